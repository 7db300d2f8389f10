use crate::core::covenant::Covenant;
use crate::core::ids::StateCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Restrictions accumulated on a single bank or facility from its covenants.
///
/// Banned states are kept as a list, not a set: two covenants banning the
/// same state leave two entries. The default likelihood cap only ever
/// tightens; applying a looser cap leaves the current one in place.
///
/// # Examples
///
/// ```
/// use loan_allocator::covenants::restrictions::Restrictions;
/// use loan_allocator::core::ids::StateCode;
/// use rust_decimal_macros::dec;
///
/// let mut r = Restrictions::new();
/// r.ban_state(StateCode::new("NY"));
/// r.cap_default_likelihood(dec!(0.05));
/// r.cap_default_likelihood(dec!(0.08));
///
/// assert!(r.bans(&StateCode::new("NY")));
/// assert_eq!(r.max_default_likelihood(), Some(dec!(0.05)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Restrictions {
    banned_states: Vec<StateCode>,
    max_default_likelihood: Option<Decimal>,
}

impl Restrictions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ban_state(&mut self, state: StateCode) {
        self.banned_states.push(state);
    }

    /// Lower the cap to `cap` if it is tighter than the current one (or none is set).
    pub fn cap_default_likelihood(&mut self, cap: Decimal) {
        self.max_default_likelihood = Some(match self.max_default_likelihood {
            Some(current) => current.min(cap),
            None => cap,
        });
    }

    /// Attach whichever of the covenant's restrictions are present.
    pub fn apply(&mut self, covenant: &Covenant) {
        if let Some(state) = covenant.banned_state() {
            self.ban_state(state.clone());
        }
        if let Some(cap) = covenant.max_default_likelihood() {
            self.cap_default_likelihood(cap);
        }
    }

    pub fn banned_states(&self) -> &[StateCode] {
        &self.banned_states
    }

    pub fn bans(&self, state: &StateCode) -> bool {
        self.banned_states.contains(state)
    }

    pub fn max_default_likelihood(&self) -> Option<Decimal> {
        self.max_default_likelihood
    }

    pub fn is_unrestricted(&self) -> bool {
        self.banned_states.is_empty() && self.max_default_likelihood.is_none()
    }
}
