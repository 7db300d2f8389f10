use crate::core::bank::Bank;
use crate::core::facility::Facility;
use crate::core::ids::StateCode;
use crate::covenants::restrictions::Restrictions;
use rust_decimal::Decimal;

/// The restrictions a facility actually enforces: its own combined with
/// those inherited from its bank.
///
/// A facility can only tighten its bank's policy. Banned states are the
/// concatenation of both lists; the default likelihood cap is the lower of
/// the two, or whichever one is set, or none.
///
/// # Examples
///
/// ```
/// use loan_allocator::covenants::resolver::EffectiveRestrictions;
/// use loan_allocator::covenants::restrictions::Restrictions;
/// use rust_decimal_macros::dec;
///
/// let mut facility = Restrictions::new();
/// facility.cap_default_likelihood(dec!(0.05));
/// let mut bank = Restrictions::new();
/// bank.cap_default_likelihood(dec!(0.02));
///
/// let effective = EffectiveRestrictions::new(&facility, &bank);
/// assert_eq!(effective.max_default_likelihood(), Some(dec!(0.02)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EffectiveRestrictions<'a> {
    own: &'a Restrictions,
    inherited: &'a Restrictions,
}

impl<'a> EffectiveRestrictions<'a> {
    pub fn new(own: &'a Restrictions, inherited: &'a Restrictions) -> Self {
        Self { own, inherited }
    }

    /// Resolve a facility against its parent bank.
    pub fn resolve(facility: &'a Facility, bank: &'a Bank) -> Self {
        debug_assert_eq!(facility.bank_id(), bank.id());
        Self::new(facility.restrictions(), bank.restrictions())
    }

    /// Facility bans first, then bank bans. Duplicates are not removed.
    pub fn banned_states(&self) -> impl Iterator<Item = &'a StateCode> + 'a {
        let own: &'a Restrictions = self.own;
        let inherited: &'a Restrictions = self.inherited;
        own.banned_states()
            .iter()
            .chain(inherited.banned_states().iter())
    }

    pub fn bans(&self, state: &StateCode) -> bool {
        self.own.bans(state) || self.inherited.bans(state)
    }

    /// `None` means no cap: every default likelihood passes.
    pub fn max_default_likelihood(&self) -> Option<Decimal> {
        match (
            self.own.max_default_likelihood(),
            self.inherited.max_default_likelihood(),
        ) {
            (Some(own), Some(inherited)) => Some(own.min(inherited)),
            (own, inherited) => own.or(inherited),
        }
    }

    /// Flatten into an owned set of restrictions.
    pub fn to_restrictions(&self) -> Restrictions {
        let mut merged = Restrictions::new();
        for state in self.banned_states() {
            merged.ban_state(state.clone());
        }
        if let Some(cap) = self.max_default_likelihood() {
            merged.cap_default_likelihood(cap);
        }
        merged
    }
}
