use crate::core::facility::Facility;
use crate::core::ids::StateCode;
use crate::core::loan::Loan;
use crate::covenants::resolver::EffectiveRestrictions;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a facility cannot take a loan. Checks run in this order and stop at
/// the first failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The loan originates from a state the facility or its bank bans.
    BannedState {
        state: StateCode,
        banned: Vec<StateCode>,
    },
    /// The loan is riskier than the effective cap allows.
    DefaultLikelihood { likelihood: Decimal, cap: Decimal },
    /// The facility has less capacity left than the loan needs.
    InsufficientFunds { available: Decimal, requested: Decimal },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::BannedState { state, banned } => {
                let banned: Vec<&str> = banned.iter().map(|s| s.as_str()).collect();
                write!(
                    f,
                    "originating state {} is banned (banned states: [{}])",
                    state,
                    banned.join(", ")
                )
            }
            Rejection::DefaultLikelihood { likelihood, cap } => write!(
                f,
                "default likelihood {} exceeds maximum {}",
                likelihood, cap
            ),
            Rejection::InsufficientFunds {
                available,
                requested,
            } => write!(
                f,
                "insufficient facility funds: {} available, loan amount {}",
                available, requested
            ),
        }
    }
}

/// Check whether `facility`, under `restrictions`, may fund `loan` right now.
///
/// `restrictions` must be the facility's effective restrictions. The
/// capacity check uses the facility's current remaining amount, so the
/// answer can change once other loans have been assigned.
pub fn check(
    loan: &Loan,
    facility: &Facility,
    restrictions: &EffectiveRestrictions<'_>,
) -> Result<(), Rejection> {
    if restrictions.bans(loan.state()) {
        return Err(Rejection::BannedState {
            state: loan.state().clone(),
            banned: restrictions.banned_states().cloned().collect(),
        });
    }
    if let Some(cap) = restrictions.max_default_likelihood() {
        if loan.default_likelihood() > cap {
            return Err(Rejection::DefaultLikelihood {
                likelihood: loan.default_likelihood(),
                cap,
            });
        }
    }
    if loan.amount() > facility.amount() {
        return Err(Rejection::InsufficientFunds {
            available: facility.amount(),
            requested: loan.amount(),
        });
    }
    Ok(())
}

/// Boolean form of [`check`].
pub fn validate(loan: &Loan, facility: &Facility, restrictions: &EffectiveRestrictions<'_>) -> bool {
    check(loan, facility, restrictions).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{BankId, FacilityId, LoanId};
    use crate::covenants::restrictions::Restrictions;
    use rust_decimal_macros::dec;

    fn facility(amount: Decimal) -> Facility {
        Facility::new(FacilityId::new("F1"), BankId::new("B1"), amount, dec!(0.05))
    }

    fn loan(amount: Decimal, likelihood: Decimal, state: &str) -> Loan {
        Loan::new(
            LoanId::new("L1"),
            amount,
            likelihood,
            dec!(0.10),
            StateCode::new(state),
        )
    }

    #[test]
    fn test_unrestricted_facility_accepts() {
        let open = Restrictions::new();
        let effective = EffectiveRestrictions::new(&open, &open);
        assert!(validate(&loan(dec!(400), dec!(0.5), "NY"), &facility(dec!(1000)), &effective));
    }

    #[test]
    fn test_banned_state_rejects() {
        let mut own = Restrictions::new();
        own.ban_state(StateCode::new("NY"));
        let bank = Restrictions::new();
        let effective = EffectiveRestrictions::new(&own, &bank);

        let result = check(&loan(dec!(400), dec!(0.01), "NY"), &facility(dec!(1000)), &effective);
        assert_eq!(
            result,
            Err(Rejection::BannedState {
                state: StateCode::new("NY"),
                banned: vec![StateCode::new("NY")],
            })
        );
    }

    #[test]
    fn test_bank_ban_applies_to_facility() {
        let own = Restrictions::new();
        let mut bank = Restrictions::new();
        bank.ban_state(StateCode::new("VT"));
        let effective = EffectiveRestrictions::new(&own, &bank);
        assert!(!validate(&loan(dec!(1), dec!(0), "VT"), &facility(dec!(10)), &effective));
    }

    #[test]
    fn test_default_likelihood_cap() {
        let mut own = Restrictions::new();
        own.cap_default_likelihood(dec!(0.05));
        let mut bank = Restrictions::new();
        bank.cap_default_likelihood(dec!(0.02));
        let effective = EffectiveRestrictions::new(&own, &bank);

        let f = facility(dec!(1000));
        assert!(validate(&loan(dec!(100), dec!(0.02), "CA"), &f, &effective));
        assert_eq!(
            check(&loan(dec!(100), dec!(0.03), "CA"), &f, &effective),
            Err(Rejection::DefaultLikelihood {
                likelihood: dec!(0.03),
                cap: dec!(0.02),
            })
        );
    }

    #[test]
    fn test_amount_must_fit_remaining_capacity() {
        let open = Restrictions::new();
        let effective = EffectiveRestrictions::new(&open, &open);
        let f = facility(dec!(400));
        assert!(validate(&loan(dec!(400), dec!(0.01), "CA"), &f, &effective));
        assert_eq!(
            check(&loan(dec!(500), dec!(0.01), "CA"), &f, &effective),
            Err(Rejection::InsufficientFunds {
                available: dec!(400),
                requested: dec!(500),
            })
        );
    }

    #[test]
    fn test_banned_state_checked_before_funds() {
        let mut own = Restrictions::new();
        own.ban_state(StateCode::new("NY"));
        let effective = EffectiveRestrictions::new(&own, &own);
        let result = check(&loan(dec!(5000), dec!(0.9), "NY"), &facility(dec!(10)), &effective);
        assert!(matches!(result, Err(Rejection::BannedState { .. })));
    }

    #[test]
    fn test_validate_is_repeatable() {
        let open = Restrictions::new();
        let effective = EffectiveRestrictions::new(&open, &open);
        let l = loan(dec!(600), dec!(0.01), "CA");
        let f = facility(dec!(500));
        assert_eq!(validate(&l, &f, &effective), validate(&l, &f, &effective));
    }

    #[test]
    fn test_rejection_display() {
        let r = Rejection::InsufficientFunds {
            available: dec!(400),
            requested: dec!(500),
        };
        assert_eq!(
            r.to_string(),
            "insufficient facility funds: 400 available, loan amount 500"
        );
    }
}
