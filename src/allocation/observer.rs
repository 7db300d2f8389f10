//! Observability port for the allocation run.
//!
//! The allocator never logs on its own. It reports what it does as
//! [`AllocationEvent`]s to an [`AllocationObserver`] chosen by the caller.

use crate::allocation::validation::Rejection;
use crate::core::ids::{FacilityId, LoanId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AllocationEvent {
    /// Allocation of a loan is starting.
    LoanStarted { loan: LoanId, amount: Decimal },
    /// A facility is about to be validated against the loan.
    Evaluating { loan: LoanId, facility: FacilityId },
    Rejected {
        loan: LoanId,
        facility: FacilityId,
        reason: Rejection,
    },
    YieldComputed {
        loan: LoanId,
        facility: FacilityId,
        expected_yield: Decimal,
    },
    /// The facility is the best candidate seen so far for this loan.
    BestSoFar {
        loan: LoanId,
        facility: FacilityId,
        expected_yield: Decimal,
    },
    /// Eligible, but an earlier facility yields at least as much.
    NotOptimal {
        loan: LoanId,
        facility: FacilityId,
        expected_yield: Decimal,
    },
    Assigned {
        loan: LoanId,
        facility: FacilityId,
        expected_yield: Decimal,
        remaining: Decimal,
    },
    /// No facility could take the loan. Not an error.
    Unassigned { loan: LoanId, amount: Decimal },
}

impl AllocationEvent {
    pub fn loan(&self) -> &LoanId {
        match self {
            AllocationEvent::LoanStarted { loan, .. }
            | AllocationEvent::Evaluating { loan, .. }
            | AllocationEvent::Rejected { loan, .. }
            | AllocationEvent::YieldComputed { loan, .. }
            | AllocationEvent::BestSoFar { loan, .. }
            | AllocationEvent::NotOptimal { loan, .. }
            | AllocationEvent::Assigned { loan, .. }
            | AllocationEvent::Unassigned { loan, .. } => loan,
        }
    }

    /// Severity the event carries when forwarded to a log.
    pub fn level(&self) -> log::Level {
        match self {
            AllocationEvent::Assigned { .. } => log::Level::Info,
            AllocationEvent::Unassigned { .. } => log::Level::Warn,
            _ => log::Level::Debug,
        }
    }
}

impl fmt::Display for AllocationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationEvent::LoanStarted { loan, amount } => {
                write!(f, "Assigning loan: {}, amount: {}", loan, amount)
            }
            AllocationEvent::Evaluating { facility, .. } => {
                write!(f, "Validating facility: {}", facility)
            }
            AllocationEvent::Rejected {
                facility, reason, ..
            } => write!(f, " - Facility {} is invalid: {}", facility, reason),
            AllocationEvent::YieldComputed { expected_yield, .. } => {
                write!(f, " - Expected yield: {}", expected_yield)
            }
            AllocationEvent::BestSoFar {
                facility,
                expected_yield,
                ..
            } => write!(
                f,
                " - Best facility so far: {}, expected yield: {}",
                facility, expected_yield
            ),
            AllocationEvent::NotOptimal { facility, .. } => {
                write!(f, " - Facility {} is not optimal", facility)
            }
            AllocationEvent::Assigned {
                loan,
                facility,
                expected_yield,
                remaining,
            } => write!(
                f,
                "Loan {} assigned to facility {} (expected yield {}, remaining {})",
                loan, facility, expected_yield, remaining
            ),
            AllocationEvent::Unassigned { loan, amount } => {
                write!(f, "Unable to assign loan: {}, Amount: {}", loan, amount)
            }
        }
    }
}

/// Receives allocation events as they happen.
pub trait AllocationObserver {
    fn on_event(&mut self, event: AllocationEvent);
}

impl<O: AllocationObserver + ?Sized> AllocationObserver for &mut O {
    fn on_event(&mut self, event: AllocationEvent) {
        (**self).on_event(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl AllocationObserver for NullObserver {
    fn on_event(&mut self, _event: AllocationEvent) {}
}

/// Forwards events to the `log` facade at [`AllocationEvent::level`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl AllocationObserver for LogObserver {
    fn on_event(&mut self, event: AllocationEvent) {
        log::log!(event.level(), "{}", event);
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Vec<AllocationEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AllocationEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<AllocationEvent> {
        self.events
    }

    /// Events that concern one loan.
    pub fn for_loan<'a>(&'a self, loan: &'a LoanId) -> impl Iterator<Item = &'a AllocationEvent> {
        self.events.iter().filter(move |e| e.loan() == loan)
    }

    pub fn rejections(&self) -> impl Iterator<Item = (&LoanId, &FacilityId, &Rejection)> {
        self.events.iter().filter_map(|e| match e {
            AllocationEvent::Rejected {
                loan,
                facility,
                reason,
            } => Some((loan, facility, reason)),
            _ => None,
        })
    }

    pub fn unassigned(&self) -> impl Iterator<Item = &LoanId> {
        self.events.iter().filter_map(|e| match e {
            AllocationEvent::Unassigned { loan, .. } => Some(loan),
            _ => None,
        })
    }
}

impl AllocationObserver for RecordingObserver {
    fn on_event(&mut self, event: AllocationEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_recording_observer_filters() {
        let mut observer = RecordingObserver::new();
        observer.on_event(AllocationEvent::Rejected {
            loan: LoanId::new("1"),
            facility: FacilityId::new("2"),
            reason: Rejection::InsufficientFunds {
                available: dec!(1),
                requested: dec!(2),
            },
        });
        observer.on_event(AllocationEvent::Unassigned {
            loan: LoanId::new("1"),
            amount: dec!(2),
        });
        observer.on_event(AllocationEvent::LoanStarted {
            loan: LoanId::new("3"),
            amount: dec!(5),
        });

        assert_eq!(observer.rejections().count(), 1);
        assert_eq!(observer.unassigned().collect::<Vec<_>>(), vec![&LoanId::new("1")]);
        assert_eq!(observer.for_loan(&LoanId::new("3")).count(), 1);
    }

    #[test]
    fn test_event_levels() {
        let unassigned = AllocationEvent::Unassigned {
            loan: LoanId::new("1"),
            amount: dec!(2),
        };
        assert_eq!(unassigned.level(), log::Level::Warn);
        assert_eq!(
            unassigned.to_string(),
            "Unable to assign loan: 1, Amount: 2"
        );
    }

    #[test]
    fn test_observer_through_mut_reference() {
        fn feed<O: AllocationObserver>(mut observer: O) {
            observer.on_event(AllocationEvent::Unassigned {
                loan: LoanId::new("9"),
                amount: dec!(1),
            });
        }

        let mut observer = RecordingObserver::new();
        feed(&mut observer);
        assert_eq!(observer.events().len(), 1);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = AllocationEvent::Evaluating {
            loan: LoanId::new("1"),
            facility: FacilityId::new("2"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "evaluating");
        assert_eq!(json["facility"], "2");
    }
}
