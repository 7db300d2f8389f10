use crate::allocation::observer::{AllocationEvent, AllocationObserver};
use crate::allocation::validation::check;
use crate::allocation::yields::expected_yield;
use crate::core::dataset::Dataset;
use crate::core::ids::FacilityId;
use crate::core::loan::Loan;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The facility chosen for a loan, and the yield it expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub facility: FacilityId,
    pub expected_yield: Decimal,
    #[serde(skip)]
    slot: usize,
}

/// Counts from one allocation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStats {
    pub assigned: usize,
    pub unassigned: usize,
}

impl AllocationStats {
    pub fn total(&self) -> usize {
        self.assigned + self.unassigned
    }
}

/// Greedy, single-pass loan allocator.
///
/// Loans are taken in input order. Each one goes to the eligible facility
/// with the strictly greatest expected yield; on a tie the facility seen
/// first keeps it. A zero or negative yield is an ordinary candidate.
/// Capacity is drawn down immediately, so an earlier loan can crowd a later
/// one out of its best facility. There is no look-ahead and no backtracking.
pub struct Allocator;

impl Allocator {
    /// Allocate every loan in the dataset.
    ///
    /// # Algorithm
    ///
    /// For each loan, in input order:
    ///
    /// 1. Scan all facilities in input order, skipping any that fail validation.
    /// 2. Keep the eligible facility with the greatest expected yield.
    /// 3. If one was found, bind the loan to it and reduce its remaining
    ///    amount by the loan amount; otherwise leave the loan unassigned.
    ///
    /// Loans that already carry an assignment are skipped.
    pub fn allocate<O>(dataset: &mut Dataset, observer: &mut O) -> AllocationStats
    where
        O: AllocationObserver + ?Sized,
    {
        let mut stats = AllocationStats::default();
        for slot in 0..dataset.loans().len() {
            if dataset.loans()[slot].is_assigned() {
                continue;
            }
            match Self::allocate_loan(dataset, slot, observer) {
                Some(_) => stats.assigned += 1,
                None => stats.unassigned += 1,
            }
        }
        stats
    }

    /// Allocate the loan at position `slot`, returning where it went.
    pub(crate) fn allocate_loan<O>(
        dataset: &mut Dataset,
        slot: usize,
        observer: &mut O,
    ) -> Option<Selection>
    where
        O: AllocationObserver + ?Sized,
    {
        let loan = &dataset.loans()[slot];
        observer.on_event(AllocationEvent::LoanStarted {
            loan: loan.id().clone(),
            amount: loan.amount(),
        });

        let Some(selection) = Self::select(dataset, loan, observer) else {
            observer.on_event(AllocationEvent::Unassigned {
                loan: loan.id().clone(),
                amount: loan.amount(),
            });
            return None;
        };

        let loan_id = loan.id().clone();
        dataset.assign(slot, selection.slot, selection.expected_yield);
        observer.on_event(AllocationEvent::Assigned {
            loan: loan_id,
            facility: selection.facility.clone(),
            expected_yield: selection.expected_yield,
            remaining: dataset.facilities()[selection.slot].amount(),
        });
        Some(selection)
    }

    /// Find the best eligible facility for `loan` without changing anything.
    pub fn select<O>(dataset: &Dataset, loan: &Loan, observer: &mut O) -> Option<Selection>
    where
        O: AllocationObserver + ?Sized,
    {
        let mut best: Option<Selection> = None;

        for (slot, facility) in dataset.facilities().iter().enumerate() {
            observer.on_event(AllocationEvent::Evaluating {
                loan: loan.id().clone(),
                facility: facility.id().clone(),
            });

            let restrictions = dataset.effective_restrictions_at(slot);
            if let Err(reason) = check(loan, facility, &restrictions) {
                observer.on_event(AllocationEvent::Rejected {
                    loan: loan.id().clone(),
                    facility: facility.id().clone(),
                    reason,
                });
                continue;
            }

            let candidate = expected_yield(loan, facility);
            observer.on_event(AllocationEvent::YieldComputed {
                loan: loan.id().clone(),
                facility: facility.id().clone(),
                expected_yield: candidate,
            });

            let improves = best
                .as_ref()
                .map_or(true, |current| candidate > current.expected_yield);
            if improves {
                observer.on_event(AllocationEvent::BestSoFar {
                    loan: loan.id().clone(),
                    facility: facility.id().clone(),
                    expected_yield: candidate,
                });
                best = Some(Selection {
                    facility: facility.id().clone(),
                    expected_yield: candidate,
                    slot,
                });
            } else {
                observer.on_event(AllocationEvent::NotOptimal {
                    loan: loan.id().clone(),
                    facility: facility.id().clone(),
                    expected_yield: candidate,
                });
            }
        }
        best
    }
}
