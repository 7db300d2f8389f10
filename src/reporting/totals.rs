use crate::core::dataset::Dataset;
use crate::core::facility::Facility;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a yield to whole units, half to even (12.5 -> 12, 13.5 -> 14).
pub fn round_yield(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

/// Unrounded sum of the expected yields of a facility's assigned loans.
pub fn raw_total_yield(dataset: &Dataset, facility: &Facility) -> Decimal {
    dataset
        .loans_assigned_to(facility.id())
        .filter_map(|loan| loan.expected_yield())
        .sum()
}

/// Projected yield of a facility over all its assigned loans, rounded to
/// whole units. Zero for a facility with no loans.
///
/// # Examples
///
/// ```
/// use loan_allocator::prelude::*;
/// use loan_allocator::reporting::totals::total_yield;
/// use rust_decimal_macros::dec;
///
/// let dataset = Dataset::build(
///     vec![Bank::new(BankId::new("B1"))],
///     vec![Facility::new(FacilityId::new("F1"), BankId::new("B1"), dec!(1000), dec!(0.05))],
///     vec![],
///     vec![],
/// ).unwrap();
///
/// let facility = dataset.facility(&FacilityId::new("F1")).unwrap();
/// assert_eq!(total_yield(&dataset, facility), dec!(0));
/// ```
pub fn total_yield(dataset: &Dataset, facility: &Facility) -> Decimal {
    round_yield(raw_total_yield(dataset, facility))
}
