use crate::core::facility::Facility;
use crate::core::loan::Loan;
use rust_decimal::Decimal;

/// Expected net profit of funding `loan` through `facility`.
///
/// ```text
/// (1 - p) * r_loan * A  -  p * A  -  r_facility * A
/// ```
///
/// Interest earned if the loan repays, less principal lost if it defaults,
/// less the facility's cost of funds on the amount lent. Unrounded.
///
/// # Examples
///
/// ```
/// use loan_allocator::allocation::yields::expected_yield;
/// use loan_allocator::core::facility::Facility;
/// use loan_allocator::core::loan::Loan;
/// use loan_allocator::core::ids::*;
/// use rust_decimal_macros::dec;
///
/// let facility = Facility::new(FacilityId::new("F1"), BankId::new("B1"), dec!(1000), dec!(0.05));
/// let loan = Loan::new(LoanId::new("L1"), dec!(400), dec!(0.01), dec!(0.10), StateCode::new("NY"));
///
/// // 0.99 * 0.10 * 400 - 0.01 * 400 - 0.05 * 400
/// assert_eq!(expected_yield(&loan, &facility), dec!(15.6));
/// ```
pub fn expected_yield(loan: &Loan, facility: &Facility) -> Decimal {
    let p = loan.default_likelihood();
    let amount = loan.amount();
    (Decimal::ONE - p) * loan.interest_rate() * amount
        - p * amount
        - facility.interest_rate() * amount
}
