use crate::core::ids::{BankId, FacilityId, LoanId};
use crate::core::record::{FieldReader, ParseError, Record, Table, MAX_AMOUNT, MAX_RATE};
use crate::covenants::restrictions::Restrictions;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bank's line of lending capacity.
///
/// `amount` is the remaining capacity and shrinks as loans are assigned;
/// `initial_amount` keeps the capacity the facility was loaded with.
///
/// # Examples
///
/// ```
/// use loan_allocator::core::facility::Facility;
/// use loan_allocator::core::ids::{BankId, FacilityId};
/// use rust_decimal_macros::dec;
///
/// let facility = Facility::new(FacilityId::new("1"), BankId::new("1"), dec!(1000), dec!(0.05));
/// assert_eq!(facility.amount(), dec!(1000));
/// assert!(facility.loans().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    id: FacilityId,
    bank_id: BankId,
    initial_amount: Decimal,
    amount: Decimal,
    /// The facility's cost of funds.
    interest_rate: Decimal,
    restrictions: Restrictions,
    /// Assigned loans, append-only.
    loans: Vec<LoanId>,
}

impl Facility {
    pub const FIELDS: &'static [&'static str] = &["id", "bank_id", "amount", "interest_rate"];

    pub fn new(id: FacilityId, bank_id: BankId, amount: Decimal, interest_rate: Decimal) -> Self {
        Self {
            id,
            bank_id,
            initial_amount: amount,
            amount,
            interest_rate,
            restrictions: Restrictions::new(),
            loans: Vec::new(),
        }
    }

    /// Build from a `facilities` row.
    pub fn from_record(row: usize, record: &Record) -> Result<Self, ParseError> {
        let fields = FieldReader::new(Table::Facilities, row, record, Self::FIELDS)?;
        Ok(Facility::new(
            FacilityId::new(fields.required("id")?),
            BankId::new(fields.required("bank_id")?),
            fields.decimal("amount", MAX_AMOUNT)?,
            fields.decimal("interest_rate", MAX_RATE)?,
        ))
    }

    /// Record an assignment: append the loan and draw its amount down.
    ///
    /// Callers must have checked that `amount` fits; the policy only assigns
    /// after validation has passed.
    pub(crate) fn fund(&mut self, loan: LoanId, amount: Decimal) {
        debug_assert!(amount <= self.amount, "facility {} overdrawn", self.id);
        self.loans.push(loan);
        self.amount -= amount;
    }

    // --- Accessors ---

    pub fn id(&self) -> &FacilityId {
        &self.id
    }

    pub fn bank_id(&self) -> &BankId {
        &self.bank_id
    }

    /// Remaining lending capacity.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn initial_amount(&self) -> Decimal {
        self.initial_amount
    }

    /// Capacity already lent out.
    pub fn drawn(&self) -> Decimal {
        self.initial_amount - self.amount
    }

    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    /// Restrictions set directly on this facility, without its bank's.
    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    pub(crate) fn restrictions_mut(&mut self) -> &mut Restrictions {
        &mut self.restrictions
    }

    pub fn loans(&self) -> &[LoanId] {
        &self.loans
    }
}
