use crate::core::ids::{FacilityId, LoanId, StateCode};
use crate::core::record::{FieldReader, ParseError, Record, Table, MAX_AMOUNT, MAX_RATE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The outcome of placing a loan: which facility funds it and the yield
/// that facility expects from it. Held as one value so that neither half
/// can be set without the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub facility: FacilityId,
    pub expected_yield: Decimal,
}

/// A loan request.
///
/// Everything but the assignment is fixed at construction.
///
/// # Examples
///
/// ```
/// use loan_allocator::core::loan::Loan;
/// use loan_allocator::core::ids::{LoanId, StateCode};
/// use rust_decimal_macros::dec;
///
/// let loan = Loan::new(LoanId::new("1"), dec!(400), dec!(0.01), dec!(0.10), StateCode::new("NY"));
/// assert!(!loan.is_assigned());
/// assert_eq!(loan.expected_yield(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    id: LoanId,
    amount: Decimal,
    default_likelihood: Decimal,
    interest_rate: Decimal,
    state: StateCode,
    assignment: Option<Assignment>,
}

impl Loan {
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "amount",
        "default_likelihood",
        "interest_rate",
        "state",
    ];

    pub fn new(
        id: LoanId,
        amount: Decimal,
        default_likelihood: Decimal,
        interest_rate: Decimal,
        state: StateCode,
    ) -> Self {
        Self {
            id,
            amount,
            default_likelihood,
            interest_rate,
            state,
            assignment: None,
        }
    }

    /// Build from a `loans` row.
    pub fn from_record(row: usize, record: &Record) -> Result<Self, ParseError> {
        let fields = FieldReader::new(Table::Loans, row, record, Self::FIELDS)?;
        Ok(Loan::new(
            LoanId::new(fields.required("id")?),
            fields.decimal("amount", MAX_AMOUNT)?,
            fields.decimal("default_likelihood", MAX_RATE)?,
            fields.decimal("interest_rate", MAX_RATE)?,
            StateCode::new(fields.required("state")?),
        ))
    }

    pub(crate) fn assign(&mut self, facility: FacilityId, expected_yield: Decimal) {
        debug_assert!(self.assignment.is_none(), "loan {} assigned twice", self.id);
        self.assignment = Some(Assignment {
            facility,
            expected_yield,
        });
    }

    // --- Accessors ---

    pub fn id(&self) -> &LoanId {
        &self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn default_likelihood(&self) -> Decimal {
        self.default_likelihood
    }

    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    pub fn state(&self) -> &StateCode {
        &self.state
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    pub fn assigned_facility(&self) -> Option<&FacilityId> {
        self.assignment.as_ref().map(|a| &a.facility)
    }

    pub fn expected_yield(&self) -> Option<Decimal> {
        self.assignment.as_ref().map(|a| a.expected_yield)
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }
}
