use crate::core::ids::{BankId, CovenantId, FacilityId, StateCode};
use crate::core::record::{FieldReader, ParseError, Record, Table, MAX_RATE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A restriction rule attached to a bank, or to one of its facilities.
///
/// A covenant carries at most one banned state and at most one default
/// likelihood cap. During normalization it is folded into the restrictions
/// of its target: the facility when `facility_id` is set, else the bank.
///
/// # Examples
///
/// ```
/// use loan_allocator::core::covenant::Covenant;
/// use loan_allocator::core::ids::{BankId, CovenantId, FacilityId, StateCode};
///
/// let covenant = Covenant::new(CovenantId::new("1"), BankId::new("1"))
///     .on_facility(FacilityId::new("2"))
///     .banning(StateCode::new("NY"));
///
/// assert_eq!(covenant.facility_id(), Some(&FacilityId::new("2")));
/// assert_eq!(covenant.max_default_likelihood(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Covenant {
    id: CovenantId,
    /// Required, but only checked during normalization.
    bank_id: Option<BankId>,
    facility_id: Option<FacilityId>,
    banned_state: Option<StateCode>,
    max_default_likelihood: Option<Decimal>,
}

impl Covenant {
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "bank_id",
        "facility_id",
        "banned_state",
        "max_default_likelihood",
    ];

    /// A bank-wide covenant with no restrictions yet.
    pub fn new(id: CovenantId, bank_id: BankId) -> Self {
        Self {
            id,
            bank_id: Some(bank_id),
            facility_id: None,
            banned_state: None,
            max_default_likelihood: None,
        }
    }

    /// Narrow the covenant to a single facility.
    pub fn on_facility(mut self, facility_id: FacilityId) -> Self {
        self.facility_id = Some(facility_id);
        self
    }

    pub fn banning(mut self, state: StateCode) -> Self {
        self.banned_state = Some(state);
        self
    }

    pub fn capping(mut self, max_default_likelihood: Decimal) -> Self {
        self.max_default_likelihood = Some(max_default_likelihood);
        self
    }

    /// Build from a `covenants` row. The `id` column is optional; when it is
    /// missing the 1-based row number is used instead.
    pub fn from_record(row: usize, record: &Record) -> Result<Self, ParseError> {
        let fields = FieldReader::new(Table::Covenants, row, record, Self::FIELDS)?;
        let id = fields
            .optional("id")
            .map(CovenantId::new)
            .unwrap_or_else(|| CovenantId::new(row.to_string()));
        Ok(Self {
            id,
            bank_id: fields.optional("bank_id").map(BankId::new),
            facility_id: fields.optional("facility_id").map(FacilityId::new),
            banned_state: fields.optional("banned_state").map(StateCode::new),
            max_default_likelihood: fields.optional_decimal("max_default_likelihood", MAX_RATE)?,
        })
    }

    // --- Accessors ---

    pub fn id(&self) -> &CovenantId {
        &self.id
    }

    pub fn bank_id(&self) -> Option<&BankId> {
        self.bank_id.as_ref()
    }

    pub fn facility_id(&self) -> Option<&FacilityId> {
        self.facility_id.as_ref()
    }

    pub fn banned_state(&self) -> Option<&StateCode> {
        self.banned_state.as_ref()
    }

    pub fn max_default_likelihood(&self) -> Option<Decimal> {
        self.max_default_likelihood
    }
}
