use crate::core::ids::{BankId, FacilityId};
use crate::core::record::{FieldReader, ParseError, Record, Table};
use crate::covenants::restrictions::Restrictions;
use serde::{Deserialize, Serialize};

/// A lender. Its restrictions apply to every facility it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    id: BankId,
    name: Option<String>,
    restrictions: Restrictions,
    /// Facilities registered to this bank during normalization, in input order.
    facilities: Vec<FacilityId>,
}

impl Bank {
    pub const FIELDS: &'static [&'static str] = &["id", "name"];

    pub fn new(id: BankId) -> Self {
        Self {
            id,
            name: None,
            restrictions: Restrictions::new(),
            facilities: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build from a `banks` row.
    pub fn from_record(row: usize, record: &Record) -> Result<Self, ParseError> {
        let fields = FieldReader::new(Table::Banks, row, record, Self::FIELDS)?;
        let mut bank = Bank::new(BankId::new(fields.required("id")?));
        bank.name = fields.optional("name").map(str::to_string);
        Ok(bank)
    }

    pub fn id(&self) -> &BankId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    pub(crate) fn restrictions_mut(&mut self) -> &mut Restrictions {
        &mut self.restrictions
    }

    pub fn facilities(&self) -> &[FacilityId] {
        &self.facilities
    }

    pub(crate) fn register_facility(&mut self, facility: FacilityId) {
        self.facilities.push(facility);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_from_record() {
        let record = Record::new().with("id", "1").with("name", "Chase");
        let bank = Bank::from_record(1, &record).unwrap();
        assert_eq!(bank.id(), &BankId::new("1"));
        assert_eq!(bank.name(), Some("Chase"));
        assert!(bank.restrictions().is_unrestricted());
        assert!(bank.facilities().is_empty());
    }

    #[test]
    fn test_bank_requires_id() {
        let record = Record::new().with("name", "Chase");
        assert!(matches!(
            Bank::from_record(2, &record),
            Err(ParseError::MissingField { row: 2, .. })
        ));
    }

    #[test]
    fn test_bank_rejects_unknown_field() {
        let record = Record::new().with("id", "1").with("rating", "AA");
        assert!(matches!(
            Bank::from_record(1, &record),
            Err(ParseError::UnknownField { .. })
        ));
    }
}
