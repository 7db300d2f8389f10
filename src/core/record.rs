use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest accepted magnitude for an amount column.
///
/// With [`MAX_RATE`] this keeps every yield, total and percentage the
/// allocator derives well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Largest accepted magnitude for a rate or likelihood column.
pub const MAX_RATE: Decimal = dec!(100);

/// The four input tables the allocator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Banks,
    Covenants,
    Facilities,
    Loans,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Banks => "banks",
            Table::Covenants => "covenants",
            Table::Facilities => "facilities",
            Table::Loans => "loans",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while turning a raw row into a typed entity.
///
/// Row numbers are 1-based and count data rows only (the header is not a row).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{table} row {row}: field '{field}' is not a number: '{value}'")]
    InvalidNumber {
        table: Table,
        row: usize,
        field: String,
        value: String,
    },
    #[error("{table} row {row}: field '{field}' is out of range (limit {limit}): '{value}'")]
    OutOfRange {
        table: Table,
        row: usize,
        field: String,
        value: String,
        limit: Decimal,
    },
    #[error("{table} row {row}: missing required field '{field}'")]
    MissingField {
        table: Table,
        row: usize,
        field: String,
    },
    #[error("{table} row {row}: unknown field '{field}'")]
    UnknownField {
        table: Table,
        row: usize,
        field: String,
    },
}

/// One input row: field name to raw string value, in header order.
///
/// # Examples
///
/// ```
/// use loan_allocator::core::record::Record;
///
/// let record: Record = [("id", "1"), ("amount", "1000")].into_iter().collect();
/// assert_eq!(record.get("amount"), Some("1000"));
/// assert_eq!(record.get("rate"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value under the same name.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

/// Typed, schema-checked access to a [`Record`].
///
/// Construction fails if the record carries a field outside `schema`.
/// Required fields must be present and non-empty; optional fields treat an
/// empty string as absent.
pub(crate) struct FieldReader<'a> {
    table: Table,
    row: usize,
    record: &'a Record,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(
        table: Table,
        row: usize,
        record: &'a Record,
        schema: &[&str],
    ) -> Result<Self, ParseError> {
        if let Some(unknown) = record.field_names().find(|name| !schema.contains(name)) {
            return Err(ParseError::UnknownField {
                table,
                row,
                field: unknown.to_string(),
            });
        }
        Ok(Self { table, row, record })
    }

    pub(crate) fn optional(&self, field: &str) -> Option<&'a str> {
        self.record.get(field).filter(|value| !value.is_empty())
    }

    pub(crate) fn required(&self, field: &str) -> Result<&'a str, ParseError> {
        self.optional(field).ok_or_else(|| ParseError::MissingField {
            table: self.table,
            row: self.row,
            field: field.to_string(),
        })
    }

    /// A required number no larger than `limit` in magnitude.
    pub(crate) fn decimal(&self, field: &str, limit: Decimal) -> Result<Decimal, ParseError> {
        let raw = self.required(field)?;
        self.parse_decimal(field, raw, limit)
    }

    pub(crate) fn optional_decimal(
        &self,
        field: &str,
        limit: Decimal,
    ) -> Result<Option<Decimal>, ParseError> {
        self.optional(field)
            .map(|raw| self.parse_decimal(field, raw, limit))
            .transpose()
    }

    fn parse_decimal(&self, field: &str, raw: &str, limit: Decimal) -> Result<Decimal, ParseError> {
        let parsed = Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw));
        match parsed {
            Ok(value) if value.abs() <= limit => Ok(value),
            Ok(_) => Err(self.out_of_range(field, raw, limit)),
            // Well-formed but beyond what Decimal can hold, e.g. 1e31.
            Err(_) if raw.parse::<f64>().map_or(false, f64::is_finite) => {
                Err(self.out_of_range(field, raw, limit))
            }
            Err(_) => Err(ParseError::InvalidNumber {
                table: self.table,
                row: self.row,
                field: field.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    fn out_of_range(&self, field: &str, raw: &str, limit: Decimal) -> ParseError {
        ParseError::OutOfRange {
            table: self.table,
            row: self.row,
            field: field.to_string(),
            value: raw.to_string(),
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[&str] = &["id", "amount", "note"];

    fn record() -> Record {
        Record::new()
            .with("id", "3")
            .with("amount", "1500.25")
            .with("note", "")
    }

    #[test]
    fn test_record_insert_replaces() {
        let mut r = Record::new().with("id", "1");
        r.insert("id", "2");
        assert_eq!(r.get("id"), Some("2"));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn test_reader_parses_decimal() {
        let r = record();
        let reader = FieldReader::new(Table::Loans, 1, &r, SCHEMA).unwrap();
        assert_eq!(reader.decimal("amount", MAX_AMOUNT).unwrap(), dec!(1500.25));
        assert_eq!(reader.required("id").unwrap(), "3");
    }

    #[test]
    fn test_reader_scientific_notation() {
        let r = Record::new().with("amount", "1e3");
        let reader = FieldReader::new(Table::Loans, 1, &r, SCHEMA).unwrap();
        assert_eq!(reader.decimal("amount", MAX_AMOUNT).unwrap(), dec!(1000));
    }

    #[test]
    fn test_reader_empty_optional_is_absent() {
        let r = record();
        let reader = FieldReader::new(Table::Loans, 1, &r, SCHEMA).unwrap();
        assert_eq!(reader.optional("note"), None);
        assert_eq!(reader.optional_decimal("note", MAX_RATE).unwrap(), None);
    }

    #[test]
    fn test_reader_rejects_unknown_field() {
        let r = record().with("colour", "red");
        let err = FieldReader::new(Table::Banks, 4, &r, SCHEMA).err().unwrap();
        assert_eq!(
            err,
            ParseError::UnknownField {
                table: Table::Banks,
                row: 4,
                field: "colour".to_string(),
            }
        );
    }

    #[test]
    fn test_reader_missing_required() {
        let r = Record::new().with("id", "1");
        let reader = FieldReader::new(Table::Facilities, 2, &r, SCHEMA).unwrap();
        assert!(matches!(
            reader.decimal("amount", MAX_AMOUNT),
            Err(ParseError::MissingField { row: 2, .. })
        ));
    }

    #[test]
    fn test_reader_invalid_number() {
        let r = Record::new().with("amount", "lots");
        let reader = FieldReader::new(Table::Loans, 9, &r, SCHEMA).unwrap();
        let err = reader.decimal("amount", MAX_AMOUNT).unwrap_err();
        assert_eq!(
            err.to_string(),
            "loans row 9: field 'amount' is not a number: 'lots'"
        );
    }

    #[test]
    fn test_reader_rejects_amount_over_limit() {
        let r = Record::new().with("amount", "1e20");
        let reader = FieldReader::new(Table::Loans, 3, &r, SCHEMA).unwrap();
        assert_eq!(
            reader.decimal("amount", MAX_AMOUNT).unwrap_err(),
            ParseError::OutOfRange {
                table: Table::Loans,
                row: 3,
                field: "amount".to_string(),
                value: "1e20".to_string(),
                limit: MAX_AMOUNT,
            }
        );
        assert_eq!(
            reader.decimal("amount", MAX_AMOUNT * dec!(1000000)).unwrap(),
            dec!(100000000000000000000)
        );
    }

    #[test]
    fn test_reader_limit_applies_to_negative_values() {
        let r = Record::new().with("amount", "-101");
        let reader = FieldReader::new(Table::Facilities, 1, &r, SCHEMA).unwrap();
        assert!(matches!(
            reader.decimal("amount", MAX_RATE),
            Err(ParseError::OutOfRange { .. })
        ));
        let r = Record::new().with("amount", "-100");
        let reader = FieldReader::new(Table::Facilities, 1, &r, SCHEMA).unwrap();
        assert_eq!(reader.decimal("amount", MAX_RATE).unwrap(), dec!(-100));
    }

    #[test]
    fn test_reader_number_beyond_decimal_range_is_out_of_range() {
        let r = Record::new().with("amount", "1e31");
        let reader = FieldReader::new(Table::Loans, 7, &r, SCHEMA).unwrap();
        let err = reader.decimal("amount", MAX_AMOUNT).unwrap_err();
        assert!(matches!(err, ParseError::OutOfRange { row: 7, .. }));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_reader_non_finite_is_not_a_number() {
        for raw in ["inf", "NaN"] {
            let r = Record::new().with("amount", raw);
            let reader = FieldReader::new(Table::Loans, 1, &r, SCHEMA).unwrap();
            assert!(matches!(
                reader.decimal("amount", MAX_AMOUNT),
                Err(ParseError::InvalidNumber { .. })
            ));
        }
    }
}
