use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a lending bank, as given in the `banks` table.
    ///
    /// # Examples
    ///
    /// ```
    /// use loan_allocator::core::ids::BankId;
    ///
    /// let a = BankId::new("1");
    /// let b = BankId::new("2");
    /// assert_ne!(a, b);
    /// ```
    BankId
);

string_id!(
    /// Identifier of a facility (a bank's line of lending capacity).
    FacilityId
);

string_id!(
    /// Identifier of a covenant. Covenant tables often carry no id column,
    /// in which case the row number is used.
    CovenantId
);

string_id!(
    /// Identifier of a loan request.
    LoanId
);

string_id!(
    /// Jurisdiction code a loan originates from, e.g. `"NY"`.
    StateCode
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality() {
        assert_eq!(FacilityId::new("7"), FacilityId::from("7"));
        assert_ne!(LoanId::new("1"), LoanId::new("2"));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(format!("{}", StateCode::new("CA")), "CA");
        assert_eq!(BankId::new("12").as_str(), "12");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&LoanId::new("42")).unwrap();
        assert_eq!(json, "\"42\"");
    }
}
