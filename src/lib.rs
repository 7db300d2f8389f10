//! # loan-allocator
//!
//! Covenant-aware loan allocation engine.
//!
//! Given banks, their lending facilities, the covenants restricting them and
//! a book of loan requests, this engine assigns each loan to at most one
//! facility, choosing the eligible facility with the highest expected yield.
//!
//! ## Architecture
//!
//! - **core** — Identifiers, raw records, entities and the normalized dataset
//! - **covenants** — Covenant accumulation and effective restriction resolution
//! - **allocation** — Eligibility checks, expected yield and the greedy assignment policy
//! - **reporting** — Per-facility totals, assignment and yield tables, status dumps
//! - **io** — Delimited-file readers and writers
//! - **simulation** — Random dataset generation for stress testing

pub mod allocation;
pub mod config;
pub mod core;
pub mod covenants;
pub mod io;
pub mod reporting;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::allocation::observer::{
        AllocationEvent, AllocationObserver, LogObserver, NullObserver, RecordingObserver,
    };
    pub use crate::allocation::policy::{AllocationStats, Allocator};
    pub use crate::allocation::validation::{check, validate, Rejection};
    pub use crate::allocation::yields::expected_yield;
    pub use crate::core::bank::Bank;
    pub use crate::core::covenant::Covenant;
    pub use crate::core::dataset::{Dataset, DatasetError, RawTables, ReferenceError};
    pub use crate::core::facility::Facility;
    pub use crate::core::ids::{BankId, CovenantId, FacilityId, LoanId, StateCode};
    pub use crate::core::loan::Loan;
    pub use crate::core::record::{ParseError, Record};
    pub use crate::reporting::report::AllocationReport;
}
