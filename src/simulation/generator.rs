//! Random dataset generation for stress tests and benchmarks.
//!
//! Produces raw tables in the same shape the file reader returns, so a
//! generated dataset goes through the same parse and normalize path as a
//! real one.

use crate::core::dataset::{Dataset, DatasetError, RawTables};
use crate::core::record::Record;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random lending book.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub bank_count: usize,
    pub facility_count: usize,
    pub covenant_count: usize,
    pub loan_count: usize,
    /// Facility capacity range.
    pub min_facility_amount: u64,
    pub max_facility_amount: u64,
    /// Loan principal range.
    pub min_loan_amount: u64,
    pub max_loan_amount: u64,
    /// Jurisdictions loans are drawn from, and covenants may ban.
    pub states: Vec<String>,
    /// Chance that a covenant targets a single facility rather than a bank.
    pub facility_covenant_ratio: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bank_count: 3,
            facility_count: 10,
            covenant_count: 12,
            loan_count: 200,
            min_facility_amount: 50_000,
            max_facility_amount: 500_000,
            min_loan_amount: 1_000,
            max_loan_amount: 50_000,
            states: ["CA", "NY", "TX", "FL", "MO", "MT", "VT", "IL", "AZ", "WA"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            facility_covenant_ratio: 0.5,
        }
    }
}

/// Rate with two to four decimal places, from a uniform range.
fn rate(rng: &mut impl Rng, low: f64, high: f64, dp: u32) -> String {
    let value = rng.gen_range(low..high);
    Decimal::from_f64_retain(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp(dp)
        .to_string()
}

/// Generate random input tables.
///
/// Every foreign key points at a generated record, so the result always
/// normalizes. Each bank owns at least one facility when there are enough
/// facilities to go round.
pub fn generate_tables(config: &GeneratorConfig) -> RawTables {
    let mut rng = rand::thread_rng();
    let bank_count = config.bank_count.max(1);

    let banks = (1..=bank_count)
        .map(|i| {
            Record::new()
                .with("id", i.to_string())
                .with("name", format!("BANK-{:03}", i))
        })
        .collect();

    let facility_bank: Vec<usize> = (0..config.facility_count)
        .map(|i| {
            if i < bank_count {
                i + 1
            } else {
                rng.gen_range(1..=bank_count)
            }
        })
        .collect();

    let facilities = facility_bank
        .iter()
        .enumerate()
        .map(|(i, bank)| {
            let amount =
                rng.gen_range(config.min_facility_amount..=config.max_facility_amount.max(config.min_facility_amount));
            Record::new()
                .with("id", (i + 1).to_string())
                .with("bank_id", bank.to_string())
                .with("amount", amount.to_string())
                .with("interest_rate", rate(&mut rng, 0.01, 0.08, 2))
        })
        .collect();

    let mut covenants = Vec::with_capacity(config.covenant_count);
    for _ in 0..config.covenant_count {
        let mut record = Record::new();
        let on_facility =
            !facility_bank.is_empty() && rng.gen_bool(config.facility_covenant_ratio.clamp(0.0, 1.0));
        if on_facility {
            let slot = rng.gen_range(0..facility_bank.len());
            record.insert("bank_id", facility_bank[slot].to_string());
            record.insert("facility_id", (slot + 1).to_string());
        } else {
            record.insert("bank_id", rng.gen_range(1..=bank_count).to_string());
        }
        // Roughly a third ban a state, a third cap risk, a third do both.
        let kind = rng.gen_range(0..3);
        if kind != 1 {
            if let Some(state) = config.states.choose(&mut rng) {
                record.insert("banned_state", state.clone());
            }
        }
        if kind != 0 {
            record.insert("max_default_likelihood", rate(&mut rng, 0.02, 0.12, 2));
        }
        covenants.push(record);
    }

    let loans = (1..=config.loan_count)
        .map(|i| {
            let amount =
                rng.gen_range(config.min_loan_amount..=config.max_loan_amount.max(config.min_loan_amount));
            let state = config
                .states
                .choose(&mut rng)
                .cloned()
                .unwrap_or_else(|| "CA".to_string());
            Record::new()
                .with("id", i.to_string())
                .with("amount", amount.to_string())
                .with("default_likelihood", rate(&mut rng, 0.0, 0.15, 2))
                .with("interest_rate", rate(&mut rng, 0.05, 0.35, 2))
                .with("state", state)
        })
        .collect();

    RawTables {
        banks,
        covenants,
        facilities,
        loans,
    }
}

/// Generate and normalize a random dataset.
pub fn generate_dataset(config: &GeneratorConfig) -> Result<Dataset, DatasetError> {
    Dataset::from_records(&generate_tables(config))
}
