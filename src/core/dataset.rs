use crate::core::bank::Bank;
use crate::core::covenant::Covenant;
use crate::core::facility::Facility;
use crate::core::ids::{BankId, CovenantId, FacilityId, LoanId};
use crate::core::loan::Loan;
use crate::core::record::{ParseError, Record, Table};
use crate::covenants::resolver::EffectiveRestrictions;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A foreign key that does not resolve, or an id loaded twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("facility {facility} references unknown bank {bank_id}")]
    UnknownBankForFacility {
        facility: FacilityId,
        bank_id: BankId,
    },
    #[error("covenant {covenant} references unknown bank {bank_id}")]
    UnknownBankForCovenant {
        covenant: CovenantId,
        bank_id: BankId,
    },
    #[error("covenant {covenant} has no bank")]
    MissingBank { covenant: CovenantId },
    #[error("covenant {covenant} references unknown facility {facility_id}")]
    UnknownFacility {
        covenant: CovenantId,
        facility_id: FacilityId,
    },
    #[error("duplicate id '{id}' in {table}")]
    DuplicateId { table: Table, id: String },
}

/// Anything that makes a dataset unusable. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// The four input tables as raw rows, before any typing or linking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTables {
    pub banks: Vec<Record>,
    pub covenants: Vec<Record>,
    pub facilities: Vec<Record>,
    pub loans: Vec<Record>,
}

/// The arena owning every entity of one allocation run.
///
/// Entities refer to each other by id only; the dataset keeps the lookup
/// tables. After [`Dataset::build`] the structure is fixed. The only state
/// that changes afterwards is facility capacity, facility loan lists and
/// loan assignments, all driven by the allocation policy.
///
/// # Examples
///
/// ```
/// use loan_allocator::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let dataset = Dataset::build(
///     vec![Bank::new(BankId::new("B1"))],
///     vec![Facility::new(FacilityId::new("F1"), BankId::new("B1"), dec!(1000), dec!(0.05))],
///     vec![Covenant::new(CovenantId::new("1"), BankId::new("B1")).banning(StateCode::new("NY"))],
///     vec![],
/// ).unwrap();
///
/// let effective = dataset.effective_restrictions(&FacilityId::new("F1")).unwrap();
/// assert!(effective.bans(&StateCode::new("NY")));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    banks: Vec<Bank>,
    facilities: Vec<Facility>,
    covenants: Vec<Covenant>,
    loans: Vec<Loan>,
    #[serde(skip)]
    bank_index: HashMap<BankId, usize>,
    #[serde(skip)]
    facility_index: HashMap<FacilityId, usize>,
    #[serde(skip)]
    loan_index: HashMap<LoanId, usize>,
    /// Position of each facility's bank in `banks`, parallel to `facilities`.
    #[serde(skip)]
    facility_bank: Vec<usize>,
}

impl Dataset {
    /// Type every raw row, then normalize.
    pub fn from_records(tables: &RawTables) -> Result<Self, DatasetError> {
        let banks = parse_rows(&tables.banks, Bank::from_record)?;
        let covenants = parse_rows(&tables.covenants, Covenant::from_record)?;
        let facilities = parse_rows(&tables.facilities, Facility::from_record)?;
        let loans = parse_rows(&tables.loans, Loan::from_record)?;
        Self::build(banks, facilities, covenants, loans)
    }

    /// Link typed entities together and fold covenants into restrictions.
    ///
    /// # Normalization
    ///
    /// 1. Index banks, facilities and loans by id. Bank and facility ids are
    ///    foreign-key targets and must be unique; a repeated loan id is kept
    ///    as a separate loan and [`Dataset::loan`] finds the first.
    /// 2. Resolve each facility's bank and register the facility with it.
    /// 3. Resolve each covenant's bank (required) and facility (optional).
    /// 4. Apply each covenant to its facility if it names one, else to its bank.
    pub fn build(
        banks: Vec<Bank>,
        facilities: Vec<Facility>,
        covenants: Vec<Covenant>,
        loans: Vec<Loan>,
    ) -> Result<Self, DatasetError> {
        let bank_index = index_by(&banks, Table::Banks, |b| b.id().clone(), |id| id.to_string())?;
        let facility_index = index_by(
            &facilities,
            Table::Facilities,
            |f| f.id().clone(),
            |id| id.to_string(),
        )?;
        let mut loan_index = HashMap::with_capacity(loans.len());
        for (slot, loan) in loans.iter().enumerate() {
            loan_index.entry(loan.id().clone()).or_insert(slot);
        }

        let mut dataset = Self {
            banks,
            facilities,
            covenants,
            loans,
            bank_index,
            facility_index,
            loan_index,
            facility_bank: Vec::new(),
        };
        dataset.link_facilities()?;
        dataset.apply_covenants()?;
        Ok(dataset)
    }

    fn link_facilities(&mut self) -> Result<(), ReferenceError> {
        let mut facility_bank = Vec::with_capacity(self.facilities.len());
        for facility in &self.facilities {
            let bank_slot = *self.bank_index.get(facility.bank_id()).ok_or_else(|| {
                ReferenceError::UnknownBankForFacility {
                    facility: facility.id().clone(),
                    bank_id: facility.bank_id().clone(),
                }
            })?;
            self.banks[bank_slot].register_facility(facility.id().clone());
            facility_bank.push(bank_slot);
        }
        self.facility_bank = facility_bank;
        Ok(())
    }

    fn apply_covenants(&mut self) -> Result<(), ReferenceError> {
        for covenant in &self.covenants {
            let bank_id = covenant
                .bank_id()
                .ok_or_else(|| ReferenceError::MissingBank {
                    covenant: covenant.id().clone(),
                })?;
            let bank_slot = *self.bank_index.get(bank_id).ok_or_else(|| {
                ReferenceError::UnknownBankForCovenant {
                    covenant: covenant.id().clone(),
                    bank_id: bank_id.clone(),
                }
            })?;

            match covenant.facility_id() {
                Some(facility_id) => {
                    let slot = *self.facility_index.get(facility_id).ok_or_else(|| {
                        ReferenceError::UnknownFacility {
                            covenant: covenant.id().clone(),
                            facility_id: facility_id.clone(),
                        }
                    })?;
                    self.facilities[slot].restrictions_mut().apply(covenant);
                }
                None => self.banks[bank_slot].restrictions_mut().apply(covenant),
            }
        }
        Ok(())
    }

    // --- Lookups ---

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn covenants(&self) -> &[Covenant] {
        &self.covenants
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn bank(&self, id: &BankId) -> Option<&Bank> {
        self.bank_index.get(id).map(|&slot| &self.banks[slot])
    }

    pub fn facility(&self, id: &FacilityId) -> Option<&Facility> {
        self.facility_index.get(id).map(|&slot| &self.facilities[slot])
    }

    pub fn loan(&self, id: &LoanId) -> Option<&Loan> {
        self.loan_index.get(id).map(|&slot| &self.loans[slot])
    }

    /// The bank owning the facility at `slot`.
    pub(crate) fn bank_of(&self, slot: usize) -> &Bank {
        &self.banks[self.facility_bank[slot]]
    }

    pub(crate) fn effective_restrictions_at(&self, slot: usize) -> EffectiveRestrictions<'_> {
        EffectiveRestrictions::resolve(&self.facilities[slot], self.bank_of(slot))
    }

    /// Combined facility and bank restrictions for a facility.
    pub fn effective_restrictions(&self, id: &FacilityId) -> Option<EffectiveRestrictions<'_>> {
        self.facility_index
            .get(id)
            .map(|&slot| self.effective_restrictions_at(slot))
    }

    /// Facilities registered to a bank, in input order.
    pub fn facilities_of<'a>(&'a self, bank: &BankId) -> impl Iterator<Item = &'a Facility> + 'a {
        self.bank(bank)
            .map(|b| b.facilities())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |id| self.facility(id))
    }

    /// Loans assigned to a facility, in assignment order.
    pub fn loans_assigned_to<'a>(
        &'a self,
        facility: &'a FacilityId,
    ) -> impl Iterator<Item = &'a Loan> + 'a {
        self.loans
            .iter()
            .filter(move |loan| loan.assigned_facility() == Some(facility))
    }

    pub fn unassigned_loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.iter().filter(|loan| !loan.is_assigned())
    }

    /// Bind loan and facility and draw the facility down.
    pub(crate) fn assign(&mut self, loan_slot: usize, facility_slot: usize, expected_yield: Decimal) {
        let loan = &mut self.loans[loan_slot];
        let facility = &mut self.facilities[facility_slot];
        loan.assign(facility.id().clone(), expected_yield);
        facility.fund(loan.id().clone(), loan.amount());
    }
}

fn parse_rows<T>(
    rows: &[Record],
    parse: impl Fn(usize, &Record) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    rows.iter()
        .enumerate()
        .map(|(i, record)| parse(i + 1, record))
        .collect()
}

fn index_by<T, K: std::hash::Hash + Eq>(
    items: &[T],
    table: Table,
    key: impl Fn(&T) -> K,
    describe: impl Fn(&K) -> String,
) -> Result<HashMap<K, usize>, ReferenceError> {
    let mut index = HashMap::with_capacity(items.len());
    for (slot, item) in items.iter().enumerate() {
        let id = key(item);
        if index.contains_key(&id) {
            return Err(ReferenceError::DuplicateId {
                table,
                id: describe(&id),
            });
        }
        index.insert(id, slot);
    }
    Ok(index)
}
