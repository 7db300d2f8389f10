use crate::core::dataset::Dataset;
use crate::core::ids::{BankId, FacilityId, LoanId};
use crate::reporting::totals::total_yield;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// End-of-run state of one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySummary {
    pub facility: FacilityId,
    pub bank: BankId,
    pub initial_amount: Decimal,
    pub remaining_amount: Decimal,
    pub loan_count: usize,
    /// Rounded half to even.
    pub total_yield: Decimal,
}

impl FacilitySummary {
    /// Share of the initial capacity lent out, as a percentage.
    pub fn utilization_percent(&self) -> f64 {
        if self.initial_amount == Decimal::ZERO {
            return 0.0;
        }
        let drawn = self.initial_amount - self.remaining_amount;
        let pct = drawn * Decimal::from(100) / self.initial_amount;
        pct.to_string().parse::<f64>().unwrap_or(0.0)
    }
}

impl fmt::Display for FacilitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Facility: {}, Amount: {}, Loans: {}, Total Yield: {}",
            self.facility, self.remaining_amount, self.loan_count, self.total_yield
        )
    }
}

/// End-of-run state of one loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanStatus {
    pub loan: LoanId,
    pub facility: Option<FacilityId>,
    pub amount: Decimal,
    pub expected_yield: Option<Decimal>,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assigned = self
            .facility
            .as_ref()
            .map_or_else(|| "X".to_string(), |id| id.to_string());
        write!(
            f,
            "Loan {}, Assigned: {}, Amount: {}",
            self.loan, assigned, self.amount
        )
    }
}

/// A row of the assignment table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub loan_id: LoanId,
    pub facility_id: FacilityId,
}

/// A row of the yield table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldRow {
    pub facility_id: FacilityId,
    pub expected_yield: Decimal,
}

/// Everything an allocation run produced, read off the final dataset.
///
/// Facilities and loans keep input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    facilities: Vec<FacilitySummary>,
    loans: Vec<LoanStatus>,
}

impl AllocationReport {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let facilities = dataset
            .facilities()
            .iter()
            .map(|facility| FacilitySummary {
                facility: facility.id().clone(),
                bank: facility.bank_id().clone(),
                initial_amount: facility.initial_amount(),
                remaining_amount: facility.amount(),
                loan_count: facility.loans().len(),
                total_yield: total_yield(dataset, facility),
            })
            .collect();

        let loans = dataset
            .loans()
            .iter()
            .map(|loan| LoanStatus {
                loan: loan.id().clone(),
                facility: loan.assigned_facility().cloned(),
                amount: loan.amount(),
                expected_yield: loan.expected_yield(),
            })
            .collect();

        Self { facilities, loans }
    }

    pub fn facilities(&self) -> &[FacilitySummary] {
        &self.facilities
    }

    pub fn loans(&self) -> &[LoanStatus] {
        &self.loans
    }

    pub fn facility(&self, id: &FacilityId) -> Option<&FacilitySummary> {
        self.facilities.iter().find(|s| &s.facility == id)
    }

    /// `loan_id, facility_id` for every assigned loan. Unassigned loans are omitted.
    pub fn assignments(&self) -> Vec<AssignmentRow> {
        self.loans
            .iter()
            .filter_map(|status| {
                status.facility.as_ref().map(|facility| AssignmentRow {
                    loan_id: status.loan.clone(),
                    facility_id: facility.clone(),
                })
            })
            .collect()
    }

    /// `facility_id, expected_yield` for every facility, zero when it funded nothing.
    pub fn yields(&self) -> Vec<YieldRow> {
        self.facilities
            .iter()
            .map(|s| YieldRow {
                facility_id: s.facility.clone(),
                expected_yield: s.total_yield,
            })
            .collect()
    }

    pub fn unassigned(&self) -> impl Iterator<Item = &LoanStatus> {
        self.loans.iter().filter(|status| status.facility.is_none())
    }

    pub fn assigned_count(&self) -> usize {
        self.loans.iter().filter(|s| s.facility.is_some()).count()
    }

    /// Sum of the rounded per-facility totals.
    pub fn total_yield(&self) -> Decimal {
        self.facilities.iter().map(|s| s.total_yield).sum()
    }

    /// Status dump: facilities, then loans, then unassigned loans.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.facilities.len() + 2 * self.loans.len() + 3);
        lines.push("Facility Status:".to_string());
        lines.extend(self.facilities.iter().map(|s| s.to_string()));
        lines.push("Loan Status:".to_string());
        lines.extend(self.loans.iter().map(|s| s.to_string()));
        lines.push("Unassigned Loans:".to_string());
        lines.extend(self.unassigned().map(|s| s.to_string()));
        lines
    }
}

impl fmt::Display for AllocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Allocation Result ===")?;
        writeln!(f, "Loans:          {}", self.loans.len())?;
        writeln!(f, "Assigned:       {}", self.assigned_count())?;
        writeln!(f, "Unassigned:     {}", self.loans.len() - self.assigned_count())?;
        writeln!(f, "Total Yield:    {}", self.total_yield())?;

        writeln!(f, "\n--- Facilities ---")?;
        for s in &self.facilities {
            writeln!(
                f,
                "  {:<10} bank {:<8} remaining {:>14}  loans {:>5}  yield {:>10}  used {:.1}%",
                s.facility.as_str(),
                s.bank.as_str(),
                s.remaining_amount.to_string(),
                s.loan_count,
                s.total_yield.to_string(),
                s.utilization_percent()
            )?;
        }

        let unassigned: Vec<&LoanStatus> = self.unassigned().collect();
        if !unassigned.is_empty() {
            writeln!(f, "\n--- Unassigned Loans ---")?;
            for s in unassigned {
                writeln!(f, "  {} (amount {})", s.loan, s.amount)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::observer::NullObserver;
    use crate::allocation::policy::Allocator;
    use crate::core::bank::Bank;
    use crate::core::facility::Facility;
    use crate::core::ids::StateCode;
    use crate::core::loan::Loan;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn allocated() -> Dataset {
        let mut dataset = Dataset::build(
            vec![Bank::new(BankId::new("B1"))],
            vec![
                Facility::new(FacilityId::new("F1"), BankId::new("B1"), dec!(1000), dec!(0.05)),
                Facility::new(FacilityId::new("F2"), BankId::new("B1"), dec!(50), dec!(0.01)),
            ],
            vec![],
            vec![
                Loan::new(LoanId::new("L1"), dec!(600), dec!(0.01), dec!(0.10), StateCode::new("CA")),
                Loan::new(LoanId::new("L2"), dec!(500), dec!(0.01), dec!(0.10), StateCode::new("CA")),
            ],
        )
        .unwrap();
        Allocator::allocate(&mut dataset, &mut NullObserver);
        dataset
    }

    #[test]
    fn test_report_tables() {
        let report = AllocationReport::from_dataset(&allocated());

        assert_eq!(
            report.assignments(),
            vec![AssignmentRow {
                loan_id: LoanId::new("L1"),
                facility_id: FacilityId::new("F1"),
            }]
        );

        // 0.99 * 0.10 * 600 - 0.01 * 600 - 0.05 * 600 = 23.4
        let yields = report.yields();
        assert_eq!(yields.len(), 2);
        assert_eq!(yields[0].expected_yield, dec!(23));
        assert_eq!(yields[1].expected_yield, Decimal::ZERO);
        assert_eq!(report.total_yield(), dec!(23));
    }

    #[test]
    fn test_report_unassigned_listing() {
        let report = AllocationReport::from_dataset(&allocated());
        let unassigned: Vec<&LoanId> = report.unassigned().map(|s| &s.loan).collect();
        assert_eq!(unassigned, vec![&LoanId::new("L2")]);
        assert_eq!(report.assigned_count(), 1);
    }

    #[test]
    fn test_status_lines() {
        let report = AllocationReport::from_dataset(&allocated());
        let lines = report.status_lines();
        assert_eq!(lines[0], "Facility Status:");
        assert_eq!(lines[1], "Facility: F1, Amount: 400, Loans: 1, Total Yield: 23");
        assert_eq!(lines[3], "Loan Status:");
        assert_eq!(lines[4], "Loan L1, Assigned: F1, Amount: 600");
        assert_eq!(lines[5], "Loan L2, Assigned: X, Amount: 500");
        assert_eq!(lines[6], "Unassigned Loans:");
        assert_eq!(lines[7], "Loan L2, Assigned: X, Amount: 500");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_utilization_percent() {
        let report = AllocationReport::from_dataset(&allocated());
        let f1 = report.facility(&FacilityId::new("F1")).unwrap();
        assert_relative_eq!(f1.utilization_percent(), 60.0, epsilon = 1e-9);
        let f2 = report.facility(&FacilityId::new("F2")).unwrap();
        assert_relative_eq!(f2.utilization_percent(), 0.0);
    }

    #[test]
    fn test_report_serializes() {
        let report = AllocationReport::from_dataset(&allocated());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["facilities"][0]["total_yield"], "23");
        assert!(json["loans"][1]["facility"].is_null());
    }
}
