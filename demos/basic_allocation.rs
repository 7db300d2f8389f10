//! Basic loan allocation example.
//!
//! Walks through covenant resolution, yield-based selection and capacity
//! consumption on a small hand-built book.

use loan_allocator::prelude::*;
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  loan-allocator: Basic Allocation Example    ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let b1 = BankId::new("B1");
    let f1 = FacilityId::new("F1");
    let f2 = FacilityId::new("F2");

    // --- Scenario 1: A banned state steers the loan ---
    println!("━━━ Scenario 1: Covenant-restricted facility ━━━\n");

    let mut dataset = Dataset::build(
        vec![Bank::new(b1.clone()).with_name("First Lending")],
        vec![
            Facility::new(f1.clone(), b1.clone(), dec!(1000), dec!(0.05)),
            Facility::new(f2.clone(), b1.clone(), dec!(500), dec!(0.03)),
        ],
        vec![
            Covenant::new(CovenantId::new("1"), b1.clone())
                .on_facility(f2.clone())
                .banning(StateCode::new("NY")),
            Covenant::new(CovenantId::new("2"), b1.clone()).capping(dec!(0.02)),
            Covenant::new(CovenantId::new("3"), b1.clone())
                .on_facility(f1.clone())
                .capping(dec!(0.05)),
        ],
        vec![
            Loan::new(LoanId::new("L1"), dec!(400), dec!(0.01), dec!(0.10), StateCode::new("NY")),
            Loan::new(LoanId::new("L2"), dec!(450), dec!(0.01), dec!(0.10), StateCode::new("CA")),
            Loan::new(LoanId::new("L3"), dec!(100), dec!(0.03), dec!(0.25), StateCode::new("CA")),
        ],
    )
    .expect("demo dataset is well-formed");

    for id in [&f1, &f2] {
        if let Some(effective) = dataset.effective_restrictions(id) {
            let banned: Vec<&str> = effective.banned_states().map(|s| s.as_str()).collect();
            println!(
                "  {} effective: banned [{}], max default likelihood {:?}",
                id,
                banned.join(", "),
                effective.max_default_likelihood().map(|d| d.to_string())
            );
        }
    }
    println!();

    let mut observer = RecordingObserver::new();
    Allocator::allocate(&mut dataset, &mut observer);

    for event in observer.events() {
        println!("  {}", event);
    }
    println!();

    let report = AllocationReport::from_dataset(&dataset);
    println!("{}", report);

    // --- Scenario 2: Earlier loans consume capacity ---
    println!("━━━ Scenario 2: Sequential capacity consumption ━━━\n");

    let mut dataset = Dataset::build(
        vec![Bank::new(b1.clone())],
        vec![Facility::new(f1.clone(), b1, dec!(1000), dec!(0.05))],
        vec![],
        vec![
            Loan::new(LoanId::new("A"), dec!(600), dec!(0.01), dec!(0.10), StateCode::new("CA")),
            Loan::new(LoanId::new("B"), dec!(500), dec!(0.01), dec!(0.10), StateCode::new("CA")),
        ],
    )
    .expect("demo dataset is well-formed");

    let mut observer = RecordingObserver::new();
    let stats = Allocator::allocate(&mut dataset, &mut observer);
    for (loan, facility, reason) in observer.rejections() {
        println!("  Loan {} rejected by {}: {}", loan, facility, reason);
    }
    println!(
        "\n  Assigned {} of {} loans; F1 has {} left.",
        stats.assigned,
        stats.total(),
        dataset.facility(&f1).map(|f| f.amount()).unwrap_or_default()
    );
}
