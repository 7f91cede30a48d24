use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use loan_book_core::allocation::{allocate_loans, AllocationInput};
use loan_book_core::report;
use loan_book_core::{Bank, CovenantRecord, Facility, Loan};

// ===========================================================================
// Scenario builders
// ===========================================================================

fn bank(bank_id: u32, name: &str) -> Bank {
    Bank {
        bank_id,
        bank_name: name.to_string(),
    }
}

fn facility(facility_id: u32, bank_id: u32, rate: Decimal, amount: u64) -> Facility {
    Facility {
        amount,
        interest_rate: rate,
        facility_id,
        bank_id,
    }
}

fn covenant(facility_id: u32, bank_id: u32, ceiling: Decimal, banned: Option<&str>) -> CovenantRecord {
    CovenantRecord {
        facility_id,
        max_default_likelihood: ceiling,
        bank_id,
        banned_state: banned.map(str::to_string),
    }
}

fn loan(loan_id: u32, amount: u64, rate: Decimal, likelihood: Decimal, state: &str) -> Loan {
    Loan {
        interest_rate: rate,
        amount,
        loan_id,
        default_likelihood: likelihood,
        state: state.to_string(),
    }
}

/// The small book: one bank, one facility at 5% with 1000 capacity, one
/// covenant capping default likelihood at 0.3 and banning TX.
fn small_book(loans: Vec<Loan>) -> AllocationInput {
    AllocationInput {
        banks: vec![bank(1, "B1")],
        facilities: vec![facility(10, 1, dec!(0.05), 1000)],
        covenants: vec![covenant(10, 1, dec!(0.3), Some("TX"))],
        loans,
    }
}

// ===========================================================================
// End-to-end scenarios
// ===========================================================================

#[test]
fn test_single_loan_assigned_with_expected_yield() {
    let input = small_book(vec![loan(100, 500, dec!(0.10), dec!(0.1), "CA")]);
    let out = allocate_loans(&input).unwrap();

    let assignment = &out.result.assignments[0];
    assert_eq!(assignment.loan_id, 100);
    assert_eq!(assignment.facility_id, Some(10));
    // (1 - 0.1) * 0.10 * 500 - 0.1 * 500 - 0.05 * 500 = 45 - 50 - 25 = -30
    assert_eq!(assignment.expected_yield, dec!(-30));

    let position = &out.result.facilities[0];
    assert_eq!(position.expected_yield, dec!(-30));
    assert_eq!(position.remaining_amount, 500);
}

#[test]
fn test_banned_state_rejected_despite_capacity_and_likelihood() {
    let input = small_book(vec![
        loan(100, 500, dec!(0.10), dec!(0.1), "CA"),
        loan(101, 300, dec!(0.10), dec!(0.1), "TX"),
    ]);
    let out = allocate_loans(&input).unwrap();

    assert_eq!(out.result.assignments[1].facility_id, None);
    assert_eq!(out.result.loans_unserved, 1);
    // Only the first loan touched the facility.
    assert_eq!(out.result.facilities[0].remaining_amount, 500);
}

#[test]
fn test_oversize_loan_unserved_and_nothing_mutated() {
    let input = small_book(vec![loan(100, 5000, dec!(0.10), dec!(0.1), "CA")]);
    let out = allocate_loans(&input).unwrap();

    assert_eq!(out.result.assignments[0].facility_id, None);
    assert_eq!(out.result.assignments[0].expected_yield, Decimal::ZERO);
    assert_eq!(out.result.facilities[0].remaining_amount, 1000);
    assert_eq!(out.result.facilities[0].expected_yield, Decimal::ZERO);
}

#[test]
fn test_bank_wide_covenant_governs_uncovered_facility() {
    let mut input = small_book(vec![loan(100, 500, dec!(0.10), dec!(0.1), "NV")]);
    input.facilities = vec![facility(11, 1, dec!(0.04), 1000)];
    input.covenants = vec![covenant(0, 1, dec!(0.3), Some("NV"))];
    let out = allocate_loans(&input).unwrap();

    // Facility 11 has no specific covenant; the bank-wide ban on NV applies.
    assert_eq!(out.result.assignments[0].facility_id, None);
}

#[test]
fn test_missing_covenant_is_auto_eligible_with_warning() {
    let input = AllocationInput {
        banks: vec![bank(3, "Covenant-Free Credit Union")],
        facilities: vec![facility(30, 3, dec!(0.02), 1000)],
        covenants: vec![],
        loans: vec![loan(100, 500, dec!(0.10), dec!(0.9), "TX")],
    };
    let out = allocate_loans(&input).unwrap();

    assert_eq!(out.result.assignments[0].facility_id, Some(30));
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].contains("Covenant-Free Credit Union"));
}

// ===========================================================================
// Allocation policy properties
// ===========================================================================

#[test]
fn test_cheapest_facility_wins_not_best_yield() {
    let input = AllocationInput {
        banks: vec![bank(1, "B1"), bank(2, "B2")],
        facilities: vec![
            facility(20, 2, dec!(0.01), 1000),
            facility(10, 1, dec!(0.06), 1000),
        ],
        covenants: vec![
            covenant(20, 2, dec!(1.0), None),
            covenant(10, 1, dec!(1.0), None),
        ],
        loans: vec![loan(100, 500, dec!(0.10), dec!(0.0), "CA")],
    };
    let out = allocate_loans(&input).unwrap();
    assert_eq!(out.result.assignments[0].facility_id, Some(20));
}

#[test]
fn test_capacity_conservation_across_run() {
    let input = AllocationInput {
        banks: vec![bank(1, "B1")],
        facilities: vec![
            facility(10, 1, dec!(0.05), 1200),
            facility(11, 1, dec!(0.07), 800),
        ],
        covenants: vec![covenant(0, 1, dec!(0.5), None)],
        loans: vec![
            loan(100, 500, dec!(0.10), dec!(0.1), "CA"),
            loan(101, 400, dec!(0.09), dec!(0.2), "OR"),
            loan(102, 600, dec!(0.12), dec!(0.3), "WA"),
            loan(103, 900, dec!(0.11), dec!(0.9), "ID"), // over ceiling, unserved
        ],
    };
    let out = allocate_loans(&input).unwrap();

    for position in &out.result.facilities {
        let assigned: u64 = out
            .result
            .assignments
            .iter()
            .zip(&input.loans)
            .filter(|(a, _)| a.facility_id == Some(position.facility_id))
            .map(|(_, l)| l.amount)
            .sum();
        assert_eq!(position.remaining_amount, position.amount - assigned);
    }
    assert_eq!(out.result.loans_served, 3);
    assert_eq!(out.result.loans_unserved, 1);
}

#[test]
fn test_every_assignment_passes_its_resolved_covenant() {
    let input = AllocationInput {
        banks: vec![bank(1, "B1"), bank(2, "B2")],
        facilities: vec![
            facility(10, 1, dec!(0.03), 1000),
            facility(20, 2, dec!(0.05), 1000),
        ],
        covenants: vec![
            covenant(10, 1, dec!(0.2), Some("TX")),
            covenant(0, 2, dec!(0.4), None),
        ],
        loans: vec![
            loan(100, 300, dec!(0.10), dec!(0.1), "TX"), // banned at 10, fits 20
            loan(101, 300, dec!(0.10), dec!(0.3), "CA"), // over 10's ceiling, fits 20
            loan(102, 300, dec!(0.10), dec!(0.1), "CA"), // fits 10
        ],
    };
    let out = allocate_loans(&input).unwrap();

    assert_eq!(out.result.assignments[0].facility_id, Some(20));
    assert_eq!(out.result.assignments[1].facility_id, Some(20));
    assert_eq!(out.result.assignments[2].facility_id, Some(10));
}

#[test]
fn test_facility_positions_ascend_by_rate() {
    let input = AllocationInput {
        banks: vec![],
        facilities: vec![
            facility(3, 1, dec!(0.09), 100),
            facility(1, 1, dec!(0.02), 100),
            facility(2, 1, dec!(0.05), 100),
        ],
        covenants: vec![],
        loans: vec![],
    };
    let out = allocate_loans(&input).unwrap();
    let rates: Vec<Decimal> = out
        .result
        .facilities
        .iter()
        .map(|p| p.interest_rate)
        .collect();
    let mut sorted = rates.clone();
    sorted.sort();
    assert_eq!(rates, sorted);
}

#[test]
fn test_rerun_is_deterministic() {
    let input = small_book(vec![
        loan(100, 500, dec!(0.10), dec!(0.1), "CA"),
        loan(101, 400, dec!(0.09), dec!(0.2), "OR"),
    ]);
    let first = allocate_loans(&input).unwrap();
    let second = allocate_loans(&input).unwrap();

    let ids = |out: &loan_book_core::allocation::AllocationOutput| {
        out.assignments
            .iter()
            .map(|a| (a.loan_id, a.facility_id))
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first.result), ids(&second.result));
}

// ===========================================================================
// Reporting contract
// ===========================================================================

#[test]
fn test_output_tables_for_mixed_run() {
    let input = small_book(vec![
        loan(100, 500, dec!(0.10), dec!(0.1), "CA"),
        loan(101, 300, dec!(0.10), dec!(0.1), "TX"),
    ]);
    let out = allocate_loans(&input).unwrap();

    let assignments = report::assignment_rows(&out.result);
    assert_eq!(assignments.len(), 2);
    assert_eq!((assignments[0].loan_id, assignments[0].facility_id), (100, 10));
    assert_eq!((assignments[1].loan_id, assignments[1].facility_id), (101, 0));

    let yields = report::yield_rows(&out.result);
    assert_eq!(yields.len(), 1);
    assert_eq!(yields[0].facility_id, 10);
    assert_eq!(yields[0].expected_yield, dec!(-30));
}

#[test]
fn test_yield_rounding_applied_to_fractional_accumulation() {
    // 0.9 * 0.10 * 50 - 0.1 * 50 - 0.05 * 50 = 4.5 - 5 - 2.5 = -3
    // 0.95 * 0.09 * 50 - 0.05 * 50 - 0.05 * 50 = 4.275 - 2.5 - 2.5 = -0.725
    // accumulated: -3.725 -> rounds away from zero to -4
    let input = small_book(vec![
        loan(100, 50, dec!(0.10), dec!(0.1), "CA"),
        loan(101, 50, dec!(0.09), dec!(0.05), "OR"),
    ]);
    let out = allocate_loans(&input).unwrap();

    assert_eq!(out.result.facilities[0].expected_yield, dec!(-3.725));
    let yields = report::yield_rows(&out.result);
    assert_eq!(yields[0].expected_yield, dec!(-4));
}
