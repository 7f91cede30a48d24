//! Loan allocator.
//!
//! Assigns each loan to the first facility, in ascending-rate order, that
//! has enough remaining capacity and whose resolved covenant the loan
//! passes. Greedy first-fit: the cheapest qualifying facility wins even when
//! a later facility would yield more. Loans are processed strictly in input
//! order and every commit depletes capacity before the next loan is
//! evaluated, so outcomes depend on loan order; that order dependence is the
//! documented policy.
//!
//! All rate and yield arithmetic uses `rust_decimal::Decimal`. No `f64`.

use std::collections::HashSet;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::covenant::CovenantIndex;
use crate::eligibility;
use crate::error::LoanBookError;
use crate::ledger::{FacilityEntry, FacilityLedger};
use crate::types::{
    with_metadata, Bank, BankId, ComputationOutput, CovenantRecord, Facility, FacilityId, Loan,
    LoanId, Rate,
};
use crate::LoanBookResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Everything one allocation run consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationInput {
    /// Known banks; only used to attach display names to diagnostics.
    pub banks: Vec<Bank>,
    pub facilities: Vec<Facility>,
    /// Raw covenant rows, merged into the index at the start of the run.
    pub covenants: Vec<CovenantRecord>,
    /// Loan requests in processing order.
    pub loans: Vec<Loan>,
}

/// Outcome recorded for one loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAssignment {
    pub loan_id: LoanId,
    /// Serving facility; `None` when no facility qualified.
    pub facility_id: Option<FacilityId>,
    /// Expected yield this loan contributes to its facility; zero when unserved.
    pub expected_yield: Decimal,
}

/// Final position of one facility after all loans are processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityPosition {
    pub facility_id: FacilityId,
    pub bank_id: BankId,
    pub interest_rate: Rate,
    /// Original capacity.
    pub amount: u64,
    /// Capacity left after all assignments.
    pub remaining_amount: u64,
    /// Accumulated expected yield, unrounded.
    pub expected_yield: Decimal,
}

impl From<&FacilityEntry> for FacilityPosition {
    fn from(entry: &FacilityEntry) -> Self {
        FacilityPosition {
            facility_id: entry.facility.facility_id,
            bank_id: entry.facility.bank_id,
            interest_rate: entry.facility.interest_rate,
            amount: entry.facility.amount,
            remaining_amount: entry.remaining_amount,
            expected_yield: entry.expected_yield,
        }
    }
}

/// Output of a full allocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutput {
    /// One entry per input loan, in input order.
    pub assignments: Vec<LoanAssignment>,
    /// Facility positions in ledger (ascending-rate) order.
    pub facilities: Vec<FacilityPosition>,
    pub loans_served: usize,
    pub loans_unserved: usize,
}

/// A facility selected for a loan, prior to commit.
#[derive(Debug, Clone, Copy)]
pub struct FacilityMatch {
    /// Position in the ledger's traversal order.
    pub position: usize,
    pub facility_id: FacilityId,
    pub expected_yield: Decimal,
}

// ---------------------------------------------------------------------------
// Allocator
// ---------------------------------------------------------------------------

/// Assigns loans to facilities, cheapest qualifying facility first.
pub struct Allocator<'a> {
    ledger: &'a mut FacilityLedger,
    covenants: &'a CovenantIndex,
    banks: &'a [Bank],
    warnings: Vec<String>,
    unrestricted_banks: HashSet<BankId>,
}

impl<'a> Allocator<'a> {
    pub fn new(
        ledger: &'a mut FacilityLedger,
        covenants: &'a CovenantIndex,
        banks: &'a [Bank],
    ) -> Self {
        Allocator {
            ledger,
            covenants,
            banks,
            warnings: Vec::new(),
            unrestricted_banks: HashSet::new(),
        }
    }

    /// Find the first facility, in ascending-rate order, with enough
    /// remaining capacity and a passing (or absent) covenant, along with the
    /// expected yield of funding `loan` there. `None` when the traversal
    /// exhausts without a qualifier.
    pub fn find_facility(&mut self, loan: &Loan) -> Option<FacilityMatch> {
        let covenants = self.covenants;
        for position in 0..self.ledger.len() {
            let (bank_id, facility_id, facility_rate, remaining) = {
                let entry = &self.ledger.entries()[position];
                (
                    entry.facility.bank_id,
                    entry.facility.facility_id,
                    entry.facility.interest_rate,
                    entry.remaining_amount,
                )
            };
            if remaining < loan.amount {
                continue;
            }
            match covenants.lookup(bank_id, facility_id) {
                Some(covenant) => {
                    if !eligibility::passes(covenant, loan) {
                        continue;
                    }
                }
                // A bank with no covenant at either level accepts any loan.
                // Noteworthy, not an error.
                None => self.note_unrestricted(bank_id),
            }
            return Some(FacilityMatch {
                position,
                facility_id,
                expected_yield: expected_yield(facility_rate, loan),
            });
        }
        None
    }

    /// Process every loan in input order, committing each assignment
    /// (capacity depleted, yield accumulated) before the next loan is
    /// evaluated. Unserved loans are recorded and processing continues.
    pub fn serve_all(&mut self, loans: &[Loan]) -> Vec<LoanAssignment> {
        let mut assignments = Vec::with_capacity(loans.len());
        for loan in loans {
            match self.find_facility(loan) {
                Some(found) => {
                    self.ledger
                        .commit(found.position, loan.amount, found.expected_yield);
                    assignments.push(LoanAssignment {
                        loan_id: loan.loan_id,
                        facility_id: Some(found.facility_id),
                        expected_yield: found.expected_yield,
                    });
                }
                None => assignments.push(LoanAssignment {
                    loan_id: loan.loan_id,
                    facility_id: None,
                    expected_yield: Decimal::ZERO,
                }),
            }
        }
        assignments
    }

    /// Drain the warnings collected while serving loans.
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    fn note_unrestricted(&mut self, bank_id: BankId) {
        if self.unrestricted_banks.insert(bank_id) {
            let warning = match self.banks.iter().find(|b| b.bank_id == bank_id) {
                Some(bank) => format!(
                    "No covenant for bank {} ({}); its facilities accept any loan.",
                    bank_id, bank.bank_name
                ),
                None => format!(
                    "No covenant for bank {}; its facilities accept any loan.",
                    bank_id
                ),
            };
            self.warnings.push(warning);
        }
    }
}

/// Expected yield to a facility charging `facility_rate` from funding `loan`:
/// interest gains weighted by survival, net of expected default cost and the
/// facility's own cost of funds.
pub fn expected_yield(facility_rate: Rate, loan: &Loan) -> Decimal {
    let amount = Decimal::from(loan.amount);
    let gains = (Decimal::ONE - loan.default_likelihood) * loan.interest_rate * amount;
    let default_cost = loan.default_likelihood * amount;
    let facility_cost = facility_rate * amount;
    gains - default_cost - facility_cost
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run the full pipeline: build the covenant index and the rate-ordered
/// ledger, serve every loan in input order, and report final positions.
pub fn allocate_loans(
    input: &AllocationInput,
) -> LoanBookResult<ComputationOutput<AllocationOutput>> {
    let start = Instant::now();
    validate_allocation_input(input)?;

    let covenants = CovenantIndex::from_records(&input.covenants);
    let mut ledger = FacilityLedger::build(input.facilities.clone());

    let mut allocator = Allocator::new(&mut ledger, &covenants, &input.banks);
    let assignments = allocator.serve_all(&input.loans);
    let mut warnings = allocator.into_warnings();

    for loan in &input.loans {
        if loan.default_likelihood < Decimal::ZERO || loan.default_likelihood > Decimal::ONE {
            warnings.push(format!(
                "Loan {} has default likelihood {} outside [0, 1]; processed as given.",
                loan.loan_id, loan.default_likelihood
            ));
        }
    }

    let loans_served = assignments
        .iter()
        .filter(|a| a.facility_id.is_some())
        .count();
    let output = AllocationOutput {
        facilities: ledger.entries().iter().map(FacilityPosition::from).collect(),
        loans_unserved: assignments.len() - loans_served,
        loans_served,
        assignments,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "facility_count": input.facilities.len(),
        "covenant_rows": input.covenants.len(),
        "loan_count": input.loans.len(),
        "ordering": "ascending interest rate, input order on ties",
    });

    Ok(with_metadata(
        "Greedy first-fit allocation over rate-ordered facilities",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_allocation_input(input: &AllocationInput) -> LoanBookResult<()> {
    for facility in &input.facilities {
        if facility.interest_rate < Decimal::ZERO {
            return Err(LoanBookError::InvalidInput {
                field: "interest_rate".into(),
                reason: format!(
                    "Interest rate must be non-negative for facility {}.",
                    facility.facility_id
                ),
            });
        }
    }
    for loan in &input.loans {
        if loan.interest_rate < Decimal::ZERO {
            return Err(LoanBookError::InvalidInput {
                field: "interest_rate".into(),
                reason: format!("Interest rate must be non-negative for loan {}.", loan.loan_id),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
