use clap::Args;

use loan_book_core::allocation::{allocate_loans, AllocationInput};
use loan_book_core::report;

use crate::input;
use crate::output::{self, RunSummary};

/// Arguments for the allocate command
#[derive(Args)]
pub struct AllocateArgs {
    /// Path to the banks CSV (bank_id, bank_name); used to name banks in
    /// the summary and warnings
    #[arg(long)]
    pub banks: Option<String>,

    /// Path to the facilities CSV (amount, interest_rate, facility_id, bank_id)
    #[arg(long)]
    pub facilities: String,

    /// Path to the covenants CSV (facility_id, max_default_likelihood,
    /// bank_id, banned_state)
    #[arg(long)]
    pub covenants: String,

    /// Path to the loans CSV (interest_rate, amount, loan_id,
    /// default_likelihood, state); read from stdin when omitted and data is
    /// piped
    #[arg(long)]
    pub loans: Option<String>,

    /// Where to write the loan assignments table
    #[arg(long, default_value = "output/assignments.csv")]
    pub assignments: String,

    /// Where to write the facility yields table
    #[arg(long, default_value = "output/yields.csv")]
    pub yields: String,
}

pub fn run_allocate(args: AllocateArgs) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let banks = match &args.banks {
        Some(path) => input::csv_in::read_banks(path)?,
        None => Vec::new(),
    };
    let facilities = input::csv_in::read_facilities(&args.facilities)?;
    let covenants = input::csv_in::read_covenants(&args.covenants)?;
    let loans = match &args.loans {
        Some(path) => input::csv_in::read_loans(path)?,
        None => input::stdin::read_stdin_loans()?
            .ok_or("--loans is required (or pipe a loans CSV on stdin)")?,
    };

    let computed = allocate_loans(&AllocationInput {
        banks: banks.clone(),
        facilities,
        covenants,
        loans,
    })?;

    output::csv_out::write_assignments(&args.assignments, &report::assignment_rows(&computed.result))?;
    output::csv_out::write_yields(&args.yields, &report::yield_rows(&computed.result))?;

    Ok(RunSummary::build(
        &computed,
        &banks,
        &args.assignments,
        &args.yields,
    ))
}
