pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use rust_decimal::Decimal;
use serde::Serialize;

use loan_book_core::allocation::AllocationOutput;
use loan_book_core::report;
use loan_book_core::types::{Bank, ComputationOutput, FacilityId, LoanId, Rate};

use crate::OutputFormat;

/// Dispatch the run summary to the appropriate formatter.
pub fn format_output(format: &OutputFormat, summary: &RunSummary) {
    match format {
        OutputFormat::Json => json::print_json(summary),
        OutputFormat::Table => table::print_table(summary),
        OutputFormat::Minimal => minimal::print_minimal(summary),
    }
}

/// What one allocation run produced, shaped for display.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub loans_total: usize,
    pub loans_served: usize,
    /// Loans no facility could serve, in input order.
    pub unserved_loan_ids: Vec<LoanId>,
    /// Facility lines in ascending-rate order.
    pub facilities: Vec<FacilityLine>,
    pub warnings: Vec<String>,
    pub assignments_path: String,
    pub yields_path: String,
    pub methodology: String,
    pub computation_time_us: u64,
}

/// One facility in the summary.
#[derive(Debug, Clone, Serialize)]
pub struct FacilityLine {
    pub facility_id: FacilityId,
    /// Bank display name, or "bank <id>" when the banks table was not given.
    pub bank: String,
    pub interest_rate: Rate,
    pub amount: u64,
    pub remaining_amount: u64,
    /// Accumulated expected yield, rounded as written to the yields table.
    pub expected_yield: Decimal,
}

impl RunSummary {
    pub fn build(
        computed: &ComputationOutput<AllocationOutput>,
        banks: &[Bank],
        assignments_path: &str,
        yields_path: &str,
    ) -> Self {
        let result = &computed.result;
        let facilities = result
            .facilities
            .iter()
            .map(|position| FacilityLine {
                facility_id: position.facility_id,
                bank: banks
                    .iter()
                    .find(|b| b.bank_id == position.bank_id)
                    .map(|b| b.bank_name.clone())
                    .unwrap_or_else(|| format!("bank {}", position.bank_id)),
                interest_rate: position.interest_rate,
                amount: position.amount,
                remaining_amount: position.remaining_amount,
                expected_yield: report::round_yield(position.expected_yield),
            })
            .collect();

        RunSummary {
            loans_total: result.assignments.len(),
            loans_served: result.loans_served,
            unserved_loan_ids: result
                .assignments
                .iter()
                .filter(|a| a.facility_id.is_none())
                .map(|a| a.loan_id)
                .collect(),
            facilities,
            warnings: computed.warnings.clone(),
            assignments_path: assignments_path.to_string(),
            yields_path: yields_path.to_string(),
            methodology: computed.methodology.clone(),
            computation_time_us: computed.metadata.computation_time_us,
        }
    }
}
