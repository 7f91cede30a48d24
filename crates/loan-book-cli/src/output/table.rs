use tabled::{builder::Builder, Table};

use super::RunSummary;

/// Format the run summary as a facility table plus loan and warning notes.
pub fn print_table(summary: &RunSummary) {
    let mut builder = Builder::default();
    builder.push_record(["Facility", "Bank", "Rate", "Capacity", "Remaining", "Expected Yield"]);
    for line in &summary.facilities {
        builder.push_record([
            line.facility_id.to_string(),
            line.bank.clone(),
            line.interest_rate.to_string(),
            line.amount.to_string(),
            line.remaining_amount.to_string(),
            line.expected_yield.to_string(),
        ]);
    }
    let table = Table::from(builder);
    println!("{}", table);

    println!("\nLoans served: {}/{}", summary.loans_served, summary.loans_total);
    if !summary.unserved_loan_ids.is_empty() {
        let ids: Vec<String> = summary
            .unserved_loan_ids
            .iter()
            .map(|id| id.to_string())
            .collect();
        println!("Unserved loans: {}", ids.join(", "));
    }

    if !summary.warnings.is_empty() {
        println!("\nWarnings:");
        for w in &summary.warnings {
            println!("  - {}", w);
        }
    }

    println!("\nAssignments: {}", summary.assignments_path);
    println!("Yields: {}", summary.yields_path);
}
