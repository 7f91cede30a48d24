use super::RunSummary;

/// Print just the headline outcome of the run.
pub fn print_minimal(summary: &RunSummary) {
    println!("{}/{} loans served", summary.loans_served, summary.loans_total);
}
