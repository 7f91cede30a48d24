use super::RunSummary;

/// Pretty-print the run summary as JSON to stdout.
pub fn print_json(summary: &RunSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
