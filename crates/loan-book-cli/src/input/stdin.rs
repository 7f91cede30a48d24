use std::io::{self, Read};

use loan_book_core::types::Loan;

/// Attempt to read a loans CSV from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive).
pub fn read_stdin_loans() -> Result<Option<Vec<Loan>>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }

    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(buffer.as_bytes());
    let loans = super::csv_in::parse_loans(reader, "loans (stdin)")?;
    Ok(Some(loans))
}
