//! CSV readers for the four input tables.
//!
//! Columns are positional and the header row is skipped. An unparsable
//! field aborts the run with the source table and 1-based row position.

use std::fmt::Display;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use loan_book_core::types::{Bank, CovenantRecord, Facility, Loan};
use loan_book_core::LoanBookError;

/// Read the banks table: bank_id, bank_name.
pub fn read_banks(path: &str) -> Result<Vec<Bank>, Box<dyn std::error::Error>> {
    Ok(parse_banks(open_csv(path)?, "banks")?)
}

/// Read the facilities table: amount, interest_rate, facility_id, bank_id.
pub fn read_facilities(path: &str) -> Result<Vec<Facility>, Box<dyn std::error::Error>> {
    Ok(parse_facilities(open_csv(path)?, "facilities")?)
}

/// Read the covenants table: facility_id, max_default_likelihood, bank_id,
/// banned_state. The first two fields are optional per row.
pub fn read_covenants(path: &str) -> Result<Vec<CovenantRecord>, Box<dyn std::error::Error>> {
    Ok(parse_covenants(open_csv(path)?, "covenants")?)
}

/// Read the loans table: interest_rate, amount, loan_id, default_likelihood,
/// state.
pub fn read_loans(path: &str) -> Result<Vec<Loan>, Box<dyn std::error::Error>> {
    Ok(parse_loans(open_csv(path)?, "loans")?)
}

pub fn parse_banks<R: Read>(
    mut reader: csv::Reader<R>,
    table: &str,
) -> Result<Vec<Bank>, LoanBookError> {
    let mut banks = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = checked(record, table, i)?;
        let row = row_number(&record, i);
        banks.push(Bank {
            bank_id: parse_field(&record, 0, table, row, "bank_id")?,
            bank_name: field(&record, 1, table, row, "bank_name")?.to_string(),
        });
    }
    Ok(banks)
}

pub fn parse_facilities<R: Read>(
    mut reader: csv::Reader<R>,
    table: &str,
) -> Result<Vec<Facility>, LoanBookError> {
    let mut facilities = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = checked(record, table, i)?;
        let row = row_number(&record, i);
        // The amount column arrives as a float; the contract truncates it.
        let raw_amount: Decimal = parse_field(&record, 0, table, row, "amount")?;
        let amount = raw_amount.trunc().to_u64().ok_or_else(|| {
            LoanBookError::MalformedRecord {
                table: table.into(),
                row,
                reason: format!("amount '{raw_amount}' is not a non-negative integer"),
            }
        })?;
        facilities.push(Facility {
            amount,
            interest_rate: parse_field(&record, 1, table, row, "interest_rate")?,
            facility_id: parse_field(&record, 2, table, row, "facility_id")?,
            bank_id: parse_field(&record, 3, table, row, "bank_id")?,
        });
    }
    Ok(facilities)
}

pub fn parse_covenants<R: Read>(
    mut reader: csv::Reader<R>,
    table: &str,
) -> Result<Vec<CovenantRecord>, LoanBookError> {
    let mut covenants = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = checked(record, table, i)?;
        let row = row_number(&record, i);
        // An empty facility id makes the row bank-wide; an empty ceiling
        // means no ceiling.
        let facility_id = match field(&record, 0, table, row, "facility_id")?.trim() {
            "" => 0,
            raw => parse_raw(raw, table, row, "facility_id")?,
        };
        let max_default_likelihood = match field(&record, 1, table, row, "max_default_likelihood")?
            .trim()
        {
            "" => Decimal::ONE,
            raw => parse_raw(raw, table, row, "max_default_likelihood")?,
        };
        let banned_state = field(&record, 3, table, row, "banned_state")?.trim();
        covenants.push(CovenantRecord {
            facility_id,
            max_default_likelihood,
            bank_id: parse_field(&record, 2, table, row, "bank_id")?,
            banned_state: if banned_state.is_empty() {
                None
            } else {
                Some(banned_state.to_string())
            },
        });
    }
    Ok(covenants)
}

pub fn parse_loans<R: Read>(
    mut reader: csv::Reader<R>,
    table: &str,
) -> Result<Vec<Loan>, LoanBookError> {
    let mut loans = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = checked(record, table, i)?;
        let row = row_number(&record, i);
        loans.push(Loan {
            interest_rate: parse_field(&record, 0, table, row, "interest_rate")?,
            amount: parse_field(&record, 1, table, row, "amount")?,
            loan_id: parse_field(&record, 2, table, row, "loan_id")?,
            default_likelihood: parse_field(&record, 3, table, row, "default_likelihood")?,
            state: field(&record, 4, table, row, "state")?.to_string(),
        });
    }
    Ok(loans)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn open_csv(path: &str) -> Result<csv::Reader<std::fs::File>, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e).into())
}

/// Resolve and validate the path, as the readers are handed user input.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.exists() {
        return Err(format!("File not found: {}", resolved.display()).into());
    }

    if !resolved.is_file() {
        return Err(format!("Not a file: {}", resolved.display()).into());
    }

    Ok(resolved)
}

fn checked(
    record: Result<csv::StringRecord, csv::Error>,
    table: &str,
    index: usize,
) -> Result<csv::StringRecord, LoanBookError> {
    record.map_err(|e| LoanBookError::MalformedRecord {
        table: table.into(),
        row: e
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2),
        reason: e.to_string(),
    })
}

/// 1-based row position in the source file, counting the header.
fn row_number(record: &csv::StringRecord, index: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(index + 2)
}

fn field<'r>(
    record: &'r csv::StringRecord,
    col: usize,
    table: &str,
    row: usize,
    name: &str,
) -> Result<&'r str, LoanBookError> {
    record.get(col).ok_or_else(|| LoanBookError::MalformedRecord {
        table: table.into(),
        row,
        reason: format!("missing column {} ({})", col + 1, name),
    })
}

fn parse_field<T>(
    record: &csv::StringRecord,
    col: usize,
    table: &str,
    row: usize,
    name: &str,
) -> Result<T, LoanBookError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_raw(field(record, col, table, row, name)?.trim(), table, row, name)
}

fn parse_raw<T>(raw: &str, table: &str, row: usize, name: &str) -> Result<T, LoanBookError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e| LoanBookError::MalformedRecord {
        table: table.into(),
        row,
        reason: format!("{name} '{raw}': {e}"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
