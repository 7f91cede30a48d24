//! CSV writers for the two result tables.

use std::fs;
use std::io;
use std::path::Path;

use loan_book_core::report::{AssignmentRow, YieldRow};

/// Write the loan assignments table: loan_id, facility_id.
pub fn write_assignments(
    path: &str,
    rows: &[AssignmentRow],
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_parent_dir(path)?;
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| format!("Failed to open '{}': {}", path, e))?;
    writer.write_record(["loan_id", "facility_id"])?;
    for row in rows {
        writer.write_record([row.loan_id.to_string(), row.facility_id.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the facility yields table: facility_id, expected_yield.
pub fn write_yields(path: &str, rows: &[YieldRow]) -> Result<(), Box<dyn std::error::Error>> {
    ensure_parent_dir(path)?;
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| format!("Failed to open '{}': {}", path, e))?;
    writer.write_record(["facility_id", "expected_yield"])?;
    for row in rows {
        writer.write_record([row.facility_id.to_string(), row.expected_yield.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Create the output directory if needed. An existing directory is success.
fn ensure_parent_dir(path: &str) -> io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
