use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanBookError {
    #[error("Malformed record in {table} at row {row}: {reason}")]
    MalformedRecord {
        table: String,
        row: usize,
        reason: String,
    },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanBookError {
    fn from(e: serde_json::Error) -> Self {
        LoanBookError::SerializationError(e.to_string())
    }
}
