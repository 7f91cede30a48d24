pub mod allocation;
pub mod covenant;
pub mod eligibility;
pub mod error;
pub mod ledger;
pub mod report;
pub mod types;

pub use error::LoanBookError;
pub use types::*;

/// Standard result type for all loan-book operations
pub type LoanBookResult<T> = Result<T, LoanBookError>;
