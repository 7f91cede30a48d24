use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Default likelihoods expressed as decimals in [0, 1].
pub type Likelihood = Decimal;

/// Bank identifier
pub type BankId = u32;

/// Facility identifier. 0 is reserved: in covenant keys it marks a bank-wide
/// covenant, and in the assignments output it marks an unserved loan.
pub type FacilityId = u32;

/// Loan identifier
pub type LoanId = u32;

/// A lending institution, referenced by id from facilities and covenants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    pub bank_id: BankId,
    pub bank_name: String,
}

/// A pool of lendable funds offered by a bank at a fixed interest rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    /// Total lendable capacity.
    pub amount: u64,
    /// Rate the facility charges on the funds it lends.
    pub interest_rate: Rate,
    pub facility_id: FacilityId,
    pub bank_id: BankId,
}

/// One raw covenant input row. Rows sharing a (bank, facility) key are merged
/// into a single covenant when the index is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CovenantRecord {
    /// Facility the row restricts; 0 applies the row bank-wide.
    pub facility_id: FacilityId,
    /// Ceiling on loan default likelihood; 1.0 = no ceiling.
    pub max_default_likelihood: Likelihood,
    pub bank_id: BankId,
    /// Origination state banned by this row, if any.
    pub banned_state: Option<String>,
}

/// A loan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub interest_rate: Rate,
    /// Requested principal.
    pub amount: u64,
    pub loan_id: LoanId,
    /// Estimated likelihood the loan is not repaid.
    pub default_likelihood: Likelihood,
    /// Origination state code.
    pub state: String,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
