//! Output tables for the persistence adapter: per-loan assignments and
//! per-facility accumulated yields, with the rounding contract applied.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::allocation::AllocationOutput;
use crate::types::{FacilityId, LoanId};

/// Facility id written for loans no facility could serve.
pub const UNSERVED: FacilityId = 0;

/// One row of the assignments output table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub loan_id: LoanId,
    /// `UNSERVED` (0) when the loan was not served.
    pub facility_id: FacilityId,
}

/// One row of the yields output table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldRow {
    pub facility_id: FacilityId,
    /// Accumulated expected yield, rounded per `round_yield`.
    pub expected_yield: Decimal,
}

/// Round an accumulated yield for output: nearest whole number, halves away
/// from zero (2.5 rounds to 3, -2.5 rounds to -3).
pub fn round_yield(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Assignment rows in loan input order.
pub fn assignment_rows(output: &AllocationOutput) -> Vec<AssignmentRow> {
    output
        .assignments
        .iter()
        .map(|a| AssignmentRow {
            loan_id: a.loan_id,
            facility_id: a.facility_id.unwrap_or(UNSERVED),
        })
        .collect()
}

/// Yield rows in ledger (ascending-rate) order, rounded for output.
pub fn yield_rows(output: &AllocationOutput) -> Vec<YieldRow> {
    output
        .facilities
        .iter()
        .map(|p| YieldRow {
            facility_id: p.facility_id,
            expected_yield: round_yield(p.expected_yield),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
