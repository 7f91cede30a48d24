//! Facility ledger.
//!
//! Rate-ordered arena of facility records with their running allocation
//! state. Traversal order is the allocation priority: ascending interest
//! rate, ties in original load order. The ledger is the single owner of
//! mutable facility state; all mutation goes through `commit`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Facility;

/// A facility plus its running allocation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityEntry {
    pub facility: Facility,
    /// Capacity still available. Never exceeds `facility.amount`, never negative.
    pub remaining_amount: u64,
    /// Expected yield accumulated from assigned loans. Can be negative.
    pub expected_yield: Decimal,
}

/// Ordered collection of facilities.
#[derive(Debug, Clone, Default)]
pub struct FacilityLedger {
    entries: Vec<FacilityEntry>,
}

impl FacilityLedger {
    /// Build the ledger from loaded facilities, sorting once by interest
    /// rate. The sort is stable, so equal-rate facilities keep their input
    /// order. Capacity changes during allocation never alter rate order, so
    /// no re-sort happens after this point.
    pub fn build(mut facilities: Vec<Facility>) -> Self {
        facilities.sort_by(|a, b| a.interest_rate.cmp(&b.interest_rate));
        let entries = facilities
            .into_iter()
            .map(|facility| FacilityEntry {
                remaining_amount: facility.amount,
                expected_yield: Decimal::ZERO,
                facility,
            })
            .collect();
        Self { entries }
    }

    /// Traversal in allocation priority order (ascending interest rate).
    pub fn entries(&self) -> &[FacilityEntry] {
        &self.entries
    }

    /// Apply one committed assignment to the entry at `position`: deplete
    /// capacity by the loan amount and accumulate the loan's expected yield.
    /// Callers check capacity before committing; `loan_amount` must not
    /// exceed the entry's remaining amount.
    pub fn commit(&mut self, position: usize, loan_amount: u64, yield_delta: Decimal) {
        let entry = &mut self.entries[position];
        debug_assert!(entry.remaining_amount >= loan_amount);
        entry.remaining_amount -= loan_amount;
        entry.expected_yield += yield_delta;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FacilityId;
    use rust_decimal_macros::dec;

    fn facility(facility_id: FacilityId, rate: Decimal, amount: u64) -> Facility {
        Facility {
            amount,
            interest_rate: rate,
            facility_id,
            bank_id: 1,
        }
    }

    #[test]
    fn test_build_sorts_ascending_by_rate() {
        let ledger = FacilityLedger::build(vec![
            facility(3, dec!(0.09), 100),
            facility(1, dec!(0.02), 100),
            facility(2, dec!(0.05), 100),
        ]);
        let order: Vec<FacilityId> = ledger
            .entries()
            .iter()
            .map(|e| e.facility.facility_id)
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_equal_rates_keep_input_order() {
        let ledger = FacilityLedger::build(vec![
            facility(7, dec!(0.05), 100),
            facility(4, dec!(0.05), 100),
            facility(9, dec!(0.01), 100),
        ]);
        let order: Vec<FacilityId> = ledger
            .entries()
            .iter()
            .map(|e| e.facility.facility_id)
            .collect();
        assert_eq!(order, vec![9, 7, 4]);
    }

    #[test]
    fn test_build_initializes_running_state() {
        let ledger = FacilityLedger::build(vec![facility(1, dec!(0.05), 1000)]);
        let entry = &ledger.entries()[0];
        assert_eq!(entry.remaining_amount, 1000);
        assert_eq!(entry.expected_yield, Decimal::ZERO);
    }

    #[test]
    fn test_commit_depletes_capacity_and_accumulates_yield() {
        let mut ledger = FacilityLedger::build(vec![facility(1, dec!(0.05), 1000)]);
        ledger.commit(0, 400, dec!(12.5));
        ledger.commit(0, 100, dec!(-40));
        let entry = &ledger.entries()[0];
        assert_eq!(entry.remaining_amount, 500);
        assert_eq!(entry.expected_yield, dec!(-27.5));
    }

    #[test]
    fn test_commit_leaves_rate_order_untouched() {
        let mut ledger = FacilityLedger::build(vec![
            facility(1, dec!(0.02), 100),
            facility(2, dec!(0.05), 100),
        ]);
        ledger.commit(0, 100, dec!(1));
        let order: Vec<FacilityId> = ledger
            .entries()
            .iter()
            .map(|e| e.facility.facility_id)
            .collect();
        assert_eq!(order, vec![1, 2]);
    }
}
