//! Covenant index.
//!
//! Maps (bank, facility) keys to the covenant restricting that facility,
//! falling back to the bank-wide covenant (facility id 0) when no
//! facility-specific entry exists. Input rows sharing a key merge their
//! banned states into one covenant.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{BankId, CovenantRecord, FacilityId, Likelihood};

/// Facility id that marks a covenant as bank-wide.
pub const BANK_WIDE: FacilityId = 0;

/// Restrictions a bank places on which loans a facility may accept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Covenant {
    pub bank_id: BankId,
    /// Restricted facility; `BANK_WIDE` applies to all of the bank's facilities.
    pub facility_id: FacilityId,
    /// Ceiling on loan default likelihood; 1.0 = no ceiling.
    pub max_default_likelihood: Likelihood,
    /// Origination states this covenant bans.
    pub banned_states: HashSet<String>,
}

/// Lookup structure over all loaded covenants. At most one covenant per
/// (bank, facility) key; immutable once built.
#[derive(Debug, Clone, Default)]
pub struct CovenantIndex {
    index: HashMap<(BankId, FacilityId), Covenant>,
}

impl CovenantIndex {
    /// Build the index from raw input rows.
    pub fn from_records(records: &[CovenantRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            index.insert(record);
        }
        index
    }

    /// Fold one raw row into the index. The first row for a key fixes the
    /// likelihood ceiling; later rows for the same key contribute banned
    /// states only. Empty banned-state fields are ignored.
    pub fn insert(&mut self, record: &CovenantRecord) {
        let entry = self
            .index
            .entry((record.bank_id, record.facility_id))
            .or_insert_with(|| Covenant {
                bank_id: record.bank_id,
                facility_id: record.facility_id,
                max_default_likelihood: record.max_default_likelihood,
                banned_states: HashSet::new(),
            });
        if let Some(state) = record.banned_state.as_deref() {
            if !state.is_empty() {
                entry.banned_states.insert(state.to_string());
            }
        }
    }

    /// Resolve the covenant governing `facility_id` at `bank_id`: the
    /// facility-specific entry first, then the bank-wide entry. `None` is
    /// not an error; a bank may legitimately impose no restriction.
    pub fn lookup(&self, bank_id: BankId, facility_id: FacilityId) -> Option<&Covenant> {
        self.index
            .get(&(bank_id, facility_id))
            .or_else(|| self.index.get(&(bank_id, BANK_WIDE)))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
