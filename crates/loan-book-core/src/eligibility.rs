//! Eligibility rules for a loan against a resolved covenant.

use crate::covenant::Covenant;
use crate::types::Loan;

/// Whether `loan` passes `covenant`: fails on a default likelihood above the
/// covenant's ceiling, fails on an origination state in the banned set,
/// passes otherwise. The no-covenant case never reaches here; the allocator
/// treats an unrestricted facility as eligible before consulting these rules.
pub fn passes(covenant: &Covenant, loan: &Loan) -> bool {
    if loan.default_likelihood > covenant.max_default_likelihood {
        return false;
    }
    if covenant.banned_states.contains(&loan.state) {
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn covenant(max_default_likelihood: rust_decimal::Decimal, banned: &[&str]) -> Covenant {
        Covenant {
            bank_id: 1,
            facility_id: 10,
            max_default_likelihood,
            banned_states: banned.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
        }
    }

    fn loan(default_likelihood: rust_decimal::Decimal, state: &str) -> Loan {
        Loan {
            interest_rate: dec!(0.10),
            amount: 500,
            loan_id: 100,
            default_likelihood,
            state: state.to_string(),
        }
    }

    #[test]
    fn test_passes_when_under_ceiling_and_state_allowed() {
        assert!(passes(&covenant(dec!(0.3), &["TX"]), &loan(dec!(0.1), "CA")));
    }

    #[test]
    fn test_likelihood_at_ceiling_passes() {
        // The ceiling is inclusive: only strictly greater fails.
        assert!(passes(&covenant(dec!(0.3), &[]), &loan(dec!(0.3), "CA")));
    }

    #[test]
    fn test_likelihood_above_ceiling_fails() {
        assert!(!passes(&covenant(dec!(0.3), &[]), &loan(dec!(0.31), "CA")));
    }

    #[test]
    fn test_banned_state_fails() {
        assert!(!passes(&covenant(dec!(0.3), &["TX"]), &loan(dec!(0.1), "TX")));
    }

    #[test]
    fn test_no_ceiling_covenant_only_bans_states() {
        let cov = covenant(dec!(1.0), &["MT"]);
        assert!(passes(&cov, &loan(dec!(0.99), "CA")));
        assert!(!passes(&cov, &loan(dec!(0.01), "MT")));
    }
}
