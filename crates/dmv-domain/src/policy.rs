//! Thresholds and fee schedule applied by the rule services

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_FEE: u64 = 100;
pub const DEFAULT_EV_SURCHARGE: u64 = 25;
pub const DEFAULT_MIN_WRITTEN_TEST_AGE: u32 = 16;
pub const DEFAULT_RENEWAL_AFTER_YEARS: u32 = 5;

/// Rule parameters shared by every facility operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePolicy {
    /// Fee charged for any registration
    pub base_fee: u64,
    /// Added on top of the base fee for electric vehicles
    pub ev_surcharge: u64,
    /// Minimum age to sit the written test, permit or not
    pub min_written_test_age: u32,
    /// A registration older than this many years is due for renewal
    pub renewal_after_years: u32,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            base_fee: DEFAULT_BASE_FEE,
            ev_surcharge: DEFAULT_EV_SURCHARGE,
            min_written_test_age: DEFAULT_MIN_WRITTEN_TEST_AGE,
            renewal_after_years: DEFAULT_RENEWAL_AFTER_YEARS,
        }
    }
}
