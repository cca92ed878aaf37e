//! Plate category and registration fee schedule

use dmv_types::{EngineType, PlateType};

use crate::policy::RulePolicy;

/// Plate category for an engine type
pub fn plate_for(engine: EngineType) -> PlateType {
    match engine {
        EngineType::Ice => PlateType::Regular,
        EngineType::Ev => PlateType::Ev,
    }
}

/// Fee charged to register a vehicle with the given engine, or `None` when
/// the surcharge pushes it past `u64::MAX`
pub fn registration_fee(engine: EngineType, policy: &RulePolicy) -> Option<u64> {
    match engine {
        EngineType::Ice => Some(policy.base_fee),
        EngineType::Ev => policy.base_fee.checked_add(policy.ev_surcharge),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_for_engine() {
        assert_eq!(plate_for(EngineType::Ice), PlateType::Regular);
        assert_eq!(plate_for(EngineType::Ev), PlateType::Ev);
    }

    #[test]
    fn test_default_fee_schedule() {
        let policy = RulePolicy::default();
        assert_eq!(registration_fee(EngineType::Ice, &policy), Some(100));
        assert_eq!(registration_fee(EngineType::Ev, &policy), Some(125));
    }

    #[test]
    fn test_custom_fee_schedule() {
        let policy = RulePolicy {
            base_fee: 80,
            ev_surcharge: 0,
            ..RulePolicy::default()
        };
        assert_eq!(registration_fee(EngineType::Ice, &policy), Some(80));
        assert_eq!(registration_fee(EngineType::Ev, &policy), Some(80));
    }

    #[test]
    fn test_ev_fee_past_u64_max_is_none() {
        let policy = RulePolicy {
            base_fee: u64::MAX,
            ev_surcharge: 1,
            ..RulePolicy::default()
        };
        assert_eq!(registration_fee(EngineType::Ice, &policy), Some(u64::MAX));
        assert_eq!(registration_fee(EngineType::Ev, &policy), None);
    }
}
