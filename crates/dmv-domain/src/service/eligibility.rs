//! Eligibility rules for licensing steps and registration renewal
//!
//! These checks only look at the subject. Whether a facility offers the
//! service at all is decided by the facility before any of them run.

use chrono::{Months, NaiveDate};
use dmv_types::Service;
use serde::Serialize;
use thiserror::Error;

use crate::model::Registrant;
use crate::policy::RulePolicy;

/// Why a facility declined an operation.
///
/// A refusal is an expected outcome, never a fault, and the subject is left
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Refusal {
    #[error("facility does not offer {service}")]
    ServiceUnavailable { service: Service },

    #[error("registrant has no permit")]
    NoPermit,

    #[error("registrant is {age}, minimum age is {minimum}")]
    Underage { age: u32, minimum: u32 },

    #[error("written test not passed")]
    WrittenTestRequired,

    #[error("road test not passed")]
    RoadTestRequired,

    #[error("vehicle {vin} is already registered")]
    AlreadyRegistered { vin: String },

    #[error("fee for vehicle {vin} exceeds the fee ledger")]
    FeeOverflow { vin: String },
}

pub fn check_written_test(registrant: &Registrant, policy: &RulePolicy) -> Result<(), Refusal> {
    if !registrant.has_permit() {
        return Err(Refusal::NoPermit);
    }
    if registrant.age() < policy.min_written_test_age {
        return Err(Refusal::Underage {
            age: registrant.age(),
            minimum: policy.min_written_test_age,
        });
    }
    Ok(())
}

pub fn check_road_test(registrant: &Registrant) -> Result<(), Refusal> {
    if !registrant.has_permit() {
        return Err(Refusal::NoPermit);
    }
    if !registrant.license_data().written {
        return Err(Refusal::WrittenTestRequired);
    }
    Ok(())
}

pub fn check_license_renewal(registrant: &Registrant) -> Result<(), Refusal> {
    if !registrant.license_data().license {
        return Err(Refusal::RoadTestRequired);
    }
    Ok(())
}

/// True when strictly more than `renewal_after_years` have passed since
/// `registered_on`. Unregistered vehicles are never due.
pub fn is_due_for_renewal(
    registered_on: Option<NaiveDate>,
    today: NaiveDate,
    policy: &RulePolicy,
) -> bool {
    let Some(registered_on) = registered_on else {
        return false;
    };
    registered_on
        .checked_add_months(Months::new(policy.renewal_after_years.saturating_mul(12)))
        .is_some_and(|due| today > due)
}
