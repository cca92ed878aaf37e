//! Domain services

pub mod eligibility;
pub mod fees;

pub use eligibility::{
    check_license_renewal, check_road_test, check_written_test, is_due_for_renewal, Refusal,
};
pub use fees::{plate_for, registration_fee};
