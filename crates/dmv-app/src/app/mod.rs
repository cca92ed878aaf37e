//! Application use cases

pub mod office_session;

pub use office_session::{
    run_scenario, FacilitySummary, Outcome, RegistrantSummary, RegistrationLine, SessionOptions,
    SessionReport, StepOutcome,
};
