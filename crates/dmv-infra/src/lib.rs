//! Infrastructure layer - file loaders for scenarios and vehicle rosters

pub mod roster_csv;
pub mod scenario_loader;

pub use roster_csv::{load_roster_from_csv, load_roster_from_reader};
pub use scenario_loader::{FacilitySpec, RegistrantSpec, Scenario, Step, VehicleSpec};
