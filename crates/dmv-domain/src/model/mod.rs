//! Domain model types

pub mod facility;
pub mod registrant;
pub mod vehicle;

pub use facility::{Facility, FacilityInfo};
pub use registrant::{LicenseData, Registrant};
pub use vehicle::{Registration, Vehicle, VehicleHandle};
