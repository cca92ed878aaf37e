//! Vehicle model and its registration record

use chrono::{Datelike, NaiveDate};
use dmv_types::{EngineType, PlateType};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::policy::RulePolicy;
use crate::service::{eligibility, fees};

/// Shared handle to a vehicle.
///
/// Facilities keep clones of the handle, so a registration performed by a
/// facility is visible to whoever created the vehicle.
pub type VehicleHandle = Rc<RefCell<Vehicle>>;

/// Issued when a facility registers a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub date: NaiveDate,
    pub plate: PlateType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vin: String,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub engine: EngineType,
    #[serde(default)]
    registration: Option<Registration>,
}

impl Vehicle {
    pub fn new(
        vin: impl Into<String>,
        year: i32,
        make: impl Into<String>,
        model: impl Into<String>,
        engine: EngineType,
    ) -> Self {
        Self {
            vin: vin.into(),
            year,
            make: make.into(),
            model: model.into(),
            engine,
            registration: None,
        }
    }

    /// Wrap into a shared handle
    pub fn into_handle(self) -> VehicleHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn is_electric(&self) -> bool {
        self.engine == EngineType::Ev
    }

    /// Plate category this vehicle would receive, registered or not
    pub fn plate_finder(&self) -> PlateType {
        fees::plate_for(self.engine)
    }

    pub fn registration_fee(&self, policy: &RulePolicy) -> Option<u64> {
        fees::registration_fee(self.engine, policy)
    }

    pub fn registration(&self) -> Option<&Registration> {
        self.registration.as_ref()
    }

    pub fn registration_date(&self) -> Option<NaiveDate> {
        self.registration.map(|r| r.date)
    }

    /// Plate issued at registration; `None` until then
    pub fn plate_type(&self) -> Option<PlateType> {
        self.registration.map(|r| r.plate)
    }

    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    pub fn is_due_for_renewal(&self, today: NaiveDate, policy: &RulePolicy) -> bool {
        eligibility::is_due_for_renewal(self.registration_date(), today, policy)
    }

    /// Model-year age in whole calendar years
    pub fn age_in_years(&self, today: NaiveDate) -> i32 {
        (today.year() - self.year).max(0)
    }

    pub(crate) fn record_registration(&mut self, date: NaiveDate) -> Registration {
        let registration = Registration {
            date,
            plate: self.plate_finder(),
        };
        self.registration = Some(registration);
        registration
    }
}
