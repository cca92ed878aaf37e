//! Scenario files: facilities, vehicles, registrants and an ordered list of
//! steps, written in TOML.
//!
//! ```toml
//! [[facility]]
//! id = "albany"
//! name = "Albany DMV Office"
//! services = ["Vehicle Registration"]
//!
//! [[vehicle]]
//! vin = "123456789abcdefgh"
//! year = 2012
//! make = "Chevrolet"
//! model = "Cruz"
//! engine = "ice"
//!
//! [[step]]
//! action = "register_vehicle"
//! facility = "albany"
//! vin = "123456789abcdefgh"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dmv_domain::{FacilityInfo, Registrant, Vehicle};
use dmv_types::{EngineType, Error, Result};
use serde::{Deserialize, Serialize};

use crate::roster_csv::load_roster_from_csv;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilitySpec {
    /// Key used by steps to refer to this facility
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    /// Services enabled before the first step runs
    #[serde(default)]
    pub services: Vec<String>,
}

impl FacilitySpec {
    pub fn info(&self) -> FacilityInfo {
        FacilityInfo::new(&self.name, &self.address, &self.phone)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub vin: String,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub engine: EngineType,
}

impl From<&VehicleSpec> for Vehicle {
    fn from(spec: &VehicleSpec) -> Self {
        Vehicle::new(&spec.vin, spec.year, &spec.make, &spec.model, spec.engine)
    }
}

impl From<&Vehicle> for VehicleSpec {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            vin: vehicle.vin.clone(),
            year: vehicle.year,
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            engine: vehicle.engine,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrantSpec {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub permit: bool,
}

impl From<&RegistrantSpec> for Registrant {
    fn from(spec: &RegistrantSpec) -> Self {
        Registrant::new(&spec.name, spec.age, spec.permit)
    }
}

/// One action against the scenario's entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    AddService {
        facility: String,
        service: String,
    },
    RegisterVehicle {
        facility: String,
        vin: String,
        /// Registration date; today when omitted
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    EarnPermit {
        registrant: String,
    },
    WrittenTest {
        facility: String,
        registrant: String,
    },
    RoadTest {
        facility: String,
        registrant: String,
    },
    RenewLicense {
        facility: String,
        registrant: String,
    },
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::AddService { .. } => "add_service",
            Step::RegisterVehicle { .. } => "register_vehicle",
            Step::EarnPermit { .. } => "earn_permit",
            Step::WrittenTest { .. } => "written_test",
            Step::RoadTest { .. } => "road_test",
            Step::RenewLicense { .. } => "renew_license",
        }
    }

    /// Facility the step runs at, if any
    pub fn facility(&self) -> Option<&str> {
        match self {
            Step::AddService { facility, .. }
            | Step::RegisterVehicle { facility, .. }
            | Step::WrittenTest { facility, .. }
            | Step::RoadTest { facility, .. }
            | Step::RenewLicense { facility, .. } => Some(facility),
            Step::EarnPermit { .. } => None,
        }
    }

    /// Service name, vin or registrant name the step acts on
    pub fn subject(&self) -> &str {
        match self {
            Step::AddService { service, .. } => service,
            Step::RegisterVehicle { vin, .. } => vin,
            Step::EarnPermit { registrant }
            | Step::WrittenTest { registrant, .. }
            | Step::RoadTest { registrant, .. }
            | Step::RenewLicense { registrant, .. } => registrant,
        }
    }
}

/// A parsed scenario file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    /// CSV roster whose vehicles are appended to `vehicles`, relative to the
    /// scenario file
    #[serde(default)]
    pub roster: Option<PathBuf>,
    #[serde(default, rename = "facility")]
    pub facilities: Vec<FacilitySpec>,
    #[serde(default, rename = "vehicle")]
    pub vehicles: Vec<VehicleSpec>,
    #[serde(default, rename = "registrant")]
    pub registrants: Vec<RegistrantSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a scenario file, pulling in its roster if it names one
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let mut scenario: Scenario = toml::from_str(&content)?;

        if scenario.name.is_none() {
            scenario.name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string);
        }

        if let Some(roster) = scenario.roster.take() {
            let roster_path = match path.parent() {
                Some(dir) if roster.is_relative() => dir.join(&roster),
                _ => roster.clone(),
            };
            let vehicles = load_roster_from_csv(&roster_path)?;
            scenario.vehicles.extend(vehicles.iter().map(VehicleSpec::from));
            scenario.roster = Some(roster_path);
        }

        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse a scenario without a roster
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(toml_content)?;
        if scenario.roster.is_some() {
            return Err(Error::Scenario(
                "roster paths need a scenario file to resolve against".to_string(),
            ));
        }
        scenario.validate()?;
        Ok(scenario)
    }

    /// Identifiers must be unique within their kind
    fn validate(&self) -> Result<()> {
        ensure_unique("facility id", self.facilities.iter().map(|f| f.id.as_str()))?;
        ensure_unique("vehicle vin", self.vehicles.iter().map(|v| v.vin.as_str()))?;
        ensure_unique("registrant name", self.registrants.iter().map(|r| r.name.as_str()))?;
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

fn ensure_unique<'a>(kind: &str, keys: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(Error::Scenario(format!("duplicate {}: {}", kind, key)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOML: &str = r#"
name = "albany"

[[facility]]
id = "albany"
name = "Albany DMV Office"
address = "2242 Santiam Hwy SE Albany OR 97321"
phone = "541-967-2014"
services = ["Vehicle Registration"]

[[vehicle]]
vin = "123456789abcdefgh"
year = 2012
make = "Chevrolet"
model = "Cruz"
engine = "ice"

[[registrant]]
name = "Penny"
age = 16

[[step]]
action = "register_vehicle"
facility = "albany"
vin = "123456789abcdefgh"
date = "2024-05-01"

[[step]]
action = "earn_permit"
registrant = "Penny"
"#;

    #[test]
    fn test_load_from_str() {
        let scenario = Scenario::load_from_str(TEST_TOML).unwrap();
        assert_eq!(scenario.display_name(), "albany");
        assert_eq!(scenario.facilities[0].services, ["Vehicle Registration"]);
        assert_eq!(scenario.vehicles[0].engine, EngineType::Ice);
        assert!(!scenario.registrants[0].permit);
        assert_eq!(scenario.steps.len(), 2);
        assert_eq!(
            scenario.steps[0],
            Step::RegisterVehicle {
                facility: "albany".to_string(),
                vin: "123456789abcdefgh".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 1),
            }
        );
    }

    #[test]
    fn test_step_accessors() {
        let scenario = Scenario::load_from_str(TEST_TOML).unwrap();
        let permit = &scenario.steps[1];
        assert_eq!(permit.action(), "earn_permit");
        assert_eq!(permit.facility(), None);
        assert_eq!(permit.subject(), "Penny");
    }

    #[test]
    fn test_duplicate_vin_rejected() {
        let toml = r#"
[[vehicle]]
vin = "x"
year = 2000
make = "Ford"
model = "T"
engine = "ice"

[[vehicle]]
vin = "x"
year = 2001
make = "Ford"
model = "T"
engine = "ev"
"#;
        let result = Scenario::load_from_str(toml);
        assert!(matches!(result, Err(Error::Scenario(msg)) if msg.contains("duplicate vehicle vin")));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let toml = r#"
[[step]]
action = "issue_plates"
facility = "albany"
"#;
        assert!(matches!(Scenario::load_from_str(toml), Err(Error::Toml(_))));
    }
}
