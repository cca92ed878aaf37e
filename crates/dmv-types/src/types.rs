//! Vocabulary shared by every layer: engines, plates and facility services

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Propulsion of a vehicle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    /// Internal combustion engine
    Ice,
    /// Electric vehicle
    Ev,
}

impl EngineType {
    pub fn label(&self) -> &'static str {
        match self {
            EngineType::Ice => "ice",
            EngineType::Ev => "ev",
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Plate category issued at registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlateType {
    Regular,
    Ev,
}

impl PlateType {
    pub fn label(&self) -> &'static str {
        match self {
            PlateType::Regular => "regular",
            PlateType::Ev => "ev",
        }
    }
}

impl fmt::Display for PlateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Services that gate facility operations.
///
/// Facilities store service names as free-form strings (any name can be
/// added); these are the names the facility operations look for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    #[serde(rename = "Vehicle Registration")]
    VehicleRegistration,
    #[serde(rename = "Written Test")]
    WrittenTest,
    #[serde(rename = "Road Test")]
    RoadTest,
    #[serde(rename = "Renew License")]
    RenewLicense,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::VehicleRegistration,
        Service::WrittenTest,
        Service::RoadTest,
        Service::RenewLicense,
    ];

    /// Name a facility must list to offer this service
    pub fn name(&self) -> &'static str {
        match self {
            Service::VehicleRegistration => "Vehicle Registration",
            Service::WrittenTest => "Written Test",
            Service::RoadTest => "Road Test",
            Service::RenewLicense => "Renew License",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|service| service.name() == s.trim())
            .ok_or_else(|| format!("unknown service: {}", s))
    }
}
