//! Office Session - drives a scenario through its facilities
//!
//! 1. Build facilities (with their initial services), vehicles and registrants
//! 2. Execute each step in order against the named facility
//! 3. Record the outcome of every step; refusals do not stop the session
//! 4. Summarize facilities, registrants and vehicles due for renewal

use chrono::{Local, NaiveDate};
use dmv_domain::{
    Facility, LicenseData, Refusal, Registrant, RulePolicy, Vehicle, VehicleHandle,
};
use dmv_infra::{Scenario, Step};
use dmv_types::{Error, PlateType, Result};
use serde::Serialize;
use tracing::{debug, info};

/// Options for a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Rule parameters for every facility in the session
    pub policy: RulePolicy,

    /// Date used for registrations without an explicit date and for renewal
    /// checks
    pub today: NaiveDate,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            policy: RulePolicy::default(),
            today: Local::now().date_naive(),
        }
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: RulePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// What happened to a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Done {
        #[serde(skip_serializing_if = "Option::is_none")]
        fee: Option<u64>,
    },
    Refused {
        refusal: Refusal,
    },
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done { .. })
    }

    fn from_result(result: std::result::Result<(), Refusal>) -> Self {
        match result {
            Ok(()) => Outcome::Done { fee: None },
            Err(refusal) => Outcome::Refused { refusal },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    /// 1-based position in the scenario
    pub index: usize,
    pub action: String,
    pub facility: Option<String>,
    pub subject: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationLine {
    pub vin: String,
    pub year: i32,
    /// Model-year age on the session date
    pub age_years: i32,
    pub make: String,
    pub model: String,
    pub plate: PlateType,
    pub date: NaiveDate,
    pub fee: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacilitySummary {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub services: Vec<String>,
    pub registrations: Vec<RegistrationLine>,
    pub collected_fees: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrantSummary {
    pub name: String,
    pub age: u32,
    pub permit: bool,
    pub license: LicenseData,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub scenario: String,
    pub today: NaiveDate,
    pub steps: Vec<StepOutcome>,
    pub facilities: Vec<FacilitySummary>,
    pub registrants: Vec<RegistrantSummary>,
    /// Vins whose registration is older than the renewal period
    pub due_for_renewal: Vec<String>,
}

impl SessionReport {
    pub fn refused_count(&self) -> usize {
        self.steps.iter().filter(|s| !s.outcome.is_done()).count()
    }

    pub fn total_fees(&self) -> u64 {
        self.facilities.iter().map(|f| f.collected_fees).sum()
    }
}

struct Session {
    facilities: Vec<(String, Facility)>,
    vehicles: Vec<VehicleHandle>,
    registrants: Vec<Registrant>,
    today: NaiveDate,
}

impl Session {
    fn build(scenario: &Scenario, options: &SessionOptions) -> Self {
        let facilities = scenario
            .facilities
            .iter()
            .map(|spec| {
                let mut facility = Facility::with_policy(spec.info(), options.policy);
                for service in &spec.services {
                    facility.add_service(service.as_str());
                }
                (spec.id.clone(), facility)
            })
            .collect();

        Self {
            facilities,
            vehicles: scenario
                .vehicles
                .iter()
                .map(|spec| Vehicle::from(spec).into_handle())
                .collect(),
            registrants: scenario.registrants.iter().map(Registrant::from).collect(),
            today: options.today,
        }
    }

    fn facility_mut(&mut self, id: &str) -> Result<&mut Facility> {
        self.facilities
            .iter_mut()
            .find(|(key, _)| key == id)
            .map(|(_, facility)| facility)
            .ok_or_else(|| Error::UnknownReference(format!("facility '{}'", id)))
    }

    /// Split borrow: the facility immutably and a registrant mutably
    fn facility_and_registrant(
        &mut self,
        facility_id: &str,
        name: &str,
    ) -> Result<(&Facility, &mut Registrant)> {
        let facility = self
            .facilities
            .iter()
            .find(|(key, _)| key == facility_id)
            .map(|(_, facility)| facility)
            .ok_or_else(|| Error::UnknownReference(format!("facility '{}'", facility_id)))?;
        let registrant = self
            .registrants
            .iter_mut()
            .find(|r| r.name() == name)
            .ok_or_else(|| Error::UnknownReference(format!("registrant '{}'", name)))?;
        Ok((facility, registrant))
    }

    fn vehicle(&self, vin: &str) -> Result<VehicleHandle> {
        self.vehicles
            .iter()
            .find(|v| v.borrow().vin == vin)
            .cloned()
            .ok_or_else(|| Error::UnknownReference(format!("vehicle '{}'", vin)))
    }

    fn execute(&mut self, step: &Step) -> Result<Outcome> {
        let outcome = match step {
            Step::AddService { facility, service } => {
                self.facility_mut(facility)?.add_service(service.as_str());
                Outcome::Done { fee: None }
            }
            Step::RegisterVehicle { facility, vin, date } => {
                let vehicle = self.vehicle(vin)?;
                let date = date.unwrap_or(self.today);
                match self.facility_mut(facility)?.register_vehicle_on(&vehicle, date) {
                    Ok(fee) => Outcome::Done { fee: Some(fee) },
                    Err(refusal) => Outcome::Refused { refusal },
                }
            }
            Step::EarnPermit { registrant } => {
                self.registrants
                    .iter_mut()
                    .find(|r| r.name() == registrant)
                    .ok_or_else(|| Error::UnknownReference(format!("registrant '{}'", registrant)))?
                    .earn_permit();
                Outcome::Done { fee: None }
            }
            Step::WrittenTest { facility, registrant } => {
                let (facility, registrant) = self.facility_and_registrant(facility, registrant)?;
                Outcome::from_result(facility.administer_written_test(registrant))
            }
            Step::RoadTest { facility, registrant } => {
                let (facility, registrant) = self.facility_and_registrant(facility, registrant)?;
                Outcome::from_result(facility.administer_road_test(registrant))
            }
            Step::RenewLicense { facility, registrant } => {
                let (facility, registrant) = self.facility_and_registrant(facility, registrant)?;
                Outcome::from_result(facility.renew_drivers_license(registrant))
            }
        };
        Ok(outcome)
    }

    fn summarize(self, scenario: &Scenario, steps: Vec<StepOutcome>) -> SessionReport {
        let facilities = self
            .facilities
            .iter()
            .map(|(id, facility)| summarize_facility(id, facility, self.today))
            .collect();

        let registrants = self
            .registrants
            .iter()
            .map(|r| RegistrantSummary {
                name: r.name().to_string(),
                age: r.age(),
                permit: r.has_permit(),
                license: r.license_data(),
            })
            .collect();

        let mut due_for_renewal = Vec::new();
        for (_, facility) in &self.facilities {
            for vehicle in facility.vehicles_due_for_renewal(self.today) {
                due_for_renewal.push(vehicle.borrow().vin.clone());
            }
        }

        SessionReport {
            scenario: scenario.display_name().to_string(),
            today: self.today,
            steps,
            facilities,
            registrants,
            due_for_renewal,
        }
    }
}

fn summarize_facility(id: &str, facility: &Facility, today: NaiveDate) -> FacilitySummary {
    let registrations = facility
        .registered_vehicles()
        .iter()
        .filter_map(|handle| {
            let vehicle = handle.borrow();
            let registration = vehicle.registration()?;
            Some(RegistrationLine {
                vin: vehicle.vin.clone(),
                year: vehicle.year,
                age_years: vehicle.age_in_years(today),
                make: vehicle.make.clone(),
                model: vehicle.model.clone(),
                plate: registration.plate,
                date: registration.date,
                fee: vehicle.registration_fee(facility.policy())?,
            })
        })
        .collect();

    FacilitySummary {
        id: id.to_string(),
        name: facility.name().to_string(),
        address: facility.address().to_string(),
        phone: facility.phone().to_string(),
        services: facility.services().to_vec(),
        registrations,
        collected_fees: facility.collected_fees(),
    }
}

/// Main entry point: run every step of a scenario and report the results.
///
/// Refused steps are recorded and the session continues. A step naming an
/// unknown facility, vehicle or registrant aborts with
/// [`Error::UnknownReference`].
pub fn run_scenario(scenario: &Scenario, options: &SessionOptions) -> Result<SessionReport> {
    info!(scenario = scenario.display_name(), steps = scenario.steps.len(), "session started");
    let mut session = Session::build(scenario, options);

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (i, step) in scenario.steps.iter().enumerate() {
        let outcome = session.execute(step)?;
        debug!(index = i + 1, action = step.action(), subject = step.subject(), ?outcome, "step executed");
        steps.push(StepOutcome {
            index: i + 1,
            action: step.action().to_string(),
            facility: step.facility().map(str::to_string),
            subject: step.subject().to_string(),
            outcome,
        });
    }

    let report = session.summarize(scenario, steps);
    info!(
        scenario = %report.scenario,
        refused = report.refused_count(),
        fees = report.total_fees(),
        "session finished"
    );
    Ok(report)
}
