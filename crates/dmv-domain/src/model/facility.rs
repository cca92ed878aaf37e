//! Facility: offers services and applies the rules to vehicles and registrants

use chrono::{Local, NaiveDate};
use dmv_types::Service;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, info};

use crate::model::{Registrant, VehicleHandle};
use crate::policy::RulePolicy;
use crate::service::{eligibility, Refusal};

/// Descriptive details of a facility
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl FacilityInfo {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }
}

/// A DMV office.
///
/// Every operation either applies its whole mutation and returns `Ok`, or
/// returns a [`Refusal`] and leaves every facility, vehicle and registrant
/// untouched. `collected_fees` always equals the sum of the fees charged for
/// `registered_vehicles`.
#[derive(Debug, Clone)]
pub struct Facility {
    info: FacilityInfo,
    services: Vec<String>,
    registered_vehicles: Vec<VehicleHandle>,
    collected_fees: u64,
    policy: RulePolicy,
}

impl Facility {
    pub fn new(info: FacilityInfo) -> Self {
        Self::with_policy(info, RulePolicy::default())
    }

    pub fn with_policy(info: FacilityInfo, policy: RulePolicy) -> Self {
        Self {
            info,
            services: Vec::new(),
            registered_vehicles: Vec::new(),
            collected_fees: 0,
            policy,
        }
    }

    pub fn info(&self) -> &FacilityInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn address(&self) -> &str {
        &self.info.address
    }

    pub fn phone(&self) -> &str {
        &self.info.phone
    }

    pub fn policy(&self) -> &RulePolicy {
        &self.policy
    }

    /// Enabled services in the order they were added
    pub fn services(&self) -> &[String] {
        &self.services
    }

    pub fn registered_vehicles(&self) -> &[VehicleHandle] {
        &self.registered_vehicles
    }

    pub fn collected_fees(&self) -> u64 {
        self.collected_fees
    }

    /// Enable a service. Names are kept verbatim, duplicates included.
    pub fn add_service(&mut self, service: impl Into<String>) {
        let service = service.into();
        debug!(facility = %self.info.name, service = %service, "service added");
        self.services.push(service);
    }

    pub fn offers(&self, service: Service) -> bool {
        self.services.iter().any(|s| s == service.name())
    }

    fn require(&self, service: Service) -> Result<(), Refusal> {
        if self.offers(service) {
            Ok(())
        } else {
            Err(Refusal::ServiceUnavailable { service })
        }
    }

    /// Register a vehicle dated today. Returns the fee charged.
    pub fn register_vehicle(&mut self, vehicle: &VehicleHandle) -> Result<u64, Refusal> {
        self.register_vehicle_on(vehicle, Local::now().date_naive())
    }

    /// Register a vehicle with an explicit registration date. Returns the fee
    /// charged.
    pub fn register_vehicle_on(
        &mut self,
        vehicle: &VehicleHandle,
        date: NaiveDate,
    ) -> Result<u64, Refusal> {
        let outcome = self.require(Service::VehicleRegistration).and_then(|()| {
            let mut v = vehicle.borrow_mut();
            if v.is_registered() {
                return Err(Refusal::AlreadyRegistered { vin: v.vin.clone() });
            }
            let (fee, collected) = v
                .registration_fee(&self.policy)
                .and_then(|fee| Some((fee, self.collected_fees.checked_add(fee)?)))
                .ok_or_else(|| Refusal::FeeOverflow { vin: v.vin.clone() })?;
            let registration = v.record_registration(date);
            info!(
                facility = %self.info.name,
                vin = %v.vin,
                plate = %registration.plate,
                fee,
                "vehicle registered"
            );
            Ok((fee, collected))
        });

        match outcome {
            Ok((fee, collected)) => {
                self.registered_vehicles.push(Rc::clone(vehicle));
                self.collected_fees = collected;
                Ok(fee)
            }
            Err(refusal) => {
                debug!(facility = %self.info.name, %refusal, "registration refused");
                Err(refusal)
            }
        }
    }

    pub fn administer_written_test(&self, registrant: &mut Registrant) -> Result<(), Refusal> {
        self.require(Service::WrittenTest)
            .and_then(|()| eligibility::check_written_test(registrant, &self.policy))
            .map(|()| {
                registrant.pass_written_test();
                info!(facility = %self.info.name, registrant = registrant.name(), "written test passed");
            })
            .inspect_err(|refusal| {
                debug!(facility = %self.info.name, registrant = registrant.name(), %refusal, "written test refused");
            })
    }

    /// Repeated calls after a pass keep succeeding without changing state
    pub fn administer_road_test(&self, registrant: &mut Registrant) -> Result<(), Refusal> {
        self.require(Service::RoadTest)
            .and_then(|()| eligibility::check_road_test(registrant))
            .map(|()| {
                registrant.pass_road_test();
                info!(facility = %self.info.name, registrant = registrant.name(), "road test passed");
            })
            .inspect_err(|refusal| {
                debug!(facility = %self.info.name, registrant = registrant.name(), %refusal, "road test refused");
            })
    }

    pub fn renew_drivers_license(&self, registrant: &mut Registrant) -> Result<(), Refusal> {
        self.require(Service::RenewLicense)
            .and_then(|()| eligibility::check_license_renewal(registrant))
            .map(|()| {
                registrant.renew_license();
                info!(facility = %self.info.name, registrant = registrant.name(), "license renewed");
            })
            .inspect_err(|refusal| {
                debug!(facility = %self.info.name, registrant = registrant.name(), %refusal, "renewal refused");
            })
    }

    /// Registered vehicles whose registration has outlived the renewal period
    pub fn vehicles_due_for_renewal(&self, today: NaiveDate) -> Vec<VehicleHandle> {
        self.registered_vehicles
            .iter()
            .filter(|v| v.borrow().is_due_for_renewal(today, &self.policy))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LicenseData, Vehicle};
    use dmv_types::{EngineType, PlateType};

    fn albany() -> Facility {
        Facility::new(FacilityInfo::new(
            "Albany DMV Office",
            "2242 Santiam Hwy SE Albany OR 97321",
            "541-967-2014",
        ))
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_facility_is_empty() {
        let facility = albany();
        assert_eq!(facility.name(), "Albany DMV Office");
        assert_eq!(facility.address(), "2242 Santiam Hwy SE Albany OR 97321");
        assert_eq!(facility.phone(), "541-967-2014");
        assert!(facility.services().is_empty());
        assert!(facility.registered_vehicles().is_empty());
        assert_eq!(facility.collected_fees(), 0);
    }

    #[test]
    fn test_add_service_keeps_order_and_duplicates() {
        let mut facility = albany();
        facility.add_service("New Drivers License");
        facility.add_service("Renew Drivers License");
        facility.add_service("Vehicle Registration");
        facility.add_service("Vehicle Registration");
        assert_eq!(
            facility.services(),
            [
                "New Drivers License",
                "Renew Drivers License",
                "Vehicle Registration",
                "Vehicle Registration"
            ]
        );
        assert!(facility.offers(Service::VehicleRegistration));
        assert!(!facility.offers(Service::RenewLicense));
    }

    #[test]
    fn test_register_without_service_is_refused() {
        let mut facility = albany();
        let bolt = Vehicle::new("987654321abcdefgh", 2019, "Chevrolet", "Bolt", EngineType::Ev)
            .into_handle();
        assert_eq!(
            facility.register_vehicle(&bolt),
            Err(Refusal::ServiceUnavailable { service: Service::VehicleRegistration })
        );
        assert!(facility.registered_vehicles().is_empty());
        assert_eq!(facility.collected_fees(), 0);
        assert!(!bolt.borrow().is_registered());
    }

    #[test]
    fn test_register_twice_is_refused_without_double_charge() {
        let mut facility = albany();
        facility.add_service("Vehicle Registration");
        let cruz = Vehicle::new("123456789abcdefgh", 2012, "Chevrolet", "Cruz", EngineType::Ice)
            .into_handle();
        assert_eq!(facility.register_vehicle_on(&cruz, day(2024, 5, 1)), Ok(100));
        assert_eq!(
            facility.register_vehicle_on(&cruz, day(2024, 6, 1)),
            Err(Refusal::AlreadyRegistered { vin: "123456789abcdefgh".to_string() })
        );
        assert_eq!(facility.registered_vehicles().len(), 1);
        assert_eq!(facility.collected_fees(), 100);
        assert_eq!(cruz.borrow().registration_date(), Some(day(2024, 5, 1)));
    }

    #[test]
    fn test_registration_is_visible_through_every_handle() {
        let mut facility = albany();
        facility.add_service("Vehicle Registration");
        let bolt = Vehicle::new("987654321abcdefgh", 2019, "Chevrolet", "Bolt", EngineType::Ev)
            .into_handle();
        facility.register_vehicle_on(&bolt, day(2024, 5, 1)).unwrap();
        assert_eq!(bolt.borrow().plate_type(), Some(PlateType::Ev));
        assert!(Rc::ptr_eq(&facility.registered_vehicles()[0], &bolt));
    }

    #[test]
    fn test_custom_policy_fees() {
        let policy = RulePolicy { base_fee: 50, ev_surcharge: 10, ..RulePolicy::default() };
        let mut facility = Facility::with_policy(FacilityInfo::default(), policy);
        facility.add_service("Vehicle Registration");
        let bolt = Vehicle::new("ev-1", 2020, "Chevrolet", "Bolt", EngineType::Ev).into_handle();
        assert_eq!(facility.register_vehicle_on(&bolt, day(2024, 1, 1)), Ok(60));
        assert_eq!(facility.collected_fees(), 60);
    }

    #[test]
    fn test_fee_overflow_is_refused_before_any_change() {
        let policy = RulePolicy { base_fee: u64::MAX, ev_surcharge: 1, ..RulePolicy::default() };
        let mut facility = Facility::with_policy(FacilityInfo::default(), policy);
        facility.add_service("Vehicle Registration");
        let bolt = Vehicle::new("ev-1", 2020, "Chevrolet", "Bolt", EngineType::Ev).into_handle();
        assert_eq!(
            facility.register_vehicle_on(&bolt, day(2024, 1, 1)),
            Err(Refusal::FeeOverflow { vin: "ev-1".to_string() })
        );
        assert!(!bolt.borrow().is_registered());
        assert!(facility.registered_vehicles().is_empty());
        assert_eq!(facility.collected_fees(), 0);
    }

    #[test]
    fn test_collected_fees_overflow_is_refused_before_any_change() {
        let policy = RulePolicy { base_fee: u64::MAX / 2 + 1, ..RulePolicy::default() };
        let mut facility = Facility::with_policy(FacilityInfo::default(), policy);
        facility.add_service("Vehicle Registration");
        let first = Vehicle::new("ice-1", 2020, "Ford", "Focus", EngineType::Ice).into_handle();
        let second = Vehicle::new("ice-2", 2021, "Ford", "Focus", EngineType::Ice).into_handle();

        assert_eq!(facility.register_vehicle_on(&first, day(2024, 1, 1)), Ok(u64::MAX / 2 + 1));
        assert_eq!(
            facility.register_vehicle_on(&second, day(2024, 1, 2)),
            Err(Refusal::FeeOverflow { vin: "ice-2".to_string() })
        );
        assert!(!second.borrow().is_registered());
        assert_eq!(facility.registered_vehicles().len(), 1);
        assert_eq!(facility.collected_fees(), u64::MAX / 2 + 1);
    }

    #[test]
    fn test_written_test_without_service_is_refused() {
        let facility = albany();
        let mut bruce = Registrant::new("Bruce", 18, true);
        assert_eq!(
            facility.administer_written_test(&mut bruce),
            Err(Refusal::ServiceUnavailable { service: Service::WrittenTest })
        );
        assert_eq!(bruce.license_data(), LicenseData::default());
    }

    #[test]
    fn test_road_test_is_idempotent() {
        let mut facility = albany();
        facility.add_service("Written Test");
        facility.add_service("Road Test");
        let mut bruce = Registrant::new("Bruce", 18, true);
        facility.administer_written_test(&mut bruce).unwrap();
        assert!(facility.administer_road_test(&mut bruce).is_ok());
        assert!(facility.administer_road_test(&mut bruce).is_ok());
        assert_eq!(
            bruce.license_data(),
            LicenseData { written: true, license: true, renewed: false }
        );
    }

    #[test]
    fn test_vehicles_due_for_renewal() {
        let mut facility = albany();
        facility.add_service("Vehicle Registration");
        let old = Vehicle::new("old", 2010, "Ford", "Focus", EngineType::Ice).into_handle();
        let new = Vehicle::new("new", 2022, "Ford", "Mach-E", EngineType::Ev).into_handle();
        facility.register_vehicle_on(&old, day(2017, 1, 1)).unwrap();
        facility.register_vehicle_on(&new, day(2023, 1, 1)).unwrap();

        let due = facility.vehicles_due_for_renewal(day(2024, 1, 1));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].borrow().vin, "old");
    }
}
