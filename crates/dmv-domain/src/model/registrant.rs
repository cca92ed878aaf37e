//! Registrant: a person working through the licensing process

use serde::{Deserialize, Serialize};

/// Licensing progress. Flags only ever move from false to true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseData {
    /// Written test passed
    pub written: bool,
    /// Road test passed, license issued
    pub license: bool,
    /// License renewed
    pub renewed: bool,
}

/// A person applying for a license.
///
/// Holds state only; all validation happens in [`crate::Facility`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    name: String,
    age: u32,
    permit: bool,
    license_data: LicenseData,
}

impl Registrant {
    pub fn new(name: impl Into<String>, age: u32, permit: bool) -> Self {
        Self {
            name: name.into(),
            age,
            permit,
            license_data: LicenseData::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn has_permit(&self) -> bool {
        self.permit
    }

    pub fn license_data(&self) -> LicenseData {
        self.license_data
    }

    pub fn earn_permit(&mut self) {
        self.permit = true;
    }

    pub(crate) fn pass_written_test(&mut self) {
        self.license_data.written = true;
    }

    pub(crate) fn pass_road_test(&mut self) {
        self.license_data.license = true;
    }

    pub(crate) fn renew_license(&mut self) {
        self.license_data.renewed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registrant_defaults() {
        let registrant = Registrant::new("Penny", 16, false);
        assert_eq!(registrant.name(), "Penny");
        assert_eq!(registrant.age(), 16);
        assert!(!registrant.has_permit());
        assert_eq!(registrant.license_data(), LicenseData::default());
    }

    #[test]
    fn test_earn_permit_is_idempotent() {
        let mut registrant = Registrant::new("Penny", 16, false);
        registrant.earn_permit();
        registrant.earn_permit();
        assert!(registrant.has_permit());
    }

    #[test]
    fn test_flags_are_independent() {
        let mut registrant = Registrant::new("Bruce", 18, true);
        registrant.pass_written_test();
        assert_eq!(
            registrant.license_data(),
            LicenseData { written: true, license: false, renewed: false }
        );
        registrant.pass_road_test();
        registrant.renew_license();
        assert_eq!(
            registrant.license_data(),
            LicenseData { written: true, license: true, renewed: true }
        );
    }
}
