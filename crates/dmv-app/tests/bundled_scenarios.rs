//! Runs the scenarios shipped in the repository's scenarios/ folder

use chrono::NaiveDate;
use dmv_app::app::{run_scenario, Outcome, SessionOptions};
use dmv_app::scanner::scan_scenarios;
use dmv_domain::{LicenseData, Refusal};
use dmv_infra::Scenario;
use std::path::PathBuf;

fn scenarios_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("scenarios")
}

fn options() -> SessionOptions {
    SessionOptions::new().with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
}

#[test]
fn test_bundled_scenarios_run() {
    let paths = scan_scenarios(&scenarios_dir()).unwrap();
    assert!(!paths.is_empty());
    for path in paths {
        let scenario = Scenario::load_from_file(&path).unwrap();
        run_scenario(&scenario, &options()).unwrap();
    }
}

#[test]
fn test_oregon_day() {
    let scenario = Scenario::load_from_file(&scenarios_dir().join("oregon_day.toml")).unwrap();
    let report = run_scenario(&scenario, &options()).unwrap();

    let albany = &report.facilities[0];
    assert_eq!(albany.collected_fees, 325);
    assert_eq!(albany.registrations.len(), 3);
    assert_eq!(report.facilities[1].collected_fees, 0);
    assert_eq!(report.due_for_renewal, ["1a2b3c4d5e6f"]);

    assert_eq!(report.steps[4].outcome, Outcome::Refused { refusal: Refusal::NoPermit });

    let penny = report.registrants.iter().find(|r| r.name == "Penny").unwrap();
    assert_eq!(penny.license, LicenseData { written: true, license: true, renewed: true });

    let tucker = report.registrants.iter().find(|r| r.name == "Tucker").unwrap();
    assert_eq!(tucker.license, LicenseData::default());
    assert_eq!(
        report.steps.last().unwrap().outcome,
        Outcome::Refused { refusal: Refusal::RoadTestRequired }
    );
}
