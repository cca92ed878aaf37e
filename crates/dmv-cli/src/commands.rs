//! Command handlers

use crate::cli::{Cli, Commands};
use crate::output::{output_quote, output_renewal, output_reports, Quote, RenewalCheck};
use chrono::{Local, Months, NaiveDate};
use dmv_app::app::{run_scenario, SessionOptions};
use dmv_app::config::Config;
use dmv_app::export::export_ledger;
use dmv_app::scanner::scan_scenarios;
use dmv_domain::service::{is_due_for_renewal, plate_for, registration_fee};
use dmv_infra::Scenario;
use dmv_types::{ConfigError, EngineType, OutputFormat, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Run {
            path,
            export,
            today,
        } => cmd_run(&config, &path, export.as_deref(), today, output_format),

        Commands::Quote { engine } => cmd_quote(&config, engine, output_format),

        Commands::Renewal {
            registered_on,
            today,
        } => cmd_renewal(&config, registered_on, today, output_format),

        Commands::Config {
            show,
            set_output,
            set_base_fee,
            set_ev_surcharge,
            set_min_age,
            set_renewal_years,
            reset,
        } => cmd_config(
            show,
            ConfigChanges {
                output_format: set_output,
                base_fee: set_base_fee,
                ev_surcharge: set_ev_surcharge,
                min_written_test_age: set_min_age,
                renewal_after_years: set_renewal_years,
            },
            reset,
        ),
    }
}

fn cmd_run(
    config: &Config,
    path: &Path,
    export: Option<&Path>,
    today: Option<NaiveDate>,
    output_format: OutputFormat,
) -> Result<()> {
    let scenario_paths = scan_scenarios(path)?;
    if scenario_paths.is_empty() {
        eprintln!("No scenario files found in {}", path.display());
        return Ok(());
    }

    let mut options = SessionOptions::new().with_policy(config.policy());
    if let Some(today) = today {
        options = options.with_today(today);
    }

    let multiple = scenario_paths.len() > 1;
    let labels = ledger_labels(&scenario_paths);
    let mut reports = Vec::with_capacity(scenario_paths.len());
    for (scenario_path, label) in scenario_paths.iter().zip(&labels) {
        debug!(path = %scenario_path.display(), "loading scenario");
        let scenario = Scenario::load_from_file(scenario_path)?;
        let report = run_scenario(&scenario, &options)?;

        if let Some(export) = export {
            let target = export_target(export, label, multiple);
            export_ledger(&report, &target)?;
            eprintln!("Ledger written to {}", target.display());
        }
        reports.push(report);
    }

    output_reports(output_format, &reports)
}

/// One label per scenario file for naming its ledger: the file stem, with a
/// numeric suffix when two files in different directories share a stem
fn ledger_labels(paths: &[PathBuf]) -> Vec<String> {
    let mut taken = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("scenario");
            let mut label = stem.to_string();
            let mut n = 2;
            while !taken.insert(label.clone()) {
                label = format!("{}-{}", stem, n);
                n += 1;
            }
            label
        })
        .collect()
}

/// With several scenarios each ledger gets the scenario label appended to the
/// file stem
fn export_target(export: &Path, label: &str, multiple: bool) -> PathBuf {
    if !multiple {
        return export.to_path_buf();
    }
    let stem = export
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("ledger");
    let extension = export
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("xlsx");
    export.with_file_name(format!("{}-{}.{}", stem, label, extension))
}

fn cmd_quote(config: &Config, engine: EngineType, output_format: OutputFormat) -> Result<()> {
    let quote = quote_for(config, engine)?;
    output_quote(output_format, &quote)
}

fn quote_for(config: &Config, engine: EngineType) -> Result<Quote> {
    let policy = config.policy();
    let fee = registration_fee(engine, &policy).ok_or_else(|| {
        ConfigError::InvalidValue(format!(
            "{} fee overflows with base fee {} and EV surcharge {}",
            engine.label(),
            policy.base_fee,
            policy.ev_surcharge
        ))
    })?;
    Ok(Quote {
        engine,
        plate: plate_for(engine),
        fee,
    })
}

fn cmd_renewal(
    config: &Config,
    registered_on: NaiveDate,
    today: Option<NaiveDate>,
    output_format: OutputFormat,
) -> Result<()> {
    let policy = config.policy();
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let check = RenewalCheck {
        registered_on,
        today,
        renewal_after_years: policy.renewal_after_years,
        due_after: registered_on
            .checked_add_months(Months::new(policy.renewal_after_years.saturating_mul(12))),
        due: is_due_for_renewal(Some(registered_on), today, &policy),
    };
    output_renewal(output_format, &check)
}

/// Values requested with `config --set-*`
#[derive(Debug, Default)]
struct ConfigChanges {
    output_format: Option<OutputFormat>,
    base_fee: Option<u64>,
    ev_surcharge: Option<u64>,
    min_written_test_age: Option<u32>,
    renewal_after_years: Option<u32>,
}

impl ConfigChanges {
    /// Apply to `config`, returning whether anything changed
    fn apply(self, config: &mut Config) -> bool {
        let mut modified = false;

        if let Some(output_format) = self.output_format {
            config.output_format = output_format;
            modified = true;
        }

        if let Some(base_fee) = self.base_fee {
            config.base_fee = base_fee;
            modified = true;
        }

        if let Some(ev_surcharge) = self.ev_surcharge {
            config.ev_surcharge = ev_surcharge;
            modified = true;
        }

        if let Some(min_age) = self.min_written_test_age {
            config.min_written_test_age = min_age;
            modified = true;
        }

        if let Some(years) = self.renewal_after_years {
            config.renewal_after_years = years;
            modified = true;
        }

        modified
    }
}

fn cmd_config(show: bool, changes: ConfigChanges, reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let modified = changes.apply(&mut config);

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
