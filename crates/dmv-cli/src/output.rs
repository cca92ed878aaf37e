//! Output formatting module

use chrono::NaiveDate;
use dmv_app::app::{Outcome, SessionReport};
use dmv_types::{EngineType, OutputFormat, PlateType, Result};
use serde::Serialize;

/// Plate and fee for an engine type
#[derive(Debug, Serialize)]
pub struct Quote {
    pub engine: EngineType,
    pub plate: PlateType,
    pub fee: u64,
}

#[derive(Debug, Serialize)]
pub struct RenewalCheck {
    pub registered_on: NaiveDate,
    pub today: NaiveDate,
    pub renewal_after_years: u32,
    pub due_after: Option<NaiveDate>,
    pub due: bool,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Print session reports. JSON output is a single document: the report
/// itself for one scenario, an array for several.
pub fn output_reports(output_format: OutputFormat, reports: &[SessionReport]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = match reports {
            [report] => serde_json::to_string_pretty(report)?,
            _ => serde_json::to_string_pretty(reports)?,
        };
        println!("{}", content);
        return Ok(());
    }

    for report in reports {
        print_report_table(report);
    }
    Ok(())
}

fn print_report_table(report: &SessionReport) {
    println!("\nScenario: {} ({})", report.scenario, report.today);
    println!("{}", "=".repeat(60));

    println!("\n--- Steps ---");
    for step in &report.steps {
        let outcome = match &step.outcome {
            Outcome::Done { fee: Some(fee) } => format!("done (fee {})", fee),
            Outcome::Done { fee: None } => "done".to_string(),
            Outcome::Refused { refusal } => format!("refused: {}", refusal),
        };
        println!(
            "{:>3}. {:<17} {:<12} {:<20} {}",
            step.index,
            step.action,
            step.facility.as_deref().unwrap_or("-"),
            step.subject,
            outcome
        );
    }

    println!("\n--- Facilities ---");
    for facility in &report.facilities {
        println!("{} [{}]", facility.name, facility.id);
        if !facility.address.is_empty() {
            println!("  Address:    {}", facility.address);
        }
        if !facility.phone.is_empty() {
            println!("  Phone:      {}", facility.phone);
        }
        println!("  Services:   {}", facility.services.join(", "));
        for line in &facility.registrations {
            println!(
                "  {:<18} {} {} {:<8} {:<7} {} {:>5}",
                line.vin,
                line.year,
                line.make,
                line.model,
                line.plate.label(),
                line.date,
                line.fee
            );
        }
        println!("  Fees:       {}", facility.collected_fees);
    }

    if !report.registrants.is_empty() {
        println!("\n--- Registrants ---");
        for r in &report.registrants {
            println!(
                "{:<12} age {:>3}  permit {:<3}  written {:<3}  license {:<3}  renewed {}",
                r.name,
                r.age,
                yes_no(r.permit),
                yes_no(r.license.written),
                yes_no(r.license.license),
                yes_no(r.license.renewed)
            );
        }
    }

    if !report.due_for_renewal.is_empty() {
        println!("\nDue for renewal: {}", report.due_for_renewal.join(", "));
    }

    println!(
        "\nTotal fees: {}  Refused steps: {}",
        report.total_fees(),
        report.refused_count()
    );
}

pub fn output_quote(output_format: OutputFormat, quote: &Quote) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(quote)?);
    } else {
        println!("Engine:  {}", quote.engine);
        println!("Plate:   {}", quote.plate);
        println!("Fee:     {}", quote.fee);
    }
    Ok(())
}

pub fn output_renewal(output_format: OutputFormat, check: &RenewalCheck) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(check)?);
    } else {
        println!("Registered on:  {}", check.registered_on);
        println!("Checked on:     {}", check.today);
        if let Some(due_after) = check.due_after {
            println!("Due after:      {} ({} years)", due_after, check.renewal_after_years);
        }
        println!("Renewal due:    {}", yes_no(check.due));
    }
    Ok(())
}
