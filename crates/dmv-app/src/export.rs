//! Excel export of a session's registration ledger

use crate::app::SessionReport;
use dmv_types::{Error, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

fn excel(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Export the facility summaries and registrations of a session
pub fn export_ledger(report: &SessionReport, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, report)?;

    let registrations_sheet = workbook.add_worksheet();
    write_registrations_sheet(registrations_sheet, report)?;

    workbook.save(output_path).map_err(excel)?;
    tracing::info!(path = %output_path.display(), "ledger exported");

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, report: &SessionReport) -> Result<()> {
    sheet.set_name("Summary").map_err(excel)?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "DMV Registration Ledger", &header_format)
        .map_err(excel)?;
    sheet.write_string(2, 0, "Scenario:").map_err(excel)?;
    sheet.write_string(2, 1, &report.scenario).map_err(excel)?;
    sheet.write_string(3, 0, "Date:").map_err(excel)?;
    sheet
        .write_string(3, 1, report.today.format("%Y-%m-%d").to_string())
        .map_err(excel)?;
    sheet.write_string(4, 0, "Total fees:").map_err(excel)?;
    sheet
        .write_number(4, 1, report.total_fees() as f64)
        .map_err(excel)?;

    let headers = ["Facility", "Address", "Phone", "Services", "Vehicles", "Fees"];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(6, col as u16, *header, &header_format)
            .map_err(excel)?;
    }

    for (i, facility) in report.facilities.iter().enumerate() {
        let row = 7 + i as u32;
        sheet.write_string(row, 0, &facility.name).map_err(excel)?;
        sheet.write_string(row, 1, &facility.address).map_err(excel)?;
        sheet.write_string(row, 2, &facility.phone).map_err(excel)?;
        sheet
            .write_string(row, 3, facility.services.join(", "))
            .map_err(excel)?;
        sheet
            .write_number(row, 4, facility.registrations.len() as f64)
            .map_err(excel)?;
        sheet
            .write_number(row, 5, facility.collected_fees as f64)
            .map_err(excel)?;
    }

    Ok(())
}

fn write_registrations_sheet(sheet: &mut Worksheet, report: &SessionReport) -> Result<()> {
    sheet.set_name("Registrations").map_err(excel)?;

    let header_format = Format::new().set_bold();
    let headers = [
        "Facility", "VIN", "Year", "Age", "Make", "Model", "Plate", "Registered", "Fee",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel)?;
    }

    let lines = report
        .facilities
        .iter()
        .flat_map(|f| f.registrations.iter().map(move |r| (f, r)));
    for (i, (facility, line)) in lines.enumerate() {
        let row = 1 + i as u32;
        sheet.write_string(row, 0, &facility.name).map_err(excel)?;
        sheet.write_string(row, 1, &line.vin).map_err(excel)?;
        sheet.write_number(row, 2, line.year as f64).map_err(excel)?;
        sheet
            .write_number(row, 3, line.age_years as f64)
            .map_err(excel)?;
        sheet.write_string(row, 4, &line.make).map_err(excel)?;
        sheet.write_string(row, 5, &line.model).map_err(excel)?;
        sheet.write_string(row, 6, line.plate.label()).map_err(excel)?;
        sheet
            .write_string(row, 7, line.date.format("%Y-%m-%d").to_string())
            .map_err(excel)?;
        sheet.write_number(row, 8, line.fee as f64).map_err(excel)?;
    }

    Ok(())
}
