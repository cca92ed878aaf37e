//! CSV vehicle rosters
//!
//! Expected header: `vin,year,make,model,engine` with engine `ice` or `ev`.

use std::io::Read;
use std::path::Path;

use dmv_domain::Vehicle;
use dmv_types::{EngineType, Error, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RosterRow {
    vin: String,
    year: i32,
    make: String,
    model: String,
    engine: EngineType,
}

/// Load vehicles from a roster file
pub fn load_roster_from_csv(path: &Path) -> Result<Vec<Vehicle>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let file = std::fs::File::open(path)?;
    load_roster_from_reader(file)
}

/// Load vehicles from any CSV source
pub fn load_roster_from_reader<R: Read>(reader: R) -> Result<Vec<Vehicle>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut vehicles = Vec::new();
    for row in csv_reader.deserialize() {
        let row: RosterRow = row?;
        vehicles.push(Vehicle::new(row.vin, row.year, row.make, row.model, row.engine));
    }
    tracing::debug!(count = vehicles.len(), "roster loaded");
    Ok(vehicles)
}
