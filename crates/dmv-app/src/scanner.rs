//! Scenario file discovery

use dmv_types::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check if a path looks like a scenario file
pub fn is_scenario_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

/// Resolve a path to the scenario files it names: the file itself, or every
/// `.toml` file below a directory sorted by path
pub fn scan_scenarios(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    if path.is_file() {
        if !is_scenario_file(path) {
            return Err(Error::Scenario(format!(
                "{} is not a .toml scenario",
                path.display()
            )));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut scenarios: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_scenario_file(p))
        .collect();
    scenarios.sort();

    Ok(scenarios)
}
