//! The module responsible for writing output data.
use crate::dispatch::{ProductionPlan, RankedUnit};
use crate::plant::{UnitID, UnitKind};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The output file name for the production plan as CSV
const PLAN_CSV_FILE_NAME: &str = "production_plan.csv";

/// The output file name for the production plan as JSON
const PLAN_JSON_FILE_NAME: &str = "production_plan.json";

/// The output file name for the merit order and derived unit properties
const DISPATCH_INFO_FILE_NAME: &str = "debug_dispatch_info.csv";

/// Represents one unit's entry in the production plan output
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct PlanRow {
    /// Name of the unit
    pub name: UnitID,
    /// Output in MW, to one decimal place
    pub p: f64,
}

/// Represents a row in the debug dispatch info CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DispatchInfoRow {
    merit_order: usize,
    name: UnitID,
    #[serde(rename = "type")]
    kind: UnitKind,
    cost_per_mwh: f64,
    available_capacity: f64,
}

/// Convert a plan into output rows, keeping the request order
pub fn plan_rows(plan: &ProductionPlan) -> Vec<PlanRow> {
    plan.iter()
        .map(|entry| PlanRow {
            name: entry.unit_id.clone(),
            p: entry.output.to_power().value(),
        })
        .collect()
}

/// Serialise a plan as a JSON array of `{"name", "p"}` records
pub fn plan_to_json(plan: &ProductionPlan) -> Result<String> {
    Ok(serde_json::to_string_pretty(&plan_rows(plan))?)
}

/// Create a new output directory.
///
/// # Arguments
///
/// * `output_dir` - The directory to create
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// True if the output dir contained existing files which will be overwritten, else false.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Write the production plan to CSV and JSON files in the output folder
pub fn write_plan(output_path: &Path, plan: &ProductionPlan) -> Result<()> {
    let file_path = output_path.join(PLAN_CSV_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    for row in plan_rows(plan) {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let file_path = output_path.join(PLAN_JSON_FILE_NAME);
    fs::write(&file_path, plan_to_json(plan)?)
        .with_context(|| format!("Could not write {}", file_path.display()))?;

    Ok(())
}

/// Write the merit order, with each unit's cost and available capacity, to a CSV file
pub fn write_dispatch_info(output_path: &Path, ranked: &[RankedUnit]) -> Result<()> {
    let file_path = output_path.join(DISPATCH_INFO_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    for (idx, ranked) in ranked.iter().enumerate() {
        writer.serialize(DispatchInfoRow {
            merit_order: idx + 1,
            name: ranked.unit.id.clone(),
            kind: ranked.unit.kind,
            cost_per_mwh: ranked.info.cost.value(),
            available_capacity: ranked.info.available.to_power().value(),
        })?;
    }
    writer.flush()?;

    Ok(())
}
