use crate::batch::{BatchSummary, ClassifiedListing};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// JSON report written by `filter`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterReport {
    pub generated_at: String,
    pub summary: BatchSummary,
    pub listings: Vec<ClassifiedListing>,
}

impl FilterReport {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

pub fn write_report(
    listings: &[&ClassifiedListing],
    summary: &BatchSummary,
    output_path: &Path,
) -> Result<()> {
    let report = FilterReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        summary: *summary,
        listings: listings.iter().map(|l| (*l).clone()).collect(),
    };

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(output_path, json)?;
    Ok(())
}
