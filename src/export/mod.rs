pub mod excel;
pub mod json;

use crate::batch::{BatchSummary, ClassifiedListing};
use crate::cli::ExportFormat;
use crate::error::Result;
use std::path::{Path, PathBuf};

fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, stem: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        (
            output.join(format!("{}.json", stem)),
            output.join(format!("{}.xlsx", stem)),
        )
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or(stem);
        (
            parent.join(format!("{}.json", stem)),
            parent.join(format!("{}.xlsx", stem)),
        )
    }
}

/// Write the batch in `format`. With `include_all` unset only kept
/// listings are written; the summary always covers the whole batch.
///
/// Returns the files written.
pub fn export_results(
    results: &[ClassifiedListing],
    format: ExportFormat,
    output: &Path,
    stem: &str,
    include_all: bool,
) -> Result<Vec<PathBuf>> {
    let summary = BatchSummary::from_results(results);
    let selected: Vec<&ClassifiedListing> = results
        .iter()
        .filter(|r| include_all || r.is_kept())
        .collect();

    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    } else if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let written = match format {
        ExportFormat::Json => {
            let path = output_path_for_format(output, stem, "json");
            json::write_report(&selected, &summary, &path)?;
            vec![path]
        }
        ExportFormat::Excel => {
            let path = output_path_for_format(output, stem, "xlsx");
            excel::generate_excel(&selected, &summary, &path)?;
            vec![path]
        }
        ExportFormat::Both => {
            let (json_path, excel_path) = output_paths_for_both(output, stem);
            json::write_report(&selected, &summary, &json_path)?;
            excel::generate_excel(&selected, &summary, &excel_path)?;
            vec![json_path, excel_path]
        }
    };

    for path in &written {
        tracing::info!(path = %path.display(), listings = selected.len(), "report written");
    }
    Ok(written)
}
