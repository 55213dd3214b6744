mod coerce;

pub use coerce::parse_amount;

use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One scraped property listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub estimate: Option<f64>,
}

const LISTING_EXTENSION: &str = "json";

/// Load listings from a JSON file or a folder of JSON files.
///
/// Files inside a folder that fail to parse are skipped with a warning; a
/// single input file that fails to parse is an error.
pub fn load_listings(input: &Path, recursive: bool) -> Result<Vec<Listing>> {
    let listings = if input.is_dir() {
        let mut listings = Vec::new();
        for file in scan_folder(input, recursive)? {
            match load_file(&file) {
                Ok(mut found) => listings.append(&mut found),
                Err(e) => tracing::warn!(file = %file.display(), error = %e, "skipping listing file"),
            }
        }
        listings
    } else if input.is_file() {
        load_file(input)?
    } else if input.extension().is_some() {
        return Err(FilterError::FileNotFound(input.display().to_string()));
    } else {
        return Err(FilterError::FolderNotFound(input.display().to_string()));
    };

    if listings.is_empty() {
        return Err(FilterError::NoListingsFound(input.display().to_string()));
    }

    tracing::info!(count = listings.len(), input = %input.display(), "listings loaded");
    Ok(listings)
}

/// JSON files in `folder`, sorted by path
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(FilterError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_listing_file(p))
        .collect();

    files.sort();
    Ok(files)
}

/// Parse one file: a bare array of records, or an object with a `listings`
/// array. Records that are not objects are skipped.
pub fn load_file(path: &Path) -> Result<Vec<Listing>> {
    if !path.exists() {
        return Err(FilterError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|e| invalid(path, e.to_string()))?;

    let records = match &value {
        Value::Array(records) => records,
        Value::Object(obj) => match obj.get("listings") {
            Some(Value::Array(records)) => records,
            _ => return Err(invalid(path, "expected an array or a `listings` array".into())),
        },
        _ => return Err(invalid(path, "expected an array or a `listings` array".into())),
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut listings = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let fallback_id = format!("{}#{}", stem, index);
        match coerce::listing_from_value(record, &fallback_id) {
            Some(listing) => listings.push(listing),
            None => tracing::warn!(file = %path.display(), index, "skipping non-object record"),
        }
    }

    Ok(listings)
}

fn is_listing_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(LISTING_EXTENSION))
        .unwrap_or(false)
}

fn invalid(path: &Path, reason: String) -> FilterError {
    FilterError::InvalidListingFile {
        path: path.display().to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_listing_file() {
        assert!(is_listing_file(Path::new("a.json")));
        assert!(is_listing_file(Path::new("a.JSON")));
        assert!(is_listing_file(Path::new("a.Json")));
        assert!(!is_listing_file(Path::new("a.csv")));
        assert!(!is_listing_file(Path::new("json")));
    }

    #[test]
    fn test_folder_not_found() {
        let result = load_listings(Path::new("/nonexistent/folder"), false);
        assert!(matches!(result, Err(FilterError::FolderNotFound(_))));
    }

    #[test]
    fn test_file_not_found() {
        let result = load_listings(Path::new("/nonexistent/listings.json"), false);
        assert!(matches!(result, Err(FilterError::FileNotFound(_))));
    }

    #[test]
    fn test_load_wrapped_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(
            &path,
            r#"{"listings": [{"id": "1", "description": "rent to own"}, "garbage", {"zpid": 2}]}"#,
        )
        .unwrap();

        let listings = load_file(&path).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].id, "1");
        assert_eq!(listings[1].id, "2");
    }

    #[test]
    fn test_fallback_ids_use_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("austin.json");
        fs::write(&path, r#"[{"description": "a"}, {"description": "b"}]"#).unwrap();

        let listings = load_file(&path).unwrap();
        assert_eq!(listings[0].id, "austin#0");
        assert_eq!(listings[1].id, "austin#1");
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_listings(&path, false),
            Err(FilterError::InvalidListingFile { .. })
        ));

        fs::write(&path, r#"{"items": []}"#).unwrap();
        assert!(matches!(load_file(&path), Err(FilterError::InvalidListingFile { .. })));
    }

    #[test]
    fn test_folder_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"id": "a"}]"#).unwrap();
        fs::write(dir.path().join("b.json"), "oops").unwrap();
        fs::write(dir.path().join("c.Json"), r#"[{"id": "c"}]"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let listings = load_listings(dir.path(), false).unwrap();
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_recursive_scan() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(dir.path().join("b.json"), r#"[{"id": "top"}]"#).unwrap();
        fs::write(sub.join("a.json"), r#"[{"id": "nested"}]"#).unwrap();

        assert_eq!(scan_folder(dir.path(), false).unwrap().len(), 1);
        assert_eq!(scan_folder(dir.path(), true).unwrap().len(), 2);

        let listings = load_listings(dir.path(), true).unwrap();
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "nested"]);
    }

    #[test]
    fn test_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_listings(dir.path(), false),
            Err(FilterError::NoListingsFound(_))
        ));

        let path = dir.path().join("empty.json");
        fs::write(&path, "[]").unwrap();
        assert!(matches!(
            load_listings(&path, false),
            Err(FilterError::NoListingsFound(_))
        ));
    }
}
