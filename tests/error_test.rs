//! Error conditions

use ownerfi_filter::config::Config;
use ownerfi_filter::error::FilterError;
use ownerfi_filter::scanner;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_load_nonexistent_folder() {
    let result = scanner::load_listings(Path::new("/nonexistent/path/12345"), false);
    assert!(matches!(result.unwrap_err(), FilterError::FolderNotFound(_)));
}

#[test]
fn test_folder_without_listing_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    let result = scanner::load_listings(dir.path(), false);
    assert!(matches!(result.unwrap_err(), FilterError::NoListingsFound(_)));
}

#[test]
fn test_non_array_listing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.json");
    std::fs::write(&path, "{}").unwrap();

    let err = scanner::load_listings(&path, false).unwrap_err();
    assert!(matches!(err, FilterError::InvalidListingFile { .. }));
    assert!(err.to_string().contains("data.json"));
}

#[test]
fn test_bad_pattern_table_fails_at_startup() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("patterns.json");
    std::fs::write(
        &path,
        r#"{"version": 1, "primary": "missing", "sets": [{"name": "a"}]}"#,
    )
    .unwrap();

    let err = Config::default().classifier_with(Some(&path)).unwrap_err();
    assert!(matches!(err, FilterError::Classifier(_)));
}

#[test]
fn test_error_display() {
    let cases = vec![
        (
            FilterError::Config("bad value".to_string()),
            "configuration error: bad value",
        ),
        (
            FilterError::FileNotFound("listings.json".to_string()),
            "file not found: listings.json",
        ),
        (
            FilterError::FolderNotFound("/path/to/folder".to_string()),
            "folder not found: /path/to/folder",
        ),
        (
            FilterError::NoListingsFound("folder".to_string()),
            "no listings found in folder",
        ),
        (
            FilterError::InvalidListingFile {
                path: "a.json".to_string(),
                reason: "expected an array".to_string(),
            },
            "invalid listing file a.json: expected an array",
        ),
        (
            FilterError::ExcelGeneration("write failed".to_string()),
            "Excel generation failed: write failed",
        ),
        (
            FilterError::Classifier(ownerfi_common::Error::InvalidTable("no sets".to_string())),
            "pattern table error: invalid pattern table: no sets",
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}
