use liberator_core::{
    Category, ContentHash, EventLog, FileRecord, FileStat, HashError, ScanConfig, bytes_to_mib,
};
use std::str::FromStr;
use std::time::{Duration, UNIX_EPOCH};

#[test]
fn test_content_hash_creation_and_hex() {
    let bytes = [0xab; 32];
    let hash = ContentHash::new(bytes);

    let hex = hash.to_hex();
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(hash.to_string(), hex);

    assert_eq!(hash, ContentHash::new(bytes));
    assert_ne!(hash, ContentHash::new([0xcd; 32]));
}

#[test]
fn test_file_record_probe_on_real_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("letter.docx");
    std::fs::write(&path, b"dear sir").unwrap();

    let record = FileRecord::probe(&path, 1);
    assert_eq!(record.name.as_str(), "letter.docx");
    assert_eq!(record.size(), Some(8));
}

#[test]
fn test_file_record_probe_on_missing_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let record = FileRecord::probe(temp.path().join("gone.txt"), 1);

    let failure = record.stat.unwrap_err();
    assert_eq!(failure.kind, "NotFound");
}

#[test]
fn test_file_record_serializes_with_stat() {
    let record = FileRecord::new(
        "/docs/a.txt",
        1,
        Ok(FileStat::new(3, UNIX_EPOCH + Duration::from_secs(10))),
    );
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["name"], "a.txt");
    assert_eq!(json["stat"]["Ok"]["size"], 3);
}

#[test]
fn test_category_serde_names() {
    let json = serde_json::to_string(&Category::LivingScrolls).unwrap();
    assert_eq!(json, "\"living_scrolls\"");
    assert_eq!(Category::from_str("fort_projects").unwrap(), Category::FortProjects);
    assert!(Category::Documents < Category::Other);
}

#[test]
fn test_scan_config_serde_defaults() {
    let config: ScanConfig = serde_json::from_str(r#"{"root": "/srv/docs"}"#).unwrap();
    assert!(config.include_hidden);
    assert!(!config.follow_symlinks);
    assert!(config.max_depth.is_none());
}

#[test]
fn test_event_log_is_structured() {
    let mut log = EventLog::new();
    assert!(log.is_empty());
    log.info("Found 2 sets of duplicates from 3 files");
    log.warn("Error hashing /x: Permission denied: /x");

    assert_eq!(log.len(), 2);
    assert_eq!(log.warning_count(), 1);
    let json = serde_json::to_value(&log).unwrap();
    assert_eq!(json["events"][1]["level"], "warn");
}

#[test]
fn test_hash_error_display_has_path() {
    let err = HashError::io(
        "/docs/locked.pdf",
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    );
    assert_eq!(err.to_string(), "Permission denied: /docs/locked.pdf");
}

#[test]
fn test_bytes_to_mib() {
    assert!((bytes_to_mib(150 * 1024 * 1024) - 150.0).abs() < f64::EPSILON);
}
