use burrow_core::{EntryKind, ExplorerConfig, FileCatalogEntry, FsError, PickerFilter};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_entry_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("notes.txt");
    fs::write(&path, b"hello world").unwrap();

    let entry = FileCatalogEntry::from_path(&path).unwrap();
    assert_eq!(entry.name.as_str(), "notes.txt");
    assert_eq!(entry.kind, EntryKind::File);
    assert_eq!(entry.size, 11);
    assert!(entry.modified_ms > 0);
    assert!(!entry.selected);
    assert_eq!(entry.mime_type(), "text/plain");
}

#[test]
fn test_directory_entry_has_zero_size() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("photos");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("big.bin"), vec![0u8; 4096]).unwrap();

    let entry = FileCatalogEntry::from_path(&dir).unwrap();
    assert!(entry.is_dir());
    assert_eq!(entry.size, 0);
    assert_eq!(entry.display_size(), "");
}

#[test]
fn test_missing_entry_is_not_found() {
    let temp = TempDir::new().unwrap();
    let err = FileCatalogEntry::from_path(temp.path().join("nope")).unwrap_err();
    assert!(matches!(err, FsError::NotFound { .. }));
}

#[test]
fn test_config_from_toml_uses_defaults() {
    let config: ExplorerConfig = toml::from_str(r#"picker_filter = "text/*""#).unwrap();
    assert!(config.show_hidden);
    assert!(config.start_directory.is_none());
    assert_eq!(config.picker_filter, Some(PickerFilter::new("text/*")));

    let config: ExplorerConfig = toml::from_str(
        r#"
        start_directory = "/srv/share"
        show_hidden = false
        "#,
    )
    .unwrap();
    assert!(!config.show_hidden);
    assert_eq!(
        config.start_directory.as_deref(),
        Some(std::path::Path::new("/srv/share"))
    );
}
