/*!
 * Tests for file and directory utilities
 */

use std::fs;
use std::path::Path;

use anyhow::Result;
use gurukul::file_utils::FileManager;
use serde_json::json;
use crate::common;

/// Test file and directory existence checks
#[test]
fn test_existenceChecks_shouldDistinguishFilesAndDirs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "a.txt", "x")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::dir_exists(&file));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
    Ok(())
}

/// Test extension helpers
#[test]
fn test_extensionHelpers_shouldIgnoreCaseAndLeadingDot() {
    assert!(FileManager::has_extension("Chapter_1.PDF", "pdf"));
    assert!(FileManager::has_extension("Chapter_1.pdf", ".pdf"));
    assert!(!FileManager::has_extension("Chapter_1", "pdf"));
    assert_eq!(
        FileManager::sibling_with_extension("/lib/Chapter_1.pdf", ".json"),
        Path::new("/lib/Chapter_1.json")
    );
    assert_eq!(FileManager::file_name_string("/lib/Chapter_1.pdf"), "Chapter_1.pdf");
}

/// Test recursive and flat listings
#[test]
fn test_listings_shouldBeSortedAndFiltered() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_pdf(root, "b.pdf")?;
    common::create_test_pdf(root, "a.pdf")?;
    common::create_test_pdf(root, "Section_1/c.pdf")?;
    common::create_test_file(root, "notes.txt", "x")?;

    let all = FileManager::find_files(root, "pdf")?;
    assert_eq!(all, vec![root.join("Section_1/c.pdf"), root.join("a.pdf"), root.join("b.pdf")]);

    assert_eq!(FileManager::files_in_dir(root, "pdf")?.len(), 2);
    assert_eq!(FileManager::subdirectories(root)?, vec![root.join("Section_1")]);
    Ok(())
}

/// Test that JSON writes are pretty, keep non-ASCII text and create parent folders
#[test]
fn test_writeJsonPretty_shouldCreateParentsAndKeepUnicode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out/nested/data.json");

    FileManager::write_json_pretty(&path, &json!({ "term": "धर्म" }))?;

    let content = FileManager::read_to_string(&path)?;
    assert!(content.contains("धर्म"));
    assert!(content.contains("\n  \"term\""));

    FileManager::write_json_pretty(&path, &json!({ "term": "karma" }))?;
    assert!(FileManager::read_to_string(&path)?.contains("karma"));
    assert_eq!(fs::read_dir(path.parent().unwrap())?.count(), 1, "no temporary files are left behind");
    Ok(())
}

/// Test that log lines are appended with a timestamp
#[test]
fn test_appendToLogFile_shouldAppendTimestampedLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log = temp_dir.path().join("logs/run.log");

    FileManager::append_to_log_file(&log, "first")?;
    FileManager::append_to_log_file(&log, "second")?;

    let content = FileManager::read_to_string(&log)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] first"));
    assert!(lines[1].ends_with("] second"));
    Ok(())
}
