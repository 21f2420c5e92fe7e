/*!
 * Integration tests for building, writing and re-validating manifests
 */

use anyhow::Result;
use gurukul::app_config::Config;
use gurukul::app_controller::Controller;
use gurukul::manifest::{lookup, validate_manifest, write_manifest, Manifest, ManifestBuilder};
use serde_json::Value;
use crate::common;

/// Test that a written manifest reads back identical and still validates
#[test]
fn test_writeManifest_thenReadBack_shouldValidate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_kamasutra_tree(temp_dir.path())?;

    let builder = ManifestBuilder::new(lookup("kamasutra", &[])?, "gs://test-bucket");
    let manifest = builder.build(temp_dir.path())?;
    let path = temp_dir.path().join("out").join(manifest.file_name());
    write_manifest(&manifest, &path)?;

    let content = std::fs::read_to_string(&path)?;
    let read_back: Manifest = serde_json::from_str(&content)?;
    assert_eq!(read_back, manifest);

    let value: Value = serde_json::from_str(&content)?;
    assert!(validate_manifest(&value, true).passed);
    assert!(value["sections"][0]["chapters"][0].get("titleEnglish").is_none());
    assert!(content.contains("\"pdfUrl\": \"gs://test-bucket/"));
    Ok(())
}

/// Test the manifest command end to end through the controller
#[tokio::test]
async fn test_controllerManifest_shouldWriteNextToRootAndValidate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_kamasutra_tree(temp_dir.path())?;
    let controller = Controller::new_for_test()?;

    let manifest = controller.manifest(temp_dir.path(), "kamasutra", None, true).await?;
    let written = temp_dir.path().join("kamasutra_chapter_manifest.json");
    assert!(written.exists());
    assert_eq!(manifest.total_chapters, 3);

    let report = controller.validate(&written).await?;
    assert_eq!((report.with_metadata, report.without_metadata), (3, 0));
    Ok(())
}

/// Test that a user convention from the config is used for manifests
#[tokio::test]
async fn test_controllerManifest_withUserConvention_shouldUseConfiguredBasePath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_kamasutra_tree(temp_dir.path())?;

    let mut spec = gurukul::manifest::builtin_conventions()
        .into_iter()
        .find(|s| s.scripture_id == "kamasutra")
        .expect("kamasutra convention");
    spec.scripture_id = "kamasutra_mirror".to_string();
    spec.base_path = "Mirror/KamaSutra".to_string();
    let config = Config {
        conventions: vec![spec],
        bucket: "gs://mirror".to_string(),
        ..Default::default()
    };
    let controller = Controller::with_config(config)?;

    let output = temp_dir.path().join("custom.json");
    let manifest = controller.manifest(temp_dir.path(), "kamasutra_mirror", Some(&output), true).await?;

    assert!(output.exists());
    assert_eq!(manifest.scripture_id, "kamasutra_mirror");
    assert!(manifest.sections[0].chapters[0].pdf_url.starts_with("gs://mirror/Mirror/KamaSutra/Part_1_General_Remarks/"));
    Ok(())
}

/// Test that unknown scriptures and missing roots are errors that write nothing
#[tokio::test]
async fn test_controllerManifest_withBadInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_kamasutra_tree(temp_dir.path())?;
    let controller = Controller::new_for_test()?;

    assert!(controller.manifest(temp_dir.path(), "unknown_text", None, true).await.is_err());
    assert!(controller.manifest(&temp_dir.path().join("absent"), "kamasutra", None, true).await.is_err());
    assert!(!temp_dir.path().join("kamasutra_chapter_manifest.json").exists());
    Ok(())
}

/// Test that validating a broken manifest file is an error
#[tokio::test]
async fn test_controllerValidate_withInconsistentTotals_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bad_manifest.json", r#"{
        "scriptureId": "x", "scriptureName": "X", "totalChapters": 5, "lastUpdated": "",
        "sections": [ { "sectionId": "1", "chapterCount": 1, "chapters": [
            { "chapterId": "1", "chapterNumber": 1, "title": "t", "metadataUrl": "m", "pdfUrl": "p", "hasMetadata": false }
        ] } ]
    }"#)?;

    let controller = Controller::new_for_test()?;
    assert!(controller.validate(&path).await.is_err());
    Ok(())
}
