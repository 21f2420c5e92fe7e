/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use gurukul::app_config::{Config, GenerationProvider};
use gurukul::app_controller::{Controller, MetadataRequest, StrategyChoice, RUN_LOG_FILE};
use gurukul::errors::ConfigError;
use gurukul::segmentation::{Strategy, VerseRecord};
use crate::common;

fn mock_config() -> Config {
    let mut config = Config::default();
    config.generation.provider = GenerationProvider::Mock;
    config.generation.rate_limit_delay_ms = 0;
    config
}

/// Test the controller with default configuration
#[test]
fn test_controllerInitialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert_eq!(controller.config().generation.provider, GenerationProvider::Gemini);
    Ok(())
}

/// Test a full metadata run with the mock provider, including the run log
#[tokio::test]
async fn test_controllerMetadata_withMockProvider_shouldProcessAndLog() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_pdf(temp_dir.path(), "Section_1/Chapter_1.pdf")?;
    common::create_test_pdf(temp_dir.path(), "Section_1/Chapter_2.pdf")?;
    let controller = Controller::with_config(mock_config())?;

    let request = MetadataRequest {
        root: temp_dir.path().to_path_buf(),
        ..Default::default()
    };
    let summary = controller.metadata(request.clone()).await?;
    assert_eq!((summary.processed, summary.failed), (2, 0));
    assert!(temp_dir.path().join("Section_1/Chapter_1.json").exists());

    let log = std::fs::read_to_string(temp_dir.path().join(RUN_LOG_FILE))?;
    assert!(log.contains("2 processed, 0 skipped, 0 errors"));

    let again = controller.metadata(request).await?;
    assert_eq!((again.processed, again.skipped), (0, 2));
    let log = std::fs::read_to_string(temp_dir.path().join(RUN_LOG_FILE))?;
    assert_eq!(log.lines().count(), 1, "runs that change nothing are not logged");
    Ok(())
}

/// Test that a dry run reports counts without writing or needing a key
#[tokio::test]
async fn test_controllerMetadata_dryRun_shouldWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let done = common::create_test_pdf(temp_dir.path(), "Section_1/Chapter_1.pdf")?;
    common::create_sibling_metadata(&done, "Done")?;
    common::create_test_pdf(temp_dir.path(), "Section_1/Chapter_2.pdf")?;

    let mut config = Config::default();
    config.generation.api_key_env = "GURUKUL_TEST_UNSET_KEY".to_string();
    let controller = Controller::with_config(config)?;

    let summary = controller
        .metadata(MetadataRequest {
            root: temp_dir.path().to_path_buf(),
            dry_run: true,
            ..Default::default()
        })
        .await?;

    assert_eq!((summary.processed, summary.skipped, summary.total), (1, 1, 2));
    assert!(!temp_dir.path().join("Section_1/Chapter_2.json").exists());
    assert!(!temp_dir.path().join(RUN_LOG_FILE).exists());
    Ok(())
}

/// Test that a missing credential stops the run before any work
#[tokio::test]
async fn test_controllerMetadata_withMissingCredential_shouldFailEarly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_pdf(temp_dir.path(), "Section_1/Chapter_1.pdf")?;

    let mut config = Config::default();
    config.generation.api_key_env = "GURUKUL_TEST_UNSET_KEY".to_string();
    let controller = Controller::with_config(config)?;

    let error = controller
        .metadata(MetadataRequest {
            root: temp_dir.path().to_path_buf(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(error.downcast_ref::<ConfigError>(), Some(ConfigError::MissingCredential { .. })));
    assert!(!temp_dir.path().join("Section_1/Chapter_1.json").exists());
    Ok(())
}

/// Test that a missing root directory is fatal
#[tokio::test]
async fn test_controllerMetadata_withMissingRoot_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(mock_config())?;

    let error = controller
        .metadata(MetadataRequest {
            root: temp_dir.path().join("absent"),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(error.downcast_ref::<ConfigError>(), Some(ConfigError::MissingRootDirectory(_))));
    Ok(())
}

/// Test segmentation output and the overwrite guard
#[tokio::test]
async fn test_controllerSegment_shouldWriteRecordsAndRespectForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "gita.txt", common::sample_verse_text())?;
    let controller = Controller::new_for_test()?;

    let output = controller
        .segment(&input, StrategyChoice::Fixed(Strategy::Standard), None, false)
        .await?
        .expect("first run writes output");
    assert_eq!(output, temp_dir.path().join("gita.verses.json"));

    let records: Vec<VerseRecord> = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(records.len(), 5);

    let skipped = controller.segment(&input, StrategyChoice::Fixed(Strategy::Complex), None, false).await?;
    assert!(skipped.is_none());

    controller.segment(&input, StrategyChoice::Fixed(Strategy::Complex), None, true).await?;
    let records: Vec<VerseRecord> = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(records.len(), 7);
    Ok(())
}

/// Test that the scripture choice consults the lookup table in the config
#[tokio::test]
async fn test_controllerSegment_withScripture_shouldUseTableStrategy() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "rig.txt", common::sample_verse_text())?;
    let table = common::create_test_file(temp_dir.path(), "table.json", r#"{
        "scriptures": { "Rig_Veda": { "fileCount": 1, "recommendedParsingStrategy": "complex" } }
    }"#)?;
    let mut config = Config::default();
    config.lookup_table_path = table;
    let controller = Controller::with_config(config)?;

    let out_dir = temp_dir.path().join("out");
    let output = controller
        .segment(&input, StrategyChoice::Scripture("Rig_Veda".to_string()), Some(&out_dir), false)
        .await?
        .expect("output written");

    assert_eq!(output, out_dir.join("rig.verses.json"));
    let records: Vec<VerseRecord> = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(records.len(), 7);
    Ok(())
}

/// Test chapter isolation output and the missing-marker case
#[tokio::test]
async fn test_controllerIsolate_shouldWriteChapterText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "book.txt", common::sample_book_text())?;
    let controller = Controller::new_for_test()?;

    let found = controller.isolate(&input, 2, false, None, false).await?.expect("chapter 2 exists");
    let written = std::fs::read_to_string(temp_dir.path().join("chapter_2_text.txt"))?;
    assert_eq!(written, found.text);
    assert_eq!(written, "CHAPTER 2\nThe middle.\n");

    assert!(controller.isolate(&input, 7, true, None, false).await?.is_none());
    assert!(!temp_dir.path().join("chapter_7_text.txt").exists());

    assert!(controller.isolate(&temp_dir.path().join("absent.txt"), 1, false, None, false).await.is_err());
    Ok(())
}

/// Test the chapterize command through the controller
#[tokio::test]
async fn test_controllerChapterize_shouldWriteSargaFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "ramayana.txt",
        "# header\nfirst R_1,1.1\nsecond R_1,1.2\nthird R_1,2.1\nfourth R_2,5.1\n",
    )?;
    let controller = Controller::new_for_test()?;
    let out = temp_dir.path().join("chapters");

    let summary = controller.chapterize(&input, &out).await?;

    assert_eq!((summary.kandas, summary.chapters, summary.written, summary.failed), (2, 3, 3, 0));
    let first = std::fs::read_to_string(out.join("Kanda_1_Bala_Kanda/Sarga_001.txt"))?;
    assert_eq!(first, "first R_1,1.1\nsecond R_1,1.2\n");
    assert!(out.join("Kanda_2_Ayodhya_Kanda/Sarga_005.txt").exists());
    Ok(())
}

/// Test that PDF chapterizing rejects missing or unreadable sources without a report
#[tokio::test]
async fn test_controllerChapterizePdf_withBadSource_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;
    let out = temp_dir.path().join("sargas");

    assert!(controller.chapterize_pdf(&temp_dir.path().join("absent.pdf"), &out).await.is_err());

    let broken = common::create_test_file(temp_dir.path(), "ramayana.pdf", "plain text, no PDF structure")?;
    assert!(controller.chapterize_pdf(&broken, &out).await.is_err());
    assert!(!out.join(gurukul::chapterize::PAGE_RANGES_FILE).exists());
    Ok(())
}

/// Test the dictionary command through the controller
#[tokio::test]
async fn test_controllerDictionary_shouldWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().join("Gita");
    let pdf = common::create_test_pdf(&root, "Chapter_1/Gita_1.pdf")?;
    common::create_sibling_metadata(&pdf, "Arjuna's Dilemma")?;
    let controller = Controller::new_for_test()?;
    let output = temp_dir.path().join("dictionary.json");

    let dictionary = controller.dictionary(&[root, temp_dir.path().join("absent")], &output, None).await?;

    assert_eq!(dictionary.metadata.total_terms, 1);
    assert!(std::fs::read_to_string(&output)?.contains("\"dharma\""));
    assert!(controller.dictionary(&[temp_dir.path().join("absent")], &output, None).await.is_err());
    Ok(())
}

/// Test that chapterizing a missing input fails without creating the output folder
#[test]
fn test_controllerChapterize_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;
    let out = temp_dir.path().join("chapters");

    let result = tokio_test::block_on(async { controller.chapterize(&temp_dir.path().join("absent.txt"), &out).await });

    assert!(result.is_err());
    assert!(!out.exists());
    Ok(())
}

/// Test duration formatting used in run summaries
#[test]
fn test_formatDuration_shouldUseLargestUnits() {
    use std::time::Duration;
    assert_eq!(Controller::format_duration(Duration::from_millis(5250)), "5.250s");
    assert_eq!(Controller::format_duration(Duration::from_secs(65)), "1m 5s");
}
