/*!
 * Integration tests for metadata generation over a directory of chapter PDFs
 */

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use gurukul::metadata::{ChapterMetadata, MetadataGenerator, TitleFallback, WalkMode, WalkOptions};
use gurukul::providers::mock::MockProvider;
use serde_json::Value;
use crate::common;

fn create_library(root: &Path) -> Result<()> {
    common::create_test_pdf(root, "Section_1/Chapter_1.pdf")?;
    common::create_test_pdf(root, "Section_1/Chapter_2.pdf")?;
    common::create_test_pdf(root, "Section_2/Chapter_1.pdf")?;
    common::create_test_pdf(root, "Whole_Book.pdf")?;
    Ok(())
}

fn generator(provider: MockProvider) -> MetadataGenerator<MockProvider> {
    common::init_test_logging();
    MetadataGenerator::new(provider, "Describe this chapter", TitleFallback::with_default("Test Chapter"))
        .with_delay(Duration::ZERO)
}

/// Test that a second run over the same tree makes no provider calls
#[tokio::test]
async fn test_processDirectory_secondRun_shouldSkipEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    create_library(temp_dir.path())?;
    let provider = MockProvider::working();
    let generator = generator(provider.clone());

    let first = generator.process_directory(temp_dir.path(), &WalkOptions::default()).await?;
    assert_eq!((first.processed, first.skipped, first.failed, first.total), (3, 0, 0, 3));
    assert_eq!(provider.request_count(), 3);
    assert!(!temp_dir.path().join("Whole_Book.json").exists(), "root files are outside sections mode");

    let second = generator.process_directory(temp_dir.path(), &WalkOptions::default()).await?;
    assert_eq!((second.processed, second.skipped, second.failed), (0, 3, 0));
    assert_eq!(provider.request_count(), 3);
    Ok(())
}

/// Test that forcing regenerates existing metadata
#[tokio::test]
async fn test_processDirectory_withForce_shouldRegenerate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    create_library(temp_dir.path())?;
    let provider = MockProvider::working();

    generator(provider.clone()).process_directory(temp_dir.path(), &WalkOptions::default()).await?;
    let forced = generator(provider.clone())
        .with_force(true)
        .process_directory(temp_dir.path(), &WalkOptions::default())
        .await?;

    assert_eq!(forced.processed, 3);
    assert_eq!(provider.request_count(), 6);
    Ok(())
}

/// Test that written files carry the fallback title and string-only advice
#[tokio::test]
async fn test_processDirectory_writtenMetadata_shouldBePostProcessed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    create_library(temp_dir.path())?;

    generator(MockProvider::working()).process_directory(temp_dir.path(), &WalkOptions::default()).await?;

    let json_path = temp_dir.path().join("Section_1/Chapter_2.json");
    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&json_path)?)?;
    assert_eq!(raw["chapterTitle"], "Chapter 2");
    assert!(raw["deeperInsights"]["practicalAdvice"].as_array().map(|a| a.iter().all(Value::is_string)).unwrap_or(false));

    let metadata = ChapterMetadata::load(&json_path)?;
    assert_eq!(
        metadata.deeper_insights.practical_advice,
        vec!["Act without clinging to results.".to_string(), "Study daily.".to_string()]
    );
    assert_eq!(metadata.search_tags, vec!["duty".to_string(), "ethics".to_string()]);
    Ok(())
}

/// Test that one failing chapter does not stop the run and is retried next time
#[tokio::test]
async fn test_processDirectory_withIntermittentFailures_shouldContinueAndRetryLater() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    create_library(temp_dir.path())?;

    let first = generator(MockProvider::intermittent(2))
        .process_directory(temp_dir.path(), &WalkOptions::default())
        .await?;
    assert_eq!((first.processed, first.failed), (2, 1));
    assert_eq!(first.failures[0].0, temp_dir.path().join("Section_1/Chapter_2.pdf"));
    assert!(first.failures[0].1.contains("503"));
    assert!(!temp_dir.path().join("Section_1/Chapter_2.json").exists());

    let retry = generator(MockProvider::working())
        .process_directory(temp_dir.path(), &WalkOptions::default())
        .await?;
    assert_eq!((retry.processed, retry.skipped, retry.failed), (1, 2, 0));
    Ok(())
}

/// Test that a provider that always fails leaves no files behind
#[tokio::test]
async fn test_processDirectory_withFailingProvider_shouldReportEveryFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    create_library(temp_dir.path())?;

    let summary = generator(MockProvider::failing())
        .process_directory(temp_dir.path(), &WalkOptions::default())
        .await?;

    assert_eq!((summary.processed, summary.failed, summary.total), (0, 3, 3));
    assert_eq!(summary.failures.len(), 3);
    assert!(!temp_dir.path().join("Section_2/Chapter_1.json").exists());
    Ok(())
}

/// Test the recursive walk with root-level files included
#[tokio::test]
async fn test_processDirectory_recursiveMode_shouldIncludeRootFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    create_library(temp_dir.path())?;
    let options = WalkOptions {
        mode: WalkMode::Recursive,
        ..Default::default()
    };

    let summary = generator(MockProvider::working()).process_directory(temp_dir.path(), &options).await?;

    assert_eq!(summary.processed, 4);
    assert!(temp_dir.path().join("Whole_Book.json").exists());
    Ok(())
}
