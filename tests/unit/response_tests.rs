/*!
 * Tests for model reply cleaning, post-processing and title fallbacks
 */

use std::path::Path;

use anyhow::Result;
use gurukul::errors::MetadataError;
use gurukul::metadata::prompts::profile_for;
use gurukul::metadata::response::{clean_response_text, ensure_title, normalize_practical_advice, parse_metadata};
use gurukul::metadata::title::derive_title_from_path;
use gurukul::metadata::{ChapterMetadata, TitleFallback};
use serde_json::{json, Value};
use crate::common;

/// Test that commentary and fences around the object are dropped
#[test]
fn test_cleanResponseText_withCommentaryAroundFence_shouldYieldParseableObject() -> Result<()> {
    let raw = "Here you go:\n```json\n{\"a\":1}\n```\nThanks";
    let cleaned = clean_response_text(raw).expect("a JSON span should be found");

    assert_eq!(cleaned, "{\"a\":1}");
    let parsed = parse_metadata(&cleaned)?;
    assert_eq!(parsed.get("a"), Some(&json!(1)));
    Ok(())
}

/// Test that control characters inside the reply are removed
#[test]
fn test_cleanResponseText_withControlCharacters_shouldStripThem() {
    let raw = "```\n{\"aiSummary\":\u{0007} \"text\"}\u{007f}\n```";
    assert_eq!(clean_response_text(raw).as_deref(), Some("{\"aiSummary\": \"text\"}"));
}

/// Test that a reply without braces is unrecoverable
#[test]
fn test_cleanResponseText_withoutBraces_shouldReturnNone() {
    assert!(clean_response_text("I cannot read this document.").is_none());
    assert!(clean_response_text("} backwards {").is_none());
    assert!(clean_response_text("").is_none());
}

/// Test that invalid JSON carries a preview of the body
#[test]
fn test_parseMetadata_withTruncatedJson_shouldReportPreview() {
    let error = parse_metadata("{\"aiSummary\": \"cut off").unwrap_err();
    match error {
        MetadataError::Parse { preview, .. } => assert!(preview.starts_with("{\"aiSummary\"")),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Test that a JSON array is rejected
#[test]
fn test_parseMetadata_withArray_shouldBeNotAnObject() {
    assert!(matches!(parse_metadata("[1, 2]"), Err(MetadataError::NotAnObject)));
}

/// Test coercion of object-shaped advice entries
#[test]
fn test_normalizePracticalAdvice_withObjects_shouldProbeKnownKeys() {
    let mut metadata = json!({
        "deeperInsights": {
            "practicalAdvice": [
                { "point": "Breathe." },
                { "advice": "Rest." },
                { "text": "Eat simply." },
                { "other": "x" },
                "Already a string",
                42
            ]
        }
    })
    .as_object()
    .cloned()
    .unwrap_or_default();

    assert!(normalize_practical_advice(&mut metadata));
    let advice = metadata["deeperInsights"]["practicalAdvice"].as_array().cloned().unwrap_or_default();
    assert_eq!(advice[0], json!("Breathe."));
    assert_eq!(advice[1], json!("Rest."));
    assert_eq!(advice[2], json!("Eat simply."));
    assert_eq!(advice[3], json!("{\"other\":\"x\"}"));
    assert_eq!(advice[4], json!("Already a string"));
    assert_eq!(advice[5], json!("42"));

    assert!(!normalize_practical_advice(&mut metadata), "a second pass changes nothing");
}

/// Test that an existing title is left alone and an empty one replaced
#[test]
fn test_ensureTitle_shouldOnlyFillMissingTitles() {
    let mut with_title = json!({ "chapterTitle": "Karma Yoga" }).as_object().cloned().unwrap_or_default();
    assert!(!ensure_title(&mut with_title, || "fallback".to_string()));
    assert_eq!(with_title["chapterTitle"], json!("Karma Yoga"));

    let mut blank = json!({ "chapterTitle": "  " }).as_object().cloned().unwrap_or_default();
    assert!(!ensure_title(&mut blank, || "fallback".to_string()));
    assert_eq!(blank["chapterTitle"], json!("  "));

    let mut empty = json!({ "chapterTitle": "" }).as_object().cloned().unwrap_or_default();
    assert!(ensure_title(&mut empty, || "fallback".to_string()));
    assert_eq!(empty["chapterTitle"], json!("fallback"));

    let mut numeric = json!({ "chapterTitle": 3 }).as_object().cloned().unwrap_or_default();
    assert!(ensure_title(&mut numeric, || "fallback".to_string()));
}

/// Test the Bhagavad Gita title rules
#[test]
fn test_deriveTitleFromPath_gitaProfile_shouldPreferChapterFolder() {
    let profile = profile_for(Some("bhagavad_gita")).expect("gita profile should exist");

    let in_chapter_folder = Path::new("/lib/Gita/Chapter_2_Sankhya_Yoga/Bhagavad_Gita_Chapter_2.pdf");
    assert_eq!(derive_title_from_path(in_chapter_folder, &profile.title), "Chapter 2 Sankhya Yoga");

    let in_other_folder = Path::new("/lib/Gita/Misc/Bhagavad_Gita_Introduction.pdf");
    assert_eq!(derive_title_from_path(in_other_folder, &profile.title), "Introduction");
}

/// Test the default title when nothing usable remains
#[test]
fn test_deriveTitleFromPath_withShortStem_shouldUseDefaultTitle() {
    let rule = TitleFallback {
        min_len: 5,
        ..TitleFallback::with_default("Yoga Sutra Chapter")
    };
    assert_eq!(derive_title_from_path(Path::new("/lib/a_b.pdf"), &rule), "Yoga Sutra Chapter");
}

/// Test the typed view of a metadata file on disk
#[test]
fn test_chapterMetadataLoad_shouldReadSchemaFields() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let pdf = common::create_test_pdf(temp_dir.path(), "Chapter_1.pdf")?;
    let json_path = common::create_sibling_metadata(&pdf, "Arjuna's Dilemma")?;

    let metadata = ChapterMetadata::load(&json_path)?;
    assert_eq!(metadata.chapter_title.as_deref(), Some("Arjuna's Dilemma"));
    assert_eq!(metadata.key_concepts[0].term, "dharma");
    assert_eq!(metadata.deeper_insights.practical_advice, vec!["Act.".to_string()]);

    let value: Value = serde_json::to_value(&metadata)?;
    assert!(value.get("aiSummary").is_some());
    Ok(())
}
