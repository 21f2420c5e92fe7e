/*!
 * Tests for the key concept dictionary
 */

use std::path::PathBuf;

use anyhow::Result;
use gurukul::dictionary::{build_dictionary, find_chapter_files, load_manual_dictionary, Category};
use crate::common;

const CHAPTER_ONE: &str = r#"{
    "chapterTitle": "On Health",
    "keyConcepts": [
        { "term": "Vāta", "definition": "The dosha governing movement in the body." },
        { "term": "Triphalā", "definition": "A formulation of three fruits used as a remedy." }
    ]
}"#;

const CHAPTER_TWO: &str = r#"{
    "chapterTitle": "On Disease",
    "keyConcepts": [
        { "term": "vata", "definition": "Duplicate spelling that should be skipped." },
        { "term": "Jvara", "definition": "Fever; a disease arising when Vāta is disturbed." },
        { "term": "", "definition": "No term." }
    ]
}"#;

/// Test dictionary generation across two scripture folders
#[test]
fn test_buildDictionary_shouldCollectUniqueTermsWithCategories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let caraka = temp_dir.path().join("Caraka");
    common::create_test_file(&caraka, "Section_1/Chapter_1.json", CHAPTER_ONE)?;
    common::create_test_file(&caraka, "Section_1/Chapter_2.json", CHAPTER_TWO)?;
    common::create_test_file(&caraka, "caraka_chapter_manifest.json", r#"{"sections": []}"#)?;

    let dictionary = build_dictionary(&[caraka], None)?;

    let terms: Vec<&str> = dictionary.terms.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, vec!["Vāta", "Triphalā", "Jvara"]);
    assert_eq!(dictionary.terms[0].category, Category::Physiology);
    assert_eq!(dictionary.terms[1].category, Category::Treatments);
    assert_eq!(dictionary.terms[2].category, Category::Diseases);
    assert_eq!(dictionary.terms[2].related_concepts, vec!["Vāta".to_string()]);
    assert!(dictionary.terms[0].variants.contains(&"vata".to_string()));
    assert!(dictionary.terms[0].variants.contains(&"vaata".to_string()));

    assert_eq!(dictionary.metadata.source_chapters, 2);
    assert_eq!(dictionary.metadata.auto_generated_terms, 3);
    assert_eq!(dictionary.metadata.manual_terms, 0);
    assert_eq!(dictionary.metadata.scriptures, vec!["Caraka".to_string()]);
    Ok(())
}

/// Test that curated entries win over generated ones
#[test]
fn test_buildDictionary_withExistingDictionary_shouldKeepCuratedEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().join("Caraka");
    common::create_test_file(&root, "Chapter_1.json", CHAPTER_ONE)?;
    let existing = common::create_test_file(temp_dir.path(), "dictionary.json", r#"{
        "terms": [
            { "term": "vata", "category": "physiology", "description": "Curated.", "variants": ["wind"], "sanskrit": "वात" }
        ]
    }"#)?;

    let dictionary = build_dictionary(&[root], Some(&existing))?;

    assert_eq!(dictionary.metadata.manual_terms, 1);
    assert_eq!(dictionary.metadata.total_terms, 2);
    let curated = &dictionary.terms[0];
    assert_eq!(curated.description, "Curated.");
    assert!(curated.variants.contains(&"wind".to_string()));
    assert!(curated.variants.contains(&"vaata".to_string()));
    assert_eq!(curated.extra.get("sanskrit").and_then(|v| v.as_str()), Some("वात"));
    Ok(())
}

/// Test that roots without chapter files are an error and missing roots are skipped
#[test]
fn test_buildDictionary_withNoChapterFiles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("absent");
    assert!(find_chapter_files(&[missing.clone()]).is_empty());
    assert!(build_dictionary(&[missing], None).is_err());
    Ok(())
}

/// Test that a missing curated dictionary loads as empty
#[test]
fn test_loadManualDictionary_withMissingFile_shouldBeEmpty() -> Result<()> {
    let entries = load_manual_dictionary(&PathBuf::from("/nonexistent/dictionary.json"))?;
    assert!(entries.is_empty());
    Ok(())
}
