/*!
 * Search dictionary built from the `keyConcepts` of chapter metadata files.
 *
 * Every `{term, definition}` pair becomes an entry with a category, search variants
 * (diacritic-free spellings plus English words from the definition) and links to other
 * concepts its definition mentions. A hand-curated dictionary can be merged in; its
 * entries win and only gain variants.
 */

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

const DESCRIPTION_CHARS: usize = 250;
const DEFINITION_SCAN_CHARS: usize = 200;
const MAX_ENGLISH_VARIANTS: usize = 8;
const MAX_RELATED: usize = 5;

static ENGLISH_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z][a-z-]{2,}\b").unwrap_or_else(|e| panic!("{}", e)));

const STOP_WORDS: [&str; 25] = [
    "the", "and", "that", "which", "this", "from", "with", "for",
    "are", "was", "were", "been", "being", "have", "has", "had",
    "refers", "literally", "also", "known", "called", "means",
    "described", "defined", "indicates",
];

/// Broad grouping of a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Herbs,
    Treatments,
    Diseases,
    Symptoms,
    Physiology,
    #[default]
    Concepts,
}

/// One dictionary term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub term: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub related_concepts: Vec<String>,
    #[serde(default)]
    pub dosha_associations: Vec<String>,
    // @field: Fields of curated entries this tool does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryInfo {
    pub generated_from: String,
    pub generated_date: String,
    pub total_terms: usize,
    pub manual_terms: usize,
    pub auto_generated_terms: usize,
    pub source_chapters: usize,
    pub scriptures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dictionary {
    pub terms: Vec<DictionaryEntry>,
    pub metadata: DictionaryInfo,
}

#[derive(Deserialize)]
struct ManualDictionary {
    #[serde(default)]
    terms: Vec<DictionaryEntry>,
}

/// Remove combining marks after canonical decomposition (ā → a, ṛ → r)
pub fn normalize_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn key_of(term: &str) -> String {
    normalize_diacritics(term).to_lowercase()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Lowercase English words longer than three letters, stop words removed, in text order
pub fn extract_english_terms(text: &str) -> Vec<String> {
    let cleaned = normalize_diacritics(text).to_lowercase();
    ENGLISH_WORD
        .find_iter(&cleaned)
        .map(|m| m.as_str())
        .filter(|w| w.len() > 3 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Search spellings of a term, sorted
pub fn generate_variants(term: &str, definition: &str) -> Vec<String> {
    let mut variants = BTreeSet::new();
    variants.insert(key_of(term));

    let transliterations = [
        term.replace('ā', "aa").replace('Ā', "aa"),
        term.replace('ī', "ee").replace('Ī', "ee"),
        term.replace('ū', "uu").replace('Ū', "uu"),
        term.replace('ṛ', "ri").replace('Ṛ', "ri"),
    ];
    for spelling in &transliterations {
        variants.insert(key_of(spelling));
    }

    let scanned = truncate_chars(definition, DEFINITION_SCAN_CHARS);
    for word in extract_english_terms(&scanned).into_iter().take(MAX_ENGLISH_VARIANTS) {
        if word.ends_with('s') {
            if word.len() > 4 {
                variants.insert(word[..word.len() - 1].to_string());
            }
        } else {
            variants.insert(format!("{}s", word));
        }
        variants.insert(word);
    }

    variants.into_iter().filter(|v| v.chars().count() > 2).collect()
}

/// Pick a category from keywords in the definition, checked in a fixed order
pub fn categorize_term(_term: &str, definition: &str) -> Category {
    let definition = definition.to_lowercase();
    let rules: [(Category, &[&str]); 5] = [
        (Category::Herbs, &["herb", "plant", "root", "leaf", "botanical", "flower", "seed"]),
        (Category::Treatments, &["treatment", "therapy", "procedure", "science of", "formulation", "remedy"]),
        (Category::Diseases, &["disease", "disorder", "condition", "ailment", "affliction", "illness"]),
        (Category::Symptoms, &["pain", "ache", "fever", "cough", "inflammation", "swelling"]),
        (Category::Physiology, &["dosha", "tissue", "channel", "bodily", "vital", "energy", "body"]),
    ];
    rules
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| definition.contains(m)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Concepts)
}

/// Up to five other known concepts mentioned in a definition
pub fn related_concepts(all_concepts: &BTreeSet<String>, term: &str, definition: &str) -> Vec<String> {
    all_concepts
        .iter()
        .filter(|c| c.as_str() != term && c.chars().count() > 3 && definition.contains(c.as_str()))
        .take(MAX_RELATED)
        .cloned()
        .collect()
}

/// Chapter metadata files below the given roots, manifests excluded
pub fn find_chapter_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in roots {
        if !root.is_dir() {
            warn!("Skipping {}: directory not found", root.display());
            continue;
        }
        let before = files.len();
        files.extend(
            WalkDir::new(root)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| {
                    p.is_file()
                        && p.extension().map(|e| e.eq_ignore_ascii_case("json")).unwrap_or(false)
                        && !p.file_name().map(|n| n.to_string_lossy().contains("manifest")).unwrap_or(false)
                }),
        );
        info!("{}: found {} chapter files", root.display(), files.len() - before);
    }
    files.sort();
    files
}

fn read_key_concepts(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let concepts = value
        .get("keyConcepts")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let term = item.get("term")?.as_str()?.trim();
                    let definition = item.get("definition")?.as_str()?.trim();
                    if term.is_empty() || definition.is_empty() {
                        None
                    } else {
                        Some((term.to_string(), definition.to_string()))
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(concepts)
}

/// Curated dictionary entries; a missing file yields none
pub fn load_manual_dictionary(path: &Path) -> Result<Vec<DictionaryEntry>> {
    if !path.exists() {
        info!("No existing dictionary found at {}", path.display());
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dictionary {}", path.display()))?;
    let manual: ManualDictionary = serde_json::from_str(&content)
        .with_context(|| format!("Invalid dictionary {}", path.display()))?;
    Ok(manual.terms)
}

/// Curated entries first, then generated entries for terms they do not cover.
/// Curated entries gain the variants of matching generated ones.
pub fn merge_dictionaries(manual: Vec<DictionaryEntry>, generated: &[DictionaryEntry]) -> Vec<DictionaryEntry> {
    let mut merged = manual;
    let manual_count = merged.len();
    let mut added = 0;

    for entry in generated {
        let key = key_of(&entry.term);
        match merged[..manual_count].iter_mut().find(|m| key_of(&m.term) == key) {
            Some(existing) => {
                let variants: BTreeSet<String> = existing.variants.drain(..).chain(entry.variants.iter().cloned()).collect();
                existing.variants = variants.into_iter().collect();
            }
            None => {
                merged.push(entry.clone());
                added += 1;
            }
        }
    }

    info!("Added {} new terms to {} curated terms", added, manual_count);
    merged
}

/// Build the dictionary from every chapter file below `roots`
pub fn build_dictionary(roots: &[PathBuf], existing: Option<&Path>) -> Result<Dictionary> {
    let files = find_chapter_files(roots);
    if files.is_empty() {
        anyhow::bail!("No chapter metadata files found");
    }

    let mut per_file = Vec::with_capacity(files.len());
    for file in &files {
        match read_key_concepts(file) {
            Ok(concepts) => per_file.push(concepts),
            Err(e) => warn!("Skipping {}: {:#}", file.display(), e),
        }
    }

    let all_concepts: BTreeSet<String> = per_file.iter().flatten().map(|(term, _)| term.clone()).collect();
    info!("Found {} unique concepts in {} files", all_concepts.len(), files.len());

    let mut seen = HashSet::new();
    let mut generated = Vec::new();
    for (term, definition) in per_file.iter().flatten() {
        if !seen.insert(key_of(term)) {
            continue;
        }
        generated.push(DictionaryEntry {
            term: term.clone(),
            category: categorize_term(term, definition),
            variants: generate_variants(term, definition),
            description: truncate_chars(definition, DESCRIPTION_CHARS),
            related_concepts: related_concepts(&all_concepts, term, definition),
            dosha_associations: Vec::new(),
            extra: Map::new(),
        });
    }

    let manual = match existing {
        Some(path) => load_manual_dictionary(path)?,
        None => Vec::new(),
    };
    let manual_terms = manual.len();
    let auto_generated_terms = generated.len();
    let terms = merge_dictionaries(manual, &generated);

    Ok(Dictionary {
        metadata: DictionaryInfo {
            generated_from: "chapter metadata keyConcepts".to_string(),
            generated_date: Local::now().format("%Y-%m-%d").to_string(),
            total_terms: terms.len(),
            manual_terms,
            auto_generated_terms,
            source_chapters: files.len(),
            scriptures: roots
                .iter()
                .map(|r| r.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| r.display().to_string()))
                .collect(),
        },
        terms,
    })
}
