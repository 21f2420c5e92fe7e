/*!
 * Fallback chapter titles derived from file and folder names.
 *
 * Used when the model reply has no usable `chapterTitle`. Resolution order:
 * 1. the parent folder name, when it contains the configured marker (e.g. `Chapter`);
 * 2. the cleaned file stem, when it is longer than `min_len` characters;
 * 3. the scripture's default title.
 */

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap_or_else(|e| panic!("{}", e)));

/// Per-scripture rule for deriving a title from a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleFallback {
    // @field: Use the parent folder when its name contains this text
    pub parent_marker: Option<String>,
    // @field: Literal prefixes removed before cleaning
    pub strip_prefixes: Vec<String>,
    // @field: Case-insensitive patterns removed after `_`/`-` become spaces
    pub strip_patterns: Vec<String>,
    // @field: A cleaned stem must be longer than this to be used
    pub min_len: usize,
    pub title_case: bool,
    pub default_title: String,
}

impl Default for TitleFallback {
    fn default() -> Self {
        Self {
            parent_marker: None,
            strip_prefixes: Vec::new(),
            strip_patterns: Vec::new(),
            min_len: 0,
            title_case: false,
            default_title: "Chapter".to_string(),
        }
    }
}

impl TitleFallback {
    pub fn with_default(default_title: impl Into<String>) -> Self {
        Self {
            default_title: default_title.into(),
            ..Default::default()
        }
    }

    /// Clean a name: drop prefixes, turn `_`/`-` into spaces, drop patterns, collapse spaces
    pub fn clean_name(&self, name: &str) -> String {
        let mut cleaned = name.to_string();
        for prefix in &self.strip_prefixes {
            cleaned = cleaned.replace(prefix.as_str(), "");
        }
        cleaned = cleaned.replace(['_', '-'], " ");
        cleaned = MULTI_SPACE.replace_all(&cleaned, " ").trim().to_string();

        for pattern in &self.strip_patterns {
            match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(re) => cleaned = re.replace_all(&cleaned, "").to_string(),
                Err(e) => log::warn!("Ignoring invalid title pattern '{}': {}", pattern, e),
            }
        }

        let cleaned = MULTI_SPACE.replace_all(&cleaned, " ").trim().to_string();
        if self.title_case {
            title_case(&cleaned)
        } else {
            cleaned
        }
    }
}

/// Derive a title for a chapter PDF from its path
pub fn derive_title_from_path(pdf: &Path, rule: &TitleFallback) -> String {
    if let Some(marker) = &rule.parent_marker {
        let parent = pdf
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if parent.contains(marker.as_str()) {
            let cleaned = rule.clean_name(&parent);
            if !cleaned.is_empty() {
                return cleaned;
            }
        }
    }

    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let cleaned = rule.clean_name(&stem);
    if !cleaned.is_empty() && cleaned.chars().count() > rule.min_len {
        return cleaned;
    }

    rule.default_title.clone()
}

/// Capitalise the first letter of every word and lowercase the rest
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }
    result
}
