/*!
 * Cleaning and post-processing of model replies.
 *
 * Models frequently wrap the requested JSON in a markdown fence or add commentary
 * around it. The reply is reduced to the span between the first `{` and the last `}`
 * and parsed strictly; nothing is retried.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::MetadataError;

/// Field holding the chapter title
pub const TITLE_FIELD: &str = "chapterTitle";

/// Keys probed, in order, when an advice entry is an object
pub const ADVICE_KEYS: [&str; 3] = ["point", "advice", "text"];

/// Characters of the offending body kept in parse errors
const PREVIEW_CHARS: usize = 500;

static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x00-\x1F\x7F]").unwrap_or_else(|e| panic!("{}", e)));
static LEADING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(json)?\s*").unwrap_or_else(|e| panic!("{}", e)));
static TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*```$").unwrap_or_else(|e| panic!("{}", e)));

/// Reduce a raw model reply to its JSON object candidate.
///
/// Strips ASCII control characters, a leading and trailing markdown fence, then keeps
/// the text from the first `{` to the last `}` inclusive. Returns `None` when there is
/// no such span.
pub fn clean_response_text(raw: &str) -> Option<String> {
    let text = CONTROL_CHARS.replace_all(raw, "");
    let text = LEADING_FENCE.replace(text.trim(), "");
    let text = TRAILING_FENCE.replace(&text, "");

    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last <= first {
        return None;
    }
    Some(text[first..=last].to_string())
}

/// Strictly parse a cleaned body into a JSON object
pub fn parse_metadata(cleaned: &str) -> Result<Map<String, Value>, MetadataError> {
    let value: Value = serde_json::from_str(cleaned).map_err(|e| MetadataError::Parse {
        message: e.to_string(),
        preview: cleaned.chars().take(PREVIEW_CHARS).collect(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(MetadataError::NotAnObject),
    }
}

/// Coerce `deeperInsights.practicalAdvice` into a list of strings.
/// Returns whether anything changed.
pub fn normalize_practical_advice(metadata: &mut Map<String, Value>) -> bool {
    let advice = match metadata
        .get_mut("deeperInsights")
        .and_then(Value::as_object_mut)
        .and_then(|insights| insights.get_mut("practicalAdvice"))
        .and_then(Value::as_array_mut)
    {
        Some(advice) => advice,
        None => return false,
    };

    let mut changed = false;
    for item in advice.iter_mut() {
        if item.is_string() {
            continue;
        }
        *item = Value::String(advice_to_string(item));
        changed = true;
    }
    changed
}

fn advice_to_string(item: &Value) -> String {
    match item {
        Value::Object(object) => ADVICE_KEYS
            .iter()
            .filter_map(|key| object.get(*key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Null | Value::String(_) | Value::Bool(false) => None,
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| item.to_string()),
        other => other.to_string(),
    }
}

/// Set `chapterTitle` when it is absent, empty or not a string.
/// A whitespace-only title counts as given and is kept.
/// Returns whether the fallback was applied.
pub fn ensure_title<F>(metadata: &mut Map<String, Value>, fallback: F) -> bool
where
    F: FnOnce() -> String,
{
    let present = matches!(metadata.get(TITLE_FIELD), Some(Value::String(s)) if !s.is_empty());
    if present {
        return false;
    }
    metadata.insert(TITLE_FIELD.to_string(), Value::String(fallback()));
    true
}

/// Term/definition pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeyConcept {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeeperInsights {
    #[serde(default)]
    pub philosophical_viewpoint: String,
    #[serde(default)]
    pub practical_advice: Vec<String>,
}

/// Typed view of a per-chapter metadata file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChapterMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_title: Option<String>,
    #[serde(default)]
    pub ai_summary: String,
    #[serde(default)]
    pub key_concepts: Vec<KeyConcept>,
    #[serde(default)]
    pub search_tags: Vec<String>,
    #[serde(default)]
    pub deeper_insights: DeeperInsights,
}

impl ChapterMetadata {
    /// Read a metadata object, tolerating object-shaped advice entries
    pub fn from_map(mut map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        normalize_practical_advice(&mut map);
        serde_json::from_value(Value::Object(map))
    }

    /// Load a sibling metadata file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;
        let map = parse_metadata(&content)
            .with_context(|| format!("Invalid metadata file: {}", path.display()))?;
        Self::from_map(map).with_context(|| format!("Unexpected metadata shape: {}", path.display()))
    }
}
