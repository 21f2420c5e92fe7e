/*!
 * Verse pattern lookup table.
 *
 * One entry per known source text with the marker patterns observed in it and the
 * recommended parsing strategy. The table is read once at startup and never mutated.
 * The file may either be the bare table or an envelope `{ "lookupTable": ..., "summary": ... }`.
 */

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::LookupTableError;

/// Segmentation strategy for a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Numeric markers only
    #[default]
    Standard,
    /// Numeric and Devanagari markers plus the irregular-line fallback
    Complex,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Complex => write!(f, "complex"),
        }
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "complex" => Ok(Self::Complex),
            _ => Err(anyhow::anyhow!("Invalid strategy: {}", s)),
        }
    }
}

/// Per-scripture entry of the lookup table
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScriptureProfile {
    // @field: Number of source files analysed
    #[serde(default)]
    pub file_count: u32,

    // @field: Marker pattern -> occurrences
    #[serde(default, alias = "patternCounts")]
    pub patterns: BTreeMap<String, u64>,

    // @field: Strategy to use when segmenting this text
    #[serde(default)]
    pub recommended_parsing_strategy: Strategy,
}

/// A scripture whose markers need the complex strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeCase {
    pub scripture: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub complexity: serde_json::Value,
}

/// Regex template recorded for one strategy
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PreprocessingTemplate {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Corpus summary stored next to the table
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CorpusSummary {
    #[serde(default)]
    pub total_scriptures: u64,
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_patterns: u64,
    #[serde(default)]
    pub edge_cases: u64,
    #[serde(default)]
    pub generated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableBody {
    scriptures: HashMap<String, ScriptureProfile>,
    #[serde(default)]
    pattern_frequency: HashMap<String, u64>,
    #[serde(default)]
    edge_cases: Vec<EdgeCase>,
    #[serde(default)]
    preprocessing_templates: BTreeMap<String, PreprocessingTemplate>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TableFile {
    Envelope {
        #[serde(rename = "lookupTable")]
        lookup_table: TableBody,
        #[serde(default)]
        summary: Option<CorpusSummary>,
    },
    Bare(TableBody),
}

/// Read-only pattern lookup table
#[derive(Debug, Clone, Default)]
pub struct PatternLookupTable {
    scriptures: HashMap<String, ScriptureProfile>,
    pattern_frequency: HashMap<String, u64>,
    edge_cases: Vec<EdgeCase>,
    templates: BTreeMap<String, PreprocessingTemplate>,
    summary: Option<CorpusSummary>,
}

impl PatternLookupTable {
    /// Load the table from a JSON file. Missing or malformed files are fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LookupTableError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LookupTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| LookupTableError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse the table from JSON text
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let file: TableFile = serde_json::from_str(content)?;
        let (body, summary) = match file {
            TableFile::Envelope { lookup_table, summary } => (lookup_table, summary),
            TableFile::Bare(body) => (body, None),
        };

        Ok(Self {
            scriptures: body.scriptures,
            pattern_frequency: body.pattern_frequency,
            edge_cases: body.edge_cases,
            templates: body.preprocessing_templates,
            summary,
        })
    }

    /// Build a table from profiles directly
    pub fn from_profiles<I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = (String, ScriptureProfile)>,
    {
        Self {
            scriptures: profiles.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Recommended strategy for a scripture; unknown names default to `standard`
    pub fn strategy_for(&self, scripture: &str) -> Strategy {
        self.scriptures
            .get(scripture)
            .map(|p| p.recommended_parsing_strategy)
            .unwrap_or_default()
    }

    pub fn profile(&self, scripture: &str) -> Option<&ScriptureProfile> {
        self.scriptures.get(scripture)
    }

    /// All scripture names, sorted
    pub fn scripture_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scriptures.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Patterns by descending frequency, ties broken by pattern text
    pub fn pattern_frequency_ranked(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .pattern_frequency
            .iter()
            .map(|(pattern, count)| (pattern.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn edge_cases(&self) -> &[EdgeCase] {
        &self.edge_cases
    }

    pub fn templates(&self) -> &BTreeMap<String, PreprocessingTemplate> {
        &self.templates
    }

    pub fn summary(&self) -> Option<&CorpusSummary> {
        self.summary.as_ref()
    }

    pub fn len(&self) -> usize {
        self.scriptures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scriptures.is_empty()
    }
}
