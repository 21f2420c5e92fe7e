/*!
 * Verse/chapter segmenter.
 *
 * Scans text line by line and emits one record per line whose start matches a
 * marker pattern. Patterns are tried in a fixed order and the first match wins.
 * Under the `complex` strategy a short line made only of digits, punctuation or
 * Devanagari is kept as an `irregular` record even when no pattern matched.
 * Stray page numbers fall into that class too and are emitted as irregular records.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::profile::{PatternLookupTable, Strategy};

/// Lines at or above this many characters are never classified irregular
pub const IRREGULAR_MAX_CHARS: usize = 20;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("^({})", p)).unwrap_or_else(|e| panic!("bad marker pattern {}: {}", p, e)))
        .collect()
}

static STANDARD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\d+\.\d+\.\d+",
        r"\d+\.\d+",
        r"\d+\.",
        r"\d+",
        r"\d+:\d+",
        r"\d+:\d+:\d+",
    ])
});

static COMPLEX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\d+\.\d+\.\d+",
        r"\d+\.\d+",
        r"\d+\.",
        r"\d+",
        r"[१-९]+\.",
        r"[१-९]+:[१-९]+",
        r"॥\s*\d+\s*॥",
        r"॥[१-९]+॥",
    ])
});

static IRREGULAR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s.:\-\x{0900}-\x{097F}]+$").unwrap_or_else(|e| panic!("bad irregular pattern: {}", e)));

/// Kind of emitted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Verse,
    Irregular,
}

/// One marker-delimited line of the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    // @field: Matched marker text (the whole line for irregular records)
    pub marker: String,
    // @field: Trimmed line
    pub content: String,
    // @field: 1-based line number in the input
    pub line_number: usize,
    #[serde(rename = "type")]
    pub kind: RecordKind,
}

/// Stateless segmenter
pub struct Segmenter;

impl Segmenter {
    /// Ordered marker patterns for a strategy
    pub fn patterns(strategy: Strategy) -> &'static [Regex] {
        match strategy {
            Strategy::Standard => &STANDARD_PATTERNS,
            Strategy::Complex => &COMPLEX_PATTERNS,
        }
    }

    /// Split text into records. Output order equals input line order.
    pub fn segment(text: &str, strategy: Strategy) -> Vec<VerseRecord> {
        let patterns = Self::patterns(strategy);
        let mut records = Vec::new();

        for (index, raw_line) in text.split('\n').enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            let line_number = index + 1;

            let marker = patterns
                .iter()
                .find_map(|re| re.captures(line).and_then(|c| c.get(1)))
                .map(|m| m.as_str().to_string());

            match marker {
                Some(marker) => records.push(VerseRecord {
                    marker,
                    content: line.to_string(),
                    line_number,
                    kind: RecordKind::Verse,
                }),
                None if strategy == Strategy::Complex && Self::is_irregular_marker(line) => {
                    records.push(VerseRecord {
                        marker: line.to_string(),
                        content: line.to_string(),
                        line_number,
                        kind: RecordKind::Irregular,
                    });
                }
                None => {}
            }
        }

        records
    }

    /// Look up the scripture's strategy, then segment
    pub fn segment_for(text: &str, scripture: &str, table: &PatternLookupTable) -> Vec<VerseRecord> {
        let strategy = table.strategy_for(scripture);
        log::debug!("Segmenting '{}' with {} strategy", scripture, strategy);
        Self::segment(text, strategy)
    }

    /// Short marker-only line heuristic used by the complex strategy
    pub fn is_irregular_marker(line: &str) -> bool {
        line.chars().count() < IRREGULAR_MAX_CHARS && IRREGULAR_LINE.is_match(line)
    }
}

/// Counts over a segmentation result, for reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentationSummary {
    pub total: usize,
    pub verses: usize,
    pub irregular: usize,
    // @field: Marker shape (digits replaced by `N`) -> occurrences
    pub shapes: BTreeMap<String, usize>,
}

impl SegmentationSummary {
    pub fn from_records(records: &[VerseRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            match record.kind {
                RecordKind::Verse => summary.verses += 1,
                RecordKind::Irregular => summary.irregular += 1,
            }
            *summary.shapes.entry(Self::marker_shape(&record.marker)).or_insert(0) += 1;
        }

        summary
    }

    /// Collapse digit runs to `N` so `1.2` and `10.24` share a shape
    pub fn marker_shape(marker: &str) -> String {
        let mut shape = String::with_capacity(marker.len());
        let mut in_digits = false;
        for c in marker.chars() {
            if c.is_numeric() {
                if !in_digits {
                    shape.push('N');
                }
                in_digits = true;
            } else {
                shape.push(c);
                in_digits = false;
            }
        }
        shape
    }
}
