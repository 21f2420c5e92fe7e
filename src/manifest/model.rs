/*!
 * Chapter manifest document.
 *
 * Field names and order follow the JSON consumed by the library front end.
 */

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Timestamp format of `lastUpdated`
pub const LAST_UPDATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub scripture_id: String,
    pub scripture_name: String,
    pub total_chapters: usize,
    pub last_updated: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_id: String,
    pub section_name: String,
    pub section_name_english: String,
    pub chapter_count: usize,
    pub chapters: Vec<ChapterEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterEntry {
    pub chapter_id: String,
    pub chapter_number: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_english: Option<String>,
    pub metadata_url: String,
    pub pdf_url: String,
    pub has_metadata: bool,
}

impl Section {
    /// Build a section, deriving `chapterCount` from its chapters
    pub fn new(section_id: String, section_name: String, section_name_english: String, chapters: Vec<ChapterEntry>) -> Self {
        Self {
            section_id,
            section_name,
            section_name_english,
            chapter_count: chapters.len(),
            chapters,
        }
    }
}

impl Manifest {
    /// Build a manifest stamped with the current local time, deriving `totalChapters`
    pub fn new(scripture_id: impl Into<String>, scripture_name: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            scripture_id: scripture_id.into(),
            scripture_name: scripture_name.into(),
            total_chapters: sections.iter().map(|s| s.chapter_count).sum(),
            last_updated: Local::now().format(LAST_UPDATED_FORMAT).to_string(),
            sections,
        }
    }

    /// Output file name for this scripture
    pub fn file_name(&self) -> String {
        format!("{}_chapter_manifest.json", self.scripture_id)
    }

    /// Chapters with and without a sibling metadata file
    pub fn metadata_tally(&self) -> (usize, usize) {
        self.sections
            .iter()
            .flat_map(|s| s.chapters.iter())
            .fold((0, 0), |(with, without), c| {
                if c.has_metadata { (with + 1, without) } else { (with, without + 1) }
            })
    }
}
