/*!
 * Chapter isolator.
 *
 * Extracts the text of one numbered chapter from a full document. The start marker
 * for chapter N is searched in the whole text; the end marker for chapter N+1 is
 * searched only after N's start, so a forward reference to N+1 that appears before
 * N cannot cut the slice short. With no end marker the slice runs to end of text.
 */

use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Marker label variant used to find a chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerVariant {
    /// `CHAPTER n`
    Label,
    /// `Chapter n`
    LowercaseLabel,
    /// `CHAPTER n:` / `CHAPTER n.` / `CHAPTER n `
    PunctuatedLabel,
    /// `Ch. n` / `Ch n`
    Abbreviated,
}

impl MarkerVariant {
    /// Variants tried, in order, for OCR'd text
    pub const OCR_ORDER: [MarkerVariant; 4] = [
        MarkerVariant::Label,
        MarkerVariant::LowercaseLabel,
        MarkerVariant::PunctuatedLabel,
        MarkerVariant::Abbreviated,
    ];

    fn pattern(self, chapter: u32) -> String {
        match self {
            Self::Label => format!(r"CHAPTER\s+{}\b", chapter),
            Self::LowercaseLabel => format!(r"Chapter\s+{}\b", chapter),
            Self::PunctuatedLabel => format!(r"CHAPTER\s+{}[:.\s]", chapter),
            Self::Abbreviated => format!(r"Ch\.?\s*{}\b", chapter),
        }
    }

    fn regex(self, chapter: u32) -> Option<Regex> {
        RegexBuilder::new(&self.pattern(chapter))
            .case_insensitive(true)
            .build()
            .ok()
    }
}

/// Chapter boundary pair plus the sliced text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsolatedChapter {
    pub chapter: u32,
    // @field: Byte offset of the chapter's marker
    pub start: usize,
    // @field: Byte offset of the next chapter's marker, or text length
    pub end: usize,
    pub text: String,
    pub variant: MarkerVariant,
}

/// Stateless chapter isolator
pub struct ChapterIsolator;

impl ChapterIsolator {
    /// Isolate a chapter using the plain `CHAPTER n` marker.
    /// Returns `None` when the start marker is absent.
    pub fn isolate(text: &str, chapter: u32) -> Option<IsolatedChapter> {
        Self::isolate_with(text, chapter, MarkerVariant::Label)
    }

    /// Try each OCR variant in order; the first whose start marker is found wins
    pub fn isolate_ocr(text: &str, chapter: u32) -> Option<IsolatedChapter> {
        MarkerVariant::OCR_ORDER
            .iter()
            .find_map(|variant| Self::isolate_with(text, chapter, *variant))
    }

    /// Isolate a chapter with a specific marker variant
    pub fn isolate_with(text: &str, chapter: u32, variant: MarkerVariant) -> Option<IsolatedChapter> {
        if chapter == 0 {
            return None;
        }
        let start_re = variant.regex(chapter)?;
        let start = start_re.find(text)?.start();

        let tail = &text[start..];
        let end = chapter
            .checked_add(1)
            .and_then(|next| variant.regex(next))
            .and_then(|end_re| end_re.find(tail))
            .map(|m| start + m.start())
            .unwrap_or(text.len());

        Some(IsolatedChapter {
            chapter,
            start,
            end,
            text: text[start..end].to_string(),
            variant,
        })
    }
}
