/*!
 * Split a Ramayana source into sargas.
 *
 * Verse-referenced texts carry references of the form `R_{kanda},{sarga}.{verse}`. Everything
 * from one sarga's first verse line up to the next sarga's first verse line belongs to that
 * sarga and is written back unchanged, line endings included.
 *
 * English PDF translations have no verse references; their sarga boundaries are found from
 * headings on each page and reported as page ranges.
 */

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::file_utils::FileManager;
use crate::manifest::conventions::parse_roman;
use crate::segmentation::text_source;

static VERSE_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"R_(\d+),(\d+)\.(\d+)").unwrap_or_else(|e| panic!("{}", e)));

// "Sarga 12", "Chapter XIV"
static SARGA_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:sarga|chapter)\s+([ivx]+|\d+)\b").unwrap_or_else(|e| panic!("{}", e))
});

// "Canto 2, Sarga 5"
static CANTO_SARGA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)canto\s+(\d+)[,\s]+sarga\s+(\d+)").unwrap_or_else(|e| panic!("{}", e))
});

// "Book 3, Chapter 1", "Kanda 3 Sarga 1"
static BOOK_CHAPTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:book|kanda)\s+(\d+)[,\s]+(?:chapter|sarga)\s+(\d+)").unwrap_or_else(|e| panic!("{}", e))
});

// Tried in kanda order, first hit wins
static KANDA_KEYWORDS: Lazy<Vec<(u32, Regex)>> = Lazy::new(|| {
    [
        (1, r"bala|childhood"),
        (2, r"ayodhya"),
        (3, r"aranya|forest"),
        (4, r"kishkindha"),
        (5, r"sundara|beautiful"),
        (6, r"yuddha|war|battle"),
        (7, r"uttara|uttar|later"),
    ]
    .into_iter()
    .map(|(kanda, words)| {
        let re = Regex::new(&format!(r"(?i)\b(?:{})\b", words)).unwrap_or_else(|e| panic!("{}", e));
        (kanda, re)
    })
    .collect()
});

/// Highest sarga number accepted from a bare `Sarga n` heading
pub const MAX_SARGA: u32 = 200;

/// Number of kandas in the epic
pub const KANDA_COUNT: u32 = 7;

/// Name of the page-range report written next to the kanda folders
pub const PAGE_RANGES_FILE: &str = "sarga_page_ranges.json";

const KANDA_NAMES: [&str; 7] = [
    "Bala_Kanda",
    "Ayodhya_Kanda",
    "Aranya_Kanda",
    "Kishkindha_Kanda",
    "Sundara_Kanda",
    "Yuddha_Kanda",
    "Uttara_Kanda",
];

/// Sarga texts keyed by kanda then sarga number
pub type KandaMap = BTreeMap<u32, BTreeMap<u32, String>>;

/// Counts reported after a split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterizeSummary {
    pub kandas: usize,
    pub chapters: usize,
    pub written: usize,
    pub failed: usize,
}

/// Folder name of a kanda, e.g. `Kanda_2_Ayodhya_Kanda`; unnamed kandas repeat the number, `Kanda_9_Kanda_9`
pub fn kanda_folder_name(kanda: u32) -> String {
    match kanda.checked_sub(1).and_then(|i| KANDA_NAMES.get(i as usize)) {
        Some(name) => format!("Kanda_{}_{}", kanda, name),
        None => format!("Kanda_{}_Kanda_{}", kanda, kanda),
    }
}

/// File name of a sarga, e.g. `Sarga_007.txt`
pub fn sarga_file_name(sarga: u32) -> String {
    format!("Sarga_{:03}.txt", sarga)
}

/// Group the lines of `text` by sarga.
/// Header lines (starting with `#`) are dropped, as is anything before the first reference.
pub fn parse_sargas(text: &str) -> KandaMap {
    let mut kandas = KandaMap::new();
    let mut current: Option<(u32, u32)> = None;

    for line in text.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            continue;
        }

        let reference = VERSE_REFERENCE.captures(line).and_then(|caps| {
            let kanda = caps[1].parse::<u32>().ok()?;
            let sarga = caps[2].parse::<u32>().ok()?;
            Some((kanda, sarga))
        });
        if reference.is_some() {
            current = reference;
        }

        if let Some((kanda, sarga)) = current {
            kandas.entry(kanda).or_default().entry(sarga).or_default().push_str(line);
        }
    }

    kandas
}

/// Write every non-blank sarga below `output_dir`; failures are counted, not fatal
pub fn write_sargas(kandas: &KandaMap, output_dir: &Path) -> ChapterizeSummary {
    let mut summary = ChapterizeSummary {
        kandas: kandas.len(),
        ..Default::default()
    };

    for (kanda, sargas) in kandas {
        let folder = output_dir.join(kanda_folder_name(*kanda));
        for (sarga, text) in sargas {
            if text.trim().is_empty() {
                warn!("Skipping empty sarga {}.{}", kanda, sarga);
                continue;
            }
            summary.chapters += 1;

            let path: PathBuf = folder.join(sarga_file_name(*sarga));
            match FileManager::write_to_file(&path, text) {
                Ok(()) => summary.written += 1,
                Err(e) => {
                    error!("Failed to write {}: {:#}", path.display(), e);
                    summary.failed += 1;
                }
            }
        }
        info!("Kanda {}: {} sargas", kanda, sargas.len());
    }

    summary
}

/// Read `input`, split it and write the sargas below `output_dir`
pub fn chapterize_file(input: &Path, output_dir: &Path) -> Result<ChapterizeSummary> {
    let text = FileManager::read_to_string(input)
        .with_context(|| format!("Failed to read source text {}", input.display()))?;
    let kandas = parse_sargas(&text);
    if kandas.is_empty() {
        warn!("No verse references found in {}", input.display());
    }
    Ok(write_sargas(&kandas, output_dir))
}

/// First and last page (1-based, inclusive) of one sarga in a PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SargaPageRange {
    pub kanda: u32,
    pub sarga: u32,
    pub start_page: usize,
    pub end_page: usize,
    // @field: Where the sarga's PDF belongs, e.g. `Kanda_1_Bala_Kanda/Sarga_001.pdf`
    pub target: String,
}

/// Pages seen per kanda and sarga
type PageMap = BTreeMap<u32, BTreeMap<u32, BTreeSet<usize>>>;

/// Kanda named on a page, by keyword
fn kanda_on_page(text: &str) -> Option<u32> {
    KANDA_KEYWORDS.iter().find(|(_, re)| re.is_match(text)).map(|(kanda, _)| *kanda)
}

/// First `(kanda, sarga)` pair of a two-number heading pattern with a valid kanda
fn kanda_and_sarga(re: &Regex, text: &str) -> Option<(u32, u32)> {
    re.captures_iter(text).find_map(|caps| {
        let kanda = caps[1].parse::<u32>().ok()?;
        let sarga = caps[2].parse::<u32>().ok()?;
        (1..=KANDA_COUNT).contains(&kanda).then_some((kanda, sarga))
    })
}

/// First acceptable sarga number of a `Sarga n` heading, Arabic or Roman
fn bare_sarga(text: &str) -> Option<u32> {
    SARGA_HEADING.captures_iter(text).find_map(|caps| {
        let raw = &caps[1];
        let number = raw.parse::<u32>().ok().or_else(|| parse_roman(raw))?;
        (1..=MAX_SARGA).contains(&number).then_some(number)
    })
}

/// Find sarga boundaries over the text of consecutive pages.
///
/// A page starts a sarga when it carries a sarga heading; every following page belongs to
/// that sarga until the next heading. Bare `Sarga n` headings need a kanda, which is taken
/// from the last kanda keyword seen or the last `Canto/Book n, Sarga m` heading.
pub fn find_sarga_pages(pages: &[String]) -> Vec<SargaPageRange> {
    let mut seen = PageMap::new();
    let mut kanda: Option<u32> = None;
    let mut sarga: Option<u32> = None;

    for (index, text) in pages.iter().enumerate() {
        let page = index + 1;
        if text.trim().is_empty() {
            continue;
        }

        if let Some(found) = kanda_on_page(text) {
            if kanda != Some(found) {
                debug!("Kanda {} starts around page {}", found, page);
                kanda = Some(found);
            }
        }

        if let (Some(current), Some(number)) = (kanda, bare_sarga(text)) {
            sarga = Some(number);
            seen.entry(current).or_default().entry(number).or_default().insert(page);
        }
        for re in [&*CANTO_SARGA, &*BOOK_CHAPTER] {
            if let Some((k, s)) = kanda_and_sarga(re, text) {
                kanda = Some(k);
                sarga = Some(s);
                seen.entry(k).or_default().entry(s).or_default().insert(page);
            }
        }

        if let (Some(k), Some(s)) = (kanda, sarga) {
            seen.entry(k).or_default().entry(s).or_default().insert(page);
        }
    }

    let mut ranges = Vec::new();
    for (kanda, sargas) in seen {
        for (sarga, pages) in sargas {
            if let (Some(first), Some(last)) = (pages.first(), pages.last()) {
                ranges.push(SargaPageRange {
                    kanda,
                    sarga,
                    start_page: *first,
                    end_page: *last,
                    target: format!("{}/Sarga_{:03}.pdf", kanda_folder_name(kanda), sarga),
                });
            }
        }
    }
    ranges
}

/// Extract the pages of a PDF, find its sarga boundaries and write them to
/// `output_dir/sarga_page_ranges.json`
pub fn chapterize_pdf(input: &Path, output_dir: &Path) -> Result<Vec<SargaPageRange>> {
    let pages = text_source::extract_pdf_pages(input)?;
    let ranges = find_sarga_pages(&pages);
    if ranges.is_empty() {
        warn!("No sarga boundaries found in {} ({} pages)", input.display(), pages.len());
        return Ok(ranges);
    }

    let kandas: BTreeSet<u32> = ranges.iter().map(|r| r.kanda).collect();
    for kanda in &kandas {
        let count = ranges.iter().filter(|r| r.kanda == *kanda).count();
        info!("Kanda {}: {} sargas", kanda, count);
    }
    FileManager::write_json_pretty(output_dir.join(PAGE_RANGES_FILE), &ranges)?;
    Ok(ranges)
}
