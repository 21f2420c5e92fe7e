/*!
 * Folder and file naming conventions of the library's scriptures.
 *
 * A `ConventionSpec` is plain data (regexes as strings) so that the built-in table and
 * conventions supplied in the config file share one shape. It is compiled once into a
 * `NamingConvention` before a build.
 */

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Id given to divisions whose folder name does not parse
pub const UNKNOWN_DIVISION_ID: &str = "unknown";

/// How chapters are laid out below the scripture root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// `root/<division>/<chapter file>`
    DivisionFiles,
    /// `root/<division>/<chapter folder>/<chapter file>`
    DivisionChapterFolders,
    /// `root/<chapter folder>/<chapter file>`, all in one synthetic section
    RootChapterFolders { section_id: String, section_name: String },
}

/// Display name of a parsed division
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionNaming {
    /// The `name` group as captured
    Raw,
    /// `"{label} {id}: {name}"` with underscores turned into spaces
    Labeled { label: String },
}

/// English display name of a parsed division
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionEnglish {
    /// Looked up in `translations`, empty when absent
    Translated,
    /// The `name` group with underscores turned into spaces
    Spaced,
    /// Same as the section name
    SameAsName,
    Empty,
}

/// Which files stand for chapters in `division_files` layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterSource {
    /// Chapter PDFs; metadata is the sibling JSON when present
    Pdf,
    /// Chapter metadata JSON files; the PDF is their sibling
    Metadata,
}

/// Title used when no metadata title is available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackTitle {
    /// `"Chapter {n}"`
    ChapterNumber,
    /// The file stem (or chapter folder name) with `strip` patterns removed
    CleanedName {
        #[serde(default)]
        strip: Vec<String>,
        #[serde(default)]
        title_case: bool,
    },
}

/// How `titleEnglish` is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnglishTitle {
    /// Field omitted
    None,
    /// Present but empty
    Empty,
    SameAsTitle,
    /// Text after the last `.` of the metadata title
    AfterLastPeriod,
}

/// Naming convention of one scripture, as written in config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionSpec {
    pub scripture_id: String,
    pub scripture_name: String,
    // @field: Bucket-relative folder of the scripture
    pub base_path: String,
    pub layout: Layout,
    // @field: Division folders not matching are ignored entirely
    #[serde(default)]
    pub division_filter: Option<String>,
    // @field: Named groups `id` and `name`
    #[serde(default)]
    pub division_pattern: Option<String>,
    // @field: Removed from division folder names before parsing
    #[serde(default)]
    pub strip_prefixes: Vec<String>,
    pub section_naming: SectionNaming,
    pub section_english: SectionEnglish,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    #[serde(default)]
    pub chapter_folder_filter: Option<String>,
    // @field: Tried in order; named group `num`
    pub chapter_patterns: Vec<String>,
    #[serde(default)]
    pub roman_numerals: bool,
    // @field: Names matching this become chapter 0
    #[serde(default)]
    pub intro_pattern: Option<String>,
    pub chapter_source: ChapterSource,
    pub fallback_title: FallbackTitle,
    pub default_title: String,
    pub english_title: EnglishTitle,
}

/// Parsed identity of a division folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionInfo {
    pub id: String,
    pub name: String,
    pub name_english: String,
}

/// A compiled `ConventionSpec`
#[derive(Debug, Clone)]
pub struct NamingConvention {
    spec: ConventionSpec,
    division_filter: Option<Regex>,
    division_pattern: Option<Regex>,
    chapter_folder_filter: Option<Regex>,
    chapter_patterns: Vec<Regex>,
    intro_pattern: Option<Regex>,
    title_strip: Vec<Regex>,
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn compile_opt(pattern: &Option<String>) -> Result<Option<Regex>, ConfigError> {
    pattern.as_deref().map(compile).transpose()
}

fn spaced(name: &str) -> String {
    name.replace('_', " ").split_whitespace().collect::<Vec<_>>().join(" ")
}

impl NamingConvention {
    pub fn compile(spec: ConventionSpec) -> Result<Self, ConfigError> {
        let chapter_patterns = spec.chapter_patterns.iter().map(|p| compile(p)).collect::<Result<Vec<_>, _>>()?;
        for (pattern, re) in spec.chapter_patterns.iter().zip(&chapter_patterns) {
            if !re.capture_names().any(|name| name == Some("num")) {
                return Err(ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: "missing named group `num`".to_string(),
                });
            }
        }
        let title_strip = match &spec.fallback_title {
            FallbackTitle::CleanedName { strip, .. } => strip.iter().map(|p| compile(p)).collect::<Result<Vec<_>, _>>()?,
            FallbackTitle::ChapterNumber => Vec::new(),
        };

        Ok(Self {
            division_filter: compile_opt(&spec.division_filter)?,
            division_pattern: compile_opt(&spec.division_pattern)?,
            chapter_folder_filter: compile_opt(&spec.chapter_folder_filter)?,
            intro_pattern: compile_opt(&spec.intro_pattern)?,
            chapter_patterns,
            title_strip,
            spec,
        })
    }

    pub fn spec(&self) -> &ConventionSpec {
        &self.spec
    }

    pub fn scripture_id(&self) -> &str {
        &self.spec.scripture_id
    }

    /// Whether a top-level folder is a division of this scripture
    pub fn accepts_division(&self, folder_name: &str) -> bool {
        self.division_filter.as_ref().map(|re| re.is_match(folder_name)).unwrap_or(true)
    }

    /// Whether a folder holds one chapter
    pub fn accepts_chapter_folder(&self, folder_name: &str) -> bool {
        self.chapter_folder_filter.as_ref().map(|re| re.is_match(folder_name)).unwrap_or(true)
    }

    /// Id and names of a division folder; unparseable names get the `unknown` id
    pub fn parse_division(&self, folder_name: &str) -> DivisionInfo {
        let mut stripped = folder_name;
        for prefix in &self.spec.strip_prefixes {
            if let Some(rest) = stripped.strip_prefix(prefix.as_str()) {
                stripped = rest;
            }
        }

        let parsed = self.division_pattern.as_ref()
            .and_then(|re| re.captures(stripped))
            .and_then(|caps| Some((caps.name("id")?.as_str().to_string(), caps.name("name")?.as_str().to_string())));

        let (id, raw_name) = match parsed {
            Some(parsed) => parsed,
            None => {
                log::warn!("Could not parse division folder '{}', using id '{}'", folder_name, UNKNOWN_DIVISION_ID);
                return DivisionInfo {
                    id: UNKNOWN_DIVISION_ID.to_string(),
                    name: folder_name.to_string(),
                    name_english: self.english_section_name(folder_name, folder_name),
                };
            }
        };

        let name = match &self.spec.section_naming {
            SectionNaming::Raw => raw_name.clone(),
            SectionNaming::Labeled { label } => format!("{} {}: {}", label, id, spaced(&raw_name)),
        };
        let name_english = self.english_section_name(&raw_name, &name);
        DivisionInfo { id, name, name_english }
    }

    fn english_section_name(&self, raw_name: &str, name: &str) -> String {
        match self.spec.section_english {
            SectionEnglish::Translated => self.spec.translations.get(raw_name).cloned().unwrap_or_default(),
            SectionEnglish::Spaced => spaced(raw_name),
            SectionEnglish::SameAsName => name.to_string(),
            SectionEnglish::Empty => String::new(),
        }
    }

    /// Chapter number of a file stem or chapter folder name
    pub fn chapter_number(&self, name: &str) -> Option<u32> {
        for re in &self.chapter_patterns {
            if let Some(num) = re.captures(name).and_then(|caps| caps.name("num")) {
                let text = num.as_str();
                if let Ok(n) = text.parse::<u32>() {
                    return Some(n);
                }
                if self.spec.roman_numerals {
                    if let Some(n) = parse_roman(text) {
                        return Some(n);
                    }
                }
            }
        }
        match &self.intro_pattern {
            Some(re) if re.is_match(name) => Some(0),
            _ => None,
        }
    }

    /// Title used when the chapter has no metadata title
    pub fn fallback_title(&self, name: &str, number: u32) -> String {
        match &self.spec.fallback_title {
            FallbackTitle::ChapterNumber => format!("Chapter {}", number),
            FallbackTitle::CleanedName { title_case, .. } => {
                let mut cleaned = name.to_string();
                for re in &self.title_strip {
                    cleaned = re.replace(&cleaned, "").to_string();
                }
                let cleaned = spaced(&cleaned);
                let cleaned = if *title_case { crate::metadata::title::title_case(&cleaned) } else { cleaned };
                if cleaned.is_empty() {
                    self.spec.default_title.clone()
                } else {
                    cleaned
                }
            }
        }
    }

    /// `titleEnglish` for a chapter
    pub fn english_title(&self, title: &str, metadata_title: Option<&str>) -> Option<String> {
        match self.spec.english_title {
            EnglishTitle::None => None,
            EnglishTitle::Empty => Some(String::new()),
            EnglishTitle::SameAsTitle => Some(title.to_string()),
            EnglishTitle::AfterLastPeriod => Some(
                metadata_title
                    .filter(|t| !t.is_empty())
                    .and_then(|t| t.rsplit('.').next())
                    .map(|t| t.trim().to_string())
                    .unwrap_or_default(),
            ),
        }
    }
}

/// Parse a Roman numeral (case-insensitive); `None` for anything else
pub fn parse_roman(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }
    let mut total = 0u32;
    let mut previous = 0u32;
    for c in text.chars().rev() {
        let value = match c.to_ascii_uppercase() {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if value < previous {
            total = total.checked_sub(value)?;
        } else {
            total += value;
            previous = value;
        }
    }
    Some(total)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The scriptures of the library with a known layout
pub fn builtin_conventions() -> Vec<ConventionSpec> {
    let translations: BTreeMap<String, String> = [
        ("Sutrasthana", "Foundational Principles"),
        ("Nidanasthana", "Diagnostics"),
        ("Vimanasthana", "Specific Determinations"),
        ("Sasirasthana", "Anatomy & Physiology"),
        ("Indriyasthana", "Prognosis"),
        ("Chikitasthanam", "Therapeutics"),
        ("Kalpasthanam", "Pharmaceutics"),
        ("Siddhisthanam", "Success in Treatment"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let sushruta_translations: BTreeMap<String, String> = [
        ("Sutrasthanam", "Foundational Principles"),
        ("Nidanasthanam", "Diagnostics"),
        ("Sarirasthanam", "Anatomy"),
        ("Chikitsasthanam", "Therapeutics"),
        ("Kalpasthanam", "Pharmaceutics"),
        ("Uttaratantram", "Supplementary Treatise"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    vec![
        ConventionSpec {
            scripture_id: "caraka_samhita".into(),
            scripture_name: "Caraka Saṃhitā".into(),
            base_path: "Gurukul_Library/Primary_Texts/Ayurveda/Caraka_Samhita".into(),
            layout: Layout::DivisionFiles,
            division_filter: None,
            division_pattern: Some(r"^Section_(?P<id>[^_]+)_(?P<name>.+)$".into()),
            strip_prefixes: strings(&["Charaka_samhita_english_"]),
            section_naming: SectionNaming::Raw,
            section_english: SectionEnglish::Translated,
            translations,
            chapter_folder_filter: None,
            chapter_patterns: strings(&[r"Chapter_(?P<num>\d+)"]),
            roman_numerals: false,
            intro_pattern: None,
            chapter_source: ChapterSource::Pdf,
            fallback_title: FallbackTitle::ChapterNumber,
            default_title: "Chapter".into(),
            english_title: EnglishTitle::Empty,
        },
        ConventionSpec {
            scripture_id: "sushruta_samhita".into(),
            scripture_name: "Sushruta Saṃhitā".into(),
            base_path: "Gurukul_Library/Primary_Texts/Ayurveda/Sushruta_Samhita".into(),
            layout: Layout::DivisionFiles,
            division_filter: None,
            division_pattern: Some(r"^Section_(?P<id>[^_]+)_(?P<name>.+)$".into()),
            strip_prefixes: strings(&["Sushruta_Samhita_", "sushruta_samhita_"]),
            section_naming: SectionNaming::Raw,
            section_english: SectionEnglish::Translated,
            translations: sushruta_translations,
            chapter_folder_filter: None,
            chapter_patterns: strings(&[r"Chapter_(?P<num>\d+)"]),
            roman_numerals: false,
            intro_pattern: None,
            chapter_source: ChapterSource::Pdf,
            fallback_title: FallbackTitle::ChapterNumber,
            default_title: "Chapter".into(),
            english_title: EnglishTitle::Empty,
        },
        ConventionSpec {
            scripture_id: "arthashastra".into(),
            scripture_name: "Arthaśāstra".into(),
            base_path: "Gurukul_Library/Primary_Texts/Sastras/ArthaShastra".into(),
            layout: Layout::DivisionFiles,
            division_filter: Some(r"^Arthashastra_Book_".into()),
            division_pattern: Some(r"^Book_(?P<id>[^_]+)_(?P<name>.+)$".into()),
            strip_prefixes: strings(&["Arthashastra_", "arthashastra_"]),
            section_naming: SectionNaming::Raw,
            section_english: SectionEnglish::Spaced,
            translations: BTreeMap::new(),
            chapter_folder_filter: None,
            chapter_patterns: strings(&[r"[_-]Chapter_(?P<num>\d+)"]),
            roman_numerals: false,
            intro_pattern: None,
            chapter_source: ChapterSource::Metadata,
            fallback_title: FallbackTitle::CleanedName { strip: Vec::new(), title_case: false },
            default_title: "Arthashastra Chapter".into(),
            english_title: EnglishTitle::AfterLastPeriod,
        },
        ConventionSpec {
            scripture_id: "kamasutra".into(),
            scripture_name: "Kama Sutra".into(),
            base_path: "Gurukul_Library/Primary_Texts/Sastras/KamaSutra".into(),
            layout: Layout::DivisionFiles,
            division_filter: Some(r"^Part_".into()),
            division_pattern: Some(r"^Part_(?P<id>\d+)_(?P<name>.*)$".into()),
            strip_prefixes: Vec::new(),
            section_naming: SectionNaming::Labeled { label: "Part".into() },
            section_english: SectionEnglish::Spaced,
            translations: BTreeMap::new(),
            chapter_folder_filter: None,
            chapter_patterns: strings(&[r"_Chapter_(?P<num>\d+)"]),
            roman_numerals: false,
            intro_pattern: None,
            chapter_source: ChapterSource::Metadata,
            fallback_title: FallbackTitle::CleanedName { strip: Vec::new(), title_case: false },
            default_title: "Kama Sutra Chapter".into(),
            english_title: EnglishTitle::None,
        },
        ConventionSpec {
            scripture_id: "Bhagvata_Purana".into(),
            scripture_name: "Bhagavata Purana".into(),
            base_path: "Gurukul_Library/Primary_Texts/Puranas/Bhagvata_Purana".into(),
            layout: Layout::DivisionFiles,
            division_filter: Some(r"^Canto_".into()),
            division_pattern: Some(r"Canto_(?P<id>\d+)_Srimad_Bhagvatam_(?P<name>.+)".into()),
            strip_prefixes: Vec::new(),
            section_naming: SectionNaming::Labeled { label: "Canto".into() },
            section_english: SectionEnglish::SameAsName,
            translations: BTreeMap::new(),
            chapter_folder_filter: None,
            chapter_patterns: strings(&[r"SB_\d+_(?P<num>\d+)_", r"SB\s+\d+\.(?P<num>\d+)[\s-]"]),
            roman_numerals: false,
            intro_pattern: None,
            chapter_source: ChapterSource::Pdf,
            fallback_title: FallbackTitle::CleanedName {
                strip: strings(&[r"(?i)^SB[_\s]*\d+[._]\d+[_\s-]*", r"(?i)^SB[_\s]*"]),
                title_case: true,
            },
            default_title: "Bhagavata Purana Chapter".into(),
            english_title: EnglishTitle::SameAsTitle,
        },
        ConventionSpec {
            scripture_id: "panchatantra".into(),
            scripture_name: "Pañcatantra".into(),
            base_path: "Gurukul_Library/Primary_Texts/Sastras/NitiShastra/Panchatantra".into(),
            layout: Layout::DivisionChapterFolders,
            division_filter: Some(r"^Panchtantra_Tantra_".into()),
            division_pattern: Some(r"Tantra_(?P<id>\d+)_(?P<name>.+)".into()),
            strip_prefixes: Vec::new(),
            section_naming: SectionNaming::Labeled { label: "Tantra".into() },
            section_english: SectionEnglish::SameAsName,
            translations: BTreeMap::new(),
            chapter_folder_filter: Some(r"^Panch(?:a)?tantra_".into()),
            chapter_patterns: strings(&[r"(?i)_(?:CAF|WOF|COA|FOP|AWDC)_(?P<num>\d+)"]),
            roman_numerals: false,
            intro_pattern: None,
            chapter_source: ChapterSource::Pdf,
            fallback_title: FallbackTitle::CleanedName {
                strip: strings(&[
                    r"(?i)^Panch(?:a)?tantra_",
                    r"(?i)^(?:CAF|WOF|COA|FOP|AWDC)_\d+_*",
                    r"^\d+_*",
                ]),
                title_case: true,
            },
            default_title: "Panchatantra Story".into(),
            english_title: EnglishTitle::SameAsTitle,
        },
        ConventionSpec {
            scripture_id: "ramayana_valmiki".into(),
            scripture_name: "Ramayana by Valmiki".into(),
            base_path: "Gurukul_Library/Primary_Texts/Epics/Ramayana".into(),
            layout: Layout::DivisionFiles,
            division_filter: Some(r"^\d+\.\s+.+".into()),
            division_pattern: Some(r"^(?P<id>\d+)\.\s*(?P<name>.+?)\s*$".into()),
            strip_prefixes: Vec::new(),
            section_naming: SectionNaming::Labeled { label: "Kanda".into() },
            section_english: SectionEnglish::SameAsName,
            translations: BTreeMap::new(),
            chapter_folder_filter: None,
            chapter_patterns: strings(&[r"(?i)chapter\s+(?P<num>\d+)", r"(?i)chapter\s+(?P<num>[ivx]+)\b"]),
            roman_numerals: true,
            intro_pattern: None,
            chapter_source: ChapterSource::Pdf,
            fallback_title: FallbackTitle::CleanedName {
                strip: strings(&[r"(?i)^chapter\s+\d+\s+", r"(?i)^chapter\s+[ivx]+\s+"]),
                title_case: false,
            },
            default_title: "Ramayana Chapter".into(),
            english_title: EnglishTitle::SameAsTitle,
        },
        ConventionSpec {
            scripture_id: "natyashastra".into(),
            scripture_name: "Nāṭyaśāstra".into(),
            base_path: "Gurukul_Library/Primary_Texts/Sastras/NatyaShastra".into(),
            layout: Layout::RootChapterFolders {
                section_id: "1".into(),
                section_name: "Nāṭyaśāstra Chapters".into(),
            },
            division_filter: None,
            division_pattern: None,
            strip_prefixes: Vec::new(),
            section_naming: SectionNaming::Raw,
            section_english: SectionEnglish::SameAsName,
            translations: BTreeMap::new(),
            chapter_folder_filter: Some(r"^Chapter_".into()),
            chapter_patterns: strings(&[r"Chapter_(?P<num>\d+)"]),
            roman_numerals: false,
            intro_pattern: None,
            chapter_source: ChapterSource::Pdf,
            fallback_title: FallbackTitle::CleanedName { strip: Vec::new(), title_case: false },
            default_title: "Nāṭyaśāstra Chapter".into(),
            english_title: EnglishTitle::None,
        },
        ConventionSpec {
            scripture_id: "yoga_sutra".into(),
            scripture_name: "Yoga Sūtra of Patañjali".into(),
            base_path: "Gurukul_Library/Primary_Texts/Yoga/Patanjali_Yogasutra".into(),
            layout: Layout::RootChapterFolders {
                section_id: "1".into(),
                section_name: "Yoga Sūtra Chapters".into(),
            },
            division_filter: None,
            division_pattern: None,
            strip_prefixes: Vec::new(),
            section_naming: SectionNaming::Raw,
            section_english: SectionEnglish::SameAsName,
            translations: BTreeMap::new(),
            chapter_folder_filter: Some(r"(?i)^chapter_".into()),
            chapter_patterns: strings(&[r"(?i)chapter_(?P<num>\d+)"]),
            roman_numerals: false,
            intro_pattern: None,
            chapter_source: ChapterSource::Pdf,
            fallback_title: FallbackTitle::CleanedName {
                strip: strings(&[r"(?i)^Chapter[_ ]\d+[_ ]"]),
                title_case: false,
            },
            default_title: "Yoga Sūtra Chapter".into(),
            english_title: EnglishTitle::None,
        },
        ConventionSpec {
            scripture_id: "VedangaSastra_Jyotisa".into(),
            scripture_name: "Vedanga Jyotisa Lagadha".into(),
            // Chapters sit directly under Jyotisa/ in the bucket, without the local book folder
            base_path: "Gurukul_Library/Primary_Texts/Sastras/VedangaShastra/Jyotisa".into(),
            layout: Layout::RootChapterFolders {
                section_id: "1".into(),
                section_name: "Vedanga Jyotisa Chapters".into(),
            },
            division_filter: None,
            division_pattern: None,
            strip_prefixes: Vec::new(),
            section_naming: SectionNaming::Raw,
            section_english: SectionEnglish::SameAsName,
            translations: BTreeMap::new(),
            chapter_folder_filter: Some(r"(?i)Chapter\s+\d+".into()),
            chapter_patterns: strings(&[r"(?i)Chapter\s+(?P<num>\d+)"]),
            roman_numerals: false,
            intro_pattern: None,
            chapter_source: ChapterSource::Pdf,
            fallback_title: FallbackTitle::CleanedName {
                strip: strings(&[r"(?i)^Chapter\s+\d+\s+"]),
                title_case: false,
            },
            default_title: "Vedanga Jyotisa Chapter".into(),
            english_title: EnglishTitle::SameAsTitle,
        },
        ConventionSpec {
            scripture_id: "Vastu_Sastra".into(),
            scripture_name: "Vastu Sastra Viswakarma".into(),
            base_path: "Gurukul_Library/Primary_Texts/Sastras/VastuShastra".into(),
            layout: Layout::DivisionFiles,
            division_filter: Some(r"(?i)Part\s+\d+".into()),
            division_pattern: Some(r"(?i)Part\s+(?P<id>\d+)\s+(?P<name>.+)".into()),
            strip_prefixes: Vec::new(),
            section_naming: SectionNaming::Labeled { label: "Part".into() },
            section_english: SectionEnglish::SameAsName,
            translations: BTreeMap::new(),
            chapter_folder_filter: None,
            chapter_patterns: strings(&[r"(?i)Chapter\s+(?P<num>\d+)"]),
            roman_numerals: false,
            intro_pattern: Some(r"Introduct(?:ion|ory)".into()),
            chapter_source: ChapterSource::Pdf,
            fallback_title: FallbackTitle::CleanedName {
                strip: strings(&[r"(?i)^Chapter\s+\d+\s*[-:]?\s*"]),
                title_case: false,
            },
            default_title: "Vastu Sastra Chapter".into(),
            english_title: EnglishTitle::SameAsTitle,
        },
    ]
}

/// Find a convention by scripture id; user conventions take precedence over built-ins
pub fn lookup(scripture_id: &str, user_specs: &[ConventionSpec]) -> Result<NamingConvention, ConfigError> {
    let spec = user_specs
        .iter()
        .find(|s| s.scripture_id == scripture_id)
        .cloned()
        .or_else(|| builtin_conventions().into_iter().find(|s| s.scripture_id == scripture_id))
        .ok_or_else(|| ConfigError::UnknownScripture(scripture_id.to_string()))?;
    NamingConvention::compile(spec)
}

/// Ids of all known conventions, user ones included, sorted
pub fn known_ids(user_specs: &[ConventionSpec]) -> Vec<String> {
    let mut ids: Vec<String> = builtin_conventions()
        .into_iter()
        .map(|s| s.scripture_id)
        .chain(user_specs.iter().map(|s| s.scripture_id.clone()))
        .collect();
    ids.sort();
    ids.dedup();
    ids
}
