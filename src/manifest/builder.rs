/*!
 * Manifest assembly from a scripture's folder tree.
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::Value;

use crate::errors::ManifestError;
use crate::manifest::conventions::{ChapterSource, Layout, NamingConvention};
use crate::manifest::model::{ChapterEntry, Manifest, Section};
use crate::metadata::response::{parse_metadata, TITLE_FIELD};

/// Default bucket the URLs point into
pub const DEFAULT_BUCKET: &str = "gs://mygurukul-sacred-texts-corpus";

/// Files or folders of one kind directly inside `dir`, sorted by name, hidden entries skipped
fn entries(dir: &Path, want_dirs: bool) -> io::Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if name_of(&path).starts_with('.') {
            continue;
        }
        if (want_dirs && path.is_dir()) || (!want_dirs && path.is_file()) {
            result.push(path);
        }
    }
    result.sort();
    Ok(result)
}

fn name_of(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
}

fn stem_of(path: &Path) -> String {
    path.file_stem().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().map(|e| e.to_string_lossy().eq_ignore_ascii_case(extension)).unwrap_or(false)
}

fn is_metadata_json(path: &Path) -> bool {
    has_extension(path, "json") && !name_of(path).contains("manifest")
}

/// Title stored in a chapter metadata file.
/// `Err` when the file exists but cannot be read or parsed.
fn read_metadata_title(json: &Path) -> Result<Option<String>, String> {
    let content = fs::read_to_string(json).map_err(|e| e.to_string())?;
    let map = parse_metadata(&content).map_err(|e| e.to_string())?;
    Ok(map
        .get(TITLE_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string))
}

/// One chapter candidate before it becomes an entry
struct ChapterFiles<'a> {
    number: u32,
    // @field: Name the fallback title is derived from
    fallback_source: String,
    json: Option<PathBuf>,
    pdf_name: String,
    json_name: String,
    url_dirs: Vec<&'a str>,
}

/// Builds manifests for one naming convention
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    convention: NamingConvention,
    bucket: String,
}

impl ManifestBuilder {
    pub fn new(convention: NamingConvention, bucket: impl Into<String>) -> Self {
        Self {
            convention,
            bucket: bucket.into(),
        }
    }

    pub fn convention(&self) -> &NamingConvention {
        &self.convention
    }

    /// `{bucket}/{base_path}/{dirs...}/{file}`
    pub fn url(&self, dirs: &[&str], file: &str) -> String {
        let mut parts = vec![self.bucket.trim_end_matches('/'), self.convention.spec().base_path.trim_matches('/')];
        parts.extend(dirs.iter().copied());
        parts.push(file);
        parts.join("/")
    }

    /// Walk `root` and assemble its manifest
    pub fn build(&self, root: &Path) -> Result<Manifest, ManifestError> {
        let spec = self.convention.spec();
        info!("Building {} manifest from {}", spec.scripture_id, root.display());

        let mut sections = match &spec.layout {
            Layout::RootChapterFolders { section_id, section_name } => {
                let chapters = self.chapters_from_folders(root, &[])?;
                if chapters.is_empty() {
                    Vec::new()
                } else {
                    vec![Section::new(section_id.clone(), section_name.clone(), section_name.clone(), chapters)]
                }
            }
            Layout::DivisionFiles | Layout::DivisionChapterFolders => {
                let mut sections = Vec::new();
                for folder in entries(root, true)? {
                    let folder_name = name_of(&folder);
                    if !self.convention.accepts_division(&folder_name) {
                        debug!("Ignoring folder {}", folder_name);
                        continue;
                    }
                    let division = self.convention.parse_division(&folder_name);
                    let chapters = match spec.layout {
                        Layout::DivisionChapterFolders => self.chapters_from_folders(&folder, &[folder_name.as_str()])?,
                        _ => self.chapters_from_files(&folder, &folder_name)?,
                    };
                    if chapters.is_empty() {
                        warn!("Division {} has no chapters", folder_name);
                    }
                    sections.push(Section::new(division.id, division.name, division.name_english, chapters));
                }
                sections
            }
        };

        if sections.is_empty() {
            return Err(ManifestError::NoDivisions(root.to_path_buf()));
        }

        // Numeric ids ascending, everything else after them in discovery order
        sections.sort_by_key(|s| match s.section_id.parse::<u64>() {
            Ok(n) => (0u8, n),
            Err(_) => (1u8, 0),
        });

        let manifest = Manifest::new(spec.scripture_id.clone(), spec.scripture_name.clone(), sections);
        let (with, without) = manifest.metadata_tally();
        info!("Found {} chapters in {} sections ({} with metadata, {} without)",
            manifest.total_chapters, manifest.sections.len(), with, without);
        Ok(manifest)
    }

    /// Chapters stored as files directly inside a division folder
    fn chapters_from_files(&self, division: &Path, division_name: &str) -> Result<Vec<ChapterEntry>, ManifestError> {
        let source = self.convention.spec().chapter_source;
        let mut chapters = Vec::new();

        for file in entries(division, false)? {
            let is_chapter_file = match source {
                ChapterSource::Pdf => has_extension(&file, "pdf"),
                ChapterSource::Metadata => is_metadata_json(&file),
            };
            if !is_chapter_file {
                continue;
            }

            let stem = stem_of(&file);
            let number = match self.convention.chapter_number(&stem) {
                Some(n) => n,
                None => {
                    warn!("Skipping {}: no chapter number in name", file.display());
                    continue;
                }
            };

            let json = file.with_extension("json");
            chapters.push(self.entry(ChapterFiles {
                number,
                fallback_source: stem.clone(),
                json_name: name_of(&json),
                pdf_name: format!("{}.pdf", stem),
                json: Some(json),
                url_dirs: vec![division_name],
            }));
        }

        chapters.sort_by_key(|c| c.chapter_number);
        Ok(chapters)
    }

    /// Chapters stored one per folder below `parent`
    fn chapters_from_folders(&self, parent: &Path, parent_dirs: &[&str]) -> Result<Vec<ChapterEntry>, ManifestError> {
        let mut chapters = Vec::new();

        for folder in entries(parent, true)? {
            let folder_name = name_of(&folder);
            if !self.convention.accepts_chapter_folder(&folder_name) {
                debug!("Ignoring folder {}", folder.display());
                continue;
            }

            let number = match self.convention.chapter_number(&folder_name) {
                Some(n) => n,
                None => {
                    warn!("Skipping {}: no chapter number in name", folder.display());
                    continue;
                }
            };

            let files = entries(&folder, false)?;
            let pdf = match files.iter().find(|f| has_extension(f, "pdf")) {
                Some(pdf) => pdf.clone(),
                None => {
                    warn!("Skipping {}: no PDF found", folder.display());
                    continue;
                }
            };
            let sibling = pdf.with_extension("json");
            let json = if sibling.is_file() {
                Some(sibling.clone())
            } else {
                files.iter().find(|f| is_metadata_json(f)).cloned()
            };
            let json_name = json.as_deref().map(name_of).unwrap_or_else(|| name_of(&sibling));

            let mut url_dirs = parent_dirs.to_vec();
            url_dirs.push(folder_name.as_str());
            chapters.push(self.entry(ChapterFiles {
                number,
                fallback_source: folder_name.clone(),
                json,
                pdf_name: name_of(&pdf),
                json_name,
                url_dirs,
            }));
        }

        chapters.sort_by_key(|c| c.chapter_number);
        Ok(chapters)
    }

    fn entry(&self, files: ChapterFiles<'_>) -> ChapterEntry {
        let (has_metadata, metadata_title) = match files.json.as_deref().filter(|p| p.is_file()) {
            Some(json) => match read_metadata_title(json) {
                Ok(title) => (true, title),
                Err(e) => {
                    warn!("Unreadable metadata {}: {}", json.display(), e);
                    (false, None)
                }
            },
            None => (false, None),
        };

        let title = metadata_title
            .clone()
            .unwrap_or_else(|| self.convention.fallback_title(&files.fallback_source, files.number));
        let title_english = self.convention.english_title(&title, metadata_title.as_deref());

        ChapterEntry {
            chapter_id: files.number.to_string(),
            chapter_number: files.number,
            title,
            title_english,
            metadata_url: self.url(&files.url_dirs, &files.json_name),
            pdf_url: self.url(&files.url_dirs, &files.pdf_name),
            has_metadata,
        }
    }
}

/// Write a manifest as indented JSON
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), ManifestError> {
    let json = serde_json::to_string_pretty(manifest)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    info!("Manifest saved to {}", path.display());
    Ok(())
}
