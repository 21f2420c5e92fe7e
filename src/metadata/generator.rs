/*!
 * Per-chapter metadata generation.
 *
 * One PDF is read, sent inline with the scripture's instruction, and the reply is cleaned,
 * parsed, post-processed and written beside the PDF as `X.json`. Directory walks process
 * files strictly one after another; a failure on one file is recorded and the walk moves on.
 */

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{debug, error, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ConfigError, MetadataError};
use crate::file_utils::FileManager;
use crate::metadata::response::{clean_response_text, ensure_title, normalize_practical_advice, parse_metadata, TITLE_FIELD};
use crate::metadata::title::{derive_title_from_path, TitleFallback};
use crate::providers::{DocumentPrompt, Provider};

/// Default pause between two API calls
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_millis(3000);

/// Which PDFs a walk collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WalkMode {
    /// PDFs directly inside each immediate subdirectory of the root
    #[default]
    Sections,
    /// Every PDF below the root
    Recursive,
}

/// PDF collection rules for one scripture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WalkOptions {
    pub mode: WalkMode,
    // @field: Ignore PDFs lying directly in the root (recursive mode)
    pub skip_root_files: bool,
    // @field: Root-level file names never processed
    pub excluded_files: Vec<String>,
    // @field: File names must match this regex when set
    pub file_pattern: Option<String>,
}

/// Result of handling one PDF
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Processed(PathBuf),
    Skipped(PathBuf),
    Failed { path: PathBuf, reason: String },
}

/// End-of-run tally
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl RunSummary {
    fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Processed(_) => self.processed += 1,
            ItemOutcome::Skipped(_) => self.skipped += 1,
            ItemOutcome::Failed { path, reason } => {
                self.failed += 1;
                self.failures.push((path, reason));
            }
        }
    }
}

/// Collect the chapter PDFs of a scripture, sorted by full path
pub fn collect_pdfs(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>> {
    let filter = match &options.file_pattern {
        Some(pattern) => Some(Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?),
        None => None,
    };

    let mut pdfs = match options.mode {
        WalkMode::Sections => {
            let mut found = Vec::new();
            for section in FileManager::subdirectories(root)? {
                found.extend(FileManager::files_in_dir(&section, "pdf")?);
            }
            found
        }
        WalkMode::Recursive => FileManager::find_files(root, "pdf")?
            .into_iter()
            .filter(|pdf| {
                let in_root = pdf.parent() == Some(root);
                if !in_root {
                    return true;
                }
                let name = FileManager::file_name_string(pdf);
                !options.skip_root_files && !options.excluded_files.iter().any(|excluded| *excluded == name)
            })
            .collect(),
    };

    if let Some(filter) = filter {
        pdfs.retain(|pdf| filter.is_match(&FileManager::file_name_string(pdf)));
    }

    pdfs.sort();
    Ok(pdfs)
}

/// Drives one provider over chapter PDFs
pub struct MetadataGenerator<P>
where
    P: Provider<Request = DocumentPrompt>,
{
    provider: P,
    instruction: String,
    title: TitleFallback,
    delay: Duration,
    force: bool,
    // @field: Set once a request has actually gone out
    provider_called: AtomicBool,
}

impl<P> MetadataGenerator<P>
where
    P: Provider<Request = DocumentPrompt>,
{
    pub fn new(provider: P, instruction: impl Into<String>, title: TitleFallback) -> Self {
        Self {
            provider,
            instruction: instruction.into(),
            title,
            delay: DEFAULT_RATE_LIMIT_DELAY,
            force: false,
            provider_called: AtomicBool::new(false),
        }
    }

    /// Pause inserted between two successive API calls
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Regenerate even when the sibling JSON already exists
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Sibling metadata path of a PDF
    pub fn output_path(pdf: &Path) -> PathBuf {
        FileManager::sibling_with_extension(pdf, "json")
    }

    fn should_skip(&self, pdf: &Path) -> bool {
        !self.force && FileManager::file_exists(Self::output_path(pdf))
    }

    /// Wait out the delay when an earlier request already went out
    async fn pace(&self) {
        if self.provider_called.swap(true, Ordering::SeqCst) && !self.delay.is_zero() {
            debug!("Waiting {:?} before the next request", self.delay);
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Generate, post-process and write the metadata of one PDF
    pub async fn generate_for_file(&self, pdf: &Path) -> Result<Map<String, Value>, MetadataError> {
        let document = std::fs::read(pdf)?;
        let prompt = DocumentPrompt::pdf(self.instruction.clone(), document);

        self.pace().await;
        let response = self.provider.complete(prompt).await?;
        let raw = P::extract_text(&response);
        debug!("Received {} characters for {}", raw.len(), pdf.display());

        let cleaned = clean_response_text(&raw).ok_or(MetadataError::UnrecoverableResponse)?;
        let mut metadata = parse_metadata(&cleaned)?;

        if ensure_title(&mut metadata, || derive_title_from_path(pdf, &self.title)) {
            info!("Fallback title applied for {}: {}",
                pdf.display(),
                metadata.get(TITLE_FIELD).and_then(Value::as_str).unwrap_or_default());
        }
        if normalize_practical_advice(&mut metadata) {
            info!("Converted practicalAdvice entries to strings for {}", pdf.display());
        }

        let output = Self::output_path(pdf);
        FileManager::write_json_pretty(&output, &metadata)
            .map_err(|e| MetadataError::Io(std::io::Error::other(format!("{:#}", e))))?;

        Ok(metadata)
    }

    /// Handle one PDF without letting its errors escape
    pub async fn process_file(&self, pdf: &Path) -> ItemOutcome {
        if self.should_skip(pdf) {
            info!("Skipping {} (metadata already exists)", pdf.display());
            return ItemOutcome::Skipped(pdf.to_path_buf());
        }

        info!("Processing {}", pdf.display());
        match self.generate_for_file(pdf).await {
            Ok(_) => {
                info!("Saved metadata to {}", Self::output_path(pdf).display());
                ItemOutcome::Processed(pdf.to_path_buf())
            }
            Err(e) => {
                error!("Failed to process {}: {}", pdf.display(), e);
                if let MetadataError::Parse { preview, .. } = &e {
                    debug!("Response preview: {}", preview);
                }
                ItemOutcome::Failed {
                    path: pdf.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Process a list of PDFs in order; API calls are spaced by the delay
    pub async fn process_files(&self, pdfs: &[PathBuf], progress: &ProgressBar) -> RunSummary {
        let mut summary = RunSummary {
            total: pdfs.len(),
            ..Default::default()
        };

        for pdf in pdfs {
            progress.set_message(FileManager::file_name_string(pdf));
            summary.record(self.process_file(pdf).await);
            progress.inc(1);
        }

        summary
    }

    /// Collect and process every chapter PDF below `root`
    pub async fn process_directory(&self, root: &Path, options: &WalkOptions) -> Result<RunSummary> {
        if !FileManager::dir_exists(root) {
            return Err(ConfigError::MissingRootDirectory(root.to_path_buf()).into());
        }

        let pdfs = collect_pdfs(root, options)
            .with_context(|| format!("Failed to collect PDFs under {}", root.display()))?;
        if pdfs.is_empty() {
            warn!("No chapter PDFs found under {}", root.display());
        }

        let summary = self.process_files(&pdfs, &ProgressBar::hidden()).await;
        info!("Metadata run finished: processed {}, skipped {}, failed {} (of {})",
            summary.processed, summary.skipped, summary.failed, summary.total);
        Ok(summary)
    }
}
