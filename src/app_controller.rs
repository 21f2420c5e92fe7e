use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::{Config, GenerationProvider};
use crate::chapterize::{self, ChapterizeSummary, SargaPageRange};
use crate::dictionary::{self, Dictionary};
use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::manifest::{conventions, validate_manifest, write_manifest, Manifest, ManifestBuilder, ValidationReport};
use crate::metadata::generator::{collect_pdfs, MetadataGenerator, RunSummary, WalkMode};
use crate::metadata::prompts::{self, MetadataProfile};
use crate::metadata::title::TitleFallback;
use crate::providers::gemini::Gemini;
use crate::providers::mock::MockProvider;
use crate::providers::{DocumentPrompt, Provider};
use crate::segmentation::isolator::{ChapterIsolator, IsolatedChapter};
use crate::segmentation::text_source;
use crate::segmentation::{PatternLookupTable, SegmentationSummary, Segmenter, Strategy};

// @module: Application controller for the library tools

/// Name of the run log written next to a metadata walk
pub const RUN_LOG_FILE: &str = "gurukul.metadata.log";

/// How the segmenter picks its strategy
#[derive(Debug, Clone)]
pub enum StrategyChoice {
    // @choice: Look the scripture up in the pattern table
    Scripture(String),
    // @choice: Use this strategy directly
    Fixed(Strategy),
}

/// Options of a metadata walk
#[derive(Debug, Clone, Default)]
pub struct MetadataRequest {
    pub root: PathBuf,
    pub scripture: Option<String>,
    pub recursive: bool,
    pub prompt_file: Option<PathBuf>,
    pub dry_run: bool,
    pub force: bool,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output path of a segmentation run: `{stem}.verses.json`
    pub fn segment_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
        let stem = input.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_else(|| "output".to_string());
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(format!("{}.verses.json", stem))
    }

    /// Output path of an isolation run: `chapter_{n}_text.txt`
    pub fn isolate_output_path(input: &Path, chapter: u32, output_dir: Option<&Path>) -> PathBuf {
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(format!("chapter_{}_text.txt", chapter))
    }

    fn load_lookup_table(&self, table: Option<&Path>) -> Result<PatternLookupTable> {
        let path = table.map(Path::to_path_buf).unwrap_or_else(|| self.config.lookup_table_path.clone());
        let table = PatternLookupTable::load(&path)?;
        info!("Loaded pattern table with {} scriptures from {}", table.len(), path.display());
        Ok(table)
    }

    fn require_file(path: &Path) -> Result<()> {
        if !FileManager::file_exists(path) {
            return Err(anyhow!("Input file does not exist: {}", path.display()));
        }
        Ok(())
    }

    fn require_root(&self, root: &Path) -> Result<PathBuf> {
        let root = self.config.resolve_library_path(root);
        if !FileManager::dir_exists(&root) {
            return Err(ConfigError::MissingRootDirectory(root).into());
        }
        Ok(root)
    }

    /// Segment a source text into verse records and write them as JSON.
    /// Returns `None` when the output already exists and `force` is off.
    pub async fn segment(&self, input: &Path, choice: StrategyChoice, output_dir: Option<&Path>, force: bool) -> Result<Option<PathBuf>> {
        Self::require_file(input)?;
        let output = Self::segment_output_path(input, output_dir);
        if output.exists() && !force {
            warn!("Skipping file, {} already exists (use -f to force overwrite)", output.display());
            return Ok(None);
        }

        let start_time = Instant::now();
        let strategy = match choice {
            StrategyChoice::Fixed(strategy) => strategy,
            StrategyChoice::Scripture(name) => {
                let table = self.load_lookup_table(None)?;
                if table.profile(&name).is_none() {
                    warn!("Scripture '{}' is not in the pattern table, using the standard strategy", name);
                }
                table.strategy_for(&name)
            }
        };

        let text = text_source::load_text(input)?;
        let records = Segmenter::segment(&text, strategy);
        let summary = SegmentationSummary::from_records(&records);

        FileManager::write_json_pretty(&output, &records)?;
        info!("Segmented {} with {} strategy: {} records ({} verse, {} irregular) in {}",
            input.display(), strategy, summary.total, summary.verses, summary.irregular,
            Self::format_duration(start_time.elapsed()));
        info!("Success: {}", output.display());

        Ok(Some(output))
    }

    /// Isolate one chapter and write its text.
    /// A missing chapter marker is logged and yields `Ok(None)` without writing anything.
    pub async fn isolate(&self, input: &Path, chapter: u32, ocr: bool, output_dir: Option<&Path>, force: bool) -> Result<Option<IsolatedChapter>> {
        Self::require_file(input)?;
        let output = Self::isolate_output_path(input, chapter, output_dir);
        if output.exists() && !force {
            warn!("Skipping file, {} already exists (use -f to force overwrite)", output.display());
            return Ok(None);
        }

        let text = text_source::load_text(input)?;
        let isolated = if ocr {
            ChapterIsolator::isolate_ocr(&text, chapter)
        } else {
            ChapterIsolator::isolate(&text, chapter)
        };

        match isolated {
            Some(found) => {
                FileManager::write_to_file(&output, &found.text)?;
                info!("Chapter {} spans bytes {}..{} ({:?} marker)", chapter, found.start, found.end, found.variant);
                info!("Success: {}", output.display());
                Ok(Some(found))
            }
            None => {
                error!("Could not find the start of chapter {} in {}", chapter, input.display());
                Ok(None)
            }
        }
    }

    fn metadata_profile(scripture: Option<&str>) -> MetadataProfile {
        match prompts::profile_for(scripture) {
            Some(profile) => profile,
            None => {
                warn!("No built-in prompt for '{}', using the generic library prompt", scripture.unwrap_or_default());
                let mut generic = prompts::generic_profile();
                if let Some(name) = scripture {
                    generic.title = TitleFallback::with_default(format!("{} Chapter", name));
                }
                generic
            }
        }
    }

    /// Generate chapter metadata for every PDF below the root
    pub async fn metadata(&self, request: MetadataRequest) -> Result<RunSummary> {
        let root = self.require_root(&request.root)?;
        let generation = &self.config.generation;
        let api_key = if !request.dry_run && generation.requires_api_key() {
            Some(generation.resolve_api_key()?)
        } else {
            None
        };
        let profile = Self::metadata_profile(request.scripture.as_deref());
        let mut walk = profile.walk.clone();
        if request.recursive {
            walk.mode = WalkMode::Recursive;
        }

        let pdfs = collect_pdfs(&root, &walk)
            .with_context(|| format!("Failed to collect PDFs under {}", root.display()))?;
        if pdfs.is_empty() {
            warn!("No chapter PDFs found under {}", root.display());
            return Ok(RunSummary::default());
        }

        if request.dry_run {
            return Ok(Self::report_dry_run(&pdfs, request.force));
        }

        let instruction = profile.instruction(request.prompt_file.as_deref())?;
        let delay = Duration::from_millis(generation.rate_limit_delay_ms);

        let summary = match generation.provider {
            GenerationProvider::Gemini => {
                let client = Gemini::new(api_key.unwrap_or_default(), generation.endpoint.clone(), generation.model.clone(), generation.timeout_secs)
                    .with_generation_options(generation.temperature, generation.max_output_tokens);
                info!("🚀 Gurukul: {} - {} ({})", generation.provider.display_name(), generation.model, profile.name);
                let generator = MetadataGenerator::new(client, instruction, profile.title.clone())
                    .with_delay(delay)
                    .with_force(request.force);
                Self::run_generator(&generator, &pdfs).await
            }
            GenerationProvider::Mock => {
                info!("🚀 Gurukul: {} ({})", generation.provider.display_name(), profile.name);
                let generator = MetadataGenerator::new(MockProvider::working(), instruction, profile.title.clone())
                    .with_delay(delay)
                    .with_force(request.force);
                Self::run_generator(&generator, &pdfs).await
            }
        };

        self.log_run_summary(&root, &profile, &summary);
        Ok(summary)
    }

    fn report_dry_run(pdfs: &[PathBuf], force: bool) -> RunSummary {
        let mut summary = RunSummary {
            total: pdfs.len(),
            ..Default::default()
        };
        for pdf in pdfs {
            let exists = FileManager::file_exists(MetadataGenerator::<MockProvider>::output_path(pdf));
            if exists && !force {
                info!("[dry run] would skip {}", pdf.display());
                summary.skipped += 1;
            } else {
                info!("[dry run] would process {}", pdf.display());
                summary.processed += 1;
            }
        }
        info!("Dry run: {} to process, {} to skip", summary.processed, summary.skipped);
        summary
    }

    async fn run_generator<P>(generator: &MetadataGenerator<P>, pdfs: &[PathBuf]) -> RunSummary
    where
        P: Provider<Request = DocumentPrompt>,
    {
        let start_time = Instant::now();
        let progress_bar = Self::progress_bar(pdfs.len() as u64, "files");
        let summary = generator.process_files(pdfs, &progress_bar).await;
        progress_bar.finish_and_clear();

        info!("Metadata processing completed: {} processed, {} skipped, {} errors (of {}) in {}",
            summary.processed, summary.skipped, summary.failed, summary.total,
            Self::format_duration(start_time.elapsed()));
        for (path, reason) in &summary.failures {
            error!("Failed: {} ({})", path.display(), reason);
        }
        summary
    }

    fn log_run_summary(&self, root: &Path, profile: &MetadataProfile, summary: &RunSummary) {
        if summary.processed == 0 && summary.failed == 0 {
            return;
        }
        let log_file_path = root.join(RUN_LOG_FILE);
        let mut content = format!("{} - {} ({}): {} processed, {} skipped, {} errors",
            profile.name,
            self.config.generation.model,
            self.config.generation.provider.display_name(),
            summary.processed, summary.skipped, summary.failed);
        for (path, reason) in &summary.failures {
            content.push_str(&format!("\n  {} - {}", path.display(), reason));
        }
        if let Err(e) = FileManager::append_to_log_file(&log_file_path, &content) {
            warn!("Failed to write run log: {}", e);
        } else {
            info!("Run log written to {}", log_file_path.display());
        }
    }

    /// Build, validate and write a chapter manifest
    pub async fn manifest(&self, root: &Path, scripture: &str, output: Option<&Path>, check_counts: bool) -> Result<Manifest> {
        let root = self.require_root(root)?;
        let convention = conventions::lookup(scripture, &self.config.conventions)?;
        let builder = ManifestBuilder::new(convention, self.config.bucket.clone());
        let manifest = builder.build(&root)?;

        let value = serde_json::to_value(&manifest).context("Failed to serialize manifest")?;
        let report = validate_manifest(&value, check_counts);
        Self::log_report(&report);
        if !report.passed {
            return Err(anyhow!("Manifest validation failed for {}; nothing written", scripture));
        }

        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.join(manifest.file_name()));
        write_manifest(&manifest, &output)?;
        info!("Total: {} sections, {} chapters", manifest.sections.len(), manifest.total_chapters);
        Ok(manifest)
    }

    /// Validate a manifest file already on disk
    pub async fn validate(&self, manifest_path: &Path) -> Result<ValidationReport> {
        Self::require_file(manifest_path)?;
        let content = FileManager::read_to_string(manifest_path)?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", manifest_path.display()))?;
        let report = validate_manifest(&value, true);
        Self::log_report(&report);
        if !report.passed {
            return Err(anyhow!("Manifest {} is invalid", manifest_path.display()));
        }
        Ok(report)
    }

    fn log_report(report: &ValidationReport) {
        for line in &report.diagnostics {
            warn!("{}", line);
        }
        if report.passed {
            info!("Manifest valid: {} chapters with metadata, {} without",
                report.with_metadata, report.without_metadata);
        }
    }

    /// Build the search dictionary from chapter metadata and write it
    pub async fn dictionary(&self, roots: &[PathBuf], output: &Path, existing: Option<&Path>) -> Result<Dictionary> {
        let mut resolved = Vec::with_capacity(roots.len());
        for root in roots {
            let path = self.config.resolve_library_path(root);
            if FileManager::dir_exists(&path) {
                resolved.push(path);
            } else {
                warn!("Scripture directory not found: {}", path.display());
            }
        }
        if resolved.is_empty() {
            return Err(anyhow!("None of the given scripture directories exist"));
        }

        let dictionary = dictionary::build_dictionary(&resolved, existing)?;
        FileManager::write_json_pretty(output, &dictionary)?;
        info!("Dictionary with {} terms ({} curated, {} generated) written to {}",
            dictionary.metadata.total_terms, dictionary.metadata.manual_terms,
            dictionary.metadata.auto_generated_terms, output.display());
        Ok(dictionary)
    }

    /// Split a verse-referenced text into sarga files
    pub async fn chapterize(&self, input: &Path, output_dir: &Path) -> Result<ChapterizeSummary> {
        Self::require_file(input)?;
        FileManager::ensure_dir(output_dir)?;
        let summary = chapterize::chapterize_file(input, output_dir)?;
        info!("Chapterize completed: {} kandas, {} sargas, {} written, {} errors",
            summary.kandas, summary.chapters, summary.written, summary.failed);
        Ok(summary)
    }

    /// Find the sarga page ranges of an English PDF translation and write the range report
    pub async fn chapterize_pdf(&self, input: &Path, output_dir: &Path) -> Result<Vec<SargaPageRange>> {
        Self::require_file(input)?;
        FileManager::ensure_dir(output_dir)?;
        let ranges = chapterize::chapterize_pdf(input, output_dir)?;
        info!("Chapterize completed: {} sargas located in {}", ranges.len(), input.display());
        Ok(ranges)
    }

    /// Print the pattern table: summary, strategies, edge cases, top patterns, templates
    pub async fn profiles(&self, table: Option<&Path>) -> Result<()> {
        let table = self.load_lookup_table(table)?;

        if let Some(summary) = table.summary() {
            println!("Corpus: {} scriptures, {} files, {} patterns, {} edge cases",
                summary.total_scriptures, summary.total_files, summary.total_patterns, summary.edge_cases);
            if !summary.generated_at.is_empty() {
                println!("Generated: {}", summary.generated_at);
            }
            println!();
        }

        println!("Scriptures:");
        for name in table.scripture_names() {
            let files = table.profile(name).map(|p| p.file_count).unwrap_or_default();
            println!("  {:<40} {:<9} {} files", name, table.strategy_for(name), files);
        }

        if !table.edge_cases().is_empty() {
            println!("\nEdge cases:");
            for case in table.edge_cases() {
                println!("  {}: {}", case.scripture, case.reason);
            }
        }

        let ranked = table.pattern_frequency_ranked(20);
        if !ranked.is_empty() {
            println!("\nTop patterns:");
            for (pattern, count) in ranked {
                println!("  {:>8}  {}", count, pattern);
            }
        }

        if !table.templates().is_empty() {
            println!("\nTemplates:");
            for (strategy, template) in table.templates() {
                println!("  {}: {}", strategy, template.description);
                for regex in &template.regex {
                    println!("    {}", regex);
                }
            }
        }

        Ok(())
    }

    fn progress_bar(len: u64, unit: &str) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let template_result = ProgressStyle::default_bar()
            .template(&format!("{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}", unit))
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    // Format duration in a human-readable format (HH:MM:SS)
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
