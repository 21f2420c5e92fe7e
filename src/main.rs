// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use gurukul::app_config::{self, Config, GenerationProvider};
use gurukul::app_controller::{Controller, MetadataRequest, StrategyChoice};
use gurukul::segmentation::{text_source, Strategy};

/// CLI Wrapper for GenerationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Gemini,
    Mock,
}

impl From<CliProvider> for GenerationProvider {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Gemini => GenerationProvider::Gemini,
            CliProvider::Mock => GenerationProvider::Mock,
        }
    }
}

/// CLI Wrapper for Strategy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliStrategy {
    Standard,
    Complex,
}

impl From<CliStrategy> for Strategy {
    fn from(cli_strategy: CliStrategy) -> Self {
        match cli_strategy {
            CliStrategy::Standard => Strategy::Standard,
            CliStrategy::Complex => Strategy::Complex,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a source text into verse records ({stem}.verses.json)
    Segment {
        /// PDF or text file to segment
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Scripture name, looked up in the pattern table
        #[arg(short, long, conflicts_with = "strategy")]
        scripture: Option<String>,

        /// Strategy to use instead of a table lookup
        #[arg(long, value_enum)]
        strategy: Option<CliStrategy>,

        /// Output directory (defaults to the input's folder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Extract one chapter's text (chapter_{n}_text.txt)
    Isolate {
        /// PDF or text file holding the whole book
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Chapter number
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        chapter: u32,

        /// Try the OCR marker variants in order
        #[arg(long)]
        ocr: bool,

        /// Output directory (defaults to the input's folder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Generate chapter metadata JSON next to every chapter PDF
    Metadata {
        /// Scripture folder holding the chapter PDFs
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Built-in profile id (prompt, title fallback, folder walk)
        #[arg(short, long)]
        scripture: Option<String>,

        /// Collect every PDF below ROOT
        #[arg(short, long)]
        recursive: bool,

        /// Instruction file replacing the built-in prompt
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// List what would be processed without calling the model
        #[arg(long)]
        dry_run: bool,

        /// Provider to use
        #[arg(short, long, value_enum)]
        provider: Option<CliProvider>,

        /// Model name to use
        #[arg(short, long)]
        model: Option<String>,

        /// Regenerate metadata that already exists
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Build {scriptureId}_chapter_manifest.json for a scripture folder
    Manifest {
        /// Scripture folder
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Naming convention id
        #[arg(short, long)]
        scripture: String,

        /// Output file (defaults to ROOT/{scriptureId}_chapter_manifest.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the per-section chapter count check
        #[arg(long)]
        no_count_check: bool,
    },

    /// Check a manifest file
    Validate {
        #[arg(value_name = "MANIFEST_JSON")]
        manifest: PathBuf,
    },

    /// Build the search dictionary from chapter metadata
    Dictionary {
        /// Scripture folders to scan
        #[arg(value_name = "ROOT", required = true)]
        roots: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Curated dictionary to merge (its entries win)
        #[arg(short, long)]
        existing: Option<PathBuf>,
    },

    /// Split a Ramayana source into sargas (text files, or page ranges for a PDF)
    Chapterize {
        /// Verse-referenced text, or an English PDF whose sarga page ranges are reported
        #[arg(value_name = "SOURCE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the verse pattern table
    Profiles {
        /// Table file (defaults to the configured one)
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// Generate shell completions for gurukul
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Gurukul - scripture library tooling
///
/// Segments source texts, isolates chapters, generates chapter metadata with Gemini
/// and builds the chapter manifests of the Gurukul library.
#[derive(Parser, Debug)]
#[command(name = "gurukul")]
#[command(author = "Gurukul Team")]
#[command(version)]
#[command(about = "Scripture library tooling: segmentation, metadata and manifests")]
#[command(long_about = "Gurukul prepares the scripture library: it segments source texts, isolates chapters,
generates per-chapter metadata with a generative model and builds chapter manifests.

EXAMPLES:
    gurukul segment gita.txt --scripture Bhagavad_Gita     # Strategy from the pattern table
    gurukul isolate book.pdf --chapter 5 --ocr             # Extract chapter 5
    gurukul metadata Gurukul_Library/Yoga_Sutra -s yoga_sutra
    gurukul metadata Gurukul_Library/Arthashastra --dry-run
    gurukul manifest Gurukul_Library/Kamasutra -s kamasutra
    gurukul validate kamasutra_chapter_manifest.json
    gurukul dictionary Gurukul_Library/Caraka_Samhita -o dictionary.json
    gurukul completions bash > gurukul.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

ENVIRONMENT:
    GOOGLE_API_KEY  - Gemini API key (variable name configurable), required by `metadata`")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        let initial = logger.level;
        log::set_boxed_logger(logger)?;
        log::set_max_level(initial);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "gurukul", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    // Load or create configuration
    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Commands::Metadata { provider, model, .. } = &cli.command {
        if let Some(provider) = provider {
            config.generation.provider = provider.clone().into();
        }
        if let Some(model) = model {
            config.generation.model = model.clone();
        }
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    run_command(&controller, cli.command).await
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Segment { input, scripture, strategy, output, force_overwrite } => {
            let choice = match (scripture, strategy) {
                (Some(name), _) => StrategyChoice::Scripture(name),
                (None, Some(strategy)) => StrategyChoice::Fixed(strategy.into()),
                (None, None) => StrategyChoice::Fixed(Strategy::Standard),
            };
            controller.segment(&input, choice, output.as_deref(), force_overwrite).await?;
        }
        Commands::Isolate { input, chapter, ocr, output, force_overwrite } => {
            controller.isolate(&input, chapter, ocr, output.as_deref(), force_overwrite).await?;
        }
        Commands::Metadata { root, scripture, recursive, prompt_file, dry_run, force_overwrite, .. } => {
            let request = MetadataRequest {
                root,
                scripture,
                recursive,
                prompt_file,
                dry_run,
                force: force_overwrite,
            };
            controller.metadata(request).await?;
        }
        Commands::Manifest { root, scripture, output, no_count_check } => {
            controller.manifest(&root, &scripture, output.as_deref(), !no_count_check).await?;
        }
        Commands::Validate { manifest } => {
            controller.validate(&manifest).await?;
        }
        Commands::Dictionary { roots, output, existing } => {
            controller.dictionary(&roots, &output, existing.as_deref()).await?;
        }
        Commands::Chapterize { input, output } => {
            if text_source::is_pdf(&input) {
                controller.chapterize_pdf(&input, &output).await?;
            } else {
                controller.chapterize(&input, &output).await?;
            }
        }
        Commands::Profiles { table } => {
            controller.profiles(table.as_deref()).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
