/*!
 * Tests for application configuration functionality
 */

use std::path::{Path, PathBuf};

use anyhow::Result;
use gurukul::app_config::{Config, GenerationProvider, LogLevel};
use gurukul::errors::ConfigError;
use gurukul::manifest::builtin_conventions;
use crate::common;

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.library_root, PathBuf::from("."));
    assert_eq!(config.bucket, "gs://mygurukul-sacred-texts-corpus");
    assert_eq!(config.lookup_table_path, PathBuf::from("verse-pattern-lookup-table.json"));
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.conventions.is_empty());

    assert_eq!(config.generation.provider, GenerationProvider::Gemini);
    assert_eq!(config.generation.model, "gemini-2.5-pro");
    assert_eq!(config.generation.api_key_env, "GOOGLE_API_KEY");
    assert_eq!(config.generation.timeout_secs, 300);
    assert_eq!(config.generation.rate_limit_delay_ms, 3000);
    assert!(config.generation.requires_api_key());
    assert!(config.validate().is_ok());
}

/// Test that a partial config file is completed with defaults
#[test]
fn test_configDeserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(r#"{
        "bucket": "gs://other",
        "log_level": "debug",
        "generation": { "provider": "mock", "rate_limit_delay_ms": 0 }
    }"#)?;

    assert_eq!(config.bucket, "gs://other");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(config.generation.provider, GenerationProvider::Mock);
    assert_eq!(config.generation.rate_limit_delay_ms, 0);
    assert_eq!(config.generation.model, "gemini-2.5-pro");
    assert!(!config.generation.requires_api_key());
    Ok(())
}

/// Test validation of required values and user conventions
#[test]
fn test_configValidate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.bucket = "  ".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = Config::default();
    config.generation.model = String::new();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = Config::default();
    let mut spec = builtin_conventions().remove(0);
    spec.scripture_id = "broken".to_string();
    spec.chapter_patterns = vec!["Chapter_(\\d+".to_string()];
    config.conventions.push(spec);
    assert!(matches!(config.validate(), Err(ConfigError::InvalidPattern { .. })));
}

/// Test that a missing config file is created with defaults and can be read back
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created.bucket, Config::default().bucket);

    let mut changed = created.clone();
    changed.generation.provider = GenerationProvider::Mock;
    changed.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.generation.provider, GenerationProvider::Mock);
    Ok(())
}

/// Test that a malformed config file is an error, not a silent default
#[test]
fn test_loadOrCreate_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ \"bucket\": ")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test that relative command-line paths resolve against the library root
#[test]
fn test_resolveLibraryPath_shouldJoinRelativeMissingPaths() {
    let config = Config {
        library_root: PathBuf::from("/srv/library"),
        ..Default::default()
    };

    assert_eq!(
        config.resolve_library_path(Path::new("Gurukul_Library/Epics")),
        PathBuf::from("/srv/library/Gurukul_Library/Epics")
    );
    assert_eq!(config.resolve_library_path(Path::new("/abs/path")), PathBuf::from("/abs/path"));
}

/// Test provider names in both directions
#[test]
fn test_generationProvider_displayAndParse_shouldAgree() -> Result<()> {
    for provider in [GenerationProvider::Gemini, GenerationProvider::Mock] {
        assert_eq!(provider.to_string().parse::<GenerationProvider>()?, provider);
    }
    assert_eq!(GenerationProvider::Gemini.display_name(), "Gemini");
    Ok(())
}
