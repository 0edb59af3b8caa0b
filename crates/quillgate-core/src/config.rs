//! Configuration loading and discovery.
//!
//! Configuration is merged from, lowest precedence first:
//! 1. Built-in defaults (see the `DEFAULT_*` constants)
//! 2. User config from the XDG config directory
//! 3. Project config found by walking up from the current directory
//! 4. Explicit files (e.g. `--config`)
//! 5. `QUILLGATE_*` environment variables
//!
//! # Supported formats
//!
//! TOML (`.toml`), YAML (`.yaml`, `.yml`) and JSON (`.json`).
//!
//! # Config file locations (in order of precedence, highest first):
//! - `quillgate.<ext>` in current directory or any parent
//! - `.quillgate.<ext>` in current directory or any parent
//! - `~/.config/quillgate/config.<ext>` (user config)
//!
//! When multiple files exist in the same directory, all are merged via figment.
//! Later extensions override earlier: toml < yaml < yml < json.
//!
//! Nested keys can be set from the environment with a double underscore,
//! e.g. `QUILLGATE_SCORING__PASS_SCORE=80`.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use quillgate_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("pass bar: {}", config.scoring.pass_score);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Content shorter than this many characters fails the length check.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 200;
/// Fewer blank-line separated segments than this fails the paragraph check.
pub const DEFAULT_MIN_PARAGRAPHS: usize = 3;
/// Any word above this density fails the keyword check.
pub const DEFAULT_KEYWORD_OVERUSE_DENSITY: f64 = 0.03;
/// Words at or below this density are left out of the keyword report.
pub const DEFAULT_KEYWORD_REPORT_MIN_DENSITY: f64 = 0.01;
/// Maximum number of words in the keyword report.
pub const DEFAULT_KEYWORD_REPORT_LIMIT: usize = 10;
/// Average sentence length above this many words is "too long".
pub const DEFAULT_MAX_AVG_SENTENCE_WORDS: f64 = 25.0;
/// Average sentence length below this many words is "too short".
pub const DEFAULT_MIN_AVG_SENTENCE_WORDS: f64 = 10.0;
/// Relative deviation from the average a sentence needs to count as variety.
pub const DEFAULT_VARIETY_TOLERANCE: f64 = 0.5;
/// Polarity magnitude separating Positive/Negative from Neutral.
pub const DEFAULT_SENTIMENT_THRESHOLD: f64 = 0.05;
/// The readability score is divided by this before it is added.
pub const DEFAULT_READABILITY_DIVISOR: f64 = 5.0;
/// Upper bound on the readability contribution.
pub const DEFAULT_READABILITY_CAP: f64 = 20.0;
/// Scores below this trigger a revision.
pub const DEFAULT_PASS_SCORE: f64 = 70.0;
/// Language assumed when none is given.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Thresholds used by the scoring engine.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum content length in characters.
    pub min_content_chars: usize,
    /// Minimum number of paragraphs.
    pub min_paragraphs: usize,
    /// Density above which a keyword counts as overused.
    pub keyword_overuse_density: f64,
    /// Density a keyword must exceed to be reported.
    pub keyword_report_min_density: f64,
    /// Maximum number of reported keywords.
    pub keyword_report_limit: usize,
    /// Maximum acceptable average sentence length in words.
    pub max_avg_sentence_words: f64,
    /// Minimum acceptable average sentence length in words.
    pub min_avg_sentence_words: f64,
    /// Relative deviation that counts as sentence-length variety.
    pub variety_tolerance: f64,
    /// Sentiment polarity threshold.
    pub sentiment_threshold: f64,
    /// Divisor applied to the readability score.
    pub readability_divisor: f64,
    /// Cap on the readability contribution.
    pub readability_cap: f64,
    /// Score needed to pass without revision.
    pub pass_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            min_paragraphs: DEFAULT_MIN_PARAGRAPHS,
            keyword_overuse_density: DEFAULT_KEYWORD_OVERUSE_DENSITY,
            keyword_report_min_density: DEFAULT_KEYWORD_REPORT_MIN_DENSITY,
            keyword_report_limit: DEFAULT_KEYWORD_REPORT_LIMIT,
            max_avg_sentence_words: DEFAULT_MAX_AVG_SENTENCE_WORDS,
            min_avg_sentence_words: DEFAULT_MIN_AVG_SENTENCE_WORDS,
            variety_tolerance: DEFAULT_VARIETY_TOLERANCE,
            sentiment_threshold: DEFAULT_SENTIMENT_THRESHOLD,
            readability_divisor: DEFAULT_READABILITY_DIVISOR,
            readability_cap: DEFAULT_READABILITY_CAP,
            pass_score: DEFAULT_PASS_SCORE,
        }
    }
}

/// The configuration for quillgate.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files. File logging is off when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Language hint passed to the scorer (defaults to "en").
    pub language: Option<String>,
    /// Maximum input size in bytes (default: 5 MiB).
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    ///
    /// When `true`, `max_input_bytes` is ignored and no size check is performed.
    pub disable_input_limit: bool,
    /// Shell command used by `revise` to generate content.
    ///
    /// The command receives the prompt on stdin and must print the content.
    pub generator: Option<String>,
    /// Scoring thresholds.
    pub scoring: ScoringConfig,
}

impl Config {
    /// Language hint, falling back to [`DEFAULT_LANGUAGE`].
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Effective input size limit, `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(
                self.max_input_bytes
                    .unwrap_or(crate::DEFAULT_MAX_INPUT_BYTES),
            )
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "quillgate";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "QUILLGATE_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/quillgate/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set a boundary marker to stop directory traversal. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load. Later files take precedence.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // QUILLGATE_LOG_LEVEL=debug, QUILLGATE_SCORING__PASS_SCORE=80, etc.
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(
            log_level = config.log_level.as_str(),
            pass_score = config.scoring.pass_score,
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Only the closest directory with any match contributes. Dotfiles come
    /// before regular files so the regular file wins on conflicts.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();

            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    found.push(dotfile);
                }
            }
            for ext in CONFIG_EXTENSIONS {
                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    found.push(regular);
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config next to the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Get the user config directory path.
///
/// Returns `~/.config/quillgate/` on Linux, `~/Library/Application Support/quillgate/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path.to_path_buf()).unwrap()
    }

    #[test]
    fn default_config_uses_named_constants() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.language(), "en");
        assert_eq!(config.scoring.min_content_chars, DEFAULT_MIN_CONTENT_CHARS);
        assert_eq!(config.scoring.pass_score, DEFAULT_PASS_SCORE);
        assert_eq!(config.input_limit(), Some(crate::DEFAULT_MAX_INPUT_BYTES));
    }

    #[test]
    fn loader_builds_with_defaults() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load()
            .unwrap();
        assert_eq!(config.scoring, ScoringConfig::default());
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn nested_scoring_table_overrides_defaults() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "log_level = \"debug\"\n\n[scoring]\npass_score = 80.0\nmin_paragraphs = 5\n",
        )
        .unwrap();

        let (config, _) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&path))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.scoring.pass_score, 80.0);
        assert_eq!(config.scoring.min_paragraphs, 5);
        // untouched keys keep their defaults
        assert_eq!(config.scoring.min_content_chars, DEFAULT_MIN_CONTENT_CHARS);
    }

    #[test]
    fn later_file_overrides_earlier() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base.toml");
        fs::write(&base, r#"log_level = "warn""#).unwrap();
        let over = tmp.path().join("override.yaml");
        fs::write(&over, "log_level: error\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&base))
            .with_file(utf8(&over))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert!(sources.primary_file().unwrap().as_str().ends_with("override.yaml"));
    }

    #[test]
    fn project_config_discovered_from_subdirectory() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("project");
        let deep = project.join("posts").join("drafts");
        fs::create_dir_all(&deep).unwrap();
        fs::write(project.join(".quillgate.toml"), "language = \"de\"\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(&deep))
            .load()
            .unwrap();

        assert_eq!(config.language(), "de");
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn boundary_marker_stops_search() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        let work = child.join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(parent.join(".quillgate.toml"), r#"log_level = "warn""#).unwrap();
        fs::create_dir(child.join(".git")).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(utf8(&work))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn regular_file_beats_dotfile() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".quillgate.toml"), r#"log_level = "debug""#).unwrap();
        fs::write(tmp.path().join("quillgate.toml"), r#"log_level = "error""#).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(tmp.path()))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(sources.project_files.len(), 2);
    }

    #[test]
    fn load_or_error_fails_when_no_config() {
        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load_or_error();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn invalid_value_is_reported() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[scoring]\npass_score = \"high\"\n").unwrap();

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&path))
            .load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn disable_input_limit_removes_limit() {
        let config = Config {
            max_input_bytes: Some(1024),
            disable_input_limit: true,
            ..Config::default()
        };
        assert_eq!(config.input_limit(), None);
    }

    #[test]
    fn scoring_deserializes_from_yaml() {
        let yaml = "scoring:\n  keyword_overuse_density: 0.05\n  pass_score: 60\ngenerator: \"ollama run llama3\"\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.scoring.keyword_overuse_density, 0.05);
        assert_eq!(config.scoring.pass_score, 60.0);
        assert_eq!(config.generator.as_deref(), Some("ollama run llama3"));
    }

    #[test]
    #[allow(unsafe_code)]
    fn env_var_overrides_nested_scoring_key() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: Test environment; mutex serializes env access across tests.
        unsafe {
            std::env::set_var("QUILLGATE_SCORING__PASS_SCORE", "85");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("QUILLGATE_SCORING__PASS_SCORE");
        }

        let (config, _) = result.unwrap();
        assert_eq!(config.scoring.pass_score, 85.0);
    }
}
