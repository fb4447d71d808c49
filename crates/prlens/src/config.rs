//! Project configuration file support for prlens.
//!
//! Loads configuration from `prlens.toml` in the working directory, falling
//! back to `<config_dir>/prlens/config.toml`.

use anyhow::{Context, Result};
use prlens_git::{DEFAULT_MAX_DIFF_BYTES, DEFAULT_SIMILARITY_THRESHOLD};
use prlens_logging::LogFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The config file name
pub const CONFIG_FILE_NAME: &str = "prlens.toml";

/// Default templates directory, relative to the working directory
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Project-level configuration loaded from `prlens.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Repository analyzed when a call does not name one
    pub repo_path: Option<PathBuf>,
    /// Directory holding the `.md` PR templates
    pub templates_dir: Option<PathBuf>,
    /// Rename/copy similarity threshold in percent
    pub similarity_threshold: Option<u16>,
    /// Cap on diff text per change set; 0 disables the cap
    pub max_diff_bytes: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. `info` or `prlens_git=debug`
    pub level: Option<String>,
    pub format: Option<LogFormat>,
    /// Append JSON lines tool events to this file
    pub file: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load configuration for the working directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if a config file exists and parses successfully
    /// - `Ok(None)` if neither file exists
    /// - `Err(...)` if a file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let local = working_dir.join(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load_from(&local).map(Some);
        }

        match user_config_path() {
            Some(path) if path.exists() => Self::load_from(&path).map(Some),
            _ => Ok(None),
        }
    }

    /// Parse one config file. Relative paths inside it are resolved against
    /// the file's directory.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let mut config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        if let Some(base) = config_path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        resolve(&mut self.repo_path);
        resolve(&mut self.templates_dir);
        resolve(&mut self.logging.file);
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("prlens").join("config.toml"))
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub repo_path: Option<PathBuf>,
    pub templates_dir: Option<PathBuf>,
    pub log_format: Option<LogFormat>,
    pub log_level: Option<String>,
}

/// Effective startup settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub repo_path: PathBuf,
    pub templates_dir: PathBuf,
    pub similarity_threshold: u16,
    pub max_diff_bytes: Option<usize>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Priority: command line > config file > defaults
    pub fn resolve(config: ProjectConfig, overrides: Overrides, working_dir: &Path) -> Self {
        let max_diff_bytes = match config.max_diff_bytes {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(DEFAULT_MAX_DIFF_BYTES),
        };

        Self {
            repo_path: overrides
                .repo_path
                .or(config.repo_path)
                .unwrap_or_else(|| working_dir.to_path_buf()),
            templates_dir: overrides
                .templates_dir
                .or(config.templates_dir)
                .unwrap_or_else(|| working_dir.join(DEFAULT_TEMPLATES_DIR)),
            similarity_threshold: config
                .similarity_threshold
                .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
            max_diff_bytes,
            log_level: overrides
                .log_level
                .or(config.logging.level)
                .unwrap_or_else(|| "info".to_string()),
            log_format: overrides
                .log_format
                .or(config.logging.format)
                .unwrap_or_default(),
            log_file: config.logging.file,
        }
    }
}
