//! Index configuration
//!
//! Values are resolved with priority: environment variables > config file >
//! defaults. The config file lives in the per-user app data directory:
//! ~/Library/Application Support/wsindex/config.toml (macOS),
//! %LOCALAPPDATA%/wsindex/config.toml (Windows) or
//! ~/.local/share/wsindex/config.toml (Linux).

use crate::query::SearchOptions;
use crate::utils::app_data::get_config_path;
use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Files larger than this are never indexed
pub const DEFAULT_MAX_FILE_SIZE: u64 = 500_000;

/// Stored line text is cut to this many characters
pub const DEFAULT_MAX_LINE_CHARS: usize = 300;

/// Files per published batch
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Results returned per query
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Results contributed by a single file before it is abandoned
pub const DEFAULT_PER_FILE_CAP: usize = 500;

/// Configuration file format (TOML)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub index: IndexConfigFile,
}

/// `[index]` section of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexConfigFile {
    pub max_file_size: Option<u64>,
    pub max_line_chars: Option<usize>,
    pub batch_size: Option<usize>,
    pub max_results: Option<usize>,
    pub per_file_cap: Option<usize>,
    pub extra_skip_dirs: Option<Vec<String>>,
    pub extra_skip_globs: Option<Vec<String>>,
}

/// Configuration for indexing and querying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    pub max_file_size: u64,
    pub max_line_chars: usize,
    pub batch_size: usize,
    pub max_results: usize,
    pub per_file_cap: usize,
    /// Directory names skipped in addition to the built-in table
    pub extra_skip_dirs: Vec<String>,
    /// File-name globs skipped in addition to the built-in tables
    pub extra_skip_globs: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_line_chars: DEFAULT_MAX_LINE_CHARS,
            batch_size: DEFAULT_BATCH_SIZE,
            max_results: DEFAULT_MAX_RESULTS,
            per_file_cap: DEFAULT_PER_FILE_CAP,
            extra_skip_dirs: Vec::new(),
            extra_skip_globs: Vec::new(),
        }
    }
}

impl IndexConfig {
    /// Load config with priority: environment variables > config file > defaults.
    ///
    /// A missing or unreadable config file falls back to defaults.
    pub fn load() -> Self {
        let mut config = Self::default();

        match get_config_path() {
            Ok(path) if path.exists() => match Self::read_file(&path) {
                Ok(file) => config.apply_file(file),
                Err(e) => warn!("ignoring {}: {:#}", path.display(), e),
            },
            Ok(_) => {}
            Err(e) => warn!("no config directory: {:#}", e),
        }

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load defaults overlaid with one specific config file (no env overrides).
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.apply_file(Self::read_file(path)?);
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn apply_file(&mut self, file: ConfigFile) {
        let section = file.index;
        if let Some(v) = section.max_file_size {
            self.max_file_size = v;
        }
        if let Some(v) = section.max_line_chars {
            self.max_line_chars = v;
        }
        if let Some(v) = section.batch_size {
            self.batch_size = v;
        }
        if let Some(v) = section.max_results {
            self.max_results = v;
        }
        if let Some(v) = section.per_file_cap {
            self.per_file_cap = v;
        }
        if let Some(v) = section.extra_skip_dirs {
            self.extra_skip_dirs = v;
        }
        if let Some(v) = section.extra_skip_globs {
            self.extra_skip_globs = v;
        }
    }

    /// Apply `WSINDEX_*` overrides from `lookup`. Unparseable values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(v) = parse("WSINDEX_MAX_FILE_SIZE") {
            self.max_file_size = v;
        }
        if let Some(v) = parse("WSINDEX_MAX_LINE_CHARS") {
            self.max_line_chars = v as usize;
        }
        if let Some(v) = parse("WSINDEX_BATCH_SIZE") {
            self.batch_size = v as usize;
        }
        if let Some(v) = parse("WSINDEX_MAX_RESULTS") {
            self.max_results = v as usize;
        }
        if let Some(v) = parse("WSINDEX_PER_FILE_CAP") {
            self.per_file_cap = v as usize;
        }
    }

    /// Batch size, never zero.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_results: self.max_results,
            per_file_cap: self.per_file_cap,
        }
    }
}
