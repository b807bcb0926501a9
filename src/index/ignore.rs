//! Which directories and files the builder never looks at.
//!
//! The fixed tables cover VCS metadata, dependency and build output folders,
//! editor caches and known binary formats. They are exhaustive rather than
//! heuristic: a file that is not listed here is attempted as text and only
//! dropped if it fails to decode.

use crate::config::IndexConfig;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

const SKIP_DIRS: &[&str] = &[
    "node_modules", ".git", ".svn", ".hg", ".DS_Store",
    "build", "Build", "DerivedData", ".build",
    "Pods", ".cocoapods", "Carthage",
    ".gradle", ".idea", ".vscode",
    "target", "dist", "out", ".output",
    "__pycache__", ".pytest_cache", ".mypy_cache",
    ".next", ".nuxt", ".vercel",
    "vendor", "bower_components",
    ".cache", ".parcel-cache", ".turbo",
    "coverage", ".nyc_output", "xcuserdata",
];

/// OS marker files
const SKIP_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "svg",
    "mp4", "mov", "avi", "mp3", "wav", "flac",
    "zip", "tar", "gz", "rar", "7z",
    "exe", "dll", "so", "dylib", "o", "a",
    "ttf", "otf", "woff", "woff2",
    "pdf", "psd", "db", "sqlite", "sqlite3",
];

/// True for directory names that are never descended into.
pub fn should_skip_directory(name: &str) -> bool {
    SKIP_DIRS.contains(&name)
}

/// True for OS marker files and known binary extensions (case-insensitive).
pub fn should_skip_file(name: &str, extension: &str) -> bool {
    SKIP_FILES.contains(&name)
        || BINARY_EXTENSIONS
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Extension of a file name as the skip tables see it (`""` when there is none).
pub fn extension_of(name: &str) -> &str {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
}

/// The fixed tables plus any extra names and globs from configuration.
#[derive(Debug, Clone, Default)]
pub struct IgnorePolicy {
    extra_dirs: Vec<String>,
    extra_files: Option<GlobSet>,
}

impl IgnorePolicy {
    /// Policy with only the built-in tables.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        let extra_files = if config.extra_skip_globs.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in &config.extra_skip_globs {
                let glob = Glob::new(pattern)
                    .with_context(|| format!("Invalid skip glob: {}", pattern))?;
                builder.add(glob);
            }
            Some(builder.build().context("Failed to compile skip globs")?)
        };

        Ok(Self {
            extra_dirs: config.extra_skip_dirs.clone(),
            extra_files,
        })
    }

    pub fn skip_directory(&self, name: &str) -> bool {
        should_skip_directory(name) || self.extra_dirs.iter().any(|d| d == name)
    }

    pub fn skip_file(&self, name: &str) -> bool {
        if should_skip_file(name, extension_of(name)) {
            return true;
        }
        self.extra_files
            .as_ref()
            .map(|set| set.is_match(name))
            .unwrap_or(false)
    }
}
