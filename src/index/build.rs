use crate::config::IndexConfig;
use crate::index::ignore::IgnorePolicy;
use crate::index::loader::FileLoader;
use crate::index::store::IndexStore;
use crate::index::types::{IndexGeneration, IndexedFile};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Counters for one traversal, reported in the log when it ends
#[derive(Debug, Default, Clone, Copy)]
struct BuildCounters {
    dirs: usize,
    unreadable_dirs: usize,
    indexed: usize,
    skipped: usize,
}

/// Walks a directory tree and publishes loaded files into an [`IndexStore`].
///
/// The builder never reports failures: unreadable directories count as empty,
/// unloadable files are skipped, and writes made after the store has moved on
/// to a newer generation are dropped by the store itself.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    store: Arc<IndexStore>,
    loader: FileLoader,
    policy: IgnorePolicy,
    batch_size: usize,
}

impl IndexBuilder {
    pub fn new(store: Arc<IndexStore>, config: &IndexConfig) -> Result<Self> {
        let policy = IgnorePolicy::from_config(config)?;
        Ok(Self::with_policy(store, config, policy))
    }

    pub fn with_policy(store: Arc<IndexStore>, config: &IndexConfig, policy: IgnorePolicy) -> Self {
        Self {
            store,
            loader: FileLoader::from_config(config),
            policy,
            batch_size: config.effective_batch_size(),
        }
    }

    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }

    /// Begin a new generation and run the traversal on a background thread.
    pub fn spawn(&self, root: PathBuf) -> Result<JoinHandle<()>> {
        let generation = self.store.begin_build();
        let builder = self.clone();

        let spawned = thread::Builder::new()
            .name(format!("wsindex-build-{}", generation))
            .spawn(move || builder.run(&root, generation));

        match spawned {
            Ok(handle) => Ok(handle),
            Err(e) => {
                // Nothing will ever finish this generation
                self.store.finish_build(generation);
                Err(e).context("Failed to spawn index builder thread")
            }
        }
    }

    /// Index `root` under `generation`. Stops early once the generation is superseded.
    pub fn run(&self, root: &Path, generation: IndexGeneration) {
        let started = Instant::now();
        info!("indexing {} (generation {})", root.display(), generation);

        let mut counters = BuildCounters::default();
        let mut stack = vec![root.to_path_buf()];
        let mut batch: Vec<IndexedFile> = Vec::with_capacity(self.batch_size);

        while let Some(dir) = stack.pop() {
            if !self.store.is_current(generation) {
                debug!(
                    "generation {} superseded, abandoning {}",
                    generation,
                    root.display()
                );
                return;
            }
            counters.dirs += 1;

            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("cannot list {}: {}", dir.display(), e);
                    counters.unreadable_dirs += 1;
                    continue;
                }
            };

            for entry in entries.flatten() {
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                let name = entry.file_name();
                let name = name.to_string_lossy();
                let path = entry.path();

                if file_type.is_dir() {
                    if !self.policy.skip_directory(&name) {
                        stack.push(path);
                    }
                    continue;
                }

                // Links are followed to files only; linked directories could cycle
                let is_file = file_type.is_file()
                    || (file_type.is_symlink() && fs::metadata(&path).is_ok_and(|m| m.is_file()));
                if !is_file || self.policy.skip_file(&name) {
                    counters.skipped += 1;
                    continue;
                }

                match self.loader.load(&path) {
                    Some(file) => {
                        counters.indexed += 1;
                        batch.push(file);
                        if batch.len() >= self.batch_size {
                            self.flush(generation, &mut batch);
                        }
                    }
                    None => counters.skipped += 1,
                }
            }
        }

        self.flush(generation, &mut batch);
        let finished = self.store.finish_build(generation);

        if finished {
            info!(
                "indexed {} files in {} directories under {} in {:.2?} ({} skipped, {} unreadable dirs)",
                counters.indexed,
                counters.dirs,
                root.display(),
                started.elapsed(),
                counters.skipped,
                counters.unreadable_dirs
            );
        } else {
            debug!("generation {} finished after being superseded", generation);
        }
    }

    fn flush(&self, generation: IndexGeneration, batch: &mut Vec<IndexedFile>) {
        if batch.is_empty() {
            return;
        }
        let files = mem::replace(batch, Vec::with_capacity(self.batch_size));
        let count = files.len();
        if !self.store.publish_batch(generation, files) {
            debug!("dropped stale batch of {} files (generation {})", count, generation);
        }
    }
}
