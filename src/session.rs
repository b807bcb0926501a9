//! Per-project search session
//!
//! A [`Workspace`] owns one [`IndexStore`] and drives the background builder
//! for whichever project root is open. Opening or switching a project
//! invalidates the store first, so results for the previous root disappear
//! immediately and any builder still walking it stops at its next directory.

use crate::config::IndexConfig;
use crate::index::build::IndexBuilder;
use crate::index::stats::IndexStats;
use crate::index::store::{IndexStore, Snapshot};
use crate::index::types::SearchResult;
use crate::query::{search_with, SearchOptions};
use anyhow::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

pub struct Workspace {
    store: Arc<IndexStore>,
    builder: IndexBuilder,
    options: SearchOptions,
    root: Option<PathBuf>,
    worker: Option<JoinHandle<()>>,
}

impl Workspace {
    /// Create a session with nothing open.
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let store = Arc::new(IndexStore::new());
        let builder = IndexBuilder::new(Arc::clone(&store), config)?;
        Ok(Self {
            store,
            builder,
            options: config.search_options(),
            root: None,
            worker: None,
        })
    }

    /// Open (or switch to) a project root and start indexing it in the background.
    pub fn open(&mut self, root: impl AsRef<Path>) -> Result<()> {
        let root = root.as_ref();
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

        self.store.invalidate();
        // A previous builder is left to notice the generation change on its own
        if let Some(previous) = self.worker.take() {
            if !previous.is_finished() {
                debug!("detaching superseded builder");
            }
        }

        self.worker = Some(self.builder.spawn(root.clone())?);
        self.root = Some(root);
        Ok(())
    }

    /// Drop the index and forget the open root.
    pub fn close(&mut self) {
        self.store.invalidate();
        self.worker = None;
        self.root = None;
    }

    /// Block until the current builder has finished.
    pub fn wait(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("index builder panicked");
            }
        }
    }

    /// Search the current snapshot with the configured limits.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        search_with(query, &self.snapshot(), &self.options)
    }

    /// Search with an explicit result cap.
    pub fn search_limit(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let options = SearchOptions {
            max_results,
            ..self.options
        };
        search_with(query, &self.snapshot(), &options)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn is_indexing(&self) -> bool {
        self.store.is_indexing()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats::collect(&self.store)
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        // Lets a running builder stop at its next directory
        self.store.invalidate();
    }
}
