//! Shared, lock-protected set of indexed files.
//!
//! The store is the only state shared between the background builder and
//! readers. Every write carries the generation token it was started under and
//! is dropped if a newer generation has begun since; the check and the append
//! happen under the same lock, so a superseded batch can never become visible.

use crate::index::types::{IndexGeneration, IndexedFile};
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Point-in-time view of the indexed files.
///
/// Cloning is cheap. Later publishes never change a snapshot already handed
/// out: the store copies its file list on write while any snapshot shares it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    files: Arc<Vec<Arc<IndexedFile>>>,
    generation: IndexGeneration,
}

impl Snapshot {
    /// Generation the snapshot was taken in.
    pub fn generation(&self) -> IndexGeneration {
        self.generation
    }

    pub fn files(&self) -> &[Arc<IndexedFile>] {
        &self.files
    }
}

impl Deref for Snapshot {
    type Target = [Arc<IndexedFile>];

    fn deref(&self) -> &Self::Target {
        &self.files
    }
}

#[derive(Debug, Default)]
struct IndexState {
    files: Arc<Vec<Arc<IndexedFile>>>,
    generation: IndexGeneration,
    is_building: bool,
}

/// The index store. Share it between threads with `Arc`.
#[derive(Debug, Default)]
pub struct IndexStore {
    state: Mutex<IndexState>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexState> {
        // Every mutation is a single assignment or append, so the state is
        // consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop all files and supersede any running build.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.files = Arc::default();
        state.is_building = false;
    }

    /// Start a new build, returning the token its writes must carry.
    pub fn begin_build(&self) -> IndexGeneration {
        let mut state = self.lock();
        state.generation += 1;
        state.files = Arc::default();
        state.is_building = true;
        state.generation
    }

    /// Append a batch if `generation` is still current. Returns whether it was kept.
    pub fn publish_batch(&self, generation: IndexGeneration, batch: Vec<IndexedFile>) -> bool {
        if batch.is_empty() {
            return self.is_current(generation);
        }
        let batch: Vec<Arc<IndexedFile>> = batch.into_iter().map(Arc::new).collect();

        let mut state = self.lock();
        if state.generation != generation {
            return false;
        }
        Arc::make_mut(&mut state.files).extend(batch);
        true
    }

    /// Mark the build finished if `generation` is still current.
    pub fn finish_build(&self, generation: IndexGeneration) -> bool {
        let mut state = self.lock();
        if state.generation != generation {
            return false;
        }
        state.is_building = false;
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            files: Arc::clone(&state.files),
            generation: state.generation,
        }
    }

    /// Advisory flag for status displays.
    pub fn is_indexing(&self) -> bool {
        self.lock().is_building
    }

    /// Something is searchable, or nothing more is coming.
    pub fn is_ready(&self) -> bool {
        let state = self.lock();
        !state.files.is_empty() || !state.is_building
    }

    pub fn generation(&self) -> IndexGeneration {
        self.lock().generation
    }

    pub fn is_current(&self, generation: IndexGeneration) -> bool {
        self.lock().generation == generation
    }

    pub fn len(&self) -> usize {
        self.lock().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
