use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// Files with in-memory changes not yet written to disk.
///
/// Relies on every mutator calling [`DirtyTracker::mark_dirty`]; no content hashing is done.
#[derive(Debug, Default, Clone)]
pub struct DirtyTracker {
    paths: IndexSet<PathBuf>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self, path: &Path) {
        if self.paths.insert(path.to_path_buf()) {
            tracing::debug!("{path:?} marked dirty");
        }
    }

    /// Call only after the file was written successfully.
    pub fn mark_clean(&mut self, path: &Path) {
        if self.paths.shift_remove(path) {
            tracing::debug!("{path:?} marked clean");
        }
    }

    pub fn is_dirty(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn dirty_count(&self) -> usize {
        self.paths.len()
    }

    /// Dirty paths in the order they were first modified.
    pub fn all_dirty(&self) -> Vec<PathBuf> {
        self.paths.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}
