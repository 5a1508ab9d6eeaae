use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use dashmap::DashMap;

use crate::links::Menu;

/// Built menus keyed by path, invalidated by mtime.
pub struct MenuCache {
    entries: DashMap<PathBuf, (SystemTime, Arc<Menu>)>,
}

impl Default for MenuCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Cached menu for `path` if it was built at `mtime`, else build, store
    /// and return it. Failures are not cached.
    pub fn get_or_compute<E>(
        &self,
        path: &Path,
        mtime: SystemTime,
        compute: impl FnOnce() -> Result<Menu, E>,
    ) -> Result<Arc<Menu>, E> {
        if let Some(entry) = self.entries.get(path) {
            if entry.0 == mtime {
                tracing::debug!(path = %path.display(), "menu cache hit");
                return Ok(Arc::clone(&entry.1));
            }
        }

        let menu = Arc::new(compute()?);
        self.entries
            .insert(path.to_path_buf(), (mtime, Arc::clone(&menu)));
        Ok(menu)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
