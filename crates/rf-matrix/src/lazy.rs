//! Out-of-core support: deferred loading and the process-wide release mode.
//!
//! The mode is a single process-wide flag. It is only changed through
//! [`OutOfCoreGuard`], which restores the previous value when dropped.
//! Changing it while another thread is saving matrices is not supported: the
//! caller must sequence mode changes and exports.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

static OUT_OF_CORE: AtomicBool = AtomicBool::new(false);

/// Whether matrices drop their buffer after a successful save.
pub fn out_of_core_enabled() -> bool {
    OUT_OF_CORE.load(Ordering::SeqCst)
}

/// Scoped setter for the out-of-core mode.
///
/// Nested guards restore the value that was current when each was created;
/// they are not reference counted.
#[must_use = "the previous mode is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct OutOfCoreGuard {
    previous: bool,
}

impl OutOfCoreGuard {
    pub fn new(enabled: bool) -> Self {
        let previous = OUT_OF_CORE.swap(enabled, Ordering::SeqCst);
        Self { previous }
    }

    /// Mode that will be restored on drop.
    pub fn previous(&self) -> bool {
        self.previous
    }
}

impl Drop for OutOfCoreGuard {
    fn drop(&mut self) {
        OUT_OF_CORE.store(self.previous, Ordering::SeqCst);
    }
}

/// Deferred-load descriptor attached to a matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LazySource {
    /// A load from `path` is pending.
    pub request_load: bool,
    /// The buffer currently holds the file content.
    pub loaded: bool,
    /// The buffer was written since it was last loaded.
    pub modified: bool,
    pub path: Option<PathBuf>,
    /// Size used when the backing file is empty.
    pub expected_rows: usize,
    pub expected_cols: usize,
}

impl LazySource {
    /// Descriptor attached by an explicit allocation.
    pub fn fresh() -> Self {
        Self {
            request_load: false,
            loaded: false,
            modified: true,
            ..Self::default()
        }
    }

    /// Descriptor for content that stays on disk until it is needed.
    pub fn deferred(path: impl Into<PathBuf>, expected_rows: usize, expected_cols: usize) -> Self {
        Self {
            request_load: true,
            loaded: false,
            modified: false,
            path: Some(path.into()),
            expected_rows,
            expected_cols,
        }
    }

    /// A load must happen before the buffer is used.
    pub fn needs_load(&self) -> bool {
        self.request_load && !self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_descriptor_flags() {
        let lazy = LazySource::fresh();
        assert!(!lazy.request_load);
        assert!(!lazy.loaded);
        assert!(lazy.modified);
        assert!(!lazy.needs_load());
    }

    #[test]
    fn needs_load_truth_table() {
        let mut lazy = LazySource::deferred("a.txt", 1, 1);
        assert!(lazy.needs_load());
        lazy.loaded = true;
        assert!(!lazy.needs_load());
        lazy.loaded = false;
        lazy.request_load = false;
        assert!(!lazy.needs_load());
    }
}
