//! Lazily computed counters.

use std::sync::OnceLock;

/// A `usize` that is computed on first read and kept until invalidated.
///
/// Backends whose size is expensive to derive wrap it in a `CachedCount` and
/// call [`CachedCount::invalidate`] on every mutation.
#[derive(Debug, Clone, Default)]
pub struct CachedCount {
    value: OnceLock<usize>,
}

impl CachedCount {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value, computing it with `compute` if it is not cached yet.
    pub fn get(&self, compute: impl FnOnce() -> usize) -> usize {
        *self.value.get_or_init(compute)
    }

    /// Forget the cached value.
    pub fn invalidate(&mut self) {
        self.value.take();
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.value.get().is_some()
    }
}
