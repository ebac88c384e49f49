//! Lookup construction errors.

/// Errors that can occur while configuring or selecting a lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The grid resolution was not an integer in the supported range.
    #[error("invalid grid size {value:?}: expected an integer in 1..={max}")]
    InvalidGridSize { value: String, max: usize },

    /// The backend name did not match any known backend.
    #[error("unknown lookup backend {0:?}: expected one of list, grid, tree")]
    UnknownBackend(String),
}
