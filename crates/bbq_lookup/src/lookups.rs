//! Factories for boxed lookups.
//!
//! Callers that pick a backend at runtime hold a
//! `Box<dyn BoundingBoxLookup<T>>`; these functions build one.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::error::LookupError;
use crate::grid::GridLookup;
use crate::list::ListLookup;
use crate::lookup::BoundingBoxLookup;
use crate::tree::TreeLookup;

/// The available lookup implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// [`ListLookup`]: insert O(1), remove O(n), query O(n).
    List,
    /// [`GridLookup`]: uniform grid over growing bounds.
    Grid,
    /// [`TreeLookup`]: bounding volume hierarchy.
    Tree,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::List, Backend::Grid, Backend::Tree];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Backend::List => "list",
            Backend::Grid => "grid",
            Backend::Tree => "tree",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|backend| backend.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LookupError::UnknownBackend(s.to_string()))
    }
}

/// A list-backed lookup. Generally the fastest choice for very small datasets.
#[must_use]
pub fn list<T: PartialEq + 'static>() -> Box<dyn BoundingBoxLookup<T>> {
    Box::new(ListLookup::new())
}

/// A grid-backed lookup whose resolution comes from [`GridConfig::from_env`].
pub fn grid<T: PartialEq + 'static>() -> Result<Box<dyn BoundingBoxLookup<T>>, LookupError> {
    Ok(grid_with(GridConfig::from_env()?))
}

#[must_use]
pub fn grid_with<T: PartialEq + 'static>(config: GridConfig) -> Box<dyn BoundingBoxLookup<T>> {
    Box::new(GridLookup::new(config))
}

/// A tree-backed lookup.
#[must_use]
pub fn tree<T: PartialEq + 'static>() -> Box<dyn BoundingBoxLookup<T>> {
    Box::new(TreeLookup::new())
}

/// Build the lookup for `backend`. `grid_config` is only used by [`Backend::Grid`].
#[must_use]
pub fn create<T: PartialEq + 'static>(
    backend: Backend,
    grid_config: GridConfig,
) -> Box<dyn BoundingBoxLookup<T>> {
    match backend {
        Backend::List => list(),
        Backend::Grid => grid_with(grid_config),
        Backend::Tree => tree(),
    }
}
