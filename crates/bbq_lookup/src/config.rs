//! Grid lookup configuration.

use std::env::VarError;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Configuration for a [`GridLookup`](crate::GridLookup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGridConfig")]
pub struct GridConfig {
    cells_per_axis: usize,
}

#[derive(Deserialize)]
struct RawGridConfig {
    cells_per_axis: usize,
}

impl TryFrom<RawGridConfig> for GridConfig {
    type Error = LookupError;

    fn try_from(raw: RawGridConfig) -> Result<Self, Self::Error> {
        Self::new(raw.cells_per_axis)
    }
}

impl GridConfig {
    /// Default number of cells along each axis.
    pub const DEFAULT_CELLS_PER_AXIS: usize = 16;

    /// Upper bound on the resolution (the grid holds `n³` cells).
    pub const MAX_CELLS_PER_AXIS: usize = 128;

    /// Environment variable overriding the default resolution.
    pub const ENV_VAR: &'static str = "BBQ_GRID_SIZE";

    /// Create a config with `cells_per_axis` cells along each axis.
    pub fn new(cells_per_axis: usize) -> Result<Self, LookupError> {
        if !(1..=Self::MAX_CELLS_PER_AXIS).contains(&cells_per_axis) {
            return Err(LookupError::InvalidGridSize {
                value: cells_per_axis.to_string(),
                max: Self::MAX_CELLS_PER_AXIS,
            });
        }
        Ok(Self { cells_per_axis })
    }

    /// Read the resolution from [`GridConfig::ENV_VAR`], falling back to the default.
    pub fn from_env() -> Result<Self, LookupError> {
        Self::from_var(std::env::var(Self::ENV_VAR))
    }

    /// Resolve the result of reading [`GridConfig::ENV_VAR`].
    pub fn from_var(var: Result<String, VarError>) -> Result<Self, LookupError> {
        match var {
            Ok(raw) => Self::parse(&raw),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(raw)) => Err(LookupError::InvalidGridSize {
                value: raw.to_string_lossy().into_owned(),
                max: Self::MAX_CELLS_PER_AXIS,
            }),
        }
    }

    /// Parse a resolution from its textual form.
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let cells_per_axis = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| LookupError::InvalidGridSize {
                value: raw.to_string(),
                max: Self::MAX_CELLS_PER_AXIS,
            })?;
        Self::new(cells_per_axis)
    }

    #[must_use]
    pub const fn cells_per_axis(&self) -> usize {
        self.cells_per_axis
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cells_per_axis * self.cells_per_axis * self.cells_per_axis
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cells_per_axis: Self::DEFAULT_CELLS_PER_AXIS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolution() {
        let config = GridConfig::default();
        assert_eq!(config.cells_per_axis(), 16);
        assert_eq!(config.cell_count(), 4096);
    }

    #[test]
    fn test_parse_accepts_whitespace() {
        assert_eq!(GridConfig::parse(" 8 ").unwrap().cells_per_axis(), 8);
    }

    #[test]
    fn test_rejects_zero_and_oversized() {
        assert!(GridConfig::new(0).is_err());
        assert!(GridConfig::new(GridConfig::MAX_CELLS_PER_AXIS + 1).is_err());
        assert!(GridConfig::new(GridConfig::MAX_CELLS_PER_AXIS).is_ok());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = GridConfig::parse("sixteen").unwrap_err();
        assert_eq!(
            err,
            LookupError::InvalidGridSize {
                value: "sixteen".to_string(),
                max: GridConfig::MAX_CELLS_PER_AXIS,
            }
        );
    }

    #[test]
    fn test_unset_var_uses_default() {
        assert_eq!(
            GridConfig::from_var(Err(VarError::NotPresent)).unwrap(),
            GridConfig::default()
        );
    }

    #[test]
    fn test_var_overrides_default() {
        let config = GridConfig::from_var(Ok("8".to_string())).unwrap();
        assert_eq!(config.cells_per_axis(), 8);
    }

    #[test]
    fn test_invalid_var_is_rejected() {
        assert_eq!(
            GridConfig::from_var(Ok("0".to_string())),
            Err(LookupError::InvalidGridSize {
                value: "0".to_string(),
                max: GridConfig::MAX_CELLS_PER_AXIS,
            })
        );
        let not_unicode = VarError::NotUnicode(std::ffi::OsString::from("16"));
        assert!(matches!(
            GridConfig::from_var(Err(not_unicode)),
            Err(LookupError::InvalidGridSize { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GridConfig::new(32).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"cells_per_axis":32}"#);
        let restored: GridConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_json_rejects_zero_cells() {
        assert!(serde_json::from_str::<GridConfig>(r#"{"cells_per_axis":0}"#).is_err());
    }
}
