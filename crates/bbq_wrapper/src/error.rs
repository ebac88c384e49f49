//! Wrapper errors.

use bbq_math::GeometryError;

/// Errors surfaced while converting host geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WrapperError {
    #[error("host geometry is not a valid lookup shape: {0}")]
    Geometry(#[from] GeometryError),
}
