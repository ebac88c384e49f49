//! # bbq_math
//!
//! Geometry types for the bbq spatial lookups. Re-exports [`glam`] for
//! linear algebra and defines the shapes a lookup stores and is queried with:
//!
//! - [`BoundingBox`]: an axis-aligned box in 3D space.
//! - [`Line`]: a line segment between two points.
//! - [`QueryItem`]: anything a lookup can be queried with.

pub mod bounding_box;
pub mod error;
pub mod line;
pub mod query;

// Re-export glam types for convenience.
pub use glam::{DVec3, Vec3};

pub use bounding_box::BoundingBox;
pub use error::{Axis, GeometryError};
pub use line::Line;
pub use query::QueryItem;
