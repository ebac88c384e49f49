//! Converter traits between host geometry and lookup geometry.

use bbq_math::{BoundingBox, GeometryError, QueryItem};

/// Converts a host bounding-box type to and from [`BoundingBox`].
pub trait BoundingBoxWrapper {
    /// The host's bounding-box type.
    type Foreign;

    /// Fails if the host box is inverted or non-finite.
    fn to_bounding_box(&self, foreign: &Self::Foreign) -> Result<BoundingBox, GeometryError>;

    fn from_bounding_box(&self, bounding_box: &BoundingBox) -> Self::Foreign;
}

/// Converts a host query type to and from [`QueryItem`].
pub trait QueryItemWrapper {
    /// The host's query type.
    type Foreign;

    fn to_query_item(&self, foreign: &Self::Foreign) -> Result<QueryItem, GeometryError>;

    fn from_query_item(&self, item: &QueryItem) -> Self::Foreign;
}
