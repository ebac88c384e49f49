//! Adapter for engines that describe geometry with single-precision
//! [`glam::Vec3`].
//!
//! Lookups store `f64` coordinates, so widening an `f32` box is exact and a
//! box read back out of the lookup equals the one that was inserted.

use bbq_lookup::BoundingBoxLookup;
use bbq_math::{BoundingBox, GeometryError, Line, QueryItem};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::convert::{BoundingBoxWrapper, QueryItemWrapper};
use crate::lookup::{WrapperBoundingBoxLookup, wrap as wrap_lookup};

/// A single-precision axis-aligned box as a host engine stores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct F32BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl F32BoundingBox {
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

/// A single-precision query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum F32QueryItem {
    All,
    BoundingBox(F32BoundingBox),
    Point(Vec3),
    Line { start: Vec3, end: Vec3 },
}

impl F32QueryItem {
    pub const ALL: Self = Self::All;
}

/// Converts [`F32BoundingBox`] to and from lookup boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct F32BoxConverter;

impl BoundingBoxWrapper for F32BoxConverter {
    type Foreign = F32BoundingBox;

    fn to_bounding_box(&self, foreign: &F32BoundingBox) -> Result<BoundingBox, GeometryError> {
        BoundingBox::new(foreign.min.as_dvec3(), foreign.max.as_dvec3())
    }

    fn from_bounding_box(&self, bounding_box: &BoundingBox) -> F32BoundingBox {
        F32BoundingBox::new(bounding_box.min().as_vec3(), bounding_box.max().as_vec3())
    }
}

/// Converts [`F32QueryItem`] to and from lookup queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct F32QueryConverter;

impl QueryItemWrapper for F32QueryConverter {
    type Foreign = F32QueryItem;

    fn to_query_item(&self, foreign: &F32QueryItem) -> Result<QueryItem, GeometryError> {
        Ok(match foreign {
            F32QueryItem::All => QueryItem::All,
            F32QueryItem::BoundingBox(bounding_box) => {
                QueryItem::BoundingBox(F32BoxConverter.to_bounding_box(bounding_box)?)
            }
            F32QueryItem::Point(point) => {
                let point = point.as_dvec3();
                if !point.is_finite() {
                    return Err(GeometryError::NonFinite);
                }
                QueryItem::Point(point)
            }
            F32QueryItem::Line { start, end } => {
                QueryItem::Line(Line::new(start.as_dvec3(), end.as_dvec3())?)
            }
        })
    }

    fn from_query_item(&self, item: &QueryItem) -> F32QueryItem {
        match item {
            QueryItem::All => F32QueryItem::All,
            QueryItem::BoundingBox(bounding_box) => {
                F32QueryItem::BoundingBox(F32BoxConverter.from_bounding_box(bounding_box))
            }
            QueryItem::Point(point) => F32QueryItem::Point(point.as_vec3()),
            QueryItem::Line(line) => F32QueryItem::Line {
                start: line.start().as_vec3(),
                end: line.end().as_vec3(),
            },
        }
    }
}

/// A lookup keyed by [`F32BoundingBox`] and queried with [`F32QueryItem`].
pub type F32BoundingBoxLookup<T> = WrapperBoundingBoxLookup<T, F32BoxConverter, F32QueryConverter>;

/// Wrap `lookup` for single-precision host geometry.
#[must_use]
pub fn wrap<T: PartialEq>(lookup: Box<dyn BoundingBoxLookup<T>>) -> F32BoundingBoxLookup<T> {
    wrap_lookup(lookup, F32BoxConverter, F32QueryConverter)
}

#[cfg(test)]
mod tests {
    use bbq_math::DVec3;

    use super::*;

    #[test]
    fn test_box_conversion_is_exact() {
        let host = F32BoundingBox::new(Vec3::new(0.1, -2.5, 3.3), Vec3::new(1.7, 0.0, 9.9));
        let inner = F32BoxConverter.to_bounding_box(&host).unwrap();
        assert_eq!(F32BoxConverter.from_bounding_box(&inner), host);
    }

    #[test]
    fn test_inverted_host_box_is_rejected() {
        let host = F32BoundingBox::new(Vec3::ONE, Vec3::ZERO);
        assert!(matches!(
            F32BoxConverter.to_bounding_box(&host),
            Err(GeometryError::Inverted { .. })
        ));
    }

    #[test]
    fn test_query_conversion() {
        let line = F32QueryItem::Line {
            start: Vec3::ZERO,
            end: Vec3::new(4.0, 0.0, 0.0),
        };
        let inner = F32QueryConverter.to_query_item(&line).unwrap();
        assert_eq!(
            inner,
            QueryItem::Line(Line::new(DVec3::ZERO, DVec3::new(4.0, 0.0, 0.0)).unwrap())
        );
        assert_eq!(F32QueryConverter.from_query_item(&inner), line);
        assert_eq!(
            F32QueryConverter.to_query_item(&F32QueryItem::ALL).unwrap(),
            QueryItem::ALL
        );
    }

    #[test]
    fn test_nan_point_is_rejected() {
        let point = F32QueryItem::Point(Vec3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(
            F32QueryConverter.to_query_item(&point),
            Err(GeometryError::NonFinite)
        );
    }

    #[test]
    fn test_host_box_serialization_roundtrip() {
        let host = F32BoundingBox::new(Vec3::ZERO, Vec3::splat(2.0));
        let bytes = rmp_serde::to_vec(&host).unwrap();
        let restored: F32BoundingBox = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(host, restored);
    }
}
