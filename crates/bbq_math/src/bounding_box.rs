//! Axis-aligned bounding boxes.
//!
//! [`BoundingBox`] is the key every lookup stores its values under. Its
//! corners are validated on construction, so every box in a lookup satisfies
//! `min <= max` on all three axes and has finite coordinates.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Axis, GeometryError};
use crate::line::Line;
use crate::query::QueryItem;

/// An axis-aligned box in 3D space.
///
/// All intersection and containment tests are inclusive: boxes that only
/// touch along a face, edge or corner intersect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Corners", into = "Corners")]
pub struct BoundingBox {
    min: DVec3,
    max: DVec3,
}

/// Unvalidated wire form of a [`BoundingBox`].
#[derive(Serialize, Deserialize)]
struct Corners {
    min: DVec3,
    max: DVec3,
}

impl TryFrom<Corners> for BoundingBox {
    type Error = GeometryError;

    fn try_from(corners: Corners) -> Result<Self, Self::Error> {
        Self::new(corners.min, corners.max)
    }
}

impl From<BoundingBox> for Corners {
    fn from(bounding_box: BoundingBox) -> Self {
        Self {
            min: bounding_box.min,
            max: bounding_box.max,
        }
    }
}

impl BoundingBox {
    /// Create a box from its minimum and maximum corners.
    pub fn new(min: DVec3, max: DVec3) -> Result<Self, GeometryError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        for axis in Axis::ALL {
            let (lo, hi) = (min[axis.index()], max[axis.index()]);
            if lo > hi {
                return Err(GeometryError::Inverted {
                    axis,
                    min: lo,
                    max: hi,
                });
            }
        }
        Ok(Self { min, max })
    }

    /// Create a box spanning two arbitrary opposite corners.
    pub fn from_corners(a: DVec3, b: DVec3) -> Result<Self, GeometryError> {
        Self::new(a.min(b), a.max(b))
    }

    /// Create a zero-volume box at a single point.
    pub fn point(point: DVec3) -> Result<Self, GeometryError> {
        Self::new(point, point)
    }

    /// Build a box from corners that are already known to be ordered and finite.
    pub(crate) const fn from_ordered(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// The minimum corner.
    #[must_use]
    pub const fn min(&self) -> DVec3 {
        self.min
    }

    /// The maximum corner.
    #[must_use]
    pub const fn max(&self) -> DVec3 {
        self.max
    }

    /// Edge lengths along each axis.
    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// The midpoint of the box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Total area of the six faces.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        let s = self.size();
        2.0 * (s.x * s.y + s.y * s.z + s.z * s.x)
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        let s = self.size();
        s.x * s.y * s.z
    }

    /// The smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        Self::from_ordered(self.min.min(other.min), self.max.max(other.max))
    }

    /// The overlapping region of both boxes, or `None` if they are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects_box(other) {
            return None;
        }
        Some(Self::from_ordered(
            self.min.max(other.min),
            self.max.min(other.max),
        ))
    }

    /// Returns `true` if `self` fully encloses `other`.
    #[must_use]
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    #[must_use]
    pub fn intersects_box(&self, other: &BoundingBox) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    #[must_use]
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }

    /// Segment/box test using the slab method.
    #[must_use]
    pub fn intersects_line(&self, line: &Line) -> bool {
        let start = line.start();
        let direction = line.end() - start;
        let mut t_enter = 0.0_f64;
        let mut t_exit = 1.0_f64;

        for axis in Axis::ALL {
            let i = axis.index();
            let (lo, hi) = (self.min[i], self.max[i]);
            if direction[i] == 0.0 {
                // Parallel to this slab: must already be inside it.
                if start[i] < lo || start[i] > hi {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / direction[i];
            let mut t0 = (lo - start[i]) * inv;
            let mut t1 = (hi - start[i]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return false;
            }
        }
        true
    }

    /// Returns `true` if this box intersects the given query item.
    #[must_use]
    pub fn intersects(&self, item: &QueryItem) -> bool {
        match item {
            QueryItem::All => true,
            QueryItem::BoundingBox(other) => self.intersects_box(other),
            QueryItem::Point(point) => self.contains_point(*point),
            QueryItem::Line(line) => self.intersects_line(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> BoundingBox {
        BoundingBox::new(DVec3::ZERO, DVec3::ONE).unwrap()
    }

    fn cube(min: f64, max: f64) -> BoundingBox {
        BoundingBox::new(DVec3::splat(min), DVec3::splat(max)).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_axis() {
        let err = BoundingBox::new(DVec3::new(0.0, 2.0, 0.0), DVec3::new(1.0, 1.0, 1.0))
            .unwrap_err();
        assert_eq!(
            err,
            GeometryError::Inverted {
                axis: Axis::Y,
                min: 2.0,
                max: 1.0
            }
        );
    }

    #[test]
    fn test_new_rejects_nan() {
        let err = BoundingBox::new(DVec3::new(f64::NAN, 0.0, 0.0), DVec3::ONE).unwrap_err();
        assert_eq!(err, GeometryError::NonFinite);
    }

    #[test]
    fn test_from_corners_orders_axes() {
        let b = BoundingBox::from_corners(DVec3::new(3.0, 0.0, 5.0), DVec3::new(1.0, 2.0, 4.0))
            .unwrap();
        assert_eq!(b.min(), DVec3::new(1.0, 0.0, 4.0));
        assert_eq!(b.max(), DVec3::new(3.0, 2.0, 5.0));
    }

    #[test]
    fn test_union_and_intersection() {
        let a = cube(0.0, 2.0);
        let b = cube(1.0, 3.0);
        assert_eq!(a.union(&b), cube(0.0, 3.0));
        assert_eq!(a.intersection(&b), Some(cube(1.0, 2.0)));
        assert_eq!(a.intersection(&cube(5.0, 6.0)), None);
    }

    #[test]
    fn test_touching_faces_intersect() {
        let a = cube(0.0, 1.0);
        let b = BoundingBox::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0)).unwrap();
        assert!(a.intersects_box(&b));
        assert_eq!(a.intersection(&b).unwrap().volume(), 0.0);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let outer = cube(0.0, 10.0);
        assert!(outer.contains(&outer));
        assert!(outer.contains(&cube(2.0, 3.0)));
        assert!(!outer.contains(&cube(5.0, 11.0)));
    }

    #[test]
    fn test_point_queries() {
        let b = unit();
        assert!(b.contains_point(DVec3::splat(0.5)));
        assert!(b.contains_point(DVec3::ONE));
        assert!(!b.contains_point(DVec3::splat(1.5)));
    }

    #[test]
    fn test_line_through_box() {
        let b = unit();
        let through = Line::new(DVec3::new(-1.0, 0.5, 0.5), DVec3::new(2.0, 0.5, 0.5)).unwrap();
        assert!(b.intersects_line(&through));
    }

    #[test]
    fn test_line_stops_short_of_box() {
        let b = unit();
        let short = Line::new(DVec3::new(-3.0, 0.5, 0.5), DVec3::new(-1.0, 0.5, 0.5)).unwrap();
        assert!(!b.intersects_line(&short));
    }

    #[test]
    fn test_line_parallel_outside_slab() {
        let b = unit();
        let above = Line::new(DVec3::new(-1.0, 2.0, 0.5), DVec3::new(2.0, 2.0, 0.5)).unwrap();
        assert!(!b.intersects_line(&above));
    }

    #[test]
    fn test_diagonal_line_misses_corner() {
        let b = unit();
        // Passes the (1, 1) corner on the outside in the xy plane.
        let miss = Line::new(DVec3::new(1.5, 0.0, 0.5), DVec3::new(3.0, 1.5, 0.5)).unwrap();
        assert!(!b.intersects_line(&miss));
    }

    #[test]
    fn test_degenerate_line_is_a_point() {
        let b = unit();
        let inside = Line::new(DVec3::splat(0.5), DVec3::splat(0.5)).unwrap();
        let outside = Line::new(DVec3::splat(2.0), DVec3::splat(2.0)).unwrap();
        assert!(b.intersects_line(&inside));
        assert!(!b.intersects_line(&outside));
    }

    #[test]
    fn test_intersects_all_matches_everything() {
        assert!(cube(50.0, 60.0).intersects(&QueryItem::ALL));
    }

    #[test]
    fn test_surface_area_and_volume() {
        let b = BoundingBox::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(b.surface_area(), 22.0);
        assert_eq!(b.volume(), 6.0);
        assert_eq!(b.center(), DVec3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let b = cube(-1.0, 4.5);
        let bytes = rmp_serde::to_vec(&b).unwrap();
        let restored: BoundingBox = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(b, restored);
    }

    #[test]
    fn test_deserialization_validates_corners() {
        let inverted = Corners {
            min: DVec3::ONE,
            max: DVec3::ZERO,
        };
        let bytes = rmp_serde::to_vec(&inverted).unwrap();
        assert!(rmp_serde::from_slice::<BoundingBox>(&bytes).is_err());
    }
}
