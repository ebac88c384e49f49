//! Query items.
//!
//! A [`QueryItem`] describes the region a lookup is asked about. Every stored
//! entry whose bounding box intersects the item is visited.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;
use crate::line::Line;

/// Something a lookup can be queried with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum QueryItem {
    /// Matches every entry.
    All,
    /// Matches entries whose box overlaps this box.
    BoundingBox(BoundingBox),
    /// Matches entries whose box contains this point.
    Point(DVec3),
    /// Matches entries whose box is crossed by this segment.
    Line(Line),
}

impl QueryItem {
    /// Shorthand for [`QueryItem::All`].
    pub const ALL: Self = Self::All;

    /// The region this query can possibly touch, or `None` for [`QueryItem::All`].
    ///
    /// Point queries yield a zero-volume box. A non-finite point yields a box
    /// that intersects nothing.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Self::All => None,
            Self::BoundingBox(bounding_box) => Some(*bounding_box),
            Self::Point(point) => Some(BoundingBox::from_ordered(*point, *point)),
            Self::Line(line) => Some(line.bounding_box()),
        }
    }
}

impl From<BoundingBox> for QueryItem {
    fn from(bounding_box: BoundingBox) -> Self {
        Self::BoundingBox(bounding_box)
    }
}

impl From<DVec3> for QueryItem {
    fn from(point: DVec3) -> Self {
        Self::Point(point)
    }
}

impl From<Line> for QueryItem {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_no_bounds() {
        assert_eq!(QueryItem::ALL.bounding_box(), None);
    }

    #[test]
    fn test_point_bounds_are_degenerate() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        let b = QueryItem::from(p).bounding_box().unwrap();
        assert_eq!(b.min(), p);
        assert_eq!(b.max(), p);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let line = Line::new(DVec3::ZERO, DVec3::ONE).unwrap();
        let item = QueryItem::from(line);
        let bytes = rmp_serde::to_vec(&item).unwrap();
        let restored: QueryItem = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(item, restored);
    }
}
