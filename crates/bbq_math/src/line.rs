//! Line segments.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;
use crate::error::GeometryError;

/// A finite line segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Endpoints", into = "Endpoints")]
pub struct Line {
    start: DVec3,
    end: DVec3,
}

#[derive(Serialize, Deserialize)]
struct Endpoints {
    start: DVec3,
    end: DVec3,
}

impl TryFrom<Endpoints> for Line {
    type Error = GeometryError;

    fn try_from(endpoints: Endpoints) -> Result<Self, Self::Error> {
        Self::new(endpoints.start, endpoints.end)
    }
}

impl From<Line> for Endpoints {
    fn from(line: Line) -> Self {
        Self {
            start: line.start,
            end: line.end,
        }
    }
}

impl Line {
    /// Create a segment between two finite points.
    pub fn new(start: DVec3, end: DVec3) -> Result<Self, GeometryError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> DVec3 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DVec3 {
        self.end
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// The smallest box enclosing the whole segment.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_ordered(self.start.min(self.end), self.start.max(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_spans_endpoints() {
        let line = Line::new(DVec3::new(4.0, -1.0, 2.0), DVec3::new(1.0, 3.0, 2.0)).unwrap();
        let b = line.bounding_box();
        assert_eq!(b.min(), DVec3::new(1.0, -1.0, 2.0));
        assert_eq!(b.max(), DVec3::new(4.0, 3.0, 2.0));
    }

    #[test]
    fn test_rejects_infinite_endpoint() {
        assert_eq!(
            Line::new(DVec3::ZERO, DVec3::new(f64::INFINITY, 0.0, 0.0)),
            Err(GeometryError::NonFinite)
        );
    }

    #[test]
    fn test_length() {
        let line = Line::new(DVec3::ZERO, DVec3::new(3.0, 4.0, 0.0)).unwrap();
        assert_eq!(line.length(), 5.0);
    }
}
