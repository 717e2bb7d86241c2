// src/math/types/bounds.rs

use crate::math::types::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D bounding box (axis-aligned bounding box).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2D {
    pub min: Point,
    pub max: Point,
}

impl Bounds2D {
    /// Creates a bounding box from two arbitrary corner points.
    pub fn from_points(p1: Point, p2: Point) -> Self {
        Self {
            min: Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Point::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    /// Creates a bounding box from a center and half extents.
    pub fn from_center(center: Point, half_width: f64, half_height: f64) -> Self {
        Self {
            min: Point::new(center.x - half_width, center.y - half_height),
            max: Point::new(center.x + half_width, center.y + half_height),
        }
    }

    /// Zero-size bounding box located at a single point.
    pub fn of_point(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Creates a bounding box enclosing all points, or `None` for no points.
    pub fn from_points_iter<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut points_iter = points.into_iter();
        let first_point = points_iter.next()?;

        let mut bounds = Self::of_point(first_point);
        for point in points_iter {
            bounds.expand_to_include_point(point);
        }

        Some(bounds)
    }

    /// Empty (inverted) bounding box, the identity for `union`.
    pub fn empty() -> Self {
        Self {
            min: Point::new(f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// Checks whether a point lies inside the box (edges included).
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Checks whether a point lies strictly inside the box; points on an edge do not count.
    pub fn interior_contains(&self, point: Point) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.y > self.min.y && point.y < self.max.y
    }

    /// Checks whether another box is fully contained.
    pub fn contains_bounds(&self, other: &Bounds2D) -> bool {
        if other.is_empty() {
            return true;
        }
        if self.is_empty() {
            return false;
        }

        self.min.x <= other.min.x
            && self.max.x >= other.max.x
            && self.min.y <= other.min.y
            && self.max.y >= other.max.y
    }

    /// Checks whether two boxes overlap. Touching edges count as overlap.
    pub fn intersects(&self, other: &Bounds2D) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn union(&self, other: &Bounds2D) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grows the box to include a point.
    pub fn expand_to_include_point(&mut self, point: Point) {
        if self.is_empty() {
            self.min = point;
            self.max = point;
        } else {
            self.min.x = self.min.x.min(point.x);
            self.min.y = self.min.y.min(point.y);
            self.max.x = self.max.x.max(point.x);
            self.max.y = self.max.y.max(point.y);
        }
    }

    /// Grows the box to include another box.
    pub fn extend(&mut self, other: &Bounds2D) {
        if !other.is_empty() {
            self.expand_to_include_point(other.min);
            self.expand_to_include_point(other.max);
        }
    }

    /// Returns a copy grown by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Self {
        if self.is_empty() {
            return *self;
        }

        Self {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }
}

impl Default for Bounds2D {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Bounds2D(empty)")
        } else {
            write!(f, "Bounds2D({} to {})", self.min, self.max)
        }
    }
}

impl From<geo::Rect<f64>> for Bounds2D {
    fn from(rect: geo::Rect<f64>) -> Self {
        Self {
            min: rect.min().into(),
            max: rect.max().into(),
        }
    }
}

impl From<Bounds2D> for rstar::AABB<[f64; 2]> {
    fn from(b: Bounds2D) -> Self {
        rstar::AABB::from_corners(b.min.to_array(), b.max.to_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Bounds2D {
        Bounds2D::from_points(Point::new(0.0, 0.0), Point::new(1.0, 1.0))
    }

    #[test]
    fn test_empty_is_union_identity() {
        let mut b = Bounds2D::empty();
        assert!(b.is_empty());
        b.extend(&unit());
        assert_eq!(b, unit());
        assert_eq!(Bounds2D::empty().union(&unit()), unit());
    }

    #[test]
    fn test_intersects_includes_touching() {
        let other = Bounds2D::from_points(Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        assert!(unit().intersects(&other));
        let apart = Bounds2D::from_points(Point::new(1.1, 0.0), Point::new(2.0, 1.0));
        assert!(!unit().intersects(&apart));
        assert!(!Bounds2D::empty().intersects(&unit()));
    }

    #[test]
    fn test_point_bounds_intersect() {
        let p = Bounds2D::of_point(Point::new(0.5, 1.0));
        assert!(p.intersects(&unit()));
        assert!(!Bounds2D::of_point(Point::new(0.5, 1.5)).intersects(&unit()));
    }

    #[test]
    fn test_interior_excludes_edges() {
        assert!(unit().interior_contains(Point::new(0.5, 0.5)));
        assert!(!unit().interior_contains(Point::new(0.0, 0.5)));
        assert!(!unit().interior_contains(Point::new(0.5, 1.0)));
        assert!(!Bounds2D::of_point(Point::ORIGIN).interior_contains(Point::ORIGIN));
    }

    #[test]
    fn test_expand_and_center() {
        let b = unit().expand(0.5);
        assert_eq!(b.min, Point::new(-0.5, -0.5));
        assert_eq!(b.max, Point::new(1.5, 1.5));
        assert_eq!(b.center(), Point::new(0.5, 0.5));
        assert_eq!(b.area(), 4.0);
        assert!(b.contains_bounds(&unit()));
    }

    #[test]
    fn test_from_points_iter() {
        let b = Bounds2D::from_points_iter(vec![
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(b.min, Point::new(-2.0, -1.0));
        assert_eq!(b.max, Point::new(3.0, 4.0));
        assert!(Bounds2D::from_points_iter(Vec::new()).is_none());
    }
}
