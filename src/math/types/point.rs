// src/math/types/point.rs
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 2D point in a consistent Euclidean unit system (e.g. meters).
///
/// Unlike a bare `(f64, f64)` tuple, `Point` is totally ordered and hashable so it
/// can key the edge graph of the hull builder. Comparison treats `-0.0` and `0.0`
/// as the same coordinate.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn distance_squared_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    // Adding 0.0 folds -0.0 into 0.0.
    fn canonical(&self) -> (f64, f64) {
        (self.x + 0.0, self.y + 0.0)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Point {}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        let (ax, ay) = self.canonical();
        let (bx, by) = other.canonical();
        ax.total_cmp(&bx).then_with(|| ay.total_cmp(&by))
    }
}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (x, y) = self.canonical();
        x.to_bits().hash(state);
        y.to_bits().hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// Conversion traits
impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<geo::Coord<f64>> for Point {
    fn from(c: geo::Coord<f64>) -> Self {
        Self { x: c.x, y: c.y }
    }
}

impl From<Point> for geo::Coord<f64> {
    fn from(p: Point) -> Self {
        geo::Coord { x: p.x, y: p.y }
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(p: geo::Point<f64>) -> Self {
        Self { x: p.x(), y: p.y() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_signed_zero_is_one_point() {
        let a = Point::new(0.0, -0.0);
        let b = Point::new(-0.0, 0.0);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b), "-0.0 and 0.0 must hash alike");
    }

    #[test]
    fn test_ordering_is_x_then_y() {
        let mut pts = vec![
            Point::new(1.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(0.0, -1.0),
        ];
        pts.sort();
        assert_eq!(
            pts,
            vec![
                Point::new(0.0, -1.0),
                Point::new(0.0, 5.0),
                Point::new(1.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(a.distance_squared_to(b), 25.0);
    }

    #[test]
    fn test_geo_conversion() {
        let c: geo::Coord<f64> = Point::new(1.5, -2.0).into();
        assert_eq!(c, geo::coord! { x: 1.5, y: -2.0 });
        assert_eq!(Point::from(c), Point::new(1.5, -2.0));
    }
}
