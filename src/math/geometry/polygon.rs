// src/math/geometry/polygon.rs

//! # Polygon Module
//!
//! A polygon here is an ordered sequence of rings. Each ring is a sequence of points that
//! may or may not repeat its first point at the end; an unclosed ring has an implicit
//! closing edge. Rings are not classified into exterior/interior: outer boundaries, holes
//! and disjoint parts all live side by side, which is exactly what hull extraction yields.

use crate::math::{
    error::{TilegramError, TilegramResult},
    types::{Bounds2D, Point},
    utils::comparison,
};
use geo::{BoundingRect, Centroid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ring of a polygon.
pub type Ring = Vec<Point>;

/// Returns `true` if the ring repeats its first point at the end.
pub fn is_ring_closed(ring: &[Point]) -> bool {
    ring.len() > 1 && ring.first() == ring.last()
}

/// Iterates the directed edges of a ring, including the implicit closing edge when the
/// ring is not explicitly closed.
pub fn ring_edges(ring: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let closing = if ring.len() > 1 && !is_ring_closed(ring) {
        Some((ring[ring.len() - 1], ring[0]))
    } else {
        None
    };
    ring.windows(2).map(|w| (w[0], w[1])).chain(closing)
}

/// Signed shoelace area of a ring. Counter-clockwise rings are positive.
pub fn ring_signed_area(ring: &[Point]) -> f64 {
    ring_edges(ring)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f64>()
        * 0.5
}

/// Removes vertices lying on the straight line between their neighbours.
///
/// A vertex is dropped when its distance to the segment joining its neighbours is at most
/// `epsilon`. The ring is treated cyclically, so the start vertex is not privileged. A closed
/// input yields a closed output.
pub fn simplify_ring(ring: &[Point], epsilon: f64) -> Ring {
    let closed = is_ring_closed(ring);
    let mut pts: Vec<Point> = if closed {
        ring[..ring.len() - 1].to_vec()
    } else {
        ring.to_vec()
    };

    let mut changed = true;
    while changed && pts.len() > 3 {
        changed = false;
        let n = pts.len();
        for i in 0..n {
            let prev = pts[(i + n - 1) % n];
            let curr = pts[i];
            let next = pts[(i + 1) % n];
            if is_between(prev, curr, next, epsilon) {
                pts.remove(i);
                changed = true;
                break;
            }
        }
    }

    if closed && !pts.is_empty() {
        pts.push(pts[0]);
    }
    pts
}

fn is_between(a: Point, p: Point, b: Point, epsilon: f64) -> bool {
    let len = a.distance_to(b);
    if comparison::nearly_zero(len) {
        return p.distance_to(a) <= epsilon;
    }
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let dot = (p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y);
    (cross / len).abs() <= epsilon && dot >= 0.0 && dot <= len * len
}

/// Polygon made of one or more rings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    rings: Vec<Ring>,
}

impl Polygon {
    /// Creates a polygon from rings. Every ring must have at least three distinct positions.
    pub fn new(rings: Vec<Ring>) -> TilegramResult<Self> {
        for (i, ring) in rings.iter().enumerate() {
            let distinct = if is_ring_closed(ring) {
                ring.len() - 1
            } else {
                ring.len()
            };
            if distinct < 3 {
                return Err(TilegramError::InvalidConfiguration {
                    message: format!("Ring {} has {} points, expected at least 3", i, distinct),
                });
            }
            if ring.iter().any(|p| !p.is_finite()) {
                return Err(TilegramError::InvalidConfiguration {
                    message: format!("Ring {} contains a non-finite coordinate", i),
                });
            }
        }
        Ok(Self { rings })
    }

    /// Creates a single-ring polygon.
    pub fn from_ring(ring: Ring) -> TilegramResult<Self> {
        Self::new(vec![ring])
    }

    /// Wraps rings that are already known to be well formed (e.g. extracted hull rings).
    pub(crate) fn from_rings_unchecked(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn into_rings(self) -> Vec<Ring> {
        self.rings
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::from_points_iter(self.rings.iter().flatten().copied())
            .unwrap_or_else(Bounds2D::empty)
    }

    /// Net area: the absolute sum of signed ring areas, so oppositely wound holes subtract.
    pub fn area(&self) -> f64 {
        self.rings
            .iter()
            .map(|r| ring_signed_area(r))
            .sum::<f64>()
            .abs()
    }

    /// Area-weighted centroid. Degenerate (zero-area) polygons fall back to the mean vertex.
    pub fn centroid(&self) -> Option<Point> {
        let mut a_sum = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for ring in &self.rings {
            for (p, q) in ring_edges(ring) {
                let cross = p.x * q.y - q.x * p.y;
                a_sum += cross;
                cx += (p.x + q.x) * cross;
                cy += (p.y + q.y) * cross;
            }
        }

        if !comparison::nearly_zero(a_sum) {
            return Some(Point::new(cx / (3.0 * a_sum), cy / (3.0 * a_sum)));
        }

        let vertices: Vec<Point> = self.rings.iter().flatten().copied().collect();
        if vertices.is_empty() {
            return None;
        }
        let n = vertices.len() as f64;
        Some(Point::new(
            vertices.iter().map(|p| p.x).sum::<f64>() / n,
            vertices.iter().map(|p| p.y).sum::<f64>() / n,
        ))
    }

    /// Point-in-region test using the even-odd rule over all rings.
    pub fn contains_point(&self, point: Point) -> bool {
        let mut inside = false;
        for ring in &self.rings {
            for (a, b) in ring_edges(ring) {
                if (a.y > point.y) != (b.y > point.y)
                    && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
                {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Returns a copy with collinear vertices removed from every ring.
    pub fn simplify_collinear(&self, epsilon: f64) -> Self {
        Self {
            rings: self
                .rings
                .iter()
                .map(|r| simplify_ring(r, epsilon))
                .collect(),
        }
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polygon({} rings", self.rings.len())?;
        let vertices: usize = self.rings.iter().map(Vec::len).sum();
        write!(f, ", {} vertices)", vertices)
    }
}

impl From<&geo::Polygon<f64>> for Polygon {
    fn from(poly: &geo::Polygon<f64>) -> Self {
        let rings = std::iter::once(poly.exterior())
            .chain(poly.interiors())
            .filter(|ls| ls.0.len() > 1)
            .map(|ls| ls.coords().map(|c| Point::from(*c)).collect())
            .collect();
        Self { rings }
    }
}

impl From<&geo::MultiPolygon<f64>> for Polygon {
    fn from(mp: &geo::MultiPolygon<f64>) -> Self {
        Self {
            rings: mp.iter().flat_map(|p| Polygon::from(p).rings).collect(),
        }
    }
}

impl From<&Polygon> for geo::MultiLineString<f64> {
    fn from(poly: &Polygon) -> Self {
        geo::MultiLineString::new(
            poly.rings
                .iter()
                .map(|r| {
                    let mut coords: Vec<geo::Coord<f64>> =
                        r.iter().map(|p| geo::Coord::from(*p)).collect();
                    if !is_ring_closed(r) && !r.is_empty() {
                        coords.push(r[0].into());
                    }
                    geo::LineString::new(coords)
                })
                .collect(),
        )
    }
}

/// Centroid and bounding box of a `geo` geometry, the two values a record caches.
pub fn geo_centroid_and_bounds<G>(geometry: &G) -> Option<(Point, Bounds2D)>
where
    G: Centroid<Output = Option<geo::Point<f64>>> + BoundingRect<f64, Output = Option<geo::Rect<f64>>>,
{
    let centroid = geometry.centroid()?;
    let rect = geometry.bounding_rect()?;
    Some((centroid.into(), rect.into()))
}
