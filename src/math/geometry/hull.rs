// src/math/geometry/hull.rs

//! # Hull Module
//!
//! Merges adjoining polygons into their outer boundary.
//!
//! Every ring edge is inserted into a directed-edge graph. An edge whose reverse (or
//! itself) is already present cancels that edge instead of being added, so borders shared
//! by two inputs disappear and only the net boundary remains. Endpoints are snapped to
//! existing graph points within a tolerance first, which lets independently digitized
//! neighbours line up without leaving slivers.
//!
//! After all inputs are added the graph must be a set of disjoint simple cycles; each one
//! is walked into a closed ring.

use crate::math::{
    error::{TilegramError, TilegramResult},
    geometry::polygon::{Polygon, Ring, ring_edges},
    types::Point,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, trace};

/// Builds the merged boundary of a set of polygons.
#[derive(Debug, Clone)]
pub struct HullBuilder {
    /// Start point -> end points of the directed boundary edges.
    graph: BTreeMap<Point, BTreeSet<Point>>,
    tolerance: f64,
}

impl HullBuilder {
    /// Creates an empty builder.
    ///
    /// # Arguments
    /// * `tolerance` - Maximum distance at which two points are treated as the same point.
    ///   Must be finite and non-negative.
    pub fn new(tolerance: f64) -> TilegramResult<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(TilegramError::InvalidConfiguration {
                message: format!("Hull tolerance must be finite and >= 0, got {}", tolerance),
            });
        }
        Ok(Self {
            graph: BTreeMap::new(),
            tolerance,
        })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Number of directed edges currently in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn add_polygon(&mut self, polygon: &Polygon) {
        for ring in polygon.rings() {
            self.add_ring(ring);
        }
    }

    /// Adds every edge of a ring, including the implicit closing edge of an open ring.
    pub fn add_ring(&mut self, ring: &[Point]) {
        for (start, end) in ring_edges(ring) {
            self.add_edge(start, end);
        }
    }

    /// Adds a single directed edge, snapping and cancelling as described in the module docs.
    pub fn add_edge(&mut self, start: Point, end: Point) {
        if start == end {
            return;
        }

        let start = self.snap(start);
        let end = self.snap(end);
        if start == end {
            trace!("Dropping edge collapsed by snapping at {}", start);
            return;
        }

        if Self::remove_edge(&mut self.graph, end, start) {
            return;
        }
        if Self::remove_edge(&mut self.graph, start, end) {
            return;
        }

        self.graph.entry(start).or_default().insert(end);
    }

    /// Consumes the builder and extracts all boundary rings.
    ///
    /// Every returned ring is closed (its first point is repeated at the end).
    ///
    /// # Errors
    /// [`TilegramError::MalformedBoundary`] if a point with an out-degree other than one is
    /// reached, which means the inputs were self-intersecting or not properly closed.
    pub fn polygon(mut self) -> TilegramResult<Polygon> {
        let edges = self.edge_count();
        let mut rings = Vec::new();
        while !self.graph.is_empty() {
            rings.push(self.ring()?);
        }
        debug!("Extracted {} hull rings from {} edges", rings.len(), edges);
        Ok(Polygon::from_rings_unchecked(rings))
    }

    /// Returns the existing graph point nearest to `p` within tolerance, or `p` itself.
    fn snap(&self, p: Point) -> Point {
        let mut best: Option<(f64, Point)> = None;
        let mut consider = |q: Point| {
            let d = p.distance_to(q);
            if d <= self.tolerance && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, q));
            }
        };
        for (start, ends) in &self.graph {
            consider(*start);
            for end in ends {
                consider(*end);
            }
        }
        best.map_or(p, |(_, q)| q)
    }

    fn remove_edge(graph: &mut BTreeMap<Point, BTreeSet<Point>>, start: Point, end: Point) -> bool {
        let Some(ends) = graph.get_mut(&start) else {
            return false;
        };
        if !ends.remove(&end) {
            return false;
        }
        if ends.is_empty() {
            graph.remove(&start);
        }
        true
    }

    fn ring(&mut self) -> TilegramResult<Ring> {
        let start = self
            .graph
            .iter()
            .find(|(_, ends)| ends.len() == 1)
            .map(|(p, _)| *p);
        let Some(start) = start else {
            let (point, ends) = self
                .graph
                .iter()
                .next()
                .map(|(p, e)| (*p, e.len()))
                .unwrap_or((Point::ORIGIN, 0));
            return Err(TilegramError::MalformedBoundary {
                point,
                out_degree: ends,
            });
        };

        let mut ring = vec![start];
        let mut p = start;
        loop {
            let out_degree = self.graph.get(&p).map_or(0, BTreeSet::len);
            if out_degree != 1 {
                return Err(TilegramError::MalformedBoundary {
                    point: p,
                    out_degree,
                });
            }
            let next = self
                .graph
                .remove(&p)
                .and_then(|ends| ends.into_iter().next())
                .ok_or_else(|| TilegramError::MalformedBoundary {
                    point: p,
                    out_degree: 0,
                })?;
            ring.push(next);
            p = next;
            if p == start {
                break;
            }
        }
        Ok(ring)
    }
}

impl fmt::Display for HullBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HullBuilder {{")?;
        for (start, ends) in &self.graph {
            for end in ends {
                writeln!(f, "\t{} -> {}", start, end)?;
            }
        }
        write!(f, "}}")
    }
}

/// Merges the given polygons into their outer boundary.
pub fn hull<'a, I>(tolerance: f64, polygons: I) -> TilegramResult<Polygon>
where
    I: IntoIterator<Item = &'a Polygon>,
{
    let mut builder = HullBuilder::new(tolerance)?;
    for polygon in polygons {
        builder.add_polygon(polygon);
    }
    builder.polygon()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn poly(points: &[(f64, f64)]) -> Polygon {
        Polygon::from_ring(points.iter().map(|&(x, y)| p(x, y)).collect()).unwrap()
    }

    fn unit_square(x: f64, y: f64) -> Polygon {
        poly(&[(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y + 1.0)])
    }

    fn simplified_rings(polygon: &Polygon) -> Vec<Ring> {
        let mut rings = polygon.simplify_collinear(1e-9).into_rings();
        rings.sort();
        rings
    }

    #[test]
    fn test_shared_edge_cancels() {
        let merged = hull(0.0, &[unit_square(0.0, 0.0), unit_square(1.0, 0.0)]).unwrap();
        assert_eq!(merged.len(), 1);
        let ring = &merged.rings()[0];
        assert!(!ring.contains(&p(1.0, 0.5)));
        // Closed ring over (0,0),(1,0),(2,0),(2,1),(1,1),(0,1).
        assert_eq!(ring.len(), 7);
        assert_eq!(ring.first(), ring.last());

        assert_eq!(
            simplified_rings(&merged),
            vec![vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)]]
        );
    }

    #[test]
    fn test_four_squares_with_offset_vertex() {
        let squares = [
            unit_square(0.0, 0.0),
            unit_square(1.0, 0.0),
            poly(&[(0.0, 1.0), (1.01, 1.0), (1.0, 2.0), (0.0, 2.0)]),
            unit_square(1.0, 1.0),
        ];
        let merged = hull(0.1, &squares).unwrap();
        assert_eq!(
            simplified_rings(&merged),
            vec![vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(0.0, 0.0)]]
        );
    }

    #[test]
    fn test_offset_vertex_in_second_square() {
        let squares = [
            unit_square(0.0, 0.0),
            poly(&[(1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.01)]),
            unit_square(1.0, 1.0),
            unit_square(0.0, 1.0),
        ];
        let merged = hull(0.1, &squares).unwrap();
        assert_eq!(
            simplified_rings(&merged),
            vec![vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(0.0, 0.0)]]
        );
    }

    #[test]
    fn test_tolerance_closes_sliver() {
        let left = unit_square(0.0, 0.0);
        let right = poly(&[(1.05, 0.0), (2.0, 0.0), (2.0, 1.0), (1.05, 1.0)]);

        let open = hull(0.0, [&left, &right]).unwrap();
        assert_eq!(open.len(), 2, "without tolerance the gap stays open");

        let closed = hull(0.1, [&left, &right]).unwrap();
        assert_eq!(
            simplified_rings(&closed),
            vec![vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)]]
        );
    }

    #[test]
    fn test_duplicate_polygon_cancels_itself() {
        let sq = unit_square(0.0, 0.0);
        let merged = hull(0.0, [&sq, &sq]).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_disjoint_polygons_give_separate_rings() {
        let merged = hull(0.0, &[unit_square(0.0, 0.0), unit_square(5.0, 5.0)]).unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_hole_is_kept() {
        let mut squares = Vec::new();
        for i in 0..3 {
            for j in 0..3 {
                if i != 1 || j != 1 {
                    squares.push(unit_square(i as f64, j as f64));
                }
            }
        }
        let merged = hull(0.0, &squares).unwrap();
        assert_eq!(merged.len(), 2);
        assert!((merged.area() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_corner_contact_is_malformed() {
        let err = hull(0.0, &[unit_square(0.0, 0.0), unit_square(1.0, 1.0)]).unwrap_err();
        match err {
            TilegramError::MalformedBoundary { point, out_degree } => {
                assert_eq!(point, p(1.0, 1.0));
                assert_eq!(out_degree, 2);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_self_edges_are_dropped() {
        let mut builder = HullBuilder::new(0.0).unwrap();
        builder.add_ring(&[p(0.0, 0.0), p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)]);
        assert_eq!(builder.edge_count(), 3);

        let mut snapping = HullBuilder::new(0.5).unwrap();
        snapping.add_edge(p(0.0, 0.0), p(5.0, 0.0));
        snapping.add_edge(p(0.1, 0.0), p(0.0, 0.2));
        assert_eq!(snapping.edge_count(), 1, "edge collapsed by snapping must vanish");
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        assert!(HullBuilder::new(-1.0).is_err());
        assert!(HullBuilder::new(f64::NAN).is_err());
    }

    #[test]
    fn test_display_lists_edges() {
        let mut builder = HullBuilder::new(0.0).unwrap();
        builder.add_edge(p(0.0, 0.0), p(1.0, 0.0));
        let s = builder.to_string();
        assert!(s.contains("(0, 0) -> (1, 0)"), "{}", s);
    }
}
