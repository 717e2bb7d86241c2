// src/tilegram/tile.rs

use crate::math::{
    geometry::{hexagon, polygon::Polygon},
    types::{Bounds2D, Point},
};
use crate::tilegram::record::Record;
use std::collections::BTreeMap;

/// An individual hexagonal tile of a tilegram.
///
/// The position and shape of a tile never change; only the records assigned to it do.
#[derive(Debug, Clone)]
pub struct Tile<R> {
    center: Point,
    radius: f64,
    index: usize,
    pub(crate) records: Vec<R>,
}

impl<R> Tile<R> {
    pub(crate) fn new(center: Point, radius: f64, index: usize) -> Self {
        Self {
            center,
            radius,
            index,
            records: Vec::new(),
        }
    }

    /// Geometric center of the hexagon.
    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Position of this tile in its hexagram, fixed at construction.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Records currently assigned to this tile, in transfer-history order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Box used for indexing the tile.
    pub fn bounds(&self) -> Bounds2D {
        hexagon::hexagon_bounds(self.center, self.radius)
    }

    /// Tile box grown by half a radius on each side; tiles whose boxes meet are neighbours.
    pub fn neighborhood_bounds(&self) -> Bounds2D {
        self.bounds().expand(self.radius / 2.0)
    }

    /// The hexagon of this tile.
    pub fn polygon(&self) -> Polygon {
        hexagon::hexagon_polygon(self.center, self.radius)
    }
}

impl<R: Record> Tile<R> {
    /// Sum of the weights of the assigned records.
    pub fn weight(&self) -> f64 {
        self.records.iter().map(|r| r.weight()).sum()
    }

    /// The group with the most summed weight among the assigned records.
    ///
    /// Ties go to the lexicographically smallest group label. A tile without records has
    /// no dominant group.
    pub fn dominant_group(&self) -> Option<&str> {
        let mut group_weights: BTreeMap<&str, f64> = BTreeMap::new();
        for r in &self.records {
            *group_weights.entry(r.group()).or_insert(0.0) += r.weight();
        }

        let mut best: Option<(&str, f64)> = None;
        for (group, weight) in group_weights {
            if best.is_none_or(|(_, w)| weight > w) {
                best = Some((group, weight));
            }
        }
        best.map(|(group, _)| group)
    }
}
