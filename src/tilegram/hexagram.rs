// src/tilegram/hexagram.rs

//! # Hexagram Module
//!
//! A hexagram is the set of hexagonal tiles of a tilegram together with a spatial index over
//! the tiles. Construction lays two staggered lattices of hexagon centers over the bounding
//! box of the input records, keeps the centers that fall strictly inside at least one record's box,
//! and assigns every record to the tile whose center is nearest to the record's centroid.

use crate::math::{
    error::{TilegramError, TilegramResult},
    geometry::{hexagon, hull::HullBuilder, polygon::Polygon},
    types::{Bounds2D, Point},
};
use crate::spatial::{RTreeIndex, Slot, SpatialIndex};
use crate::tilegram::{config::HexagramConfig, record::Record, tile::Tile};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A hexagonal tilegram.
#[derive(Debug, Clone)]
pub struct Hexagram<R> {
    pub(crate) tiles: Vec<Tile<R>>,
    index: RTreeIndex<Slot>,
    radius: f64,
    bounds: Bounds2D,
}

impl<R: Record> Hexagram<R> {
    /// Creates a tilegram with hexagons of radius `radius` covering the given records.
    ///
    /// # Errors
    /// * [`TilegramError::InvalidConfiguration`] for a non-positive radius or a record with a
    ///   negative or non-finite weight.
    /// * [`TilegramError::EmptyGrid`] if no hexagon intersects any record, e.g. because the
    ///   radius is too large or there are no records.
    pub fn new(records: Vec<R>, radius: f64) -> TilegramResult<Self> {
        Self::from_config(records, &HexagramConfig::new(radius))
    }

    pub fn from_config(records: Vec<R>, config: &HexagramConfig) -> TilegramResult<Self> {
        config.validate()?;
        let radius = config.radius;

        let mut data_index = RTreeIndex::new();
        let mut data_bounds = Bounds2D::empty();
        for (i, record) in records.iter().enumerate() {
            let weight = record.weight();
            if !weight.is_finite() || weight < 0.0 {
                return Err(TilegramError::InvalidConfiguration {
                    message: format!("Record {} has invalid weight {}", i, weight),
                });
            }
            if !record.centroid().is_finite() {
                return Err(TilegramError::InvalidConfiguration {
                    message: format!("Record {} has a non-finite centroid", i),
                });
            }
            let bounds = record.bounds();
            data_bounds.extend(&bounds);
            data_index.insert(Slot::centered(i, bounds));
        }

        let mut hexagram = Self {
            tiles: Vec::new(),
            index: RTreeIndex::new(),
            radius,
            bounds: Bounds2D::empty(),
        };

        for center in hexagon::hexagon_centers(&data_bounds, radius) {
            // A center on the edge of a record box does not occupy it.
            let occupied = data_index
                .search_intersecting(&Bounds2D::of_point(center))
                .into_iter()
                .any(|slot| slot.bounds.interior_contains(center));
            if !occupied {
                continue;
            }
            let tile = Tile::new(center, radius, hexagram.tiles.len());
            hexagram
                .index
                .insert(Slot::new(tile.index(), tile.neighborhood_bounds(), center));
            hexagram.bounds.extend(&tile.bounds());
            hexagram.tiles.push(tile);
        }

        if hexagram.tiles.is_empty() {
            return Err(TilegramError::EmptyGrid {
                radius,
                records: records.len(),
            });
        }

        let record_count = records.len();
        for record in records {
            hexagram.add(record)?;
        }

        info!(
            "Built hexagram: {} tiles of radius {} for {} records, bounds {}",
            hexagram.tiles.len(),
            radius,
            record_count,
            hexagram.bounds
        );
        Ok(hexagram)
    }

    /// Assigns a record to the tile nearest its centroid and returns that tile's index.
    fn add(&mut self, record: R) -> TilegramResult<usize> {
        let centroid = record.centroid();
        let slot = self
            .index
            .nearest(centroid)
            .ok_or(TilegramError::EmptyGrid {
                radius: self.radius,
                records: 0,
            })?;
        let i = slot.index;
        self.tiles[i].records.push(record);
        Ok(i)
    }

    /// Weight of tile `i`, or `None` if there is no such tile.
    pub fn weight(&self, i: usize) -> Option<f64> {
        self.tiles.get(i).map(Tile::weight)
    }

    pub fn total_weight(&self) -> f64 {
        self.tiles.iter().map(Tile::weight).sum()
    }

    /// Indices of the tiles adjacent to tile `i` (not including `i` itself).
    ///
    /// Two tiles are adjacent when their neighbourhood boxes (hexagon box grown by half a
    /// radius) intersect. The tile index stores exactly those boxes.
    pub fn neighbors(&self, i: usize) -> Vec<usize> {
        let Some(tile) = self.tiles.get(i) else {
            return Vec::new();
        };
        let mut out: Vec<usize> = self
            .index
            .search_intersecting(&tile.neighborhood_bounds())
            .into_iter()
            .map(|slot| slot.index)
            .filter(|&j| j != i)
            .collect();
        out.sort_unstable();
        out
    }

    /// Range of tile weights divided by their mean, returned together with the mean.
    ///
    /// A hexagram whose tiles all weigh nothing is perfectly even and has ratio 0.
    pub fn range_ratio(&self) -> (f64, f64) {
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        let mut mean = 0.0;
        for tile in &self.tiles {
            let w = tile.weight();
            max = max.max(w);
            min = min.min(w);
            mean += w;
        }
        mean /= self.tiles.len() as f64;
        if mean <= 0.0 {
            return (0.0, mean);
        }
        ((max - min) / mean, mean)
    }

    /// Combined hexagon geometry of the tiles of each dominant group.
    ///
    /// `tolerance` is the distance two points can be apart while still being considered the
    /// same location; it keeps slivers out of the result. Tiles without records belong to
    /// no group and are left out.
    pub fn group_hulls(&self, tolerance: f64) -> TilegramResult<BTreeMap<String, Polygon>> {
        let mut builders: BTreeMap<String, HullBuilder> = BTreeMap::new();
        for tile in &self.tiles {
            let Some(group) = tile.dominant_group() else {
                continue;
            };
            if !builders.contains_key(group) {
                builders.insert(group.to_string(), HullBuilder::new(tolerance)?);
            }
            if let Some(builder) = builders.get_mut(group) {
                builder.add_polygon(&tile.polygon());
            }
        }

        let mut hulls = BTreeMap::new();
        for (group, builder) in builders {
            let polygon = builder.polygon()?;
            debug!("Group '{}' hull has {} rings", group, polygon.len());
            hulls.insert(group, polygon);
        }
        Ok(hulls)
    }
}

impl<R> Hexagram<R> {
    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile<R>] {
        &self.tiles
    }

    pub fn tile(&self, i: usize) -> Option<&Tile<R>> {
        self.tiles.get(i)
    }

    /// Bounding box of all tile hexagons.
    pub fn bounds(&self) -> Bounds2D {
        self.bounds
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn record_count(&self) -> usize {
        self.tiles.iter().map(|t| t.records.len()).sum()
    }

    /// Index of the tile whose center is nearest to `point`.
    pub fn nearest_tile(&self, point: Point) -> Option<usize> {
        self.index.nearest(point).map(|slot| slot.index)
    }

    /// Dissolves the tilegram and hands the records back, tile by tile.
    pub fn into_records(self) -> Vec<R> {
        self.tiles.into_iter().flat_map(|t| t.records).collect()
    }
}
