// src/tilegram/export.rs

use crate::math::geometry::polygon::Ring;
use crate::math::types::{Bounds2D, Point};
use crate::tilegram::{hexagram::Hexagram, record::Record};
use serde::Serialize;

/// Render-ready view of a single tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSnapshot {
    pub index: usize,
    pub center: Point,
    /// Open hexagon ring, counter-clockwise.
    pub hexagon: Ring,
    pub weight: f64,
    pub group: Option<String>,
    pub records: usize,
}

/// Render-ready view of a whole hexagram, detached from the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HexagramSnapshot {
    pub radius: f64,
    pub bounds: Bounds2D,
    pub tiles: Vec<TileSnapshot>,
}

impl<R: Record> Hexagram<R> {
    pub fn snapshot(&self) -> HexagramSnapshot {
        let tiles = self
            .tiles()
            .iter()
            .map(|tile| TileSnapshot {
                index: tile.index(),
                center: tile.center(),
                hexagon: tile.polygon().into_rings().into_iter().next().unwrap_or_default(),
                weight: tile.weight(),
                group: tile.dominant_group().map(str::to_owned),
                records: tile.records().len(),
            })
            .collect();

        HexagramSnapshot {
            radius: self.radius(),
            bounds: self.bounds(),
            tiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilegram::hexagram::tests::random_grid;
    use approx::assert_relative_eq;

    #[test]
    fn test_snapshot_matches_hexagram() {
        let hexagram = Hexagram::new(random_grid(21, 5, 5), 1.0).unwrap();
        let snapshot = hexagram.snapshot();

        assert_eq!(snapshot.tiles.len(), hexagram.len());
        let total: f64 = snapshot.tiles.iter().map(|t| t.weight).sum();
        assert_relative_eq!(total, hexagram.total_weight());
        let records: usize = snapshot.tiles.iter().map(|t| t.records).sum();
        assert_eq!(records, 25);
        for (t, tile) in snapshot.tiles.iter().zip(hexagram.tiles()) {
            assert_eq!(t.hexagon.len(), 6);
            assert_eq!(t.group.is_some(), !tile.is_empty());
        }
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let hexagram = Hexagram::new(random_grid(2, 3, 3), 1.0).unwrap();
        let json = serde_json::to_value(hexagram.snapshot()).unwrap();

        assert_eq!(json["radius"], 1.0);
        let tiles = json["tiles"].as_array().unwrap();
        assert_eq!(tiles.len(), hexagram.len());
        assert!(tiles[0]["center"]["x"].is_number());
        assert_eq!(tiles[0]["hexagon"].as_array().unwrap().len(), 6);
    }
}
