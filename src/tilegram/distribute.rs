// src/tilegram/distribute.rs

//! # Distribute Module
//!
//! Iterative weight rebalancing between adjacent tiles. Every outer iteration moves records
//! from tiles heavier than the mean towards lighter neighbours until the range ratio of the
//! tile weights drops to the configured target. The loop is bounded by an iteration budget,
//! an optional deadline and an optional cancellation flag.

use crate::math::error::{StopReason, TilegramError, TilegramResult};
use crate::tilegram::{config::DistributeConfig, hexagram::Hexagram, record::Record, tile::Tile};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Shared flag a caller raises to stop a running distribution.
///
/// The flag is polled once per outer iteration.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of a successful distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributeStats {
    /// Outer iterations run.
    pub iterations: usize,
    /// Total number of record moves between tiles.
    pub transfers: usize,
    /// Range ratio reached.
    pub ratio: f64,
}

impl<R: Record> Hexagram<R> {
    /// Redistributes records among tiles until `(max - min) / mean <= config.range_ratio`.
    ///
    /// # Errors
    /// * [`TilegramError::InvalidConfiguration`] for a negative target or a zero iteration budget.
    /// * [`TilegramError::ConvergenceFailure`] if the iteration budget or deadline runs out
    ///   first. Records moved so far stay moved.
    pub fn distribute(&mut self, config: &DistributeConfig) -> TilegramResult<DistributeStats> {
        self.distribute_with_cancel(config, None)
    }

    /// Like [`Hexagram::distribute`], additionally stopping with
    /// [`StopReason::Cancelled`] once `cancel` is raised.
    pub fn distribute_with_cancel(
        &mut self,
        config: &DistributeConfig,
        cancel: Option<&CancellationFlag>,
    ) -> TilegramResult<DistributeStats> {
        config.validate()?;
        let target = config.range_ratio;
        let started = Instant::now();

        // Tiles never move, so adjacency is fixed for the whole run.
        let neighbors: Vec<Vec<usize>> = (0..self.tiles.len())
            .map(|i| self.neighbors(i))
            .collect();

        let mut iterations = 0;
        let mut transfers = 0;
        loop {
            let (ratio, mean) = self.range_ratio();
            if ratio <= target {
                info!(
                    "Distribution converged after {} iterations ({} transfers): ratio {:.4} <= {}",
                    iterations, transfers, ratio, target
                );
                return Ok(DistributeStats {
                    iterations,
                    transfers,
                    ratio,
                });
            }

            let stop = if iterations >= config.max_iterations {
                Some(StopReason::IterationLimit)
            } else if config
                .deadline
                .is_some_and(|deadline| started.elapsed() >= deadline)
            {
                Some(StopReason::Deadline)
            } else if cancel.is_some_and(CancellationFlag::is_cancelled) {
                Some(StopReason::Cancelled)
            } else {
                None
            };
            if let Some(reason) = stop {
                warn!(
                    "Distribution stopped ({}) after {} iterations: ratio {:.4} > {}",
                    reason, iterations, ratio, target
                );
                return Err(TilegramError::ConvergenceFailure {
                    iterations,
                    ratio,
                    target,
                    reason,
                });
            }

            iterations += 1;
            let mut moved = 0;
            for i in 0..self.tiles.len() {
                if self.tiles[i].weight() <= mean {
                    continue;
                }
                for &j in &neighbors[i] {
                    let wdiff = self.tiles[i].weight() - self.tiles[j].weight();
                    if wdiff > 0.0 {
                        let (source, dest) = pair_mut(&mut self.tiles, i, j);
                        moved += source.transfer_to(dest, wdiff / 2.0);
                    }
                }
            }
            transfers += moved;
            debug!(
                "Distribution iteration {}: ratio {:.4}, mean {:.4}, {} records moved",
                iterations, ratio, mean, moved
            );
        }
    }
}

impl<R: Record> Tile<R> {
    /// Moves records worth at least `amount` to `target` and returns how many moved.
    ///
    /// Records of the target's dominant group go first, lighter records before heavier
    /// ones. The moved records are appended to `target` in that order; the records that
    /// stay keep their relative order. A record is never split, so the last one moved may
    /// overshoot `amount`.
    pub(crate) fn transfer_to(&mut self, target: &mut Tile<R>, amount: f64) -> usize {
        let target_group = target.dominant_group().map(str::to_owned);
        let matches = |r: &R| target_group.as_deref() == Some(r.group());

        let mut order: Vec<usize> = (0..self.records.len()).collect();
        order.sort_by(|&a, &b| {
            let (ra, rb) = (&self.records[a], &self.records[b]);
            matches(rb)
                .cmp(&matches(ra))
                .then_with(|| ra.weight().total_cmp(&rb.weight()))
        });

        let mut take = 0;
        let mut sum = 0.0;
        for &k in &order {
            sum += self.records[k].weight();
            take += 1;
            if sum >= amount {
                break;
            }
        }

        let mut slots: Vec<Option<R>> = self.records.drain(..).map(Some).collect();
        for &k in &order[..take] {
            if let Some(record) = slots[k].take() {
                target.records.push(record);
            }
        }
        self.records = slots.into_iter().flatten().collect();
        take
    }
}

/// Mutable references to two distinct elements of a slice.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = items.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::types::Point;
    use crate::tilegram::hexagram::tests::{random_grid, square, stacked_rects};
    use crate::tilegram::record::Data;
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn item(weight: f64, group: &str) -> Data {
        Data::new(square(0.0, 0.0, 1.0), weight, group).unwrap()
    }

    fn tile_with(items: Vec<Data>) -> Tile<Data> {
        let mut tile = Tile::new(Point::ORIGIN, 1.0, 0);
        tile.records = items;
        tile
    }

    fn weights(tile: &Tile<Data>) -> Vec<f64> {
        tile.records().iter().map(|r| r.weight()).collect()
    }

    /// Two adjacent tiles; the lower one holds `load` and the upper one only its anchor.
    fn two_tiles(load: Vec<Data>) -> Hexagram<Data> {
        let (lower, upper) = stacked_rects();
        let mut records = vec![
            Data::new(lower, 0.0, "a").unwrap(),
            Data::new(upper, 0.0, "a").unwrap(),
        ];
        records.extend(load);
        let hexagram = Hexagram::new(records, 1.0).unwrap();
        assert_eq!(hexagram.len(), 2);
        assert_eq!(hexagram.neighbors(0), vec![1]);
        hexagram
    }

    fn small_squares(n: usize, weight: f64) -> Vec<Data> {
        (0..n)
            .map(|k| Data::new(square(-0.5 + 0.01 * k as f64, -0.5, 0.01), weight, "a").unwrap())
            .collect()
    }

    #[test]
    fn test_transfer_prefers_target_group_then_light_records() {
        let mut source = tile_with(vec![
            item(5.0, "b"),
            item(1.0, "a"),
            item(3.0, "a"),
            item(2.0, "b"),
            item(4.0, "a"),
        ]);
        let mut target = tile_with(vec![item(10.0, "a")]);

        let moved = source.transfer_to(&mut target, 4.5);
        assert_eq!(moved, 3);
        assert_eq!(weights(&target), vec![10.0, 1.0, 3.0, 4.0]);
        assert_eq!(weights(&source), vec![5.0, 2.0]);
    }

    #[test]
    fn test_transfer_to_empty_tile_uses_weight_order() {
        let mut source = tile_with(vec![item(3.0, "x"), item(1.0, "y"), item(2.0, "x")]);
        let mut target = tile_with(Vec::new());

        assert_eq!(source.transfer_to(&mut target, 2.5), 2);
        assert_eq!(weights(&target), vec![1.0, 2.0]);
        assert_eq!(weights(&source), vec![3.0]);
    }

    #[test]
    fn test_transfer_overshoots_on_single_record() {
        let mut source = tile_with(vec![item(7.0, "x")]);
        let mut target = tile_with(Vec::new());
        assert_eq!(source.transfer_to(&mut target, 0.5), 1);
        assert!(source.is_empty());
        assert_eq!(target.weight(), 7.0);
    }

    #[test]
    fn test_loose_target_needs_no_iterations() {
        let mut hexagram = Hexagram::new(random_grid(4, 8, 8), 1.0).unwrap();
        let before: Vec<usize> = hexagram.tiles().iter().map(|t| t.records().len()).collect();

        let stats = hexagram.distribute(&DistributeConfig::new(1e9)).unwrap();
        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.transfers, 0);

        let after: Vec<usize> = hexagram.tiles().iter().map(|t| t.records().len()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_distribute_converges_between_two_tiles() {
        let mut hexagram = two_tiles(small_squares(20, 1.0));
        let (ratio, _) = hexagram.range_ratio();
        assert_relative_eq!(ratio, 2.0);

        let stats = hexagram.distribute(&DistributeConfig::new(0.25)).unwrap();
        assert_eq!(stats.iterations, 1);
        // The zero-weight anchor moves first, then ten unit records.
        assert_eq!(stats.transfers, 11);
        assert!(stats.ratio <= 0.25 + 1e-12);
        assert_relative_eq!(hexagram.weight(0).unwrap(), 10.0);
        assert_relative_eq!(hexagram.weight(1).unwrap(), 10.0);
    }

    #[test]
    fn test_weight_is_conserved() {
        let records = random_grid(7, 10, 10);
        let total: f64 = records.iter().map(|r| r.weight()).sum();
        let mut hexagram = Hexagram::new(records, 1.0).unwrap();

        let config = DistributeConfig::new(0.5).with_max_iterations(200);
        match hexagram.distribute(&config) {
            Ok(stats) => assert!(stats.ratio <= 0.5 + 1e-12),
            Err(TilegramError::ConvergenceFailure { iterations, .. }) => {
                assert_eq!(iterations, 200)
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
        assert_relative_eq!(hexagram.total_weight(), total, epsilon = 1e-6);
        assert_eq!(hexagram.record_count(), 100);
    }

    #[test]
    fn test_unreachable_target_hits_iteration_limit() {
        // A single heavy record can only bounce between the two tiles.
        let mut hexagram = two_tiles(small_squares(1, 20.0));
        let config = DistributeConfig::new(0.5).with_max_iterations(5);

        let err = hexagram.distribute(&config).unwrap_err();
        match err {
            TilegramError::ConvergenceFailure {
                iterations,
                reason,
                target,
                ratio,
            } => {
                assert_eq!(iterations, 5);
                assert_eq!(reason, StopReason::IterationLimit);
                assert_eq!(target, 0.5);
                assert!(ratio > target);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_relative_eq!(hexagram.total_weight(), 20.0);
    }

    #[test]
    fn test_cancel_and_deadline_stop_the_run() {
        let mut hexagram = two_tiles(small_squares(1, 20.0));

        let flag = CancellationFlag::new();
        flag.cancel();
        let err = hexagram
            .distribute_with_cancel(&DistributeConfig::new(0.5), Some(&flag.clone()))
            .unwrap_err();
        assert!(matches!(
            err,
            TilegramError::ConvergenceFailure {
                iterations: 0,
                reason: StopReason::Cancelled,
                ..
            }
        ));

        let config = DistributeConfig::new(0.5).with_deadline(Duration::ZERO);
        let err = hexagram.distribute(&config).unwrap_err();
        assert!(matches!(
            err,
            TilegramError::ConvergenceFailure {
                reason: StopReason::Deadline,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_target_rejected() {
        let mut hexagram = Hexagram::new(random_grid(1, 3, 3), 1.0).unwrap();
        let err = hexagram.distribute(&DistributeConfig::new(-1.0)).unwrap_err();
        assert!(matches!(err, TilegramError::InvalidConfiguration { .. }));
    }
}
