// src/tilegram/config.rs

use crate::math::error::{TilegramError, TilegramResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for building a hexagonal tile grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexagramConfig {
    /// Radius of each hexagonal tile, in the unit system of the input records.
    pub radius: f64,
}

impl Default for HexagramConfig {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

impl HexagramConfig {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn validate(&self) -> TilegramResult<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(TilegramError::InvalidConfiguration {
                message: format!("Hexagon radius must be finite and > 0, got {}", self.radius),
            });
        }
        Ok(())
    }
}

/// Configuration for redistributing weight among tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributeConfig {
    /// Target for `(max - min) / mean` of the tile weights.
    pub range_ratio: f64,
    /// Upper bound on outer iterations before reporting a convergence failure.
    pub max_iterations: usize,
    /// Optional wall-clock budget for one run.
    pub deadline: Option<Duration>,
}

impl Default for DistributeConfig {
    fn default() -> Self {
        Self {
            range_ratio: 1.0,
            max_iterations: 10_000,
            deadline: None,
        }
    }
}

impl DistributeConfig {
    pub fn new(range_ratio: f64) -> Self {
        Self {
            range_ratio,
            ..Default::default()
        }
    }

    pub fn with_range_ratio(mut self, range_ratio: f64) -> Self {
        self.range_ratio = range_ratio;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn validate(&self) -> TilegramResult<()> {
        if self.range_ratio.is_nan() || self.range_ratio < 0.0 {
            return Err(TilegramError::InvalidConfiguration {
                message: format!("Range ratio must be >= 0, got {}", self.range_ratio),
            });
        }
        if self.max_iterations == 0 {
            return Err(TilegramError::InvalidConfiguration {
                message: "Distribution needs at least one iteration.".to_string(),
            });
        }
        Ok(())
    }
}
