// src/math/error.rs
use crate::math::types::Point;
use std::fmt;
use thiserror::Error;

/// Why a redistribution run stopped before reaching its target ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured maximum number of outer iterations was used up.
    IterationLimit,
    /// The configured wall-clock deadline passed.
    Deadline,
    /// The caller raised the cancellation flag.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::IterationLimit => write!(f, "iteration limit reached"),
            StopReason::Deadline => write!(f, "deadline exceeded"),
            StopReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TilegramError {
    #[error(
        "No hexagons of radius {radius} intersect the input ({records} records); use a smaller radius"
    )]
    EmptyGrid { radius: f64, records: usize },

    #[error(
        "Distribution did not converge after {iterations} iterations ({reason}): range ratio {ratio} > target {target}"
    )]
    ConvergenceFailure {
        iterations: usize,
        ratio: f64,
        target: f64,
        reason: StopReason,
    },

    #[error("Malformed boundary at {point}: expected out-degree 1, found {out_degree}")]
    MalformedBoundary { point: Point, out_degree: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

pub type TilegramResult<T> = Result<T, TilegramError>;
