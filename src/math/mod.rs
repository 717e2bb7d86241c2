pub mod error;
pub mod geometry;
pub mod types;
pub mod utils;

pub use error::{StopReason, TilegramError, TilegramResult};
pub use types::*;
