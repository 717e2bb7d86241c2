// src/lib.rs

//! Hexagonal tilegrams.
//!
//! A tilegram replaces irregular regions (census tracts, counties, ...) with hexagonal
//! tiles of equal size. Records are assigned to the nearest tile, weight is then
//! rebalanced between adjacent tiles, and tiles sharing a dominant group can be merged
//! into boundary polygons.
//!
//! ```no_run
//! use tilegram::prelude::*;
//!
//! # fn run(records: Vec<Data>) -> TilegramResult<()> {
//! let mut hexagram = Hexagram::new(records, 1_000.0)?;
//! hexagram.distribute(&DistributeConfig::new(0.5))?;
//! let _hulls = hexagram.group_hulls(1.0)?;
//! # Ok(())
//! # }
//! ```

pub mod math;
pub mod spatial;
pub mod tilegram;

// Public API
pub mod prelude {
    pub use crate::math::{
        error::{StopReason, TilegramError, TilegramResult},
        geometry::{HullBuilder, Polygon, Ring, hull},
        types::*,
    };
    pub use crate::spatial::{RTreeIndex, SpatialIndex};
    pub use crate::tilegram::{
        CancellationFlag, Data, DistributeConfig, DistributeStats, Hexagram, HexagramConfig,
        HexagramSnapshot, Record, Tile,
    };
}
