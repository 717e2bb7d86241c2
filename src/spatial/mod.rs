// src/spatial/mod.rs
pub mod index;

pub use index::{Indexed, RTreeIndex, Slot, SpatialIndex};
