// src/tilegram/mod.rs
pub mod config;
pub mod distribute;
pub mod export;
pub mod hexagram;
pub mod record;
pub mod tile;

pub use config::{DistributeConfig, HexagramConfig};
pub use distribute::{CancellationFlag, DistributeStats};
pub use export::{HexagramSnapshot, TileSnapshot};
pub use hexagram::Hexagram;
pub use record::{Data, Record};
pub use tile::Tile;
