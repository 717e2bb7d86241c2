// src/math/geometry/mod.rs

pub mod hexagon;
pub mod hull;
pub mod polygon;

pub use self::hexagon::{hexagon_bounds, hexagon_centers, hexagon_polygon, hexagon_vertices};
pub use self::hull::{HullBuilder, hull};
pub use self::polygon::{Polygon, Ring, simplify_ring};
