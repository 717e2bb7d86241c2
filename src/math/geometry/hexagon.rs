// src/math/geometry/hexagon.rs

use crate::math::{
    geometry::polygon::{Polygon, Ring},
    types::{Bounds2D, Point},
    utils::constants::{SQRT_3, TAU},
};

/// Horizontal distance between hexagon centers of the same row family, in radii.
pub const COLUMN_SPACING: f64 = 3.0;

/// Vertical distance between hexagon centers of the same column, in radii.
pub const ROW_SPACING: f64 = SQRT_3;

/// Start offsets of the two interleaved center lattices, in radii.
pub const LATTICE_OFFSETS: [(f64, f64); 2] = [(0.0, 0.0), (-1.5, -1.0)];

/// The six vertices of the regular hexagon with the given center and radius.
///
/// Vertex `i` sits at angle `i * 60°`, so the ring runs counter-clockwise and is
/// left open (the closing edge is implicit).
pub fn hexagon_vertices(center: Point, radius: f64) -> Ring {
    (0..6)
        .map(|i| {
            let angle = TAU / 6.0 * i as f64;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

pub fn hexagon_polygon(center: Point, radius: f64) -> Polygon {
    Polygon::from_rings_unchecked(vec![hexagon_vertices(center, radius)])
}

/// Rectangle used to index a hexagon: half-width `1.5r`, half-height `r√3/2`.
pub fn hexagon_bounds(center: Point, radius: f64) -> Bounds2D {
    Bounds2D::from_center(center, 1.5 * radius, radius * SQRT_3 / 2.0)
}

/// Candidate hexagon centers covering `bounds`, lattice by lattice and column by column.
///
/// Each lattice starts at the lower-left corner of `bounds` shifted by its offset and
/// steps `3r` horizontally and `r√3` vertically while staying within the box maximum.
pub fn hexagon_centers(bounds: &Bounds2D, radius: f64) -> Vec<Point> {
    let dx = COLUMN_SPACING * radius;
    let dy = ROW_SPACING * radius;
    let mut centers = Vec::new();
    if bounds.is_empty() {
        return centers;
    }

    for (ox, oy) in LATTICE_OFFSETS {
        let x0 = bounds.min.x + ox * radius;
        let y0 = bounds.min.y + oy * radius;
        let mut i = 0usize;
        loop {
            let x = x0 + dx * i as f64;
            if x > bounds.max.x {
                break;
            }
            let mut j = 0usize;
            loop {
                let y = y0 + dy * j as f64;
                if y > bounds.max.y {
                    break;
                }
                centers.push(Point::new(x, y));
                j += 1;
            }
            i += 1;
        }
    }
    centers
}
