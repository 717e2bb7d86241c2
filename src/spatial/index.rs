// src/spatial/index.rs

//! # Spatial Index Module
//!
//! Bounding-box index over a dynamic set of objects with three queries: insert, search by
//! intersecting box, and nearest neighbour to a point. The grid code only depends on the
//! [`SpatialIndex`] trait; [`RTreeIndex`] backs it with an `rstar` R*-tree.

use crate::math::types::{Bounds2D, Point};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};

/// An object that can be stored in a spatial index.
pub trait Indexed {
    /// Box used for intersection queries.
    fn bounds(&self) -> Bounds2D;

    /// Point used for nearest-neighbour queries.
    fn anchor(&self) -> Point;
}

/// Capability interface for the spatial queries used by the tilegram.
pub trait SpatialIndex<T: Indexed> {
    fn insert(&mut self, item: T);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All items whose bounds intersect `bounds` (touching counts).
    fn search_intersecting(&self, bounds: &Bounds2D) -> Vec<&T>;

    /// The item whose anchor is closest to `point` in Euclidean distance.
    ///
    /// Ties resolve the same way for the same insertion sequence.
    fn nearest(&self, point: Point) -> Option<&T>;
}

/// A plain index slot: an integer id with a box and an anchor point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub index: usize,
    pub bounds: Bounds2D,
    pub anchor: Point,
}

impl Slot {
    pub fn new(index: usize, bounds: Bounds2D, anchor: Point) -> Self {
        Self {
            index,
            bounds,
            anchor,
        }
    }

    /// Slot anchored at the center of its box.
    pub fn centered(index: usize, bounds: Bounds2D) -> Self {
        Self::new(index, bounds, bounds.center())
    }
}

impl Indexed for Slot {
    fn bounds(&self) -> Bounds2D {
        self.bounds
    }

    fn anchor(&self) -> Point {
        self.anchor
    }
}

/// R*-tree backed [`SpatialIndex`].
///
/// Boxes and anchors live in two trees that both point into `items`, so box queries see
/// the full bounds while nearest queries measure exact anchor distances.
#[derive(Debug, Clone)]
pub struct RTreeIndex<T> {
    items: Vec<T>,
    boxes: RTree<GeomWithData<Rectangle<[f64; 2]>, usize>>,
    anchors: RTree<GeomWithData<[f64; 2], usize>>,
}

impl<T> Default for RTreeIndex<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            boxes: RTree::new(),
            anchors: RTree::new(),
        }
    }
}

impl<T> RTreeIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Indexed> SpatialIndex<T> for RTreeIndex<T> {
    fn insert(&mut self, item: T) {
        let slot = self.items.len();
        let bounds = item.bounds();
        if !bounds.is_empty() {
            self.boxes
                .insert(GeomWithData::new(Rectangle::from_aabb(bounds.into()), slot));
        }
        self.anchors
            .insert(GeomWithData::new(item.anchor().to_array(), slot));
        self.items.push(item);
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn search_intersecting(&self, bounds: &Bounds2D) -> Vec<&T> {
        if bounds.is_empty() {
            return Vec::new();
        }
        let query: AABB<[f64; 2]> = (*bounds).into();
        self.boxes
            .locate_in_envelope_intersecting(&query)
            .map(|e| &self.items[e.data])
            .collect()
    }

    fn nearest(&self, point: Point) -> Option<&T> {
        self.anchors
            .nearest_neighbor(&point.to_array())
            .map(|e| &self.items[e.data])
    }
}
