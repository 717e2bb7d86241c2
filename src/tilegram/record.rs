// src/tilegram/record.rs

use crate::math::{
    error::{TilegramError, TilegramResult},
    geometry::polygon::{Polygon, geo_centroid_and_bounds},
    types::{Bounds2D, Point},
};
use std::rc::Rc;
use std::sync::Arc;

/// A weighted, grouped spatial unit that is assigned to one tile of a tilegram.
///
/// Typical records are census block groups weighted by population and grouped by
/// county or state.
pub trait Record {
    /// Stable point used for nearest-tile assignment.
    fn centroid(&self) -> Point;

    /// Bounding box consistent with the geometry.
    fn bounds(&self) -> Bounds2D;

    /// Value of the characteristic attribute, e.g. population. Never negative.
    fn weight(&self) -> f64;

    /// Group the record belongs to, e.g. a county name.
    fn group(&self) -> &str;

    /// Geometry of the record, if it carries one.
    ///
    /// The tilegram itself only works with centroids and bounds; this is passed through
    /// for callers and renderers that draw the source regions next to the tiles.
    fn polygon(&self) -> Option<&Polygon> {
        None
    }
}

macro_rules! forward_record {
    ($($ptr:ty),*) => {$(
        impl<R: Record + ?Sized> Record for $ptr {
            fn centroid(&self) -> Point {
                (**self).centroid()
            }
            fn bounds(&self) -> Bounds2D {
                (**self).bounds()
            }
            fn weight(&self) -> f64 {
                (**self).weight()
            }
            fn group(&self) -> &str {
                (**self).group()
            }
            fn polygon(&self) -> Option<&Polygon> {
                (**self).polygon()
            }
        }
    )*};
}

forward_record!(&R, Box<R>, Rc<R>, Arc<R>);

/// Concrete [`Record`] built from a polygon, a weight and a group label.
///
/// Centroid and bounds are computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    polygon: Polygon,
    centroid: Point,
    bounds: Bounds2D,
    weight: f64,
    group: String,
}

impl Data {
    pub fn new(polygon: Polygon, weight: f64, group: impl Into<String>) -> TilegramResult<Self> {
        let centroid = polygon
            .centroid()
            .ok_or_else(|| TilegramError::InvalidConfiguration {
                message: "Record polygon has no vertices".to_string(),
            })?;
        let bounds = polygon.bounds();
        Self::with_parts(polygon, centroid, bounds, weight, group.into())
    }

    /// Builds a record from a `geo` polygon, using `geo` for centroid and bounds.
    pub fn from_geo_polygon(
        polygon: &geo::Polygon<f64>,
        weight: f64,
        group: impl Into<String>,
    ) -> TilegramResult<Self> {
        let (centroid, bounds) = geo_centroid_and_bounds(polygon).ok_or_else(|| {
            TilegramError::InvalidConfiguration {
                message: "Record polygon is empty".to_string(),
            }
        })?;
        Self::with_parts(polygon.into(), centroid, bounds, weight, group.into())
    }

    /// Builds a record from a `geo` multipolygon, using `geo` for centroid and bounds.
    pub fn from_geo_multi_polygon(
        polygon: &geo::MultiPolygon<f64>,
        weight: f64,
        group: impl Into<String>,
    ) -> TilegramResult<Self> {
        let (centroid, bounds) = geo_centroid_and_bounds(polygon).ok_or_else(|| {
            TilegramError::InvalidConfiguration {
                message: "Record multipolygon is empty".to_string(),
            }
        })?;
        Self::with_parts(polygon.into(), centroid, bounds, weight, group.into())
    }

    fn with_parts(
        polygon: Polygon,
        centroid: Point,
        bounds: Bounds2D,
        weight: f64,
        group: String,
    ) -> TilegramResult<Self> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(TilegramError::InvalidConfiguration {
                message: format!("Record weight must be finite and >= 0, got {}", weight),
            });
        }
        Ok(Self {
            polygon,
            centroid,
            bounds,
            weight,
            group,
        })
    }
}

impl Record for Data {
    fn centroid(&self) -> Point {
        self.centroid
    }

    fn bounds(&self) -> Bounds2D {
        self.bounds
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn group(&self) -> &str {
        &self.group
    }

    fn polygon(&self) -> Option<&Polygon> {
        Some(&self.polygon)
    }
}
