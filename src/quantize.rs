//! Maps planar coordinates onto an integer grid, and back.
//!
//! Quantizing is lossy: `dequantize(quantize(p))` lands within one grid cell
//! (`±scale` per axis) of `p`. Doing it twice with the same bounding box and
//! factor gives the same grid points.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::{BoundingBox, GridPoint, Point};

/// Maps grid coordinates back to planar coordinates:
/// `x = gx * scale[0] + translate[0]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// Returns an error unless `factor` can size a grid: a whole number above 1.
///
/// Grid coordinates run from 0 to `factor - 1`, so a fractional factor would
/// put the far edge of the bounding box past the last grid line.
pub fn check_factor(factor: f64) -> Result<()> {
    if factor.is_finite() && factor > 1.0 && factor.fract() == 0.0 {
        Ok(())
    } else {
        Err(Error::UnsupportedOption(format!("quantization factor must be a whole number above 1; got {}", factor)))
    }
}

fn axis_scale(extent: f64, factor: f64) -> f64 {
    if extent > 0.0 {
        extent / (factor - 1.0)
    } else {
        // Zero-width axis: every coordinate maps to 0 anyway.
        1.0
    }
}

impl Transform {
    /// Returns the Transform that spreads `bbox` over `factor` grid lines per
    /// axis.
    pub fn new(bbox: &BoundingBox, factor: f64) -> Result<Transform> {
        check_factor(factor)?;

        if bbox.is_empty() {
            return Ok(Transform { scale: [ 1.0, 1.0 ], translate: [ 0.0, 0.0 ] });
        }

        Ok(Transform {
            scale: [ axis_scale(bbox.width(), factor), axis_scale(bbox.height(), factor) ],
            translate: [ bbox.xmin, bbox.ymin ],
        })
    }

    pub fn quantize(&self, point: &Point) -> GridPoint {
        GridPoint(
            ((point.0 - self.translate[0]) / self.scale[0]).round() as i64,
            ((point.1 - self.translate[1]) / self.scale[1]).round() as i64,
        )
    }

    pub fn dequantize(&self, point: &GridPoint) -> Point {
        Point(
            point.0 as f64 * self.scale[0] + self.translate[0],
            point.1 as f64 * self.scale[1] + self.translate[1],
        )
    }

    /// Returns the planar point at the center of `point`'s grid cell.
    pub fn snap(&self, point: &Point) -> Point {
        self.dequantize(&self.quantize(point))
    }
}

/// Quantizes every arc. Returns absolute (not delta-encoded) grid arcs.
pub fn quantize(arcs: &[Vec<Point>], bbox: &BoundingBox, factor: f64) -> Result<(Vec<Vec<GridPoint>>, Transform)> {
    let transform = Transform::new(bbox, factor)?;

    let grid_arcs = arcs.iter()
        .map(|arc| arc.iter().map(|p| transform.quantize(p)).collect())
        .collect();

    Ok((grid_arcs, transform))
}

/// Inverse of `quantize()`, given absolute grid arcs.
pub fn dequantize(arcs: &[Vec<GridPoint>], transform: &Transform) -> Vec<Vec<Point>> {
    arcs.iter()
        .map(|arc| arc.iter().map(|p| transform.dequantize(p)).collect())
        .collect()
}
