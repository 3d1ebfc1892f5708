//! Per-pixel, per-source accumulation: the numerically dense inner loop.
//!
//! All overlap geometry runs in the source raster's pixel space — the
//! destination pixel quad is mapped in once, candidate source pixels are
//! axis-aligned unit squares there. Clipping at sub-pixel scale in
//! geographic degrees would burn most of an f64's resolution on the
//! integer part of the coordinate; pixel space keeps the fraction.

use crate::footprint;
use crate::geom::clip;
use crate::geom::{BoundingBox, Quad};
use crate::raster::RasterSource;

/// What one source raster contributed to one destination pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contribution {
    /// Σ overlap_area * source_value, in source-pixel-area units.
    pub sum: f64,
    /// Whether any clip produced a real (super-epsilon) overlap.
    pub overlapped: bool,
}

/// Accumulate one source raster's contribution to one destination pixel.
///
/// `dest_pixel` is the destination pixel's geographic corner quad. Every
/// candidate source pixel inside the conservative search bounds is
/// drop-shrunk, fast-rejected by bounding box, clipped against the
/// destination quad, and its `area * value` added to the sum.
///
/// A source pixel that overlaps but fails to read contributes zero; the
/// scan continues with the remaining candidates.
pub fn accumulate_pixel(
    dest_pixel: &Quad,
    source: &dyn RasterSource,
    drop_factor: f64,
    min_overlap_area: f64,
) -> Contribution {
    let (clip_ring, bounds) =
        footprint::search_bounds(dest_pixel, source.georef(), source.extent());
    let Some(bounds) = bounds else {
        return Contribution::default();
    };
    let clip_bbox = BoundingBox::from_points(&clip_ring);

    let inset = (1.0 - drop_factor) / 2.0;
    let mut result = Contribution::default();

    for row in bounds.rows.clone() {
        for col in bounds.cols.clone() {
            let x0 = col as f64 + inset;
            let x1 = (col + 1) as f64 - inset;
            let y0 = row as f64 + inset;
            let y1 = (row + 1) as f64 - inset;

            // Cheap reject before clipping
            let candidate_bbox = BoundingBox {
                min_x: x0,
                max_x: x1,
                min_y: y0,
                max_y: y1,
            };
            if !candidate_bbox.intersects(&clip_bbox) {
                continue;
            }

            let subject = Quad::axis_aligned(x0, y0, x1, y1).ring();
            let overlap = clip::clip_polygon(&subject, &clip_ring);
            let area = clip::area(&overlap);
            if area > min_overlap_area {
                result.overlapped = true;
                if let Some(value) = source.read(row, col) {
                    result.sum += area * value;
                }
            }
        }
    }
    result
}
