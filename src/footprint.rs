//! Footprint derivation: raster corner quads, per-pixel quads, and the
//! conservative source-pixel search bounds for one destination pixel.

use crate::georef::{GeoPoint, Georeference};
use crate::geom::Quad;

/// Geographic quad of a raster's four corner pixels.
///
/// Corners are mapped at `(0,0)`, `(cols,0)`, `(0,rows)`, `(cols,rows)` —
/// the corner-based convention every participating raster shares.
pub fn corner_quad(georef: &dyn Georeference, extent: (usize, usize)) -> Quad {
    let (rows, cols) = (extent.0 as f64, extent.1 as f64);
    Quad::new(
        georef.pixel_to_geo(0.0, 0.0),
        georef.pixel_to_geo(cols, 0.0),
        georef.pixel_to_geo(0.0, rows),
        georef.pixel_to_geo(cols, rows),
    )
}

/// Geographic quad of one pixel, bilinearly interpolated across the
/// raster's corner quad.
///
/// `inset` shrinks the pixel symmetrically toward its center: corner
/// offsets move from `0`/`1` to `inset`/`1 - inset`. An inset of 0 yields
/// the nominal pixel; the drop-shrunk source footprint uses
/// `(1 - drop) / 2`.
pub fn pixel_quad(corners: &Quad, extent: (usize, usize), row: usize, col: usize, inset: f64) -> Quad {
    let rows = extent.0 as f64;
    let cols = extent.1 as f64;
    let c0 = (col as f64 + inset) / cols;
    let c1 = (col as f64 + 1.0 - inset) / cols;
    let r0 = (row as f64 + inset) / rows;
    let r1 = (row as f64 + 1.0 - inset) / rows;
    Quad::new(
        corners.interpolate(c0, r0),
        corners.interpolate(c1, r0),
        corners.interpolate(c0, r1),
        corners.interpolate(c1, r1),
    )
}

/// Inclusive integer ranges of candidate source pixels for one destination
/// pixel, derived from the destination pixel's corners mapped into source
/// pixel space.
///
/// Bounds take `floor(min)..=ceil(max)` over the mapped corners and clamp
/// to the source extent; over-inclusion is intentional (rejecting a
/// non-overlapping candidate later is cheap, missing one is not).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchBounds {
    pub rows: std::ops::RangeInclusive<usize>,
    pub cols: std::ops::RangeInclusive<usize>,
}

/// Map a destination pixel quad into `source`'s pixel space (saturating at
/// the raster edge) and derive the candidate search bounds.
///
/// Returns the mapped quad ring (the clip polygon for overlap computation)
/// together with the bounds; `None` bounds mean no candidate lies inside
/// the source extent.
pub fn search_bounds(
    dest_pixel: &Quad,
    source: &dyn Georeference,
    source_extent: (usize, usize),
) -> ([GeoPoint; 4], Option<SearchBounds>) {
    let mapped: [GeoPoint; 4] = dest_pixel.ring().map(|corner| {
        let px = source.geo_to_pixel(corner);
        GeoPoint::new(px.col, px.row)
    });

    let mut min_col = f64::INFINITY;
    let mut max_col = f64::NEG_INFINITY;
    let mut min_row = f64::INFINITY;
    let mut max_row = f64::NEG_INFINITY;
    for p in &mapped {
        min_col = min_col.min(p.x);
        max_col = max_col.max(p.x);
        min_row = min_row.min(p.y);
        max_row = max_row.max(p.y);
    }

    let (rows, cols) = source_extent;
    if rows == 0 || cols == 0 || !min_col.is_finite() || !min_row.is_finite() {
        return (mapped, None);
    }

    // geo_to_pixel saturates, so mins are never negative
    let col_lo = min_col.floor() as usize;
    let row_lo = min_row.floor() as usize;
    let col_hi = (max_col.ceil() as usize).min(cols - 1);
    let row_hi = (max_row.ceil() as usize).min(rows - 1);
    if col_lo > col_hi || row_lo > row_hi {
        return (mapped, None);
    }

    (
        mapped,
        Some(SearchBounds {
            rows: row_lo..=row_hi,
            cols: col_lo..=col_hi,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::georef::AffineGeoreference;
    use approx::assert_relative_eq;

    fn north_up(origin_x: f64, origin_y: f64, size: f64) -> AffineGeoreference {
        AffineGeoreference::north_up(origin_x, origin_y, size).unwrap()
    }

    #[test]
    fn test_corner_quad_north_up() {
        let geo = north_up(100.0, 200.0, 10.0);
        let quad = corner_quad(&geo, (4, 8));
        assert_relative_eq!(quad.tl.x, 100.0);
        assert_relative_eq!(quad.tl.y, 200.0);
        assert_relative_eq!(quad.tr.x, 180.0);
        assert_relative_eq!(quad.bl.y, 160.0);
        assert_relative_eq!(quad.br.x, 180.0);
        assert_relative_eq!(quad.br.y, 160.0);
    }

    #[test]
    fn test_pixel_quad_unit_inset() {
        let geo = north_up(0.0, 0.0, 1.0);
        let corners = corner_quad(&geo, (4, 4));
        let q = pixel_quad(&corners, (4, 4), 1, 2, 0.0);
        // Pixel (row 1, col 2) spans x in [2,3], y in [-1,-2] (north-up)
        assert_relative_eq!(q.tl.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(q.tl.y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(q.br.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(q.br.y, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pixel_quad_drop_shrink() {
        let geo = north_up(0.0, 0.0, 1.0);
        let corners = corner_quad(&geo, (4, 4));
        // drop factor 0.5 → inset 0.25 on every side
        let q = pixel_quad(&corners, (4, 4), 0, 0, 0.25);
        assert_relative_eq!(q.tl.x, 0.25, epsilon = 1e-12);
        assert_relative_eq!(q.tl.y, -0.25, epsilon = 1e-12);
        assert_relative_eq!(q.br.x, 0.75, epsilon = 1e-12);
        assert_relative_eq!(q.br.y, -0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_pixel_quad_full_inset_collapses_to_center() {
        let geo = north_up(0.0, 0.0, 1.0);
        let corners = corner_quad(&geo, (2, 2));
        let q = pixel_quad(&corners, (2, 2), 0, 0, 0.5);
        for p in q.ring() {
            assert_relative_eq!(p.x, 0.5, epsilon = 1e-12);
            assert_relative_eq!(p.y, -0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_search_bounds_identity() {
        let geo = north_up(0.0, 0.0, 1.0);
        let corners = corner_quad(&geo, (4, 4));
        let dest = pixel_quad(&corners, (4, 4), 2, 1, 0.0);
        let (_, bounds) = search_bounds(&dest, &geo, (4, 4));
        let bounds = bounds.unwrap();
        // Conservative by one pixel on the high side (ceil of the exact edge)
        assert!(bounds.rows.contains(&2));
        assert!(bounds.cols.contains(&1));
        assert_eq!(*bounds.rows.start(), 2);
        assert_eq!(*bounds.cols.start(), 1);
    }

    #[test]
    fn test_search_bounds_clamped_to_extent() {
        let dest_geo = north_up(0.0, 0.0, 1.0);
        let corners = corner_quad(&dest_geo, (4, 4));
        // Source covers only the top-left 2x2 region of the destination
        let src_geo = north_up(0.0, 0.0, 1.0);
        let dest = pixel_quad(&corners, (4, 4), 1, 1, 0.0);
        let (_, bounds) = search_bounds(&dest, &src_geo, (2, 2));
        let bounds = bounds.unwrap();
        assert_eq!(*bounds.rows.end(), 1);
        assert_eq!(*bounds.cols.end(), 1);

        // A pixel wholly beyond the source extent has no candidates
        let far = pixel_quad(&corners, (4, 4), 3, 3, 0.0);
        let (_, bounds) = search_bounds(&far, &src_geo, (2, 2));
        assert!(bounds.is_none());
    }

    #[test]
    fn test_search_bounds_saturated_far_pixel() {
        // Destination pixel entirely north-west of the source raster: every
        // corner saturates to pixel (0, 0), leaving the first cell as the
        // only (non-overlapping) candidate.
        let dest_geo = north_up(-100.0, 100.0, 1.0);
        let corners = corner_quad(&dest_geo, (4, 4));
        let src_geo = north_up(0.0, 0.0, 1.0);
        let dest = pixel_quad(&corners, (4, 4), 0, 0, 0.0);
        let (mapped, bounds) = search_bounds(&dest, &src_geo, (8, 8));
        let bounds = bounds.unwrap();
        assert_eq!(bounds.rows, 0..=0);
        assert_eq!(bounds.cols, 0..=0);
        for p in mapped {
            assert_relative_eq!(p.x, 0.0);
        }
    }
}
