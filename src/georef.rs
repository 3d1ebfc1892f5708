//! Pixel ↔ geocoordinate mapping.
//!
//! One convention, applied everywhere: `pixel_to_geo` takes continuous
//! corner-based pixel coordinates (GDAL style — pixel `(row, col)` spans
//! corners `(col, row)` to `(col+1, row+1)`) and returns an (x, y, z)
//! geocoordinate. `geo_to_pixel` is its inverse with negative results
//! saturated to 0, so footprint searches near a raster border start at the
//! first row/column instead of going out of bounds.

use crate::error::GeorefError;
use crate::geom::Quad;

/// A geographic coordinate. `z` rides along through interpolation and is
/// ignored by the planar geometry.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GeoPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl std::ops::Add for GeoPoint {
    type Output = GeoPoint;

    fn add(self, rhs: GeoPoint) -> GeoPoint {
        GeoPoint {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl std::ops::Sub for GeoPoint {
    type Output = GeoPoint;

    /// Vector from `rhs` to `self`.
    fn sub(self, rhs: GeoPoint) -> GeoPoint {
        GeoPoint {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

/// A continuous location in a raster's pixel grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelCoord {
    pub col: f64,
    pub row: f64,
}

/// The mapping between a raster's pixel grid and geographic space.
///
/// Implementations must be exact (or near-exact) inverses for corner
/// points; callers assume round-trip consistency without verifying it.
pub trait Georeference: Sync {
    /// Map continuous pixel coordinates to a geocoordinate.
    fn pixel_to_geo(&self, col: f64, row: f64) -> GeoPoint;

    /// Map a geocoordinate to continuous pixel coordinates.
    ///
    /// Negative results saturate to 0.
    fn geo_to_pixel(&self, point: GeoPoint) -> PixelCoord;
}

fn saturate(col: f64, row: f64) -> PixelCoord {
    PixelCoord {
        col: col.max(0.0),
        row: row.max(0.0),
    }
}

/// A 2D affine geotransform.
///
/// Maps pixel coordinates (col, row) to geographic coordinates (x, y):
///   x = a * col + b * row + c
///   y = d * col + e * row + f
///
/// GDAL orders the same six coefficients as [c, a, b, f, d, e].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create from a GDAL-style geotransform array [c, a, b, f, d, e].
    pub fn from_gdal(gt: &[f64; 6]) -> Self {
        Self {
            a: gt[1],
            b: gt[2],
            c: gt[0],
            d: gt[4],
            e: gt[5],
            f: gt[3],
        }
    }

    /// Convert to a GDAL-style geotransform array [c, a, b, f, d, e].
    pub fn to_gdal(&self) -> [f64; 6] {
        [self.c, self.a, self.b, self.f, self.d, self.e]
    }

    /// Apply the forward transform: (col, row) -> (x, y).
    pub fn forward(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.a * col + self.b * row + self.c;
        let y = self.d * col + self.e * row + self.f;
        (x, y)
    }

    /// Compute the inverse affine transform.
    pub fn inverse(&self) -> Result<Affine, GeorefError> {
        let det = self.a * self.e - self.b * self.d;
        if det.abs() < f64::EPSILON {
            return Err(GeorefError::SingularAffine);
        }
        let inv_det = 1.0 / det;
        Ok(Affine {
            a: self.e * inv_det,
            b: -self.b * inv_det,
            c: (self.b * self.f - self.e * self.c) * inv_det,
            d: -self.d * inv_det,
            e: self.a * inv_det,
            f: (self.d * self.c - self.a * self.f) * inv_det,
        })
    }
}

/// Georeference backed by an affine geotransform.
///
/// The inverse is computed once at construction; a singular transform is
/// rejected up front rather than mid-sweep.
#[derive(Clone, Copy, Debug)]
pub struct AffineGeoreference {
    forward: Affine,
    inverse: Affine,
}

impl AffineGeoreference {
    pub fn new(transform: Affine) -> Result<Self, GeorefError> {
        let inverse = transform.inverse()?;
        Ok(Self {
            forward: transform,
            inverse,
        })
    }

    /// North-up georeference: top-left corner at (`origin_x`, `origin_y`),
    /// square pixels of `pixel_size` map units, y decreasing with row.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_size: f64) -> Result<Self, GeorefError> {
        Self::new(Affine::new(pixel_size, 0.0, origin_x, 0.0, -pixel_size, origin_y))
    }

    pub fn transform(&self) -> &Affine {
        &self.forward
    }
}

impl Georeference for AffineGeoreference {
    fn pixel_to_geo(&self, col: f64, row: f64) -> GeoPoint {
        let (x, y) = self.forward.forward(col, row);
        GeoPoint::new(x, y)
    }

    fn geo_to_pixel(&self, point: GeoPoint) -> PixelCoord {
        let (col, row) = self.inverse.forward(point.x, point.y);
        saturate(col, row)
    }
}

/// Georeference defined by the geocoordinates of a raster's four corner
/// pixels — the model produced by corner ground-control points, e.g.
/// homography-aligned video frames.
///
/// Forward mapping is bilinear interpolation across the corner quad; the
/// reverse mapping solves the exact inverse-bilinear quadratic, falling
/// back to the parallelogram (affine) solution when the quad's cross term
/// vanishes or the quadratic has no real root.
#[derive(Clone, Copy, Debug)]
pub struct CornerGeoreference {
    corners: Quad,
    rows: f64,
    cols: f64,
}

impl CornerGeoreference {
    pub fn new(corners: Quad, shape: (usize, usize)) -> Result<Self, GeorefError> {
        let (rows, cols) = shape;
        if rows == 0 || cols == 0 {
            return Err(GeorefError::DegenerateQuad(format!(
                "raster extent {rows}x{cols}"
            )));
        }
        let e = corners.tr - corners.tl;
        let f = corners.bl - corners.tl;
        if cross2(e, f).abs() < f64::EPSILON {
            return Err(GeorefError::DegenerateQuad(
                "corner quad has zero area".into(),
            ));
        }
        Ok(Self {
            corners,
            rows: rows as f64,
            cols: cols as f64,
        })
    }

    pub fn corners(&self) -> &Quad {
        &self.corners
    }

    /// Solve `interpolate(u, v) = p` for the unit-square parameters.
    ///
    /// Extrapolates smoothly outside the quad; of the two quadratic roots
    /// the one nearer the unit square wins.
    fn inverse_bilinear(&self, p: GeoPoint) -> (f64, f64) {
        let q = &self.corners;
        let e = q.tr - q.tl;
        let f = q.bl - q.tl;
        let g = (q.tl - q.tr) + (q.br - q.bl);
        let h = p - q.tl;

        let k2 = cross2(g, f);
        let k1 = cross2(e, f) + cross2(h, g);
        let k0 = cross2(h, e);

        if k2.abs() < 1e-12 {
            // Parallelogram footprint: the quadratic degenerates to a line.
            if k1.abs() < f64::EPSILON {
                return parallelogram_solve(e, f, h);
            }
            let v = -k0 / k1;
            return (u_from_v(e, f, g, h, v), v);
        }

        let w = k1 * k1 - 4.0 * k0 * k2;
        if w < 0.0 {
            return parallelogram_solve(e, f, h);
        }
        let w = w.sqrt();
        let v_a = (-k1 - w) / (2.0 * k2);
        let v_b = (-k1 + w) / (2.0 * k2);
        let cand_a = (u_from_v(e, f, g, h, v_a), v_a);
        let cand_b = (u_from_v(e, f, g, h, v_b), v_b);
        if unit_box_distance(cand_a) <= unit_box_distance(cand_b) {
            cand_a
        } else {
            cand_b
        }
    }
}

impl Georeference for CornerGeoreference {
    fn pixel_to_geo(&self, col: f64, row: f64) -> GeoPoint {
        self.corners.interpolate(col / self.cols, row / self.rows)
    }

    fn geo_to_pixel(&self, point: GeoPoint) -> PixelCoord {
        let (u, v) = self.inverse_bilinear(point);
        saturate(u * self.cols, v * self.rows)
    }
}

/// 2D cross product of two vectors.
fn cross2(a: GeoPoint, b: GeoPoint) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Solve `u*e + v*f = h` ignoring the bilinear cross term.
fn parallelogram_solve(e: GeoPoint, f: GeoPoint, h: GeoPoint) -> (f64, f64) {
    let det = cross2(e, f);
    if det.abs() < f64::EPSILON {
        return (0.0, 0.0);
    }
    (cross2(h, f) / det, cross2(e, h) / det)
}

/// Recover `u` from a solved `v`, preferring whichever coordinate axis has
/// the better-conditioned denominator.
fn u_from_v(e: GeoPoint, f: GeoPoint, g: GeoPoint, h: GeoPoint, v: f64) -> f64 {
    let denom_x = e.x + g.x * v;
    let denom_y = e.y + g.y * v;
    if denom_x.abs() >= denom_y.abs() {
        if denom_x.abs() < f64::EPSILON {
            0.0
        } else {
            (h.x - f.x * v) / denom_x
        }
    } else {
        (h.y - f.y * v) / denom_y
    }
}

/// Distance of a (u, v) pair from the unit square, 0 when inside.
fn unit_box_distance((u, v): (f64, f64)) -> f64 {
    let du = (-u).max(u - 1.0).max(0.0);
    let dv = (-v).max(v - 1.0).max(0.0);
    du.hypot(dv)
}
