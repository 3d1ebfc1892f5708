//! Planar geometry value types shared by the footprint and clipping code.

pub mod clip;

use crate::georef::GeoPoint;

/// A corner quadrilateral — a raster or pixel footprint.
///
/// Corners are named by their grid position (top-left, top-right,
/// bottom-left, bottom-right); `interpolate` treats `u` as the column
/// fraction and `v` as the row fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub tl: GeoPoint,
    pub tr: GeoPoint,
    pub bl: GeoPoint,
    pub br: GeoPoint,
}

impl Quad {
    pub fn new(tl: GeoPoint, tr: GeoPoint, bl: GeoPoint, br: GeoPoint) -> Self {
        Self { tl, tr, bl, br }
    }

    /// Axis-aligned unit-style quad from corner coordinate ranges.
    pub fn axis_aligned(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            tl: GeoPoint::new(x0, y0),
            tr: GeoPoint::new(x1, y0),
            bl: GeoPoint::new(x0, y1),
            br: GeoPoint::new(x1, y1),
        }
    }

    /// Bilinear interpolation at column fraction `u`, row fraction `v`.
    ///
    /// `(0, 0)` is the top-left corner, `(1, 1)` the bottom-right.
    pub fn interpolate(&self, u: f64, v: f64) -> GeoPoint {
        let w00 = (1.0 - u) * (1.0 - v);
        let w10 = u * (1.0 - v);
        let w01 = (1.0 - u) * v;
        let w11 = u * v;
        GeoPoint::with_z(
            self.tl.x * w00 + self.tr.x * w10 + self.bl.x * w01 + self.br.x * w11,
            self.tl.y * w00 + self.tr.y * w10 + self.bl.y * w01 + self.br.y * w11,
            self.tl.z * w00 + self.tr.z * w10 + self.bl.z * w01 + self.br.z * w11,
        )
    }

    /// Corners in clipping order: tl, bl, br, tr.
    pub fn ring(&self) -> [GeoPoint; 4] {
        [self.tl, self.bl, self.br, self.tr]
    }
}

/// Axis-aligned bounding box used for the fast overlap pre-check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn from_points(points: &[GeoPoint]) -> Self {
        let mut bbox = BoundingBox {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for p in points {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        bbox
    }

    /// Closed-interval overlap test; touching boxes count as intersecting.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.max_x >= other.min_x
            && self.min_x <= other.max_x
            && self.max_y >= other.min_y
            && self.min_y <= other.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolate_corners_and_center() {
        let q = Quad::new(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(4.0, 0.0),
            GeoPoint::new(0.0, 2.0),
            GeoPoint::new(4.0, 2.0),
        );
        let c = q.interpolate(0.5, 0.5);
        assert_relative_eq!(c.x, 2.0);
        assert_relative_eq!(c.y, 1.0);

        let tr = q.interpolate(1.0, 0.0);
        assert_relative_eq!(tr.x, 4.0);
        assert_relative_eq!(tr.y, 0.0);
    }

    #[test]
    fn test_interpolate_skewed_quad_cross_term() {
        // Only the br corner is displaced: the cross term must appear once,
        // so the center sees a quarter of the displacement.
        let q = Quad::new(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(2.0, 1.0),
        );
        let c = q.interpolate(0.5, 0.5);
        assert_relative_eq!(c.x, 0.75, epsilon = 1e-12);
        assert_relative_eq!(c.y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_bbox_intersects() {
        fn bbox(x0: f64, y0: f64, x1: f64, y1: f64) -> BoundingBox {
            BoundingBox::from_points(&Quad::axis_aligned(x0, y0, x1, y1).ring())
        }
        let a = bbox(0.0, 0.0, 2.0, 2.0);
        let b = bbox(1.0, 1.0, 3.0, 3.0);
        let c = bbox(2.5, 2.5, 4.0, 4.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        // Touching edges count as overlap
        let d = bbox(2.0, 0.0, 3.0, 2.0);
        assert!(a.intersects(&d));
    }
}
