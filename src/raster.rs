//! Abstract raster access.
//!
//! The engine never owns source pixels; it reads them through
//! [`RasterSource`], a thin synchronous accessor the host raster store
//! implements. [`GridSource`] is the in-memory implementation over an
//! `ndarray` view, which is also what the tests and benches drive.

use ndarray::ArrayView2;
use num_traits::NumCast;

use crate::georef::Georeference;

/// Read-only access to a georeferenced raster band.
///
/// `read` returns `None` for anything the engine must treat as a zero
/// contribution: out-of-bounds positions, nodata, or a value the backing
/// store failed to produce.
pub trait RasterSource: Sync {
    /// (rows, cols) of the pixel grid.
    fn extent(&self) -> (usize, usize);

    /// The raster's pixel ↔ geocoordinate mapping.
    fn georef(&self) -> &dyn Georeference;

    /// Pixel value at (row, col) as `f64`, or `None` if unreadable.
    fn read(&self, row: usize, col: usize) -> Option<f64>;
}

/// A raster backed by a 2D array view and a georeference.
#[derive(Clone, Debug)]
pub struct GridSource<'a, T, G> {
    data: ArrayView2<'a, T>,
    georef: G,
    nodata: Option<T>,
}

impl<'a, T, G> GridSource<'a, T, G>
where
    T: Copy + NumCast + PartialEq + Sync,
    G: Georeference,
{
    pub fn new(data: ArrayView2<'a, T>, georef: G) -> Self {
        Self {
            data,
            georef,
            nodata: None,
        }
    }

    /// Treat `nodata` values as unreadable (zero contribution).
    pub fn with_nodata(data: ArrayView2<'a, T>, georef: G, nodata: T) -> Self {
        Self {
            data,
            georef,
            nodata: Some(nodata),
        }
    }
}

impl<T, G> RasterSource for GridSource<'_, T, G>
where
    T: Copy + NumCast + PartialEq + Sync,
    G: Georeference,
{
    fn extent(&self) -> (usize, usize) {
        self.data.dim()
    }

    fn georef(&self) -> &dyn Georeference {
        &self.georef
    }

    fn read(&self, row: usize, col: usize) -> Option<f64> {
        let val = *self.data.get((row, col))?;
        if let Some(nd) = self.nodata {
            if val == nd {
                return None;
            }
        }
        let f: f64 = NumCast::from(val)?;
        if f.is_nan() {
            return None;
        }
        Some(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::georef::AffineGeoreference;
    use ndarray::array;

    fn georef() -> AffineGeoreference {
        AffineGeoreference::north_up(0.0, 0.0, 1.0).unwrap()
    }

    #[test]
    fn test_read_in_and_out_of_bounds() {
        let arr = array![[1.0, 2.0], [3.0, 4.0]];
        let src = GridSource::new(arr.view(), georef());
        assert_eq!(src.extent(), (2, 2));
        assert_eq!(src.read(0, 1), Some(2.0));
        assert_eq!(src.read(1, 1), Some(4.0));
        assert_eq!(src.read(2, 0), None);
        assert_eq!(src.read(0, 2), None);
    }

    #[test]
    fn test_nodata_and_nan_are_unreadable() {
        let arr = array![[-9999.0, 2.0], [f64::NAN, 4.0]];
        let src = GridSource::with_nodata(arr.view(), georef(), -9999.0);
        assert_eq!(src.read(0, 0), None);
        assert_eq!(src.read(1, 0), None);
        assert_eq!(src.read(0, 1), Some(2.0));
    }

    #[test]
    fn test_integer_storage() {
        let arr = array![[10u8, 20], [30, 40]];
        let src = GridSource::new(arr.view(), georef());
        assert_eq!(src.read(1, 0), Some(30.0));
    }
}
