//! Multi-image compositing sweep.
//!
//! Drives the accumulator for one base raster plus N additional rasters
//! over every destination pixel, divides each pixel's accumulated value by
//! the number of images that actually overlapped it, and writes the result
//! back in the destination's storage type. Rows are independent and are
//! partitioned across the rayon pool.

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use num_traits::{NumCast, Zero};

use crate::drizzle::accumulate::accumulate_pixel;
use crate::drizzle::DrizzleConfig;
use crate::error::{ConfigError, DrizzleError};
use crate::footprint;
use crate::progress::{CancelToken, ProgressSink, ReportLevel};
use crate::raster::RasterSource;

/// A finished sweep: the destination grid plus the per-pixel count of
/// overlapping source images (the normalization divisor).
#[derive(Clone, Debug)]
pub struct CompositeOutput<T> {
    pub data: Array2<T>,
    pub overlap: Array2<u32>,
}

/// Drizzle `base` and `additional` onto a fresh destination grid.
///
/// The base raster defines the destination's geographic span: the output
/// grid covers the base footprint at `config.output_shape` resolution.
/// Pixels no source overlaps keep their zero-initialized value.
///
/// Cancellation is honored between rows; a cancelled sweep returns
/// [`DrizzleError::Cancelled`] without producing output.
pub fn composite<T>(
    base: &dyn RasterSource,
    additional: &[&dyn RasterSource],
    config: &DrizzleConfig,
    progress: &dyn ProgressSink,
    cancel: &CancelToken,
) -> Result<CompositeOutput<T>, DrizzleError>
where
    T: Copy + Zero + NumCast + Send + Sync,
{
    config.validate()?;
    for extra in additional {
        if std::ptr::addr_eq(base as *const dyn RasterSource, *extra as *const dyn RasterSource) {
            return Err(ConfigError::DuplicateSource.into());
        }
    }
    let sources: Vec<&dyn RasterSource> =
        std::iter::once(base).chain(additional.iter().copied()).collect();
    for src in &sources {
        let (rows, cols) = src.extent();
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptySource { rows, cols }.into());
        }
    }

    let (out_rows, out_cols) = config.output_shape;
    let dest_corners = footprint::corner_quad(base.georef(), base.extent());

    log::info!(
        "drizzle sweep: {} source(s) onto {}x{} grid, drop factor {}",
        sources.len(),
        out_rows,
        out_cols,
        config.drop_factor
    );

    let mut data = Array2::from_elem((out_rows, out_cols), T::zero());
    let mut overlap = Array2::<u32>::zeros((out_rows, out_cols));
    let rows_done = AtomicUsize::new(0);

    data.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(overlap.axis_iter_mut(Axis(0)).into_par_iter())
        .enumerate()
        .try_for_each(|(row, (mut data_row, mut overlap_row))| {
            if cancel.is_cancelled() {
                return Err(DrizzleError::Cancelled);
            }
            for col in 0..out_cols {
                let dest_pixel =
                    footprint::pixel_quad(&dest_corners, (out_rows, out_cols), row, col, 0.0);

                let mut sum = 0.0;
                let mut count = 0u32;
                for src in &sources {
                    let c = accumulate_pixel(
                        &dest_pixel,
                        *src,
                        config.drop_factor,
                        config.min_overlap_area,
                    );
                    sum += c.sum;
                    if c.overlapped {
                        count += 1;
                    }
                }

                // Zero-overlap pixels keep their zero-initialized value
                if count > 0 {
                    let value = sum / count as f64;
                    data_row[col] = NumCast::from(value).unwrap_or_else(|| {
                        log::warn!(
                            "destination pixel ({row}, {col}): value {value} does not fit the \
                             storage type, writing zero"
                        );
                        T::zero()
                    });
                }
                overlap_row[col] = count;
            }

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            let percent = (done * 100 / out_rows) as u8;
            progress.report("Calculating result", percent, ReportLevel::Normal);
            Ok(())
        })?;

    progress.report("Done", 100, ReportLevel::Normal);
    log::info!("drizzle sweep finished");
    Ok(CompositeOutput { data, overlap })
}
