//! Streaming composite for frame sequences.
//!
//! Frames arrive one at a time (each already georeferenced by the
//! upstream alignment step) and fold into a running weighted average, so
//! an arbitrarily long sequence needs only the destination-sized
//! accumulator planes. The fold is strictly left-to-right across frames;
//! within one frame rows are still processed in parallel.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use num_traits::{NumCast, Zero};

use crate::drizzle::accumulate::accumulate_pixel;
use crate::drizzle::{CompositeOutput, DrizzleConfig};
use crate::error::DrizzleError;
use crate::footprint;
use crate::geom::Quad;
use crate::progress::{CancelToken, ProgressSink, ReportLevel};
use crate::raster::RasterSource;

/// Incremental drizzle over a sequence of georeferenced frames.
///
/// The destination's geographic span is fixed at construction (for video,
/// the first frame's footprint); each [`accumulate`](Self::accumulate)
/// call folds one frame into the per-pixel running average
/// `new = old * n/(n+1) + contribution/(n+1)`, where `n` counts the
/// frames that overlapped that pixel so far. Frames that miss a pixel
/// leave its average untouched.
pub struct StreamDrizzle<T> {
    config: DrizzleConfig,
    dest_corners: Quad,
    average: Array2<f64>,
    overlap: Array2<u32>,
    frames: usize,
    _storage: PhantomData<T>,
}

impl<T> StreamDrizzle<T>
where
    T: Copy + Zero + NumCast + Send + Sync,
{
    /// `dest_corners` is the geographic corner quad the output grid spans.
    pub fn new(config: DrizzleConfig, dest_corners: Quad) -> Result<Self, DrizzleError> {
        config.validate()?;
        let (rows, cols) = config.output_shape;
        Ok(Self {
            config,
            dest_corners,
            average: Array2::zeros((rows, cols)),
            overlap: Array2::zeros((rows, cols)),
            frames: 0,
            _storage: PhantomData,
        })
    }

    /// Number of frames folded in so far.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Fold one frame into the running average.
    pub fn accumulate(
        &mut self,
        frame: &dyn RasterSource,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<(), DrizzleError> {
        let (frame_rows, frame_cols) = frame.extent();
        if frame_rows == 0 || frame_cols == 0 {
            return Err(DrizzleError::Destination(format!(
                "frame {} has empty extent {frame_rows}x{frame_cols}",
                self.frames
            )));
        }

        let (out_rows, out_cols) = self.config.output_shape;
        let dest_corners = self.dest_corners;
        let config = self.config;
        let frame_index = self.frames;
        let rows_done = AtomicUsize::new(0);

        self.average
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(self.overlap.axis_iter_mut(Axis(0)).into_par_iter())
            .enumerate()
            .try_for_each(|(row, (mut avg_row, mut overlap_row))| {
                if cancel.is_cancelled() {
                    return Err(DrizzleError::Cancelled);
                }
                for col in 0..out_cols {
                    let dest_pixel =
                        footprint::pixel_quad(&dest_corners, (out_rows, out_cols), row, col, 0.0);
                    let c = accumulate_pixel(
                        &dest_pixel,
                        frame,
                        config.drop_factor,
                        config.min_overlap_area,
                    );
                    if c.overlapped {
                        let n = overlap_row[col] as f64;
                        avg_row[col] = avg_row[col] * (n / (n + 1.0)) + c.sum / (n + 1.0);
                        overlap_row[col] += 1;
                    }
                }
                let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
                let percent = (done * 100 / out_rows) as u8;
                progress.report(
                    &format!("Drizzling frame {}", frame_index + 1),
                    percent,
                    ReportLevel::Normal,
                );
                Ok(())
            })?;

        self.frames += 1;
        Ok(())
    }

    /// Finish the stream: cast the running average into the storage type.
    ///
    /// Pixels no frame overlapped stay zero.
    pub fn finish(self) -> CompositeOutput<T> {
        let data = ndarray::Zip::from(&self.average)
            .and(&self.overlap)
            .map_collect(|&avg, &count| {
                if count == 0 {
                    T::zero()
                } else {
                    NumCast::from(avg).unwrap_or_else(T::zero)
                }
            });
        CompositeOutput {
            data,
            overlap: self.overlap,
        }
    }
}
