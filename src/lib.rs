//! Drizzle image resampling.
//!
//! Combines one or more georeferenced rasters onto a destination grid of
//! arbitrary resolution, weighting every source pixel's contribution by
//! the exact geometric overlap between its (optionally drop-shrunk)
//! footprint and the destination pixel's footprint, then averaging over
//! the images that actually covered each pixel.
//!
//! The sweep entry points are [`drizzle::composite`] for a fixed stack of
//! sources and [`drizzle::StreamDrizzle`] for frame sequences folded in
//! one at a time. Sources are anything implementing [`raster::RasterSource`];
//! [`raster::GridSource`] wraps an `ndarray` view with either an affine
//! geotransform or a corner-point georeference.

pub mod drizzle;
pub mod error;
pub mod footprint;
pub mod geom;
pub mod georef;
pub mod progress;
pub mod raster;

pub use drizzle::{composite, CompositeOutput, DrizzleConfig, StreamDrizzle};
pub use error::{ConfigError, DrizzleError, GeorefError};
pub use georef::{Affine, AffineGeoreference, CornerGeoreference, GeoPoint, Georeference, PixelCoord};
pub use geom::Quad;
pub use progress::{CancelToken, LogProgress, NullProgress, ProgressSink, ReportLevel};
pub use raster::{GridSource, RasterSource};
