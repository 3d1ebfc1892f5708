//! The drizzle engine: overlap-area weighted accumulation of source
//! rasters onto a destination grid.

pub mod accumulate;
pub mod composite;
pub mod stream;

pub use accumulate::{accumulate_pixel, Contribution};
pub use composite::{composite, CompositeOutput};
pub use stream::StreamDrizzle;

use crate::error::ConfigError;

/// Clipped overlaps at or below this area (in source pixel units) are
/// treated as non-contributing, guarding the area formula against
/// degenerate slivers from near-collinear clip edges.
pub const DEFAULT_MIN_OVERLAP_AREA: f64 = 1e-12;

/// Sweep configuration, validated before any destination pixel is written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrizzleConfig {
    /// (rows, cols) of the destination grid.
    pub output_shape: (usize, usize),
    /// Fraction of a source pixel's linear extent retained when building
    /// its footprint; 1.0 is the full pixel.
    pub drop_factor: f64,
    /// Minimum clipped area that still counts as an overlap.
    pub min_overlap_area: f64,
}

impl DrizzleConfig {
    pub fn new(output_rows: usize, output_cols: usize) -> Self {
        Self {
            output_shape: (output_rows, output_cols),
            drop_factor: 1.0,
            min_overlap_area: DEFAULT_MIN_OVERLAP_AREA,
        }
    }

    pub fn with_drop_factor(mut self, drop_factor: f64) -> Self {
        self.drop_factor = drop_factor;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (rows, cols) = self.output_shape;
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyOutput { rows, cols });
        }
        if !self.drop_factor.is_finite() || !(0.0..=1.0).contains(&self.drop_factor) {
            return Err(ConfigError::DropFactor(self.drop_factor));
        }
        if !self.min_overlap_area.is_finite() || self.min_overlap_area < 0.0 {
            return Err(ConfigError::MinOverlapArea(self.min_overlap_area));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(DrizzleConfig::new(4, 4).validate().is_ok());
        assert!(DrizzleConfig::new(0, 4).validate().is_err());
        assert!(DrizzleConfig::new(4, 0).validate().is_err());
        assert!(DrizzleConfig::new(4, 4)
            .with_drop_factor(1.5)
            .validate()
            .is_err());
        assert!(DrizzleConfig::new(4, 4)
            .with_drop_factor(-0.1)
            .validate()
            .is_err());
        assert!(DrizzleConfig::new(4, 4)
            .with_drop_factor(f64::NAN)
            .validate()
            .is_err());
        assert!(DrizzleConfig::new(4, 4).with_drop_factor(0.0).validate().is_ok());
    }
}
