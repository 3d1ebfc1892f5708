use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrizzleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Georeference error: {0}")]
    Georef(#[from] GeorefError),

    #[error("Destination raster error: {0}")]
    Destination(String),

    #[error("Sweep cancelled")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Output size must be positive, got {rows}x{cols}")]
    EmptyOutput { rows: usize, cols: usize },

    #[error("Drop factor must be in [0, 1], got {0}")]
    DropFactor(f64),

    #[error("Minimum overlap area must be non-negative and finite, got {0}")]
    MinOverlapArea(f64),

    #[error("Same raster supplied as both base and additional source")]
    DuplicateSource,

    #[error("Source raster has empty extent ({rows}x{cols})")]
    EmptySource { rows: usize, cols: usize },
}

#[derive(Error, Debug)]
pub enum GeorefError {
    #[error("Singular affine transform (determinant is zero)")]
    SingularAffine,

    #[error("Degenerate corner quad: {0}")]
    DegenerateQuad(String),
}
