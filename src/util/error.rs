//! Error types for snakefilter.

use thiserror::Error;

/// Result alias for snakefilter operations.
pub type SnakeFilterResult<T> = std::result::Result<T, SnakeFilterError>;

/// Errors raised while validating inputs to a filter pass.
///
/// Rejected candidates are never reported through this type; they are normal
/// outcomes recorded in [`crate::FilterOutcome`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnakeFilterError {
    /// Grid dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer does not hold enough elements.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region of interest lies outside the grid.
    #[error("roi out of bounds: x={x} y={y} w={width} h={height} (img {img_width}x{img_height})")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Two grids that must share a shape do not.
    #[error("{context} dimensions {got:?} do not match image {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
        context: &'static str,
    },
    /// A candidate footprint extends past the image.
    #[error(
        "footprint of candidate {index} at ({x}, {y}) size {width}x{height} exceeds image {img_width}x{img_height}"
    )]
    FootprintOutOfBounds {
        index: usize,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A configuration value is outside its valid range.
    #[error("invalid config field {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    /// Image decoding or encoding failed.
    #[cfg(feature = "image-io")]
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
