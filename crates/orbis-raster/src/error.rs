//! Raster allocation errors.

/// Errors returned when a raster surface cannot be created.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RasterError {
    /// Width or height is zero, or the byte size overflows `usize`.
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// The pixel buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes for a {width}x{height} surface")]
    Allocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Size of the failed allocation.
        bytes: usize,
    },
}
