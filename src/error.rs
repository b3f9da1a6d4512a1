extern crate alloc;

use thiserror::Error;

/// Errors surfaced by palette extraction.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// The pixel list was empty, or sampling discarded every pixel.
    #[error("no pixels provided")]
    EmptyPixels,

    #[error("max_colors must be between 2 and 256, got {0}")]
    InvalidMaxColors(u32),

    #[error("sampling quality must be at least 1, got {0}")]
    InvalidQuality(u32),

    /// A split was attempted on a box with zero occupancy.
    #[error("cannot split a box containing no pixels")]
    EmptyBox,

    /// No median cut point exists for a box with occupancy above one.
    #[error("no valid cut point found")]
    NoCutPoint,

    #[cfg(feature = "decode")]
    #[error("unsupported mime-type {0}, only PNG and JPEG are supported")]
    UnsupportedMime(alloc::string::String),

    #[cfg(feature = "decode")]
    #[error("png decode failed: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[cfg(feature = "decode")]
    #[error("jpeg decode failed: {0}")]
    JpegDecode(#[from] jpeg_decoder::Error),

    /// The decoder produced a pixel layout the sampler cannot consume.
    #[cfg(feature = "decode")]
    #[error("unsupported pixel format in decoded image")]
    UnsupportedPixelFormat,
}
