#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! Dominant color and palette extraction via median-cut quantization.
//!
//! The engine reduces every pixel to a 5-bits-per-channel color space,
//! builds an occupancy histogram over it, and repeatedly splits the most
//! significant bounding box at its occupancy median until the requested
//! palette size is reached. The result is a [`ColorMap`] that ranks
//! representative colors by occupancy-weighted spatial extent and answers
//! containment and nearest-color queries.
//!
//! With the `decode` feature (on by default), [`decode_image`] turns PNG
//! and JPEG byte streams into an [`ImageData`] buffer, and
//! [`get_palette`] / [`get_color`] run the sampling filter plus the
//! engine in one call.
//!
//! ```
//! use rgb::RGB;
//!
//! let mut pixels = vec![RGB { r: 255, g: 0, b: 0 }; 50];
//! pixels.extend(vec![RGB { r: 0, g: 0, b: 255 }; 50]);
//!
//! let map = huepick::quantize(&pixels, 2)?;
//! assert_eq!(map.len(), 2);
//! for color in map.palette() {
//!     println!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b);
//! }
//! # Ok::<(), huepick::PaletteError>(())
//! ```

extern crate alloc;

pub mod color_map;
#[cfg(feature = "decode")]
pub mod decode;
pub mod error;
pub mod histogram;
mod median_cut;
pub mod pixels;
pub mod vbox;

pub use color_map::{ColorMap, PaletteEntry};
#[cfg(feature = "decode")]
pub use decode::decode_image;
pub use error::PaletteError;
pub use pixels::{sample_pixels, ImageData};

use alloc::vec::Vec;
use rgb::RGB;

/// Default number of palette colors for [`get_palette`].
pub const DEFAULT_COLOR_COUNT: u32 = 10;
/// Default sampling stride for [`get_palette`] and [`get_color`].
pub const DEFAULT_QUALITY: u32 = 10;

/// Options for palette extraction from a decoded image.
#[derive(Debug, Clone)]
pub struct PaletteOptions {
    /// Number of palette colors to aim for (2..=256).
    pub color_count: u32,
    /// Sampling stride: 1 looks at every pixel, 10 at every tenth.
    pub quality: u32,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            color_count: DEFAULT_COLOR_COUNT,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl PaletteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_count(mut self, n: u32) -> Self {
        self.color_count = n;
        self
    }

    pub fn quality(mut self, q: u32) -> Self {
        self.quality = q;
        self
    }
}

/// Quantize a flat pixel list down to at most `max_colors` representative
/// colors.
///
/// Runs the two-phase median-cut refinement: three quarters of the target
/// is reached ranking boxes by pixel occupancy, the remainder ranking by
/// occupancy times color-space volume. The returned map may hold fewer
/// than `max_colors` entries when the input has little color variety.
pub fn quantize(pixels: &[RGB<u8>], max_colors: u32) -> Result<ColorMap, PaletteError> {
    if pixels.is_empty() {
        return Err(PaletteError::EmptyPixels);
    }
    if !(2..=256).contains(&max_colors) {
        return Err(PaletteError::InvalidMaxColors(max_colors));
    }
    median_cut::run(pixels, max_colors)
}

/// Extract a color palette from a decoded image.
///
/// Samples the buffer at the configured stride, drops transparent and
/// near-white pixels, and quantizes what remains.
pub fn get_palette(
    image: &ImageData,
    options: &PaletteOptions,
) -> Result<Vec<RGB<u8>>, PaletteError> {
    let sampled = sample_pixels(image, options.quality)?;
    let map = quantize(&sampled, options.color_count)?;
    Ok(map.palette())
}

/// Extract the dominant color of a decoded image.
///
/// Quantizes a 5-color palette at the given sampling stride and returns
/// its leading entry.
pub fn get_color(image: &ImageData, quality: u32) -> Result<RGB<u8>, PaletteError> {
    let palette = get_palette(image, &PaletteOptions::new().color_count(5).quality(quality))?;
    palette.first().copied().ok_or(PaletteError::EmptyPixels)
}
