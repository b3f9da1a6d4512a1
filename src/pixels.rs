//! Decoded pixel buffers and the sampling filter run before quantization.

extern crate alloc;
use alloc::vec::Vec;

use rgb::{RGB, RGBA};

use crate::error::PaletteError;

/// Pixels with alpha below this are treated as transparent and skipped.
const ALPHA_THRESHOLD: u8 = 125;
/// Pixels with every channel above this count as near-white background.
const WHITE_THRESHOLD: u8 = 250;

/// A decoded RGBA image.
#[derive(Debug, Clone)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<RGBA<u8>>,
}

impl ImageData {
    /// Wrap a decoded RGBA buffer. `pixels` must hold `width * height`
    /// entries in row-major order.
    pub fn new(width: u32, height: u32, pixels: Vec<RGBA<u8>>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[RGBA<u8>] {
        &self.pixels
    }
}

/// Sample every `quality`-th pixel into the flat list fed to
/// [`quantize`](crate::quantize), discarding transparent and near-white
/// pixels along the way.
pub fn sample_pixels(image: &ImageData, quality: u32) -> Result<Vec<RGB<u8>>, PaletteError> {
    if quality == 0 {
        return Err(PaletteError::InvalidQuality(quality));
    }

    let mut sampled = Vec::with_capacity(image.pixels.len() / quality as usize + 1);
    for pixel in image.pixels.iter().step_by(quality as usize) {
        if pixel.a < ALPHA_THRESHOLD {
            continue;
        }
        if pixel.r > WHITE_THRESHOLD && pixel.g > WHITE_THRESHOLD && pixel.b > WHITE_THRESHOLD {
            continue;
        }
        sampled.push(RGB {
            r: pixel.r,
            g: pixel.g,
            b: pixel.b,
        });
    }
    Ok(sampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn opaque(r: u8, g: u8, b: u8) -> RGBA<u8> {
        RGBA { r, g, b, a: 255 }
    }

    #[test]
    fn stride_takes_every_nth_pixel() {
        let pixels: Vec<RGBA<u8>> = (0u8..12).map(|i| opaque(i, 0, 0)).collect();
        let image = ImageData::new(12, 1, pixels);
        let sampled = sample_pixels(&image, 5).unwrap();
        assert_eq!(
            sampled,
            vec![
                RGB { r: 0, g: 0, b: 0 },
                RGB { r: 5, g: 0, b: 0 },
                RGB { r: 10, g: 0, b: 0 },
            ]
        );
    }

    #[test]
    fn transparent_pixels_are_dropped() {
        let pixels = vec![
            RGBA {
                r: 10,
                g: 20,
                b: 30,
                a: 124,
            },
            RGBA {
                r: 10,
                g: 20,
                b: 30,
                a: 125,
            },
        ];
        let image = ImageData::new(2, 1, pixels);
        let sampled = sample_pixels(&image, 1).unwrap();
        assert_eq!(sampled.len(), 1);
    }

    #[test]
    fn near_white_pixels_are_dropped() {
        let pixels = vec![
            opaque(251, 251, 251),
            opaque(250, 251, 251),
            opaque(255, 255, 255),
        ];
        let image = ImageData::new(3, 1, pixels);
        let sampled = sample_pixels(&image, 1).unwrap();
        // only the pixel with one channel at the threshold survives
        assert_eq!(sampled, vec![RGB { r: 250, g: 251, b: 251 }]);
    }

    #[test]
    fn zero_quality_is_rejected() {
        let image = ImageData::new(1, 1, vec![opaque(0, 0, 0)]);
        assert!(matches!(
            sample_pixels(&image, 0),
            Err(PaletteError::InvalidQuality(0))
        ));
    }
}
