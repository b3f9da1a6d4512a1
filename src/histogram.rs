//! Reduced color space and the occupancy histogram built over it.
//!
//! Every 8-bit channel is right-shifted down to `SIG_BITS` bits, so the
//! whole space collapses to `2^(3 * SIG_BITS)` cells. The histogram counts
//! input pixels per cell and is the only data the rest of the pipeline
//! ever reads — boxes, cuts, and averages all work on these counts.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

/// Significant bits kept per channel when reducing 8-bit color.
pub const SIG_BITS: u32 = 5;
/// Shift that maps an 8-bit channel into the reduced space.
pub const RIGHT_SHIFT: u32 = 8 - SIG_BITS;
/// Highest coordinate along one axis of the reduced space.
pub(crate) const MAX_REDUCED: u8 = (1 << SIG_BITS) - 1;
/// Number of cells in the reduced color space.
pub const HISTOGRAM_SIZE: usize = 1 << (3 * SIG_BITS);

/// Reduce an 8-bit channel to its `SIG_BITS`-bit coordinate.
#[inline]
pub(crate) fn reduce(channel: u8) -> u8 {
    channel >> RIGHT_SHIFT
}

/// Pack three reduced coordinates into a histogram index.
#[inline]
pub(crate) fn color_index(r: u8, g: u8, b: u8) -> usize {
    ((r as usize) << (2 * SIG_BITS)) | ((g as usize) << SIG_BITS) | b as usize
}

/// Occupancy counts over the reduced color space.
///
/// Built once per quantization run, then shared read-only by every box
/// derived from it.
#[derive(Debug)]
pub struct Histogram {
    bins: Vec<u32>,
}

impl Histogram {
    /// Count the reduced color of every input pixel.
    pub fn from_pixels(pixels: &[rgb::RGB<u8>]) -> Self {
        let mut bins = vec![0u32; HISTOGRAM_SIZE];
        for p in pixels {
            bins[color_index(reduce(p.r), reduce(p.g), reduce(p.b))] += 1;
        }
        Self { bins }
    }

    /// Count stored for one reduced-space cell.
    #[inline]
    pub(crate) fn cell(&self, r: u8, g: u8, b: u8) -> u32 {
        self.bins[color_index(r, g, b)]
    }

    /// Total occupancy across all cells; equals the number of input pixels.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| u64::from(c)).sum()
    }
}
