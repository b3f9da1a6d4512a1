//! Axis-aligned boxes over the reduced color space.
//!
//! A box is three inclusive coordinate ranges plus a handle to the shared
//! histogram. Volume, occupancy, and the average color are derived from
//! the histogram on first use and cached; clones start with cold caches
//! and the range setters used by the splitter clear them.

extern crate alloc;
use alloc::sync::Arc;
use core::cell::Cell;

use rgb::RGB;

use crate::histogram::{reduce, Histogram, MAX_REDUCED, RIGHT_SHIFT};

/// One axis of the reduced color space, in cut priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    R,
    G,
    B,
}

/// An axis-aligned region of the reduced color space.
///
/// Bounds are inclusive and never inverted. The histogram is shared by
/// reference with every other box from the same quantization run and is
/// never mutated through a box.
#[derive(Debug)]
pub struct VBox {
    r0: u8,
    r1: u8,
    g0: u8,
    g1: u8,
    b0: u8,
    b1: u8,
    histogram: Arc<Histogram>,
    cached_volume: Cell<Option<u32>>,
    cached_count: Cell<Option<u32>>,
    cached_average: Cell<Option<RGB<u8>>>,
}

impl Clone for VBox {
    /// Independent copy of the ranges sharing the same histogram.
    /// Caches start cold.
    fn clone(&self) -> Self {
        Self {
            r0: self.r0,
            r1: self.r1,
            g0: self.g0,
            g1: self.g1,
            b0: self.b0,
            b1: self.b1,
            histogram: Arc::clone(&self.histogram),
            cached_volume: Cell::new(None),
            cached_count: Cell::new(None),
            cached_average: Cell::new(None),
        }
    }
}

impl VBox {
    /// The tightest box covering the reduced colors of `pixels`.
    pub(crate) fn spanning(pixels: &[RGB<u8>], histogram: Arc<Histogram>) -> Self {
        debug_assert!(!pixels.is_empty());

        let mut r0 = MAX_REDUCED;
        let mut r1 = 0;
        let mut g0 = MAX_REDUCED;
        let mut g1 = 0;
        let mut b0 = MAX_REDUCED;
        let mut b1 = 0;

        for p in pixels {
            let (r, g, b) = (reduce(p.r), reduce(p.g), reduce(p.b));
            r0 = r0.min(r);
            r1 = r1.max(r);
            g0 = g0.min(g);
            g1 = g1.max(g);
            b0 = b0.min(b);
            b1 = b1.max(b);
        }

        Self {
            r0,
            r1,
            g0,
            g1,
            b0,
            b1,
            histogram,
            cached_volume: Cell::new(None),
            cached_count: Cell::new(None),
            cached_average: Cell::new(None),
        }
    }

    pub(crate) fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Inclusive bounds along one axis.
    pub(crate) fn bounds(&self, axis: Axis) -> (u8, u8) {
        match axis {
            Axis::R => (self.r0, self.r1),
            Axis::G => (self.g0, self.g1),
            Axis::B => (self.b0, self.b1),
        }
    }

    /// Lower the box to `[lo, value]` along `axis`, dropping cached stats.
    pub(crate) fn set_upper(&mut self, axis: Axis, value: u8) {
        match axis {
            Axis::R => self.r1 = value,
            Axis::G => self.g1 = value,
            Axis::B => self.b1 = value,
        }
        self.invalidate();
    }

    /// Raise the box to `[value, hi]` along `axis`, dropping cached stats.
    pub(crate) fn set_lower(&mut self, axis: Axis, value: u8) {
        match axis {
            Axis::R => self.r0 = value,
            Axis::G => self.g0 = value,
            Axis::B => self.b0 = value,
        }
        self.invalidate();
    }

    fn invalidate(&self) {
        self.cached_volume.set(None);
        self.cached_count.set(None);
        self.cached_average.set(None);
    }

    /// Size of the region in reduced-space cells. Always at least 1.
    pub fn volume(&self) -> u32 {
        if let Some(v) = self.cached_volume.get() {
            return v;
        }
        let v = u32::from(self.r1 - self.r0 + 1)
            * u32::from(self.g1 - self.g0 + 1)
            * u32::from(self.b1 - self.b0 + 1);
        self.cached_volume.set(Some(v));
        v
    }

    /// Number of input pixels whose reduced color falls inside the box.
    pub fn count(&self) -> u32 {
        if let Some(c) = self.cached_count.get() {
            return c;
        }
        let mut c = 0u32;
        for i in self.r0..=self.r1 {
            for j in self.g0..=self.g1 {
                for k in self.b0..=self.b1 {
                    c += self.histogram.cell(i, j, k);
                }
            }
        }
        self.cached_count.set(Some(c));
        c
    }

    /// Occupancy-weighted size, the phase-2 ranking key.
    pub(crate) fn priority(&self) -> u64 {
        u64::from(self.count()) * u64::from(self.volume())
    }

    /// Pixel-weighted centroid of the box in 8-bit color space.
    ///
    /// Each occupied cell contributes its center, weighted by occupancy;
    /// an unoccupied box falls back to its geometric center. Channels are
    /// truncated, not rounded.
    pub fn average(&self) -> RGB<u8> {
        if let Some(c) = self.cached_average.get() {
            return c;
        }

        let mult = 1u32 << RIGHT_SHIFT;
        let mut total = 0u64;
        let mut r_sum = 0.0f64;
        let mut g_sum = 0.0f64;
        let mut b_sum = 0.0f64;

        for i in self.r0..=self.r1 {
            for j in self.g0..=self.g1 {
                for k in self.b0..=self.b1 {
                    let occupancy = self.histogram.cell(i, j, k);
                    if occupancy == 0 {
                        continue;
                    }
                    let weight = f64::from(occupancy) * f64::from(mult);
                    total += u64::from(occupancy);
                    r_sum += weight * (f64::from(i) + 0.5);
                    g_sum += weight * (f64::from(j) + 0.5);
                    b_sum += weight * (f64::from(k) + 0.5);
                }
            }
        }

        let color = if total > 0 {
            RGB {
                r: (r_sum / total as f64) as u8,
                g: (g_sum / total as f64) as u8,
                b: (b_sum / total as f64) as u8,
            }
        } else {
            RGB {
                r: ((mult * u32::from(self.r0 + self.r1 + 1)) / 2) as u8,
                g: ((mult * u32::from(self.g0 + self.g1 + 1)) / 2) as u8,
                b: ((mult * u32::from(self.b0 + self.b1 + 1)) / 2) as u8,
            }
        };
        self.cached_average.set(Some(color));
        color
    }

    /// Whether the pixel's reduced color lies inside the box.
    pub fn contains(&self, pixel: RGB<u8>) -> bool {
        let (r, g, b) = (reduce(pixel.r), reduce(pixel.g), reduce(pixel.b));
        r >= self.r0
            && r <= self.r1
            && g >= self.g0
            && g <= self.g1
            && b >= self.b0
            && b <= self.b1
    }
}
