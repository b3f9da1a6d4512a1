//! The terminal palette: representative colors and their source boxes.

extern crate alloc;
use alloc::vec::Vec;

use rgb::RGB;

use crate::median_cut::SortedQueue;
use crate::vbox::VBox;

/// One palette entry: a representative color and the box it came from.
#[derive(Debug, Clone)]
pub struct PaletteEntry {
    color: RGB<u8>,
    vbox: VBox,
}

impl PaletteEntry {
    pub fn color(&self) -> RGB<u8> {
        self.color
    }

    pub fn vbox(&self) -> &VBox {
        &self.vbox
    }
}

/// The ordered set of representative colors produced by quantization.
///
/// Entries arrive by popping the final refinement queue, so they rank by
/// occupancy-weighted volume, largest first.
#[derive(Debug, Clone)]
pub struct ColorMap {
    entries: Vec<PaletteEntry>,
}

impl ColorMap {
    pub(crate) fn from_queue(mut queue: SortedQueue<VBox>) -> Self {
        let mut entries = Vec::with_capacity(queue.len());
        while let Some(vbox) = queue.pop() {
            entries.push(PaletteEntry {
                color: vbox.average(),
                vbox,
            });
        }
        Self { entries }
    }

    /// The palette colors in map order.
    pub fn palette(&self) -> Vec<RGB<u8>> {
        self.entries.iter().map(|e| e.color).collect()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Palette color for a pixel: the first entry whose box contains it,
    /// falling back to the nearest entry.
    pub fn map(&self, pixel: RGB<u8>) -> RGB<u8> {
        self.entries
            .iter()
            .find(|e| e.vbox.contains(pixel))
            .map(|e| e.color)
            .unwrap_or_else(|| self.nearest(pixel))
    }

    /// Palette color with the smallest Euclidean RGB distance.
    /// Exact ties keep the earlier entry.
    pub fn nearest(&self, color: RGB<u8>) -> RGB<u8> {
        let mut best = RGB { r: 0, g: 0, b: 0 };
        let mut best_distance = u32::MAX;
        for entry in &self.entries {
            let d = distance_squared(color, entry.color);
            if d < best_distance {
                best_distance = d;
                best = entry.color;
            }
        }
        best
    }

    /// Snap a near-black darkest entry to pure black and a near-white
    /// brightest entry to pure white.
    ///
    /// Re-sorts the entries ascending by channel sum as a side effect.
    pub fn force_bw(&mut self) {
        self.entries
            .sort_by_key(|e| u16::from(e.color.r) + u16::from(e.color.g) + u16::from(e.color.b));

        if let Some(darkest) = self.entries.first_mut() {
            let c = darkest.color;
            if c.r < 5 && c.g < 5 && c.b < 5 {
                darkest.color = RGB { r: 0, g: 0, b: 0 };
            }
        }
        if let Some(brightest) = self.entries.last_mut() {
            let c = brightest.color;
            if c.r > 251 && c.g > 251 && c.b > 251 {
                brightest.color = RGB {
                    r: 255,
                    g: 255,
                    b: 255,
                };
            }
        }
    }
}

fn distance_squared(a: RGB<u8>, b: RGB<u8>) -> u32 {
    let dr = i32::from(a.r) - i32::from(b.r);
    let dg = i32::from(a.g) - i32::from(b.g);
    let db = i32::from(a.b) - i32::from(b.b);
    (dr * dr + dg * dg + db * db) as u32
}
