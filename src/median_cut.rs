//! Median-cut splitting and the two-phase refinement driver.
//!
//! The driver grows a queue of boxes toward the requested palette size:
//! phase 1 ranks boxes by raw pixel occupancy, phase 2 re-ranks the
//! survivors by occupancy-weighted volume and finishes the job. Each step
//! pops the top box and replaces it with the two halves of a median cut
//! along its longest axis.

extern crate alloc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Ordering;

use rgb::RGB;

use crate::color_map::ColorMap;
use crate::error::PaletteError;
use crate::histogram::{Histogram, MAX_REDUCED};
use crate::vbox::{Axis, VBox};

/// Hard cap on refinement steps per phase. Hitting it yields an
/// under-sized palette rather than an error.
pub(crate) const MAX_ITERATIONS: u32 = 1000;
/// Fraction of the target filled by the occupancy-ranked first phase.
pub(crate) const FRACTION_BY_POPULATIONS: f64 = 0.75;

/// A collection kept ascending under a fixed comparator, sorted lazily
/// before any order-dependent read.
///
/// This is a full resort on demand, not a heap — the observable palette
/// order depends on exactly this behavior.
pub(crate) struct SortedQueue<T> {
    items: Vec<T>,
    compare: fn(&T, &T) -> Ordering,
    sorted: bool,
}

impl<T> SortedQueue<T> {
    pub(crate) fn new(compare: fn(&T, &T) -> Ordering) -> Self {
        Self {
            items: Vec::new(),
            compare,
            sorted: true,
        }
    }

    pub(crate) fn push(&mut self, item: T) {
        self.items.push(item);
        self.sorted = false;
    }

    /// Remove and return the greatest element under the comparator.
    pub(crate) fn pop(&mut self) -> Option<T> {
        self.ensure_sorted();
        self.items.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    fn ensure_sorted(&mut self) {
        if !self.sorted {
            let compare = self.compare;
            self.items.sort_by(|a, b| compare(a, b));
            self.sorted = true;
        }
    }
}

/// Phase-1 ordering: raw pixel occupancy.
fn by_count(a: &VBox, b: &VBox) -> Ordering {
    a.count().cmp(&b.count())
}

/// Phase-2 ordering: occupancy times volume.
fn by_priority(a: &VBox, b: &VBox) -> Ordering {
    a.priority().cmp(&b.priority())
}

/// Split one box at (approximately) its occupancy median along its
/// longest axis.
///
/// A box holding a single pixel is terminal and comes back alone; any
/// other occupied box comes back as two children whose ranges partition
/// the parent's range on the cut axis. A box that cannot be cut without
/// leaving one side empty is also terminal.
pub(crate) fn median_cut_apply(vbox: &VBox) -> Result<(VBox, Option<VBox>), PaletteError> {
    if vbox.count() == 0 {
        return Err(PaletteError::EmptyBox);
    }
    if vbox.count() == 1 {
        return Ok((vbox.clone(), None));
    }

    let (r0, r1) = vbox.bounds(Axis::R);
    let (g0, g1) = vbox.bounds(Axis::G);
    let (b0, b1) = vbox.bounds(Axis::B);
    let r_width = r1 - r0 + 1;
    let g_width = g1 - g0 + 1;
    let b_width = b1 - b0 + 1;
    let max_width = r_width.max(g_width).max(b_width);

    // Ties go to r, then g, then b.
    let axis = if r_width == max_width {
        Axis::R
    } else if g_width == max_width {
        Axis::G
    } else {
        Axis::B
    };
    let (lo, hi) = vbox.bounds(axis);

    // Prefix occupancy along the cut axis, indexed by absolute coordinate.
    let hist = vbox.histogram();
    let mut partial_sum = [0u32; MAX_REDUCED as usize + 1];
    let mut total = 0u32;
    for i in lo..=hi {
        let mut slice = 0u32;
        match axis {
            Axis::R => {
                for j in g0..=g1 {
                    for k in b0..=b1 {
                        slice += hist.cell(i, j, k);
                    }
                }
            }
            Axis::G => {
                for j in r0..=r1 {
                    for k in b0..=b1 {
                        slice += hist.cell(j, i, k);
                    }
                }
            }
            Axis::B => {
                for j in r0..=r1 {
                    for k in g0..=g1 {
                        slice += hist.cell(j, k, i);
                    }
                }
            }
        }
        total += slice;
        partial_sum[i as usize] = total;
    }

    for i in lo..=hi {
        if partial_sum[i as usize] <= total / 2 {
            continue;
        }

        // Candidate boundary: halfway into the thinner side of the median.
        let (lo, hi, i) = (i32::from(lo), i32::from(hi), i32::from(i));
        let left = i - lo;
        let right = hi - i;
        let mut d = if left <= right {
            (hi - 1).min(i + right / 2)
        } else {
            lo.max(i - 1 - left / 2)
        };

        // Walk up past empty slices so the left child keeps pixels.
        while d < 0 || partial_sum[d as usize] == 0 {
            d += 1;
        }
        // Walk back down while the right child would be empty.
        while total - partial_sum[d as usize] == 0
            && d > 0
            && partial_sum[d as usize - 1] != 0
        {
            d -= 1;
        }

        if d >= hi {
            // Everything sits in the top slice; no cut leaves both
            // children occupied.
            return Ok((vbox.clone(), None));
        }

        let d = d as u8;
        let mut child1 = vbox.clone();
        child1.set_upper(axis, d);
        let mut child2 = vbox.clone();
        child2.set_lower(axis, d + 1);
        return Ok((child1, Some(child2)));
    }

    Err(PaletteError::NoCutPoint)
}

/// Pop-split-push loop shared by both refinement phases.
///
/// Stops when the queue reaches `target` boxes or the iteration cap
/// runs out; zero-occupancy boxes go back unchanged and still consume
/// an iteration.
fn refine(queue: &mut SortedQueue<VBox>, target: usize) -> Result<(), PaletteError> {
    let mut iterations = 0u32;
    while iterations < MAX_ITERATIONS {
        if queue.len() >= target {
            return Ok(());
        }
        iterations += 1;

        let Some(vbox) = queue.pop() else {
            return Ok(());
        };
        if vbox.count() == 0 {
            queue.push(vbox);
            continue;
        }

        let (first, second) = median_cut_apply(&vbox)?;
        queue.push(first);
        if let Some(second) = second {
            queue.push(second);
        }
    }
    Ok(())
}

/// Run the full two-phase quantization over a validated pixel list.
pub(crate) fn run(pixels: &[RGB<u8>], max_colors: u32) -> Result<ColorMap, PaletteError> {
    let histogram = Arc::new(Histogram::from_pixels(pixels));
    let vbox = VBox::spanning(pixels, Arc::clone(&histogram));

    let mut by_population = SortedQueue::new(by_count);
    by_population.push(vbox);

    let head_target = (FRACTION_BY_POPULATIONS * f64::from(max_colors)).ceil() as usize;
    refine(&mut by_population, head_target)?;

    // Re-rank by occupancy-weighted volume for the remaining splits.
    let mut by_size = SortedQueue::new(by_priority);
    while let Some(vbox) = by_population.pop() {
        by_size.push(vbox);
    }
    refine(&mut by_size, max_colors as usize)?;

    Ok(ColorMap::from_queue(by_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn spanning(pixels: &[RGB<u8>]) -> VBox {
        let hist = Arc::new(Histogram::from_pixels(pixels));
        VBox::spanning(pixels, hist)
    }

    #[test]
    fn queue_pops_maximum() {
        let mut queue: SortedQueue<u32> = SortedQueue::new(|a, b| a.cmp(b));
        queue.push(3);
        queue.push(7);
        queue.push(1);
        assert_eq!(queue.pop(), Some(7));
        queue.push(9);
        assert_eq!(queue.pop(), Some(9));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn single_pixel_box_is_terminal() {
        let pixels = vec![RGB { r: 10, g: 20, b: 30 }];
        let vbox = spanning(&pixels);
        let (first, second) = median_cut_apply(&vbox).unwrap();
        assert!(second.is_none());
        assert_eq!(first.count(), 1);
    }

    #[test]
    fn empty_box_split_is_an_error() {
        let pixels = vec![RGB { r: 0, g: 0, b: 0 }];
        let mut vbox = spanning(&pixels);
        vbox.set_upper(Axis::R, 9);
        vbox.set_lower(Axis::R, 5);
        assert_eq!(vbox.count(), 0);
        assert!(matches!(
            median_cut_apply(&vbox),
            Err(PaletteError::EmptyBox)
        ));
    }

    #[test]
    fn siblings_partition_the_cut_axis() {
        let pixels = vec![
            RGB { r: 255, g: 0, b: 0 },
            RGB { r: 0, g: 0, b: 255 },
        ];
        let vbox = spanning(&pixels);
        // r and b tie at width 32; the tie goes to r
        let (child1, child2) = median_cut_apply(&vbox).unwrap();
        let child2 = child2.expect("two occupied clusters must split");

        let (lo1, hi1) = child1.bounds(Axis::R);
        let (lo2, hi2) = child2.bounds(Axis::R);
        assert_eq!(lo1, 0);
        assert_eq!(hi1 + 1, lo2);
        assert_eq!(hi2, 31);
        // other axes untouched
        assert_eq!(child1.bounds(Axis::B), vbox.bounds(Axis::B));
        assert_eq!(child2.bounds(Axis::B), vbox.bounds(Axis::B));

        assert_eq!(child1.count() + child2.count(), vbox.count());
        assert!(child1.count() > 0);
        assert!(child2.count() > 0);
    }

    #[test]
    fn uniform_color_never_splits() {
        // many pixels, one occupied cell: no cut can separate them
        let pixels = vec![RGB { r: 128, g: 128, b: 128 }; 100];
        let vbox = spanning(&pixels);
        let (first, second) = median_cut_apply(&vbox).unwrap();
        assert!(second.is_none());
        assert_eq!(first.count(), 100);
    }

    #[test]
    fn refine_reaches_target() {
        let pixels: Vec<RGB<u8>> = (0u32..256)
            .map(|i| RGB {
                r: i as u8,
                g: (255 - i) as u8,
                b: (i * 3 % 256) as u8,
            })
            .collect();
        let mut queue = SortedQueue::new(by_count);
        queue.push(spanning(&pixels));
        refine(&mut queue, 8).unwrap();
        assert!(queue.len() >= 8);
    }

    #[test]
    fn run_splits_two_clusters_exactly() {
        let mut pixels = vec![RGB { r: 255, g: 0, b: 0 }; 50];
        pixels.extend(vec![RGB { r: 0, g: 0, b: 255 }; 50]);

        let map = run(&pixels, 2).unwrap();
        let mut palette = map.palette();
        palette.sort_by_key(|c| c.r);

        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0], RGB { r: 4, g: 4, b: 252 });
        assert_eq!(palette[1], RGB { r: 252, g: 4, b: 4 });
    }

    #[test]
    fn run_caps_palette_size() {
        let pixels: Vec<RGB<u8>> = (0u32..4096)
            .map(|i| RGB {
                r: (i % 256) as u8,
                g: (i / 16 % 256) as u8,
                b: (i * 7 % 256) as u8,
            })
            .collect();
        let map = run(&pixels, 16).unwrap();
        assert!(map.len() <= 16);
        assert!(map.len() >= 2);
    }
}
