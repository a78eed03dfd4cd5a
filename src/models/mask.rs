// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label masks.
//!
//! A mask is a `rows x cols` array of `u8` labels covering the cropped
//! frame. Label 0 is background. Painting operations ignore pixels that
//! fall outside the array.

use crate::error::{AnnotateError, Result};
use crate::util::geometry::{interpolate, Pixel};
use ndarray::Array2;

/// Per-pixel label array for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    data: Array2<u8>,
}

impl Mask {
    /// A background-only mask of the given size.
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            data: Array2::zeros((height, width)),
        }
    }

    pub fn from_array(data: Array2<u8>) -> Self {
        Self { data }
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.data
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Fail unless the mask is exactly `height x width`.
    pub fn ensure_shape(&self, height: usize, width: usize) -> Result<()> {
        if self.shape() != (height, width) {
            return Err(AnnotateError::ShapeMismatch {
                mask: self.shape(),
                image: (height, width),
            });
        }
        Ok(())
    }

    fn index(&self, p: Pixel) -> Option<(usize, usize)> {
        let (rows, cols) = self.shape();
        if p.x < 0 || p.y < 0 || p.y as usize >= rows || p.x as usize >= cols {
            return None;
        }
        Some((p.y as usize, p.x as usize))
    }

    /// Label at a pixel, `None` outside the mask.
    pub fn get(&self, p: Pixel) -> Option<u8> {
        self.index(p).map(|idx| self.data[idx])
    }

    /// Number of pixels carrying `label`.
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|&&v| v == label).count()
    }

    /// Set every pixel within `radius` of `center` to `label`.
    /// Returns whether anything changed.
    pub fn paint(&mut self, center: Pixel, radius: u32, label: u8) -> bool {
        let r = radius as i64;
        let mut changed = false;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                if let Some(idx) = self.index(Pixel::new(center.x + dx, center.y + dy)) {
                    if self.data[idx] != label {
                        self.data[idx] = label;
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    /// Paint discs along the segment `from -> to` so a fast drag leaves
    /// no gaps.
    pub fn paint_stroke(&mut self, from: Pixel, to: Pixel, radius: u32, label: u8) -> bool {
        let spacing = (radius / 2).max(1);
        let mut changed = false;
        for p in interpolate(from, to, spacing) {
            changed |= self.paint(p, radius, label);
        }
        changed
    }

    /// Replace the 4-connected region sharing the seed's label with
    /// `label`. Returns whether anything changed.
    pub fn flood_fill(&mut self, seed: Pixel, label: u8) -> bool {
        let Some(start) = self.index(seed) else {
            return false;
        };
        let target = self.data[start];
        if target == label {
            return false;
        }

        let (rows, cols) = self.shape();
        let mut stack = vec![start];
        self.data[start] = label;
        while let Some((r, c)) = stack.pop() {
            let neighbours = [
                (r.wrapping_sub(1), c),
                (r + 1, c),
                (r, c.wrapping_sub(1)),
                (r, c + 1),
            ];
            for (nr, nc) in neighbours {
                if nr < rows && nc < cols && self.data[(nr, nc)] == target {
                    self.data[(nr, nc)] = label;
                    stack.push((nr, nc));
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shape() {
        let mask = Mask::zeros(4, 6);
        assert_eq!(mask.shape(), (4, 6));
        assert_eq!(mask.count(0), 24);
        assert!(mask.ensure_shape(4, 6).is_ok());
        assert!(matches!(
            mask.ensure_shape(6, 4),
            Err(AnnotateError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_paint_disc() {
        let mut mask = Mask::zeros(10, 10);
        assert!(mask.paint(Pixel::new(5, 5), 1, 3));
        // centre plus four neighbours
        assert_eq!(mask.count(3), 5);
        assert_eq!(mask.get(Pixel::new(5, 4)), Some(3));
        assert_eq!(mask.get(Pixel::new(4, 4)), Some(0));
        // Painting the same disc again changes nothing
        assert!(!mask.paint(Pixel::new(5, 5), 1, 3));
    }

    #[test]
    fn test_paint_clips_at_edges() {
        let mut mask = Mask::zeros(3, 3);
        mask.paint(Pixel::new(0, 0), 2, 1);
        assert_eq!(mask.get(Pixel::new(0, 0)), Some(1));
        assert!(!mask.paint(Pixel::new(-10, -10), 2, 1));
    }

    #[test]
    fn test_paint_stroke_is_continuous() {
        let mut mask = Mask::zeros(5, 40);
        mask.paint_stroke(Pixel::new(0, 2), Pixel::new(39, 2), 1, 2);
        for x in 0..40 {
            assert_eq!(mask.get(Pixel::new(x, 2)), Some(2), "gap at x={x}");
        }
    }

    #[test]
    fn test_flood_fill_respects_boundaries() {
        let mut mask = Mask::zeros(5, 5);
        // vertical wall at x = 2
        for y in 0..5 {
            mask.paint(Pixel::new(2, y), 0, 9);
        }
        assert!(mask.flood_fill(Pixel::new(0, 0), 4));
        assert_eq!(mask.count(4), 10);
        assert_eq!(mask.get(Pixel::new(4, 4)), Some(0));
        assert_eq!(mask.count(9), 5);
    }

    #[test]
    fn test_flood_fill_same_label_is_noop() {
        let mut mask = Mask::zeros(3, 3);
        assert!(!mask.flood_fill(Pixel::new(1, 1), 0));
        assert!(!mask.flood_fill(Pixel::new(7, 1), 5));
        assert_eq!(mask.count(0), 9);
    }
}
