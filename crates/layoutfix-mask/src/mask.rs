//! Bit-packed binary masks
//!
//! Pixels are stored one bit each in 32-bit words, MSB first: pixel 0 of
//! a row is bit 31 of the row's first word. Every row starts on a word
//! boundary (`wpl` words per line); bits past the mask width in the last
//! word of each row are kept clear.

use crate::error::{MaskError, MaskResult};
use layoutfix_core::BoundingBox;

/// A 1-bpp raster mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    wpl: usize,
    data: Vec<u32>,
}

impl Mask {
    /// Create an all-background mask
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> MaskResult<Self> {
        if width == 0 || height == 0 {
            return Err(MaskError::InvalidDimensions { width, height });
        }
        let wpl = width.div_ceil(32) as usize;
        Ok(Self {
            width,
            height,
            wpl,
            data: vec![0; wpl * height as usize],
        })
    }

    /// Create a mask from row-major booleans (`true` is foreground)
    ///
    /// # Errors
    ///
    /// Returns an error if `values.len()` is not `width * height`.
    pub fn from_bools(width: u32, height: u32, values: &[bool]) -> MaskResult<Self> {
        let mut mask = Self::new(width, height)?;
        if values.len() != width as usize * height as usize {
            return Err(MaskError::InvalidParameters(format!(
                "expected {} values for {}x{} mask, got {}",
                width as usize * height as usize,
                width,
                height,
                values.len()
            )));
        }
        for (i, _) in values.iter().enumerate().filter(|(_, v)| **v) {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            mask.set(x, y, true);
        }
        Ok(mask)
    }

    /// Get the width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of 32-bit words per row
    #[inline]
    pub fn wpl(&self) -> usize {
        self.wpl
    }

    /// Get the raw word data
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Get the words of one row
    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        let start = y as usize * self.wpl;
        &self.data[start..start + self.wpl]
    }

    /// Check that a (possibly negative) coordinate lies inside the mask
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Get a pixel; out-of-range coordinates read as background
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.data[y as usize * self.wpl + (x / 32) as usize];
        (word >> (31 - (x % 32))) & 1 == 1
    }

    /// Set a pixel; out-of-range coordinates are ignored
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.wpl + (x / 32) as usize;
        let bit = 1u32 << (31 - (x % 32));
        if value {
            self.data[idx] |= bit;
        } else {
            self.data[idx] &= !bit;
        }
    }

    /// Set a pixel given signed coordinates, clipping to the mask
    #[inline]
    pub fn set_clipped(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            self.set(x as u32, y as u32, true);
        }
    }

    /// Set every pixel of a rectangle, clipped to the mask
    pub fn fill_rect(&mut self, rect: &BoundingBox) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.width as i32);
        let y1 = rect.bottom().min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x as u32, y as u32, true);
            }
        }
    }

    /// Count the foreground pixels
    pub fn count_pixels(&self) -> u64 {
        self.data.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Check for an all-background mask
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&w| w == 0)
    }

    /// Smallest box enclosing all foreground pixels
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut found = false;
        for y in 0..self.height {
            let row = self.row(y);
            if row.iter().all(|&w| w == 0) {
                continue;
            }
            for (wi, &word) in row.iter().enumerate() {
                if word == 0 {
                    continue;
                }
                let first = wi as u32 * 32 + word.leading_zeros();
                let last = wi as u32 * 32 + 31 - word.trailing_zeros();
                min_x = min_x.min(first);
                max_x = max_x.max(last);
            }
            min_y = min_y.min(y);
            max_y = max_y.max(y);
            found = true;
        }
        found.then(|| {
            BoundingBox::new_unchecked(
                min_x as i32,
                min_y as i32,
                (max_x - min_x + 1) as i32,
                (max_y - min_y + 1) as i32,
            )
        })
    }

    /// Check whether two masks share at least one foreground pixel.
    ///
    /// Both masks are anchored at the origin; pixels outside either mask
    /// count as background, so masks of different sizes can be compared.
    pub fn overlaps(&self, other: &Mask) -> bool {
        let rows = self.height.min(other.height);
        let words = self.wpl.min(other.wpl);
        (0..rows).any(|y| {
            let a = self.row(y);
            let b = other.row(y);
            (0..words).any(|i| a[i] & b[i] != 0)
        })
    }

    /// Pixel-wise union with another mask of the same size
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions differ.
    pub fn or_assign(&mut self, other: &Mask) -> MaskResult<()> {
        self.check_same_size(other)?;
        for (d, s) in self.data.iter_mut().zip(other.data.iter()) {
            *d |= *s;
        }
        Ok(())
    }

    /// Pixel-wise complement
    pub fn invert(&self) -> Mask {
        let mut out = self.clone();
        for w in out.data.iter_mut() {
            *w = !*w;
        }
        out.clear_unused_bits();
        out
    }

    fn check_same_size(&self, other: &Mask) -> MaskResult<()> {
        if self.width != other.width || self.height != other.height {
            return Err(MaskError::InvalidParameters(format!(
                "mask size mismatch: {}x{} vs {}x{}",
                self.width, self.height, other.width, other.height
            )));
        }
        Ok(())
    }

    /// Clear the bits past the mask width in the last word of each row.
    ///
    /// Word-level shifts can set them, which would leak into later
    /// operations such as erosion after dilation.
    pub(crate) fn clear_unused_bits(&mut self) {
        let extra = self.width % 32;
        if extra == 0 {
            return;
        }
        let keep = !0u32 << (32 - extra);
        let wpl = self.wpl;
        for row in self.data.chunks_mut(wpl) {
            row[wpl - 1] &= keep;
        }
    }
}
