//! Structuring elements
//!
//! A [`Sel`] is a small grid of hits with an origin. Morphological
//! operations visit the hit positions as offsets from the origin.

use crate::error::{MaskError, MaskResult};

/// A structuring element for binary morphology
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    hits: Vec<bool>,
}

impl Sel {
    /// Create a structuring element from a hit grid with an explicit origin
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidSel`] for an empty grid, a hit vector of
    /// the wrong length, or an origin outside the grid.
    pub fn new(width: u32, height: u32, cx: u32, cy: u32, hits: Vec<bool>) -> MaskResult<Self> {
        if width == 0 || height == 0 {
            return Err(MaskError::InvalidSel(format!(
                "dimensions must be positive: {}x{}",
                width, height
            )));
        }
        if hits.len() != (width * height) as usize {
            return Err(MaskError::InvalidSel(format!(
                "expected {} elements, got {}",
                width * height,
                hits.len()
            )));
        }
        if cx >= width || cy >= height {
            return Err(MaskError::InvalidSel(format!(
                "origin ({}, {}) outside {}x{} grid",
                cx, cy, width, height
            )));
        }
        Ok(Self {
            width,
            height,
            cx,
            cy,
            hits,
        })
    }

    /// Create a rectangular brick of hits, origin at the center
    pub fn create_brick(width: u32, height: u32) -> MaskResult<Self> {
        Self::new(
            width,
            height,
            width / 2,
            height / 2,
            vec![true; (width * height) as usize],
        )
    }

    /// Create a square brick of hits, origin at the center
    pub fn create_square(size: u32) -> MaskResult<Self> {
        Self::create_brick(size, size)
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the origin
    #[inline]
    pub fn origin(&self) -> (u32, u32) {
        (self.cx, self.cy)
    }

    /// Iterate over hit positions relative to the origin
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cx = self.cx as i32;
        let cy = self.cy as i32;
        let width = self.width;
        self.hits
            .iter()
            .enumerate()
            .filter(|(_, hit)| **hit)
            .map(move |(idx, _)| {
                let x = (idx as u32 % width) as i32;
                let y = (idx as u32 / width) as i32;
                (x - cx, y - cy)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brick_offsets() {
        let sel = Sel::create_brick(3, 1).unwrap();
        let offsets: Vec<_> = sel.hit_offsets().collect();
        assert_eq!(offsets, vec![(-1, 0), (0, 0), (1, 0)]);
        assert_eq!(sel.origin(), (1, 0));
    }

    #[test]
    fn test_square() {
        let sel = Sel::create_square(5).unwrap();
        assert_eq!(sel.hit_offsets().count(), 25);
        assert!(sel.hit_offsets().all(|(x, y)| x.abs() <= 2 && y.abs() <= 2));
    }

    #[test]
    fn test_invalid() {
        assert!(Sel::create_square(0).is_err());
        assert!(Sel::new(2, 2, 0, 0, vec![true; 3]).is_err());
        assert!(Sel::new(2, 2, 2, 0, vec![true; 4]).is_err());
    }
}
