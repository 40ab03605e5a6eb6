//! Binary morphology on bit-packed masks
//!
//! Dilation and erosion accumulate one shifted copy of the source per hit
//! of the structuring element, a whole 32-bit word at a time:
//!
//! - dilation: `dst(x, y) |= src(x - dx, y - dy)` for every hit `(dx, dy)`
//! - erosion:  `dst(x, y) &= src(x + dx, y + dy)` for every hit `(dx, dy)`
//!
//! Pixels outside the mask read as background for both operations, so an
//! erosion clears foreground touching the border. [`close`] pads the mask
//! first so that the closing is not affected by the border.

use crate::error::MaskResult;
use crate::mask::Mask;
use crate::sel::Sel;

/// How a shifted row is accumulated into the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accumulate {
    Or,
    And,
}

/// Dilate a mask
pub fn dilate(mask: &Mask, sel: &Sel) -> Mask {
    let mut out = blank_like(mask);
    let h = mask.height() as i32;
    let wpl = mask.wpl();
    for (dx, dy) in sel.hit_offsets() {
        for y in 0..h {
            let src_y = y - dy;
            if src_y < 0 || src_y >= h {
                continue;
            }
            let src = mask.row(src_y as u32);
            let start = y as usize * wpl;
            accumulate_row(&mut out.data_mut()[start..start + wpl], src, dx, Accumulate::Or);
        }
    }
    out.clear_unused_bits();
    out
}

/// Erode a mask
pub fn erode(mask: &Mask, sel: &Sel) -> Mask {
    let mut out = mask.clone();
    for w in out.data_mut().iter_mut() {
        *w = !0;
    }
    let h = mask.height() as i32;
    let wpl = mask.wpl();
    for (dx, dy) in sel.hit_offsets() {
        for y in 0..h {
            let start = y as usize * wpl;
            let dst = &mut out.data_mut()[start..start + wpl];
            let src_y = y + dy;
            if src_y < 0 || src_y >= h {
                dst.fill(0);
                continue;
            }
            accumulate_row(dst, mask.row(src_y as u32), -dx, Accumulate::And);
        }
    }
    out.clear_unused_bits();
    out
}

/// Dilate with a `width x height` brick
pub fn dilate_brick(mask: &Mask, width: u32, height: u32) -> MaskResult<Mask> {
    Ok(dilate(mask, &Sel::create_brick(width, height)?))
}

/// Erode with a `width x height` brick
pub fn erode_brick(mask: &Mask, width: u32, height: u32) -> MaskResult<Mask> {
    Ok(erode(mask, &Sel::create_brick(width, height)?))
}

/// Morphological closing (dilation followed by erosion).
///
/// The mask is padded by the extent of the structuring element before the
/// two passes and cropped afterwards, so foreground near the border is not
/// eroded away.
pub fn close(mask: &Mask, sel: &Sel) -> MaskResult<Mask> {
    let (cx, cy) = sel.origin();
    let pad_x = cx.max(sel.width() - 1 - cx);
    let pad_y = cy.max(sel.height() - 1 - cy);
    let padded = pad(mask, pad_x, pad_y)?;
    let closed = erode(&dilate(&padded, sel), sel);
    crop(&closed, pad_x, pad_y, mask.width(), mask.height())
}

/// Closing with a `width x height` brick
pub fn close_brick(mask: &Mask, width: u32, height: u32) -> MaskResult<Mask> {
    close(mask, &Sel::create_brick(width, height)?)
}

fn blank_like(mask: &Mask) -> Mask {
    let mut out = mask.clone();
    out.data_mut().fill(0);
    out
}

/// Copy a mask into the center of a larger, background-filled one
fn pad(mask: &Mask, px: u32, py: u32) -> MaskResult<Mask> {
    let mut out = Mask::new(mask.width() + 2 * px, mask.height() + 2 * py)?;
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if mask.get(x, y) {
                out.set(x + px, y + py, true);
            }
        }
    }
    Ok(out)
}

/// Copy a `width x height` window starting at (x0, y0)
fn crop(mask: &Mask, x0: u32, y0: u32, width: u32, height: u32) -> MaskResult<Mask> {
    let mut out = Mask::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            if mask.get(x + x0, y + y0) {
                out.set(x, y, true);
            }
        }
    }
    Ok(out)
}

/// Shift `src` right by `shift` pixels (left if negative) and accumulate
/// each resulting word into `dst`.
///
/// Pixels shifted in from outside the row are background.
fn accumulate_row(dst: &mut [u32], src: &[u32], shift: i32, op: Accumulate) {
    let word_shift = shift.div_euclid(32) as isize;
    let bit_shift = shift.rem_euclid(32) as u32;
    let word_at = |i: isize| -> u32 {
        if i < 0 || i as usize >= src.len() {
            0
        } else {
            src[i as usize]
        }
    };

    for (i, d) in dst.iter_mut().enumerate() {
        let si = i as isize - word_shift;
        let shifted = if bit_shift == 0 {
            word_at(si)
        } else {
            (word_at(si) >> bit_shift) | (word_at(si - 1) << (32 - bit_shift))
        };
        match op {
            Accumulate::Or => *d |= shifted,
            Accumulate::And => *d &= shifted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutfix_core::BoundingBox;

    fn mask_with(width: u32, height: u32, rects: &[(i32, i32, i32, i32)]) -> Mask {
        let mut m = Mask::new(width, height).unwrap();
        for &(x, y, w, h) in rects {
            m.fill_rect(&BoundingBox::new_unchecked(x, y, w, h));
        }
        m
    }

    #[test]
    fn test_accumulate_row_shifts() {
        let src = [0x8000_0001u32, 0x8000_0000];
        let mut dst = [0u32; 2];
        accumulate_row(&mut dst, &src, 1, Accumulate::Or);
        assert_eq!(dst, [0x4000_0000, 0xC000_0000]);

        let mut dst = [0u32; 2];
        accumulate_row(&mut dst, &src, -1, Accumulate::Or);
        assert_eq!(dst, [0x0000_0003, 0x0000_0000]);

        let mut dst = [0u32; 2];
        accumulate_row(&mut dst, &src, 32, Accumulate::Or);
        assert_eq!(dst, [0, 0x8000_0001]);
    }

    #[test]
    fn test_dilate_single_pixel() {
        let mut m = Mask::new(50, 10).unwrap();
        m.set(31, 5, true);
        let d = dilate_brick(&m, 3, 3).unwrap();
        assert_eq!(d.count_pixels(), 9);
        assert!(d.get(30, 4) && d.get(32, 6));
        assert!(!d.get(33, 5));
    }

    #[test]
    fn test_dilate_clips_at_border() {
        let m = mask_with(10, 10, &[(0, 0, 1, 1)]);
        let d = dilate_brick(&m, 3, 3).unwrap();
        assert_eq!(d.count_pixels(), 4);
    }

    #[test]
    fn test_erode_inverts_dilate_on_block() {
        let m = mask_with(40, 20, &[(10, 5, 8, 6)]);
        let d = dilate_brick(&m, 3, 3).unwrap();
        assert_eq!(d.count_pixels(), 10 * 8);
        let e = erode_brick(&d, 3, 3).unwrap();
        assert_eq!(e, m);
    }

    #[test]
    fn test_close_bridges_gap() {
        let m = mask_with(40, 10, &[(0, 0, 10, 10), (12, 0, 10, 10)]);
        let c = close_brick(&m, 5, 1).unwrap();
        assert_eq!(c.count_pixels(), 22 * 10);
        // Padding keeps the border pixels
        assert!(c.get(0, 0) && c.get(0, 9));
    }
}
