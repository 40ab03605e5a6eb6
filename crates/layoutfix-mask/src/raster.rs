//! Polygon rasterization
//!
//! Pixel `(x, y)` is addressed by its center, so a polygon vertex at
//! `(3.0, 4.0)` lies exactly on pixel (3, 4). Filling includes every pixel
//! whose center lies inside the polygon; the outline adds the pixels on
//! the boundary itself.

use crate::mask::Mask;
use layoutfix_core::Polygon;

/// Generate the pixels of a line with Bresenham's integer algorithm.
///
/// The line connects `(x1, y1)` to `(x2, y2)` with 8-connectivity and
/// includes both end points.
pub fn line_pixels(x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<(i32, i32)> {
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x2 > x1 { 1 } else { -1 };
    let sy = if y2 > y1 { 1 } else { -1 };
    let npts = dx.max(dy) + 1;
    let mut pixels = Vec::with_capacity(npts as usize);

    let (mut x, mut y) = (x1, y1);
    if dx >= dy {
        let mut err = dx / 2;
        for _ in 0..npts {
            pixels.push((x, y));
            err -= dy;
            if err < 0 {
                y += sy;
                err += dx;
            }
            x += sx;
        }
    } else {
        let mut err = dy / 2;
        for _ in 0..npts {
            pixels.push((x, y));
            err -= dx;
            if err < 0 {
                x += sx;
                err += dy;
            }
            y += sy;
        }
    }
    pixels
}

/// Draw the closed outline of a polygon, translated by `(-x0, -y0)`
pub fn draw_outline(mask: &mut Mask, polygon: &Polygon, x0: i32, y0: i32) {
    for (a, b) in polygon.edges() {
        let (ax, ay) = (a.x.round() as i32 - x0, a.y.round() as i32 - y0);
        let (bx, by) = (b.x.round() as i32 - x0, b.y.round() as i32 - y0);
        for (x, y) in line_pixels(ax, ay, bx, by) {
            mask.set_clipped(x, y);
        }
    }
}

/// Fill the interior of a polygon (even-odd rule), translated by
/// `(-x0, -y0)`, and draw its outline.
pub fn fill_polygon(mask: &mut Mask, polygon: &Polygon, x0: i32, y0: i32) {
    let verts: Vec<(f64, f64)> = polygon
        .points()
        .iter()
        .map(|p| (p.x - x0 as f64, p.y - y0 as f64))
        .collect();
    let n = verts.len();

    let mut xs: Vec<f64> = Vec::new();
    for row in 0..mask.height() {
        let fy = row as f64;
        xs.clear();
        for i in 0..n {
            let (xa, ya) = verts[i];
            let (xb, yb) = verts[(i + 1) % n];
            let (y_lo, y_hi, x_lo, x_hi) = if ya <= yb {
                (ya, yb, xa, xb)
            } else {
                (yb, ya, xb, xa)
            };
            // Half-open span so a vertex on the scanline is counted once
            if fy > y_lo && fy <= y_hi && y_hi - y_lo > f64::EPSILON {
                let t = (fy - y_lo) / (y_hi - y_lo);
                xs.push(x_lo + t * (x_hi - x_lo));
            }
        }
        xs.sort_by(|a, b| a.total_cmp(b));
        for span in xs.chunks_exact(2) {
            let start = span[0].ceil().max(0.0) as i64;
            let end = span[1].floor().min(mask.width() as f64 - 1.0) as i64;
            for x in start..=end {
                mask.set(x as u32, row, true);
            }
        }
    }

    draw_outline(mask, polygon, x0, y0);
}
