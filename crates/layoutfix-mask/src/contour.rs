//! External contour tracing
//!
//! Finds the outer boundary of every 8-connected foreground blob that is
//! not nested inside the hole of another blob. Contours run through pixel
//! centers and keep only the vertices where the tracing direction changes
//! (straight runs are compressed to their end points).

use crate::mask::Mask;
use layoutfix_core::{GeomResult, Point, Polygon};
use std::collections::VecDeque;

/// One of the eight neighbour steps, numbered clockwise starting West
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    West = 0,
    NorthWest = 1,
    North = 2,
    NorthEast = 3,
    East = 4,
    SouthEast = 5,
    South = 6,
    SouthWest = 7,
}

/// `(dx, dy)` of each step, in direction order; y grows downwards
const STEPS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

impl Direction {
    const ALL: [Direction; 8] = [
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
    ];

    /// Column change of the step
    #[inline]
    pub fn dx(self) -> i32 {
        STEPS[self as usize].0
    }

    /// Row change of the step
    #[inline]
    pub fn dy(self) -> i32 {
        STEPS[self as usize].1
    }

    /// The step moving by `(dx, dy)`, if that is a neighbour step
    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        STEPS
            .iter()
            .position(|&step| step == (dx, dy))
            .map(|i| Self::ALL[i])
    }

    /// Next direction clockwise
    #[inline]
    fn clockwise(self) -> Self {
        Self::ALL[(self as usize + 1) % 8]
    }

    /// Next direction counterclockwise
    #[inline]
    fn counterclockwise(self) -> Self {
        Self::ALL[(self as usize + 7) % 8]
    }
}

/// The traced outer boundary of one blob
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Boundary vertices (pixel coordinates), not closed
    pub points: Vec<(i32, i32)>,
}

impl Contour {
    /// Vertex count
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check for a contour without vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Area enclosed by the vertices (shoelace formula).
    ///
    /// Contours of one-pixel-wide blobs enclose no area.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: i64 = (0..n)
            .map(|i| {
                let (x0, y0) = self.points[i];
                let (x1, y1) = self.points[(i + 1) % n];
                x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64
            })
            .sum();
        twice.abs() as f64 / 2.0
    }

    /// Convert to a polygon
    pub fn to_polygon(&self) -> GeomResult<Polygon> {
        Polygon::new(self.points.iter().map(|&p| Point::from(p)).collect())
    }
}

/// Fill the holes of a mask.
///
/// Background pixels that cannot reach the mask border through
/// 4-connected background become foreground.
pub fn fill_holes(mask: &Mask) -> Mask {
    let w = mask.width() as i32;
    let h = mask.height() as i32;
    let idx = |x: i32, y: i32| (y * w + x) as usize;
    let mut outside = vec![false; (w * h) as usize];
    let mut queue = VecDeque::new();

    let seed = |x: i32, y: i32, outside: &mut Vec<bool>, queue: &mut VecDeque<(i32, i32)>| {
        if !mask.get(x as u32, y as u32) && !outside[idx(x, y)] {
            outside[idx(x, y)] = true;
            queue.push_back((x, y));
        }
    };
    for x in 0..w {
        seed(x, 0, &mut outside, &mut queue);
        seed(x, h - 1, &mut outside, &mut queue);
    }
    for y in 0..h {
        seed(0, y, &mut outside, &mut queue);
        seed(w - 1, y, &mut outside, &mut queue);
    }

    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
            if nx < 0 || ny < 0 || nx >= w || ny >= h {
                continue;
            }
            let i = idx(nx, ny);
            if !outside[i] && !mask.get(nx as u32, ny as u32) {
                outside[i] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    let mut filled = mask.clone();
    for y in 0..h {
        for x in 0..w {
            if !outside[idx(x, y)] {
                filled.set(x as u32, y as u32, true);
            }
        }
    }
    filled
}

/// Label the 8-connected foreground components.
///
/// Returns one label per pixel (row-major, 0 for background, components
/// numbered from 1 in raster order of their first pixel) and the number
/// of components.
pub fn label_components(mask: &Mask) -> (Vec<u32>, u32) {
    let w = mask.width() as i32;
    let h = mask.height() as i32;
    let mut labels = vec![0u32; (w * h) as usize];
    let mut count = 0;
    let mut queue = VecDeque::new();

    for y in 0..h {
        for x in 0..w {
            let start = (y * w + x) as usize;
            if labels[start] != 0 || !mask.get(x as u32, y as u32) {
                continue;
            }
            count += 1;
            labels[start] = count;
            queue.push_back((x, y));
            while let Some((cx, cy)) = queue.pop_front() {
                for dir in Direction::ALL {
                    let (nx, ny) = (cx + dir.dx(), cy + dir.dy());
                    if !mask.in_bounds(nx, ny) {
                        continue;
                    }
                    let i = (ny * w + nx) as usize;
                    if labels[i] == 0 && mask.get(nx as u32, ny as u32) {
                        labels[i] = count;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
    }
    (labels, count)
}

/// Trace the external contours of a mask.
///
/// Blobs lying inside the hole of another blob are part of that blob's
/// outline and get no contour of their own. Contours are returned in raster
/// order of their topmost-leftmost pixel.
pub fn external_contours(mask: &Mask) -> Vec<Contour> {
    let filled = fill_holes(mask);
    let (labels, count) = label_components(&filled);
    let w = filled.width() as i32;

    let mut seen = vec![false; count as usize + 1];
    let mut contours = Vec::with_capacity(count as usize);
    for (i, &label) in labels.iter().enumerate() {
        if label == 0 || seen[label as usize] {
            continue;
        }
        seen[label as usize] = true;
        let start = ((i as i32) % w, (i as i32) / w);
        let traced = trace_outer(&labels, &filled, label, start);
        contours.push(Contour {
            points: compress_runs(&traced),
        });
    }
    contours
}

/// Follow the outer border of the component `label`, starting from its
/// topmost-leftmost pixel.
fn trace_outer(labels: &[u32], mask: &Mask, label: u32, start: (i32, i32)) -> Vec<(i32, i32)> {
    let w = mask.width() as i32;
    let inside = |(x, y): (i32, i32)| mask.in_bounds(x, y) && labels[(y * w + x) as usize] == label;
    let step = |(x, y): (i32, i32), dir: Direction| (x + dir.dx(), y + dir.dy());

    // The west neighbour of the start pixel is background: search clockwise
    // from there for the first neighbour on the border
    let mut dir = Direction::West;
    let mut first = None;
    for _ in 0..8 {
        if inside(step(start, dir)) {
            first = Some(step(start, dir));
            break;
        }
        dir = dir.clockwise();
    }
    let Some(second) = first else {
        return vec![start];
    };

    let mut points = Vec::new();
    let mut prev = second;
    let mut cur = start;
    loop {
        points.push(cur);
        // Search counterclockwise around `cur`, starting next to `prev`
        let mut dir = match Direction::from_offset(prev.0 - cur.0, prev.1 - cur.1) {
            Some(d) => d,
            None => break,
        };
        let mut next = prev;
        for _ in 0..8 {
            dir = dir.counterclockwise();
            if inside(step(cur, dir)) {
                next = step(cur, dir);
                break;
            }
        }
        if next == start && cur == second {
            break;
        }
        prev = cur;
        cur = next;
    }
    points
}

/// Keep only the vertices where the direction of travel changes
fn compress_runs(points: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    (0..n)
        .filter(|&i| {
            let (px, py) = points[(i + n - 1) % n];
            let (cx, cy) = points[i];
            let (nx, ny) = points[(i + 1) % n];
            (cx - px, cy - py) != (nx - cx, ny - cy)
        })
        .map(|i| points[i])
        .collect()
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
    fn test_direction_table() {
        assert_eq!(Direction::from_offset(-1, 0), Some(Direction::West));
        assert_eq!(Direction::from_offset(1, 1), Some(Direction::SouthEast));
        assert_eq!(Direction::from_offset(0, 0), None);
        assert_eq!(Direction::West.counterclockwise(), Direction::SouthWest);
        assert_eq!(Direction::SouthWest.clockwise(), Direction::West);
    }

    #[test]
    fn test_rectangle_contour() {
        let m = mask_with(20, 20, &[(2, 3, 5, 4)]);
        let contours = external_contours(&m);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        assert_eq!(c.len(), 4);
        assert!(c.points.contains(&(2, 3)));
        assert!(c.points.contains(&(6, 3)));
        assert!(c.points.contains(&(6, 6)));
        assert!(c.points.contains(&(2, 6)));
        assert_eq!(c.area(), 12.0);
    }

    #[test]
    fn test_two_pixel_blob() {
        let m = mask_with(5, 5, &[(1, 1, 2, 1)]);
        let contours = external_contours(&m);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, vec![(1, 1), (2, 1)]);
        assert_eq!(contours[0].area(), 0.0);
    }

    #[test]
    fn test_single_pixel() {
        let m = mask_with(5, 5, &[(3, 3, 1, 1)]);
        let contours = external_contours(&m);
        assert_eq!(contours[0].points, vec![(3, 3)]);
    }

    #[test]
    fn test_nested_blob_has_no_contour() {
        // Ring with a separate dot inside its hole
        let mut m = mask_with(30, 30, &[(2, 2, 20, 20)]);
        for y in 4..20 {
            for x in 4..20 {
                m.set(x, y, false);
            }
        }
        m.set(10, 10, true);
        assert_eq!(external_contours(&m).len(), 1);

        let (_, count) = label_components(&m);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_diagonal_pixels_are_connected() {
        let mut m = Mask::new(6, 6).unwrap();
        m.set(1, 1, true);
        m.set(2, 2, true);
        m.set(3, 3, true);
        assert_eq!(external_contours(&m).len(), 1);
    }

    #[test]
    fn test_l_shape_contour() {
        let m = mask_with(20, 20, &[(0, 0, 4, 8), (4, 4, 4, 4)]);
        let contours = external_contours(&m);
        assert_eq!(contours.len(), 1);
        // The inner corner is cut diagonally between pixel centers
        assert_eq!(contours[0].len(), 7);
        assert!(contours[0].points.contains(&(4, 4)));
        assert!(contours[0].points.contains(&(3, 3)));
        let poly = contours[0].to_polygon().unwrap();
        assert!(poly.is_valid());
        assert_eq!(poly.area(), 21.0 + 12.0 + 0.5);
    }

    #[test]
    fn test_fill_holes() {
        let mut m = mask_with(10, 10, &[(1, 1, 6, 6)]);
        m.set(3, 3, false);
        let filled = fill_holes(&m);
        assert!(filled.get(3, 3));
        assert_eq!(filled.count_pixels(), 36);
    }
}
