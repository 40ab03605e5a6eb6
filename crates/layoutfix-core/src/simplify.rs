//! Douglas-Peucker simplification of closed rings
//!
//! The ring is split at the vertex farthest from the first one; each half
//! is then simplified as an open chain with both endpoints kept.

use crate::point::Point;

/// Simplify a closed ring (first vertex not repeated).
///
/// Vertices within `tolerance` of the chord of their run are removed.
/// Rings with fewer than four vertices are returned unchanged.
pub fn simplify_ring(points: &[Point], tolerance: f64) -> Vec<Point> {
    let n = points.len();
    if n < 4 || tolerance <= 0.0 {
        return points.to_vec();
    }

    let anchor = points[0];
    let split = (1..n)
        .max_by(|&a, &b| {
            anchor
                .distance_sq(&points[a])
                .total_cmp(&anchor.distance_sq(&points[b]))
        })
        .unwrap_or(n / 2);

    // Closed ring: 0..=split and split..=n (index n wraps to 0)
    let mut ring: Vec<Point> = points.to_vec();
    ring.push(anchor);

    let mut keep = vec![false; n + 1];
    keep[0] = true;
    keep[split] = true;
    keep[n] = true;
    mark_chain(&ring, 0, split, tolerance, &mut keep);
    mark_chain(&ring, split, n, tolerance, &mut keep);

    ring.iter()
        .take(n)
        .zip(keep.iter())
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect()
}

/// Mark the vertices to keep in the open chain `first..=last`.
///
/// Uses an explicit stack instead of recursion.
fn mark_chain(points: &[Point], first: usize, last: usize, tolerance: f64, keep: &mut [bool]) {
    let mut stack = vec![(first, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (a, b) = (&points[start], &points[end]);
        let mut max_dist = 0.0;
        let mut index = start;
        for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = p.distance_to_segment(a, b);
            if d > max_dist {
                max_dist = d;
                index = i;
            }
        }
        if max_dist > tolerance {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }
}
