//! Simple polygons with an open boundary ring
//!
//! A [`Polygon`] stores its boundary as an ordered vertex sequence without
//! repeating the first vertex at the end. Area, validity and vertex
//! simplification are computed directly on the ring; boolean operations
//! and offsetting go through `geo` / `geo-clipper`.

use crate::error::{GeomError, GeomResult};
use crate::point::{Point, on_segment, orient, segments_intersect};
use crate::simplify::simplify_ring;
use geo::{Area, ConvexHull, Intersects};
use geo_clipper::{Clipper, EndType, JoinType};
use serde::{Deserialize, Serialize};

/// Fixed-point scale used when handing coordinates to the clipper.
///
/// Pixel coordinates keep two decimals of precision through boolean ops.
pub const CLIPPER_FACTOR: f64 = 100.0;

/// A simple polygon (open ring, at least three distinct vertices)
///
/// Serialized as its vertex list; deserialization applies the same checks
/// as [`Polygon::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Create a polygon from its boundary vertices.
    ///
    /// A closing vertex equal to the first one is dropped, as are exact
    /// consecutive duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::TooFewPoints`] if fewer than three distinct
    /// vertices remain.
    pub fn new(points: Vec<Point>) -> GeomResult<Self> {
        let points = strip_duplicates(points);
        if points.len() < 3 {
            return Err(GeomError::TooFewPoints {
                count: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Create an axis-aligned rectangle
    pub fn rectangle(x: f64, y: f64, w: f64, h: f64) -> GeomResult<Self> {
        Self::new(vec![
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ])
    }

    /// Create a polygon from `(x, y)` pairs
    pub fn from_coords(coords: &[(f64, f64)]) -> GeomResult<Self> {
        Self::new(coords.iter().copied().map(Point::from).collect())
    }

    /// Get the boundary vertices
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consume the polygon and return its vertices
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Get the number of vertices
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed polygon; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the boundary edges, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Signed area (shoelace formula); the sign depends on vertex order
    pub fn signed_area(&self) -> f64 {
        let sum: f64 = self.edges().map(|(a, b)| a.x * b.y - b.x * a.y).sum();
        sum / 2.0
    }

    /// Unsigned area
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Perimeter length
    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance(&b)).sum()
    }

    /// Compute the bounding box.
    ///
    /// Returns `(x_min, y_min, x_max, y_max)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        (min_x, min_y, max_x, max_y)
    }

    /// Height of the bounding box
    pub fn height(&self) -> f64 {
        let (_, y0, _, y1) = self.bounds();
        y1 - y0
    }

    /// Check whether the bounding boxes of two polygons share any point
    pub fn bounds_touch(&self, other: &Polygon) -> bool {
        let (ax0, ay0, ax1, ay1) = self.bounds();
        let (bx0, by0, bx1, by1) = other.bounds();
        ax0 <= bx1 && bx0 <= ax1 && ay0 <= by1 && by0 <= ay1
    }

    /// Translate all vertices by (dx, dy)
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            *p = p.offset(dx, dy);
        }
    }

    /// Check whether the boundary describes a valid simple polygon.
    ///
    /// A valid polygon has non-zero area and no edge touches or crosses
    /// another edge except its two neighbours at the shared vertices.
    /// Adjacent edges folding back onto each other (spikes) are invalid.
    pub fn is_valid(&self) -> bool {
        let pts = &self.points;
        let n = pts.len();
        if n < 3 || self.area() <= f64::EPSILON {
            return false;
        }

        for i in 0..n {
            let a = &pts[i];
            let b = &pts[(i + 1) % n];
            let c = &pts[(i + 2) % n];
            // Spike: the next edge runs back along this one
            if orient(a, b, c) == 0.0 && (on_segment(a, b, c) || on_segment(b, c, a)) {
                return false;
            }
        }

        for i in 0..n {
            let p1 = &pts[i];
            let p2 = &pts[(i + 1) % n];
            for j in (i + 2)..n {
                // Edge n-1 is adjacent to edge 0 through the closing vertex
                if i == 0 && j == n - 1 {
                    continue;
                }
                let p3 = &pts[j];
                let p4 = &pts[(j + 1) % n];
                if segments_intersect(p1, p2, p3, p4) {
                    return false;
                }
            }
        }
        true
    }

    /// Point-in-polygon test (even-odd rule, boundary counts as inside)
    pub fn contains_point(&self, p: &Point) -> bool {
        for (a, b) in self.edges() {
            if orient(&a, &b, p) == 0.0 && on_segment(&a, &b, p) {
                return true;
            }
        }
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Check whether an open polyline stays inside the polygon.
    ///
    /// Touching the boundary is allowed; crossing it is not.
    pub fn contains_polyline(&self, points: &[Point]) -> bool {
        if points.is_empty() || !points.iter().all(|p| self.contains_point(p)) {
            return false;
        }
        points.windows(2).all(|seg| {
            let (p, q) = (&seg[0], &seg[1]);
            let mid = Point::new((p.x + q.x) / 2.0, (p.y + q.y) / 2.0);
            self.contains_point(&mid)
                && self.edges().all(|(a, b)| {
                    let d1 = orient(&a, &b, p);
                    let d2 = orient(&a, &b, q);
                    let d3 = orient(p, q, &a);
                    let d4 = orient(p, q, &b);
                    // Proper crossing only
                    !(d1 * d2 < 0.0 && d3 * d4 < 0.0)
                })
        })
    }

    /// Approximate equality.
    ///
    /// Both vertex sets must lie within `tolerance` of each other (in
    /// either direction) after near-duplicate vertices are merged, and the
    /// areas must agree up to what a `tolerance`-wide band along the
    /// boundary allows. Vertex order and starting vertex do not matter.
    pub fn almost_equals(&self, other: &Polygon, tolerance: f64) -> bool {
        let a = dedup_near(&self.points, tolerance);
        let b = dedup_near(&other.points, tolerance);
        let tol_sq = tolerance * tolerance;
        let covered = |from: &[Point], to: &[Point]| {
            from.iter()
                .all(|p| to.iter().any(|q| p.distance_sq(q) <= tol_sq))
        };
        if !covered(&a, &b) || !covered(&b, &a) {
            return false;
        }
        let band = tolerance * self.perimeter().max(other.perimeter());
        (self.area() - other.area()).abs() <= band.max(f64::EPSILON)
    }

    /// Simplify the boundary with the Douglas-Peucker algorithm.
    ///
    /// The result is not checked for validity; callers that need a simple
    /// polygon must check [`Polygon::is_valid`].
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::TooFewPoints`] if the ring collapses.
    pub fn simplify(&self, tolerance: f64) -> GeomResult<Polygon> {
        Polygon::new(simplify_ring(&self.points, tolerance))
    }

    /// Convert to a `geo` polygon (closed ring, no holes)
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let coords: Vec<geo::Coord<f64>> = self.points.iter().map(|&p| p.into()).collect();
        geo::Polygon::new(geo::LineString::from(coords), vec![])
    }

    /// Convert the exterior of a `geo` polygon, dropping holes
    pub fn from_geo(poly: &geo::Polygon<f64>) -> GeomResult<Polygon> {
        Polygon::new(poly.exterior().coords().map(|&c| Point::from(c)).collect())
    }

    /// Convex hull of the vertices
    pub fn convex_hull(&self) -> GeomResult<Polygon> {
        Polygon::from_geo(&self.to_geo().convex_hull())
    }

    /// Area of the convex hull enclosing both polygons
    pub fn joint_hull_area(&self, other: &Polygon) -> f64 {
        let points: Vec<geo::Point<f64>> = self
            .points
            .iter()
            .chain(other.points.iter())
            .map(|&p| geo::Point::from(geo::Coord::from(p)))
            .collect();
        geo::MultiPoint::new(points).convex_hull().unsigned_area()
    }

    /// Check whether the two closed polygons share at least one point
    pub fn intersects(&self, other: &Polygon) -> bool {
        self.bounds_touch(other) && self.to_geo().intersects(&other.to_geo())
    }

    /// Area of the intersection of the two polygons
    pub fn intersection_area(&self, other: &Polygon) -> f64 {
        if !self.bounds_touch(other) {
            return 0.0;
        }
        self.to_geo()
            .intersection(&other.to_geo(), CLIPPER_FACTOR)
            .unsigned_area()
    }

    /// Union of two polygons, reduced to a single simple outline.
    ///
    /// If the union is one polygon its exterior is returned (holes are
    /// dropped); if the parts are disjoint, their convex hull is returned.
    pub fn union_outline(&self, other: &Polygon) -> GeomResult<Polygon> {
        let union = self.to_geo().union(&other.to_geo(), CLIPPER_FACTOR);
        match union.0.len() {
            0 => Err(GeomError::EmptyResult("union")),
            1 => Polygon::from_geo(&union.0[0]),
            _ => Polygon::from_geo(&union.convex_hull()),
        }
    }

    /// Grow (or shrink, for negative `distance`) the polygon by a fixed
    /// distance with rounded corners.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::EmptyResult`] if a negative offset consumes the
    /// whole polygon.
    pub fn buffer(&self, distance: f64) -> GeomResult<Polygon> {
        let grown = self.to_geo().offset(
            distance,
            JoinType::Round(0.25),
            EndType::ClosedPolygon,
            CLIPPER_FACTOR,
        );
        let largest = grown
            .0
            .iter()
            .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
            .ok_or(GeomError::EmptyResult("buffer"))?;
        Polygon::from_geo(largest)
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = GeomError;

    fn try_from(points: Vec<Point>) -> GeomResult<Self> {
        Polygon::new(points)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(poly: Polygon) -> Self {
        poly.points
    }
}

/// Drop the closing vertex and exact consecutive duplicates
fn strip_duplicates(mut points: Vec<Point>) -> Vec<Point> {
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Merge runs of vertices closer than `tolerance` into their first vertex
fn dedup_near(points: &[Point], tolerance: f64) -> Vec<Point> {
    let tol_sq = tolerance * tolerance;
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        match out.last() {
            Some(last) if last.distance_sq(p) <= tol_sq => {}
            _ => out.push(*p),
        }
    }
    while out.len() > 1 && out[0].distance_sq(&out[out.len() - 1]) <= tol_sq {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, s: f64) -> Polygon {
        Polygon::rectangle(x, y, s, s).unwrap()
    }

    #[test]
    fn test_new_strips_closing_point() {
        let poly =
            Polygon::from_coords(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)]).unwrap();
        assert_eq!(poly.len(), 3);
    }

    #[test]
    fn test_new_too_few_points() {
        let err = Polygon::from_coords(&[(0.0, 0.0), (1.0, 1.0), (1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, GeomError::TooFewPoints { count: 2 }));
    }

    #[test]
    fn test_area_and_bounds() {
        let poly = Polygon::rectangle(2.0, 3.0, 10.0, 5.0).unwrap();
        assert_eq!(poly.area(), 50.0);
        assert_eq!(poly.bounds(), (2.0, 3.0, 12.0, 8.0));
        assert_eq!(poly.perimeter(), 30.0);
        assert_eq!(poly.height(), 5.0);
    }

    #[test]
    fn test_is_valid() {
        assert!(square(0.0, 0.0, 10.0).is_valid());

        // Bow-tie crosses itself
        let bowtie =
            Polygon::from_coords(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]).unwrap();
        assert!(!bowtie.is_valid());

        // Spike folding back onto the previous edge
        let spike = Polygon::from_coords(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (10.0, 5.0),
            (0.0, 10.0),
        ])
        .unwrap();
        assert!(!spike.is_valid());

        // Collinear vertices along an edge are fine
        let collinear =
            Polygon::from_coords(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
                .unwrap();
        assert!(collinear.is_valid());

        // Zero area
        let flat = Polygon::from_coords(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]).unwrap();
        assert!(!flat.is_valid());
    }

    #[test]
    fn test_contains_point() {
        let poly = square(0.0, 0.0, 10.0);
        assert!(poly.contains_point(&Point::new(5.0, 5.0)));
        assert!(poly.contains_point(&Point::new(10.0, 5.0)));
        assert!(!poly.contains_point(&Point::new(11.0, 5.0)));
    }

    #[test]
    fn test_contains_polyline() {
        // U shape: a baseline across the notch leaves the polygon
        let u = Polygon::from_coords(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 8.0),
            (7.0, 8.0),
            (7.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ])
        .unwrap();
        let inside = [Point::new(1.0, 9.0), Point::new(9.0, 9.0)];
        assert!(u.contains_polyline(&inside));
        let across = [Point::new(1.0, 4.0), Point::new(9.0, 4.0)];
        assert!(!u.contains_polyline(&across));
        let outside = [Point::new(1.0, 9.0), Point::new(12.0, 9.0)];
        assert!(!u.contains_polyline(&outside));
        assert!(!u.contains_polyline(&[]));
    }

    #[test]
    fn test_almost_equals() {
        let a = square(0.0, 0.0, 10.0);
        let b = Polygon::from_coords(&[
            (10.0, 0.2),
            (10.0, 10.0),
            (0.1, 10.0),
            (0.0, 0.0),
            (0.1, 0.0),
        ])
        .unwrap();
        assert!(a.almost_equals(&b, 0.5));
        assert!(b.almost_equals(&a, 0.5));
        assert!(!a.almost_equals(&square(0.0, 0.0, 12.0), 0.5));
    }

    #[test]
    fn test_intersection_area() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);
        assert!((a.intersection_area(&b) - 25.0).abs() < 1e-6);
        assert_eq!(a.intersection_area(&square(20.0, 20.0, 5.0)), 0.0);
    }

    #[test]
    fn test_union_outline() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 0.0, 10.0);
        let u = a.union_outline(&b).unwrap();
        assert!((u.area() - 150.0).abs() < 1e-6);

        // Disjoint parts fall back to the convex hull
        let c = square(20.0, 0.0, 10.0);
        let hull = a.union_outline(&c).unwrap();
        assert!((hull.area() - 300.0).abs() < 1e-6);
        assert!(hull.is_valid());
    }

    #[test]
    fn test_buffer_grows() {
        let a = square(0.0, 0.0, 10.0);
        let grown = a.buffer(2.0).unwrap();
        assert!(grown.area() > 190.0 && grown.area() < 200.0);
        assert!(grown.contains_point(&Point::new(-1.5, 5.0)));
    }

    #[test]
    fn test_joint_hull_area() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(20.0, 0.0, 10.0);
        assert!((a.joint_hull_area(&b) - 300.0).abs() < 1e-9);
    }
}
