//! Pairwise relation between two region boundaries
//!
//! [`classify`] decides whether two polygons are (approximately) equal,
//! nested, partially overlapping, touching or disjoint. The overlap case
//! carries the intersection area as a fraction of each polygon's area so
//! callers can apply their own merge thresholds.

use crate::polygon::Polygon;
use log::debug;
use serde::{Deserialize, Serialize};

/// Geometric relation of polygon A to polygon B
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Relation {
    /// Same shape within the equality tolerance
    Equal,
    /// B lies inside A
    AContainsB,
    /// A lies inside B
    BContainsA,
    /// The interiors intersect without containment
    Overlaps {
        /// Intersection area divided by the area of A
        ratio_a: f64,
        /// Intersection area divided by the area of B
        ratio_b: f64,
    },
    /// The boundaries touch or cross without a common interior area
    Crosses,
    /// No common point, or an overlap suppressed by the hull guard
    Disjoint,
}

impl Relation {
    /// The relation of B to A
    pub fn mirrored(self) -> Relation {
        match self {
            Relation::AContainsB => Relation::BContainsA,
            Relation::BContainsA => Relation::AContainsB,
            Relation::Overlaps { ratio_a, ratio_b } => Relation::Overlaps {
                ratio_a: ratio_b,
                ratio_b: ratio_a,
            },
            other => other,
        }
    }

    /// Check for either containment direction
    pub fn is_containment(&self) -> bool {
        matches!(self, Relation::AContainsB | Relation::BContainsA)
    }
}

/// Options for [`classify`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationOptions {
    /// Maximum vertex distance (pixels) for approximate equality
    pub equality_tolerance: f64,
    /// Fraction of the inner area allowed to stick out of the container
    pub containment_tolerance: f64,
    /// Report an overlap as disjoint when the convex hull of both
    /// polygons is at least as large as their summed areas
    pub hull_guard: bool,
}

impl Default for RelationOptions {
    fn default() -> Self {
        Self {
            equality_tolerance: 0.5,
            containment_tolerance: 1e-3,
            hull_guard: true,
        }
    }
}

impl RelationOptions {
    /// Set the vertex tolerance for approximate equality
    pub fn with_equality_tolerance(mut self, tolerance: f64) -> Self {
        self.equality_tolerance = tolerance;
        self
    }

    /// Set the containment tolerance
    pub fn with_containment_tolerance(mut self, tolerance: f64) -> Self {
        self.containment_tolerance = tolerance;
        self
    }

    /// Enable or disable the convex-hull guard
    pub fn with_hull_guard(mut self, enabled: bool) -> Self {
        self.hull_guard = enabled;
        self
    }
}

/// Classify the relation of polygon `a` to polygon `b`.
///
/// Checks run in a fixed order: degenerate or far apart, approximate
/// equality, containment (by intersection area), interior overlap, and
/// finally boundary contact. `classify(b, a)` always yields
/// `classify(a, b).mirrored()`.
pub fn classify(a: &Polygon, b: &Polygon, options: &RelationOptions) -> Relation {
    let area_a = a.area();
    let area_b = b.area();
    if area_a <= f64::EPSILON || area_b <= f64::EPSILON || !a.bounds_touch(b) {
        return Relation::Disjoint;
    }

    if a.almost_equals(b, options.equality_tolerance) {
        return Relation::Equal;
    }

    let inter = a.intersection_area(b);
    let a_holds_b = area_b - inter <= options.containment_tolerance * area_b;
    let b_holds_a = area_a - inter <= options.containment_tolerance * area_a;
    match (a_holds_b, b_holds_a) {
        (true, true) => return Relation::Equal,
        (true, false) => return Relation::AContainsB,
        (false, true) => return Relation::BContainsA,
        (false, false) => {}
    }

    if inter > 0.0 {
        if options.hull_guard {
            let hull_area = a.joint_hull_area(b);
            if hull_area >= area_a + area_b {
                debug!(
                    "overlap of {:.1} suppressed: hull area {:.1} >= {:.1} + {:.1}",
                    inter, hull_area, area_a, area_b
                );
                return Relation::Disjoint;
            }
        }
        return Relation::Overlaps {
            ratio_a: inter / area_a,
            ratio_b: inter / area_b,
        };
    }

    if a.intersects(b) {
        Relation::Crosses
    } else {
        Relation::Disjoint
    }
}
