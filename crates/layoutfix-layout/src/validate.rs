//! Coordinate consistency checks
//!
//! Validation never modifies the page. Every segment must lie within its
//! parent: regions within the page border, nested regions within their
//! parent region, lines within their region and baselines within their
//! line.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::page::Page;
use crate::region::Parent;
use layoutfix_core::{Polygon, Relation, RelationOptions, classify};

fn within(child: &Polygon, parent: &Polygon) -> bool {
    let options = RelationOptions::default().with_hull_guard(false);
    matches!(
        classify(child, parent, &options),
        Relation::BContainsA | Relation::Equal
    )
}

/// Check that every segment of the page lies within its parent.
///
/// Returns `true` if no problem was found; each problem is recorded as
/// [`DiagnosticKind::CoordsOutsideParent`] or
/// [`DiagnosticKind::BaselineOutsideLine`].
pub fn validate_page(page: &Page, diag: &mut Diagnostics) -> bool {
    let mut valid = true;
    for region in page.regions() {
        match &region.parent {
            Parent::Page => {
                if let Some(border) = &page.border
                    && !within(&region.coords, border)
                {
                    diag.warn(
                        DiagnosticKind::CoordsOutsideParent,
                        region.id.as_str(),
                        format!("region extends beyond border of page '{}'", page.id),
                    );
                    valid = false;
                }
            }
            Parent::Region(parent_id) => {
                if let Some(parent) = page.region(parent_id)
                    && !within(&region.coords, &parent.coords)
                {
                    diag.warn(
                        DiagnosticKind::CoordsOutsideParent,
                        region.id.as_str(),
                        format!("region extends beyond parent region '{parent_id}'"),
                    );
                    valid = false;
                }
            }
        }

        for line in &region.lines {
            if !within(&line.coords, &region.coords) {
                diag.warn(
                    DiagnosticKind::CoordsOutsideParent,
                    line.id.as_str(),
                    format!("line extends beyond region '{}'", region.id),
                );
                valid = false;
            }
            if let Some(baseline) = &line.baseline
                && !line.coords.contains_polyline(baseline)
            {
                diag.warn(
                    DiagnosticKind::BaselineOutsideLine,
                    line.id.as_str(),
                    format!("baseline extends beyond line in region '{}'", region.id),
                );
                valid = false;
            }
        }
    }
    valid
}
