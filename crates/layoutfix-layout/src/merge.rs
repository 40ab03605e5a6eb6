//! Plan execution
//!
//! [`execute_plan`] applies a [`MergePlan`] to a page and
//! [`execute_candidate`] inserts a detected region in place of the regions
//! it supersedes. Both keep the reading order consistent: references to
//! deleted regions are removed, references to merged or superseded regions
//! are redirected to the region that took their place, and ordered groups
//! are re-indexed.

use crate::diagnostics::{Change, DiagnosticKind, Diagnostics};
use crate::error::{LayoutError, LayoutResult};
use crate::page::Page;
use crate::plan::{CandidatePlan, MergePlan};
use crate::reading_order::Redirect;
use crate::region::Region;
use layoutfix_core::Polygon;
use log::{debug, info};
use std::collections::HashSet;

/// Apply a plan to a page.
///
/// Deletions run first, then merges. Entries naming regions that no longer
/// exist (for instance because a cascade already removed them) are skipped.
///
/// # Errors
///
/// Only fails if the page arena is inconsistent with itself.
pub fn execute_plan(page: &mut Page, plan: &MergePlan, diag: &mut Diagnostics) -> LayoutResult<()> {
    for deletion in &plan.deletions {
        if !page.contains(&deletion.region) {
            debug!("region '{}' already removed", deletion.region);
            continue;
        }
        delete_region(page, &deletion.region, deletion.redundant_to.as_deref(), diag)?;
    }
    for merge in &plan.merges {
        if !page.contains(&merge.loser) || !page.contains(&merge.survivor) {
            debug!(
                "skipping merge of '{}' into '{}': region gone",
                merge.loser, merge.survivor
            );
            continue;
        }
        merge_region(page, &merge.loser, &merge.survivor, diag)?;
    }
    Ok(())
}

/// Remove a region and its nested regions, dropping their reading-order
/// references
fn delete_region(
    page: &mut Page,
    id: &str,
    redundant_to: Option<&str>,
    diag: &mut Diagnostics,
) -> LayoutResult<()> {
    let removed = page.remove_region(id)?;
    for region in &removed {
        let redundant_to = if region.id == id {
            redundant_to.map(str::to_string)
        } else {
            Some(id.to_string())
        };
        diag.record(Change::Deleted {
            region: region.id.clone(),
            redundant_to,
        });
        if page.reading_order.remove(&region.id) > 0 {
            diag.record(Change::ReadingOrderRemoved {
                region: region.id.clone(),
            });
        }
    }
    Ok(())
}

/// Merge `loser` into `survivor`.
///
/// The boundary becomes the union outline of both. Lines and nested
/// regions move to the survivor; text is joined in document order.
/// Differing descriptive attributes keep the survivor's value and are
/// reported as [`DiagnosticKind::AttributeConflict`].
///
/// # Errors
///
/// Returns [`LayoutError::UnknownRegion`] if either id is not on the page;
/// the page is left untouched then.
pub fn merge_region(
    page: &mut Page,
    loser_id: &str,
    survivor_id: &str,
    diag: &mut Diagnostics,
) -> LayoutResult<()> {
    if !page.contains(survivor_id) {
        return Err(LayoutError::UnknownRegion(survivor_id.to_string()));
    }
    let loser = page
        .region(loser_id)
        .cloned()
        .ok_or_else(|| LayoutError::UnknownRegion(loser_id.to_string()))?;
    let loser_first = page
        .regions()
        .iter()
        .position(|r| r.id == loser_id)
        < page.regions().iter().position(|r| r.id == survivor_id);

    if let Some(survivor) = page.region_mut(survivor_id) {
        report_conflicts(&loser, survivor, diag);
        match merged_outline(&survivor.coords, &loser.coords) {
            Ok(outline) => survivor.coords = outline,
            Err(message) => diag.warn(DiagnosticKind::InvalidGeometry, survivor_id, message),
        }

        survivor.text = match (loser.text.clone(), survivor.text.take()) {
            (Some(l), Some(s)) if loser_first => Some(format!("{l}\n{s}")),
            (Some(l), Some(s)) => Some(format!("{s}\n{l}")),
            (l, s) => s.or(l),
        };

        let moved: Vec<(String, String)> = loser
            .lines
            .iter()
            .map(|l| (l.id.clone(), l.id.clone()))
            .collect();
        if loser_first {
            let mut lines = loser.lines.clone();
            lines.append(&mut survivor.lines);
            survivor.lines = lines;
        } else {
            survivor.lines.extend(loser.lines.iter().cloned());
        }
        if !moved.is_empty() {
            diag.record(Change::LinesReassigned {
                from: loser_id.to_string(),
                to: survivor_id.to_string(),
                lines: moved,
            });
        }
    }

    page.reparent_children(loser_id, survivor_id);
    page.remove_region(loser_id)?;
    diag.record(Change::Merged {
        loser: loser_id.to_string(),
        survivor: survivor_id.to_string(),
    });
    redirect_reading_order(page, loser_id, survivor_id, diag);
    Ok(())
}

fn merged_outline(survivor: &Polygon, loser: &Polygon) -> Result<Polygon, String> {
    let union = survivor
        .union_outline(loser)
        .map_err(|e| format!("union failed, keeping boundary: {e}"))?;
    if union.is_valid() {
        return Ok(union);
    }
    union
        .convex_hull()
        .ok()
        .filter(Polygon::is_valid)
        .ok_or_else(|| "union is not a simple polygon, keeping boundary".to_string())
}

fn report_conflicts(loser: &Region, survivor: &Region, diag: &mut Diagnostics) {
    fn check<T: PartialEq + std::fmt::Debug>(
        diag: &mut Diagnostics,
        loser: &Region,
        survivor: &Region,
        name: &str,
        a: &T,
        b: &T,
    ) {
        if a != b {
            diag.warn(
                DiagnosticKind::AttributeConflict,
                loser.id.as_str(),
                format!(
                    "merging into '{}' loses {} {:?} (kept {:?})",
                    survivor.id, name, a, b
                ),
            );
        }
    }
    check(diag, loser, survivor, "orientation", &loser.orientation, &survivor.orientation);
    check(diag, loser, survivor, "region type", &loser.region_type, &survivor.region_type);
    check(diag, loser, survivor, "subtype", &loser.subtype, &survivor.subtype);
    check(
        diag,
        loser,
        survivor,
        "primary script",
        &loser.primary_script,
        &survivor.primary_script,
    );
    check(
        diag,
        loser,
        survivor,
        "primary language",
        &loser.primary_language,
        &survivor.primary_language,
    );
    check(diag, loser, survivor, "text style", &loser.text_style, &survivor.text_style);
    if let (Some(a), Some(b)) = (&loser.text, &survivor.text)
        && a != b
    {
        diag.warn(
            DiagnosticKind::AttributeConflict,
            loser.id.as_str(),
            format!("merging text into '{}' joins two differing texts", survivor.id),
        );
    }
}

fn redirect_reading_order(page: &mut Page, from: &str, to: &str, diag: &mut Diagnostics) {
    match page.reading_order.redirect(from, to) {
        Redirect::Redirected => diag.record(Change::ReadingOrderRedirected {
            from: from.to_string(),
            to: to.to_string(),
        }),
        Redirect::Removed => diag.record(Change::ReadingOrderRemoved {
            region: from.to_string(),
        }),
        Redirect::NotFound => {}
    }
}

/// Insert a detected region in place of the regions it supersedes.
///
/// Lines of every superseded region (and of its nested regions) move to
/// `region` in document order and are renamed `{id}_lineNN`, continuing
/// after the lines `region` already has. Reading-order references to a
/// superseded region are redirected to `region`; references to its nested
/// regions are removed. The region text becomes the joined line text.
///
/// # Errors
///
/// Returns [`crate::LayoutError::DuplicateRegionId`] if `region.id` is
/// taken.
pub fn execute_candidate(
    page: &mut Page,
    plan: &CandidatePlan,
    mut region: Region,
    diag: &mut Diagnostics,
) -> LayoutResult<()> {
    region.coords = plan.polygon.clone();
    let taken = page.line_ids();

    for old_id in &plan.superseded {
        if !page.contains(old_id) {
            continue;
        }
        let removed = page.remove_region(old_id)?;
        let nested: Vec<String> = removed
            .iter()
            .filter(|r| r.id != *old_id)
            .map(|r| r.id.clone())
            .collect();
        let mut renamed = Vec::new();
        for mut line in removed.into_iter().flat_map(|r| r.lines) {
            let new_id = next_line_id(&region, &taken);
            debug!("line '{}' becomes '{}'", line.id, new_id);
            renamed.push((line.id.clone(), new_id.clone()));
            line.id = new_id;
            region.lines.push(line);
        }
        diag.record(Change::Superseded {
            region: old_id.clone(),
            by: region.id.clone(),
        });
        if !renamed.is_empty() {
            diag.record(Change::LinesReassigned {
                from: old_id.clone(),
                to: region.id.clone(),
                lines: renamed,
            });
        }
        for nested_id in nested {
            diag.record(Change::Deleted {
                region: nested_id.clone(),
                redundant_to: Some(old_id.clone()),
            });
            if page.reading_order.remove(&nested_id) > 0 {
                diag.record(Change::ReadingOrderRemoved { region: nested_id });
            }
        }
        redirect_reading_order(page, old_id, &region.id, diag);
    }

    region.text = region.line_text();
    info!(
        "inserting region '{}' with {} lines",
        region.id,
        region.lines.len()
    );
    let id = region.id.clone();
    page.add_region(region)?;
    diag.record(Change::Inserted { region: id });
    Ok(())
}

fn next_line_id(region: &Region, taken: &HashSet<String>) -> String {
    let mut n = region.lines.len();
    loop {
        let id = format!("{}_line{:02}", region.id, n);
        if !taken.contains(&id) && !region.lines.iter().any(|l| l.id == id) {
            return id;
        }
        n += 1;
    }
}
