//! Page-level entry points
//!
//! [`reconcile_page`] plausibilizes the regions already on a page;
//! [`reconcile_with_detections`] brings detector output onto the page as
//! new regions. Both mutate the page in place and report through a
//! [`Diagnostics`] sink. Only a broken detector class table or invalid
//! options abort a page; everything else is skipped and reported.

use crate::detection::{Detection, deduplicate};
use crate::diagnostics::{Change, DiagnosticKind, Diagnostics};
use crate::error::LayoutResult;
use crate::merge::{execute_candidate, execute_plan};
use crate::options::ReconcileOptions;
use crate::page::Page;
use crate::plan::{MergePlan, plan_candidate, plan_level};
use crate::region::{Parent, Region, RegionType};
use crate::sanitize::{sanitize_page, sanitize_region};
use crate::validate::validate_page;
use layoutfix_mask::{MaskError, vectorize_mask};
use log::{debug, info, warn};

/// Structural subtype given to detected regions
const DETECTED_SUBTYPE: &str = "other";

/// Remove reading-order references to regions that do not exist
fn prune_reading_order(page: &mut Page, diag: &mut Diagnostics) {
    for id in page.prune_reading_order() {
        diag.warn(
            DiagnosticKind::DanglingReadingOrderRef,
            id.as_str(),
            "reading order refers to a missing region",
        );
        diag.record(Change::ReadingOrderRemoved { region: id });
    }
}

/// Report a plan that is not applied
fn report_plan(plan: &MergePlan, diag: &mut Diagnostics) {
    for deletion in &plan.deletions {
        let message = match &deletion.redundant_to {
            Some(other) => format!("redundant to '{other}' (not removed)"),
            None => "redundant (not removed)".to_string(),
        };
        diag.warn(DiagnosticKind::RedundantRegion, deletion.region.as_str(), message);
    }
    for merge in &plan.merges {
        diag.warn(
            DiagnosticKind::RedundantRegion,
            merge.loser.as_str(),
            format!("almost within '{}' (not merged)", merge.survivor),
        );
    }
}

/// Plausibilize the regions of a page.
///
/// Dangling reading-order references are pruned and coordinates validated
/// first. Then rounds of sanitizing (if enabled) and per-level planning
/// run until a round changes nothing, so running this again on its own
/// output records no further changes. With `plausibilize` off, plans are
/// reported as [`DiagnosticKind::RedundantRegion`] and not applied.
///
/// # Errors
///
/// Returns [`crate::LayoutError::InvalidParameters`] for invalid options.
pub fn reconcile_page(
    page: &mut Page,
    options: &ReconcileOptions,
    diag: &mut Diagnostics,
) -> LayoutResult<()> {
    options.validate()?;
    prune_reading_order(page, diag);
    validate_page(page, diag);

    // None: sanitize every text region; Some: only these
    let mut to_sanitize: Option<Vec<String>> = None;
    let mut round = 0;
    loop {
        if round == options.max_rounds {
            warn!(
                "page '{}' still changing after {} rounds",
                page.id, options.max_rounds
            );
            break;
        }
        round += 1;
        let mut changed = false;

        if options.sanitize {
            match to_sanitize.take() {
                None => changed |= sanitize_page(page, diag)? > 0,
                Some(ids) => {
                    for id in ids {
                        let is_text = page
                            .region(&id)
                            .is_some_and(|r| r.region_type == RegionType::Text);
                        if is_text {
                            changed |= sanitize_region(page, &id, diag)?;
                        }
                    }
                }
            }
        }

        let mut survivors = Vec::new();
        for level in page.sibling_levels() {
            if let Parent::Region(owner) = &level
                && !page.contains(owner)
            {
                continue;
            }
            let plan = plan_level(page, &level, options, diag);
            if plan.is_empty() {
                continue;
            }
            if options.plausibilize {
                survivors.extend(plan.merges.iter().map(|m| m.survivor.clone()));
                execute_plan(page, &plan, diag)?;
                changed = true;
            } else {
                report_plan(&plan, diag);
            }
        }

        debug!("page '{}' round {}: changed {}", page.id, round, changed);
        if !changed {
            break;
        }
        to_sanitize = Some(survivors);
    }
    prune_reading_order(page, diag);
    Ok(())
}

fn vectorize_failure_kind(err: &MaskError) -> DiagnosticKind {
    match err {
        MaskError::EmptyMask => DiagnosticKind::EmptyMask,
        MaskError::NonContiguousMask { .. } => DiagnosticKind::NonContiguousMask,
        _ => DiagnosticKind::InvalidGeometry,
    }
}

/// First free region id: `base`, then `base_1`, `base_2`, ...
fn unique_region_id(page: &Page, base: &str) -> String {
    if !page.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|k| format!("{base}_{k}"))
        .find(|id| !page.contains(id))
        .unwrap_or_else(|| base.to_string())
}

/// Insert detected regions into a page.
///
/// Detections are deduplicated, then each survivor is vectorized and
/// planned against the text regions that were on the page before this
/// call. A detection that takes over no line with address content is
/// dropped as a ghost ([`DiagnosticKind::GhostDetection`]); one whose mask
/// cannot be vectorized is dropped with the vectorizer's failure. The
/// others replace the regions they supersede, taking over their lines.
///
/// Returns the ids of the inserted regions.
///
/// # Errors
///
/// - [`crate::LayoutError::InvalidDetectorOutput`] if a detection has the
///   background class or a class without a name
/// - [`crate::LayoutError::InvalidParameters`] for invalid options
pub fn reconcile_with_detections(
    page: &mut Page,
    detections: &[Detection],
    options: &ReconcileOptions,
    diag: &mut Diagnostics,
) -> LayoutResult<Vec<String>> {
    options.validate()?;
    let kept = deduplicate(detections, options, diag)?;
    prune_reading_order(page, diag);

    let neighbours: Vec<String> = page.text_regions().map(|r| r.id.clone()).collect();
    let vectorize_options = options.vectorize_options();
    let mut inserted = Vec::new();

    for det in kept {
        let detection = &detections[det.index];
        let name = options.class_name(det.class_id).unwrap_or_default();
        let base = format!("{}{:02}", options.candidate_id_prefix, det.index + 1);
        let id = unique_region_id(page, &base);

        let vectorized = match vectorize_mask(&detection.mask, &vectorize_options) {
            Ok(v) => v,
            Err(e) => {
                diag.warn(
                    vectorize_failure_kind(&e),
                    id.as_str(),
                    format!("{name} detection dropped: {e}"),
                );
                continue;
            }
        };
        info!(
            "detected {} region '{}' on page '{}' (score {:.3})",
            name, id, page.id, det.score
        );

        let plan = plan_candidate(
            page,
            &neighbours,
            &id,
            vectorized.polygon,
            vectorized.scale,
            options,
            diag,
        );
        if !plan.has_address {
            diag.warn(
                DiagnosticKind::GhostDetection,
                id.as_str(),
                format!("{name} region without any address lines ignored"),
            );
            continue;
        }

        let mut region = Region::text(id.clone(), plan.polygon.clone());
        region.confidence = Some(det.score);
        region.subtype = Some(DETECTED_SUBTYPE.to_string());
        region.custom = Some(format!("subtype:{name}"));
        execute_candidate(page, &plan, region, diag)?;
        inserted.push(id);
    }
    Ok(inserted)
}
