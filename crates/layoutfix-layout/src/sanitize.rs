//! Region boundary sanitizing
//!
//! A region boundary drawn by hand or by a coarse segmenter often includes
//! a lot of empty space. Sanitizing replaces it with the closed hull of the
//! region's lines: the lines are rasterized, gaps between them are closed
//! vertically, and the outer contour of the result becomes the boundary.

use crate::diagnostics::{Change, DiagnosticKind, Diagnostics};
use crate::error::{LayoutError, LayoutResult};
use crate::page::Page;
use crate::region::{Line, RegionType};
use layoutfix_core::Polygon;
use layoutfix_mask::{Mask, close_brick, dilate_brick, external_contours, fill_polygon};
use log::debug;

/// Contours below this share of the total contour area are ignored
const MIN_FRAGMENT_FRACTION: f64 = 0.1;

/// Simplification tolerance for the new boundary
const SIMPLIFY_TOLERANCE: f64 = 1.0;

/// Vertical closing size: the tallest line, or the widest gap between
/// vertically adjacent lines if that is larger
fn closing_scale(lines: &[Line]) -> u32 {
    let mut extents: Vec<(f64, f64)> = lines
        .iter()
        .map(|l| {
            let (_, top, _, bottom) = l.coords.bounds();
            (top, bottom - top)
        })
        .collect();
    let mut scale = extents.iter().map(|&(_, h)| h).fold(0.0, f64::max);
    if extents.len() > 1 {
        extents.sort_by(|a, b| a.0.total_cmp(&b.0));
        let gap = extents
            .windows(2)
            .map(|w| w[1].0 - (w[0].0 + w[0].1))
            .fold(f64::MIN, f64::max);
        scale = scale.max(gap);
    }
    (scale.floor() as u32).max(1)
}

/// Shrink a text region to the closed hull of its lines.
///
/// Returns whether the boundary changed. Regions without lines, with an
/// empty or fragmented line mask, or whose new outline is invalid are left
/// alone and reported.
///
/// # Errors
///
/// Returns [`LayoutError::UnknownRegion`] for an unknown id.
pub fn sanitize_region(page: &mut Page, id: &str, diag: &mut Diagnostics) -> LayoutResult<bool> {
    let region = page
        .region(id)
        .ok_or_else(|| LayoutError::UnknownRegion(id.to_string()))?;
    if region.lines.is_empty() {
        diag.warn(
            DiagnosticKind::RegionWithoutLines,
            id,
            "region contains no lines",
        );
        return Ok(false);
    }

    let scale = closing_scale(&region.lines);
    let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for line in &region.lines {
        let (lx0, ly0, lx1, ly1) = line.coords.bounds();
        x0 = x0.min(lx0);
        y0 = y0.min(ly0);
        x1 = x1.max(lx1);
        y1 = y1.max(ly1);
    }
    // Room for the one-pixel growth and for the contour tracer
    let margin = 2;
    let ox = x0.floor() as i32 - margin;
    let oy = y0.floor() as i32 - margin;
    let width = (x1.ceil() as i32 - ox + margin + 1).max(1) as u32;
    let height = (y1.ceil() as i32 - oy + margin + 1).max(1) as u32;

    let mut mask = Mask::new(width, height)?;
    for line in &region.lines {
        fill_polygon(&mut mask, &line.coords, ox, oy);
    }
    let closed = close_brick(&mask, 1, scale)?;
    let grown = dilate_brick(&closed, 3, 3)?;

    let contours = external_contours(&grown);
    let areas: Vec<f64> = contours.iter().map(|c| c.area()).collect();
    let total: f64 = areas.iter().sum();
    if total <= 0.0 {
        diag.warn(DiagnosticKind::EmptyMask, id, "line mask has zero area");
        return Ok(false);
    }

    let mut outline: Option<Polygon> = None;
    for (i, (contour, &area)) in contours.iter().zip(areas.iter()).enumerate() {
        if area / total < MIN_FRAGMENT_FRACTION {
            debug!(
                "ignoring contour {} of region '{}': area {}/{}",
                i, id, area, total
            );
            continue;
        }
        let mut polygon = contour.to_polygon()?;
        polygon.translate(f64::from(ox), f64::from(oy));
        let Ok(polygon) = polygon.simplify(SIMPLIFY_TOLERANCE) else {
            debug!("ignoring degenerate contour {} of region '{}'", i, id);
            continue;
        };
        if outline.is_some() {
            diag.warn(
                DiagnosticKind::NonContiguousMask,
                id,
                "lines form non-contiguous contours, keeping boundary",
            );
            return Ok(false);
        }
        outline = Some(polygon);
    }

    let Some(outline) = outline else {
        diag.warn(DiagnosticKind::EmptyMask, id, "no usable line contour");
        return Ok(false);
    };
    if !outline.is_valid() {
        diag.warn(
            DiagnosticKind::InvalidGeometry,
            id,
            "line hull is not a simple polygon, keeping boundary",
        );
        return Ok(false);
    }
    if outline == region.coords {
        return Ok(false);
    }

    debug!(
        "region '{}' boundary: {} -> {} vertices",
        id,
        region.coords.len(),
        outline.len()
    );
    if let Some(region) = page.region_mut(id) {
        region.coords = outline;
    }
    diag.record(Change::BoundaryUpdated {
        region: id.to_string(),
    });
    Ok(true)
}

/// Sanitize every text region of the page, returning the number of
/// boundaries changed
pub fn sanitize_page(page: &mut Page, diag: &mut Diagnostics) -> LayoutResult<usize> {
    let ids: Vec<String> = page
        .regions()
        .iter()
        .filter(|r| r.region_type == RegionType::Text)
        .map(|r| r.id.clone())
        .collect();
    let mut changed = 0;
    for id in ids {
        if sanitize_region(page, &id, diag)? {
            changed += 1;
        }
    }
    Ok(changed)
}
