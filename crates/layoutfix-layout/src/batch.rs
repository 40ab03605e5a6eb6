//! Parallel reconciliation of independent pages
//!
//! Pages share nothing, so each one is reconciled on the rayon pool with
//! its own diagnostics sink. Results come back in input order; a failing
//! page does not stop the others.

use crate::detection::Detection;
use crate::diagnostics::Diagnostics;
use crate::error::{LayoutError, LayoutResult};
use crate::options::ReconcileOptions;
use crate::page::Page;
use crate::reconcile::{reconcile_page, reconcile_with_detections};
use rayon::prelude::*;

/// Plausibilize every page in parallel
pub fn reconcile_pages(
    pages: &mut [Page],
    options: &ReconcileOptions,
) -> Vec<LayoutResult<Diagnostics>> {
    pages
        .par_iter_mut()
        .map(|page| {
            let mut diag = Diagnostics::new();
            reconcile_page(page, options, &mut diag)?;
            Ok(diag)
        })
        .collect()
}

/// Insert detected regions into every page in parallel.
///
/// `detections[i]` belongs to `pages[i]`.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidParameters`] if the two slices differ in
/// length; per-page failures are reported in the returned vector.
pub fn reconcile_pages_with_detections(
    pages: &mut [Page],
    detections: &[Vec<Detection>],
    options: &ReconcileOptions,
) -> LayoutResult<Vec<LayoutResult<Diagnostics>>> {
    if pages.len() != detections.len() {
        return Err(LayoutError::InvalidParameters(format!(
            "{} pages but {} detection lists",
            pages.len(),
            detections.len()
        )));
    }
    Ok(pages
        .par_iter_mut()
        .zip(detections.par_iter())
        .map(|(page, page_detections)| {
            let mut diag = Diagnostics::new();
            reconcile_with_detections(page, page_detections, options, &mut diag)?;
            Ok(diag)
        })
        .collect())
}
