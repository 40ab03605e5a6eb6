//! Detector output and deduplication
//!
//! A detector yields scored, classified masks in one coordinate frame.
//! [`deduplicate`] drops every detection whose mask shares a pixel with a
//! better one, then keeps only the best-scoring survivors of the singleton
//! classes.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{LayoutError, LayoutResult};
use crate::options::ReconcileOptions;
use layoutfix_core::BoundingBox;
use layoutfix_mask::Mask;
use log::debug;
use std::collections::HashMap;

/// Class id reserved for background
pub const BACKGROUND_CLASS: u32 = 0;

/// One detector result
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Index into the class table; 0 is background
    pub class_id: u32,
    /// Confidence in [0, 1]
    pub score: f64,
    /// Foreground pixels in page coordinates
    pub mask: Mask,
    /// Box enclosing the mask foreground; empty for an empty mask
    pub bbox: BoundingBox,
}

impl Detection {
    /// Create a detection, deriving the box from the mask
    pub fn new(class_id: u32, score: f64, mask: Mask) -> Self {
        let bbox = mask
            .bounding_box()
            .unwrap_or(BoundingBox::new_unchecked(0, 0, 0, 0));
        Self {
            class_id,
            score,
            mask,
            bbox,
        }
    }
}

/// A detection that survived deduplication
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeptDetection {
    /// Position in the detector batch
    pub index: usize,
    /// Class of the detection
    pub class_id: u32,
    /// Confidence of the detection
    pub score: f64,
    /// Set for the winner of a singleton class
    pub best_of_class: bool,
}

/// Select the detections to keep, in batch order.
///
/// Detections below `min_confidence` are ignored. Of two detections with
/// overlapping masks the lower-scoring one is dropped; on equal scores the
/// later one goes. For singleton classes only detections reaching the
/// class's best remaining score are kept. Finding no singleton detection at
/// all is reported as [`DiagnosticKind::NoSingletonDetection`].
///
/// # Errors
///
/// Returns [`LayoutError::InvalidDetectorOutput`] if any detection carries
/// the background class or a class without a name, since that means the
/// class table does not match the detector.
pub fn deduplicate(
    detections: &[Detection],
    options: &ReconcileOptions,
    diag: &mut Diagnostics,
) -> LayoutResult<Vec<KeptDetection>> {
    for (index, det) in detections.iter().enumerate() {
        if det.class_id == BACKGROUND_CLASS || options.class_name(det.class_id).is_none() {
            return Err(LayoutError::InvalidDetectorOutput {
                index,
                class_id: det.class_id,
            });
        }
    }

    let candidates: Vec<usize> = (0..detections.len())
        .filter(|&i| detections[i].score >= options.min_confidence)
        .collect();

    let mut worse = vec![false; detections.len()];
    for (k, &i) in candidates.iter().enumerate() {
        for &j in &candidates[k + 1..] {
            if !detections[i].bbox.overlaps(&detections[j].bbox)
                || !detections[i].mask.overlaps(&detections[j].mask)
            {
                continue;
            }
            let loser = if detections[i].score < detections[j].score {
                i
            } else {
                j
            };
            debug!("detection {} overlaps {}: dropping {}", i, j, loser);
            worse[loser] = true;
        }
    }

    let survivors: Vec<usize> = candidates.into_iter().filter(|&i| !worse[i]).collect();

    let mut best: HashMap<u32, f64> = HashMap::new();
    for &i in &survivors {
        let det = &detections[i];
        if options.is_singleton(det.class_id) {
            let entry = best.entry(det.class_id).or_insert(det.score);
            *entry = entry.max(det.score);
        }
    }
    if best.is_empty() && !options.singleton_classes.is_empty() {
        let names: Vec<&str> = options
            .singleton_classes
            .iter()
            .filter_map(|&c| options.class_name(c))
            .collect();
        diag.warn(
            DiagnosticKind::NoSingletonDetection,
            "",
            format!("no detection of {}", names.join(" or ")),
        );
    }

    let kept = survivors
        .into_iter()
        .filter_map(|i| {
            let det = &detections[i];
            let best_of_class = match best.get(&det.class_id) {
                Some(&top) if det.score < top => {
                    debug!("detection {} is not the best of class {}", i, det.class_id);
                    return None;
                }
                Some(_) => true,
                None => false,
            };
            Some(KeptDetection {
                index: i,
                class_id: det.class_id,
                score: det.score,
                best_of_class,
            })
        })
        .collect();
    Ok(kept)
}
