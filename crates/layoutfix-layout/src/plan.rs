//! Reconciliation planning
//!
//! Planning never touches the page. [`plan_level`] compares the regions of
//! one parent collection pairwise and decides which are redundant;
//! [`plan_candidate`] decides which existing regions a detected region
//! replaces and how far its boundary must grow to cover the lines it takes
//! over. The executor in [`crate::merge`] applies the results.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::options::{ContainmentPolicy, ReconcileOptions};
use crate::page::Page;
use crate::region::{Parent, Region};
use layoutfix_core::{Polygon, Relation, classify};
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

/// A region to delete outright
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deletion {
    pub region: String,
    /// The region that makes it redundant
    pub redundant_to: Option<String>,
}

/// A region to merge into a surviving region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Merge {
    pub loser: String,
    pub survivor: String,
}

/// Deletions and merges for one parent collection.
///
/// A region appears at most once, either as deleted or as a merge loser,
/// and a merge survivor is never deleted or merged away.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergePlan {
    pub deletions: Vec<Deletion>,
    pub merges: Vec<Merge>,
}

impl MergePlan {
    /// Check for an empty plan
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.merges.is_empty()
    }

    /// Number of regions the plan removes
    pub fn len(&self) -> usize {
        self.deletions.len() + self.merges.len()
    }

    /// Ids of all regions the plan removes, deletions first
    pub fn removed_ids(&self) -> Vec<&str> {
        self.deletions
            .iter()
            .map(|d| d.region.as_str())
            .chain(self.merges.iter().map(|m| m.loser.as_str()))
            .collect()
    }

    /// Check whether the plan removes a region
    pub fn removes(&self, region_id: &str) -> bool {
        self.removed_ids().contains(&region_id)
    }
}

/// Tracks regions already claimed by a plan under construction
struct PlanBuilder {
    plan: MergePlan,
    losers: HashSet<String>,
    survivors: HashSet<String>,
}

impl PlanBuilder {
    fn new() -> Self {
        Self {
            plan: MergePlan::default(),
            losers: HashSet::new(),
            survivors: HashSet::new(),
        }
    }

    fn is_settled(&self, id: &str) -> bool {
        self.losers.contains(id)
    }

    /// A survivor may not be removed in the same plan; the next round
    /// revisits the pair
    fn can_remove(&self, id: &str) -> bool {
        !self.losers.contains(id) && !self.survivors.contains(id)
    }

    fn delete(&mut self, region: &str, redundant_to: &str) -> bool {
        if !self.can_remove(region) {
            return false;
        }
        self.losers.insert(region.to_string());
        self.survivors.insert(redundant_to.to_string());
        self.plan.deletions.push(Deletion {
            region: region.to_string(),
            redundant_to: Some(redundant_to.to_string()),
        });
        true
    }

    fn merge(&mut self, loser: &str, survivor: &str) -> bool {
        if !self.can_remove(loser) {
            return false;
        }
        self.losers.insert(loser.to_string());
        self.survivors.insert(survivor.to_string());
        self.plan.merges.push(Merge {
            loser: loser.to_string(),
            survivor: survivor.to_string(),
        });
        true
    }
}

/// Plan the removal of redundant regions within one parent collection.
///
/// Only regions of the types in `plausibilize_types` take part. They are
/// sorted by ascending area (document order among equal areas) and every
/// pair `(i, j)`, `i` before `j`, is classified:
///
/// - equal: `j` is deleted in favour of `i`
/// - containment: the contained region is deleted, or merged into its
///   container under [`ContainmentPolicy::MergeIfContent`] when it holds
///   lines, text or nested regions
/// - overlap: `j` merges into `i` if the overlap exceeds the threshold
///   relative to `j`, else `i` into `j` if it does relative to `i`;
///   smaller overlaps are reported as [`DiagnosticKind::Overlap`]
///
/// Pairs involving a region already removed by the plan are skipped.
pub fn plan_level(
    page: &Page,
    level: &Parent,
    options: &ReconcileOptions,
    diag: &mut Diagnostics,
) -> MergePlan {
    let mut regions: Vec<&Region> = page
        .children_of(level)
        .iter()
        .filter_map(|id| page.region(id))
        .filter(|r| options.compares(r.region_type))
        .collect();
    // Stable, so equal areas keep document order
    regions.sort_by(|a, b| a.area().total_cmp(&b.area()));

    let relation_options = options.relation_options();
    let threshold = options.plausibilize_merge_min_overlap;
    let mut builder = PlanBuilder::new();

    for (i, small) in regions.iter().enumerate() {
        for large in &regions[i + 1..] {
            if builder.is_settled(&small.id) || builder.is_settled(&large.id) {
                continue;
            }
            let relation = classify(&small.coords, &large.coords, &relation_options);
            debug!(
                "comparing regions '{}' and '{}': {:?}",
                small.id, large.id, relation
            );
            match relation {
                Relation::Equal => {
                    builder.delete(&large.id, &small.id);
                }
                Relation::AContainsB => plan_contained(&mut builder, page, large, small, options),
                Relation::BContainsA => plan_contained(&mut builder, page, small, large, options),
                Relation::Overlaps { ratio_a, ratio_b } => {
                    if ratio_b > threshold {
                        builder.merge(&large.id, &small.id);
                    } else if ratio_a > threshold {
                        builder.merge(&small.id, &large.id);
                    } else {
                        diag.warn(
                            DiagnosticKind::Overlap,
                            small.id.as_str(),
                            format!(
                                "overlaps '{}' by {:.3}/{:.3}, below merge threshold {}",
                                large.id, ratio_a, ratio_b, threshold
                            ),
                        );
                    }
                }
                Relation::Crosses | Relation::Disjoint => {}
            }
        }
    }
    builder.plan
}

fn plan_contained(
    builder: &mut PlanBuilder,
    page: &Page,
    inner: &Region,
    outer: &Region,
    options: &ReconcileOptions,
) {
    let has_content = inner.has_content() || !page.descendants(&inner.id).is_empty();
    match options.containment_policy {
        ContainmentPolicy::MergeIfContent if has_content => {
            builder.merge(&inner.id, &outer.id);
        }
        _ => {
            builder.delete(&inner.id, &outer.id);
        }
    }
}

/// Outcome of planning a detected region
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePlan {
    /// Id the new region will get
    pub region_id: String,
    /// Boundary grown to cover every line taken over
    pub polygon: Polygon,
    /// Existing regions the new region replaces, in document order
    pub superseded: Vec<String>,
    /// Whether any line taken over carries address content
    pub has_address: bool,
}

/// Decide which existing regions a detected region replaces.
///
/// `neighbours` lists the text regions present before the detection pass,
/// in document order; ids that no longer exist are skipped. A neighbour is
/// replaced if it lies within the detected polygon, within the polygon
/// grown by `guard_band_factor * scale`, or is equal to it, or overlaps it
/// by more than `detection_supersede_min_overlap` of its own area. Each
/// replaced neighbour hands over its lines (and those of its nested
/// regions); a line not already inside the polygon grows it by union.
pub fn plan_candidate(
    page: &Page,
    neighbours: &[String],
    region_id: &str,
    polygon: Polygon,
    scale: u32,
    options: &ReconcileOptions,
    diag: &mut Diagnostics,
) -> CandidatePlan {
    let relation_options = options.relation_options().with_hull_guard(false);
    let is_within = |rel: Relation| matches!(rel, Relation::BContainsA | Relation::Equal);
    let band = options.guard_band_factor * f64::from(scale);

    let mut polygon = polygon;
    let mut superseded: Vec<String> = Vec::new();
    let mut covered: HashSet<String> = HashSet::new();
    let mut has_address = false;

    for id in neighbours {
        if covered.contains(id) {
            continue;
        }
        let Some(neighbour) = page.region(id) else {
            continue;
        };
        let relation = classify(&neighbour.coords, &polygon, &relation_options);
        let replaces = is_within(relation)
            || (band > 0.0
                && polygon.buffer(band).is_ok_and(|grown| {
                    is_within(classify(&neighbour.coords, &grown, &relation_options))
                }))
            || matches!(relation, Relation::Overlaps { ratio_a, .. }
                if ratio_a > options.detection_supersede_min_overlap);
        if !replaces {
            if relation != Relation::Disjoint {
                debug!(
                    "ignoring {:?} region '{}' for '{}'",
                    relation, neighbour.id, region_id
                );
            }
            continue;
        }
        debug!("region '{}' is replaced by '{}'", neighbour.id, region_id);

        let descendants = page.descendants(id);
        let donors = std::iter::once(neighbour)
            .chain(descendants.iter().filter_map(|d| page.region(d)));
        for line in donors.flat_map(|r| r.lines.iter()) {
            has_address |= line.is_address();
            if is_within(classify(&line.coords, &polygon, &relation_options)) {
                continue;
            }
            match polygon.union_outline(&line.coords) {
                Ok(grown) => polygon = grown,
                Err(e) => diag.warn(
                    DiagnosticKind::InvalidGeometry,
                    line.id.as_str(),
                    format!("cannot extend '{}' over line: {}", region_id, e),
                ),
            }
        }
        covered.insert(id.clone());
        covered.extend(descendants);
        superseded.push(id.clone());
    }

    CandidatePlan {
        region_id: region_id.to_string(),
        polygon,
        superseded,
        has_address,
    }
}
