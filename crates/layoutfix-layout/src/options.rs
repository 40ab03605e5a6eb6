//! Reconciliation options

use crate::error::{LayoutError, LayoutResult};
use crate::region::RegionType;
use layoutfix_core::RelationOptions;
use layoutfix_mask::VectorizeOptions;
use serde::{Deserialize, Serialize};

/// What to do with a region that lies inside a sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContainmentPolicy {
    /// Delete the contained region
    #[default]
    Delete,
    /// Merge the contained region into its container if it holds lines or
    /// text, delete it otherwise
    MergeIfContent,
}

/// Options for page reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Overlap fraction above which a region is merged into its neighbour
    /// (default: 0.9)
    pub plausibilize_merge_min_overlap: f64,
    /// Apply plans; when false they are only reported (default: true)
    pub plausibilize: bool,
    /// Shrink text regions to the closed hull of their lines first
    /// (default: false)
    pub sanitize: bool,
    /// Detections scoring below this are ignored (default: 0.7)
    pub min_confidence: f64,
    /// Dilation rounds when vectorizing masks (default: 10)
    pub max_dilation_rounds: u32,
    /// Contours below this share of the total area are noise (default: 0.1)
    pub min_fragment_area_fraction: f64,
    /// Classes of which only the best detection survives (default: 1, 2)
    pub singleton_classes: Vec<u32>,
    /// Names of the detector classes, indexed by class id
    pub class_names: Vec<String>,
    /// Handling of contained regions (default: delete)
    pub containment_policy: ContainmentPolicy,
    /// Overlap fraction of an existing region that lets a detection
    /// supersede it (default: 0.8)
    pub detection_supersede_min_overlap: f64,
    /// Guard band around a detection, in structuring scales (default: 4)
    pub guard_band_factor: f64,
    /// Prefix of the ids of detected regions (default: "addressregion")
    pub candidate_id_prefix: String,
    /// Region types compared during plausibilization (default: text)
    pub plausibilize_types: Vec<RegionType>,
    /// Vertex tolerance in pixels for approximate equality (default: 0.5)
    pub equality_tolerance: f64,
    /// Upper bound on reconciliation rounds per page (default: 10)
    pub max_rounds: u32,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            plausibilize_merge_min_overlap: 0.9,
            plausibilize: true,
            sanitize: false,
            min_confidence: 0.7,
            max_dilation_rounds: 10,
            min_fragment_area_fraction: 0.1,
            singleton_classes: vec![1, 2],
            class_names: ["", "address-rcpt", "address-sndr", "address-contact"]
                .into_iter()
                .map(String::from)
                .collect(),
            containment_policy: ContainmentPolicy::Delete,
            detection_supersede_min_overlap: 0.8,
            guard_band_factor: 4.0,
            candidate_id_prefix: "addressregion".to_string(),
            plausibilize_types: vec![RegionType::Text],
            equality_tolerance: 0.5,
            max_rounds: 10,
        }
    }
}

impl ReconcileOptions {
    /// Set the overlap merge threshold
    pub fn with_merge_min_overlap(mut self, fraction: f64) -> Self {
        self.plausibilize_merge_min_overlap = fraction;
        self
    }

    /// Enable or disable applying plans
    pub fn with_plausibilize(mut self, enabled: bool) -> Self {
        self.plausibilize = enabled;
        self
    }

    /// Enable or disable boundary sanitizing
    pub fn with_sanitize(mut self, enabled: bool) -> Self {
        self.sanitize = enabled;
        self
    }

    /// Set the detection confidence threshold
    pub fn with_min_confidence(mut self, score: f64) -> Self {
        self.min_confidence = score;
        self
    }

    /// Set the maximum number of dilation rounds
    pub fn with_max_dilation_rounds(mut self, rounds: u32) -> Self {
        self.max_dilation_rounds = rounds;
        self
    }

    /// Set the singleton classes
    pub fn with_singleton_classes(mut self, classes: Vec<u32>) -> Self {
        self.singleton_classes = classes;
        self
    }

    /// Set the containment policy
    pub fn with_containment_policy(mut self, policy: ContainmentPolicy) -> Self {
        self.containment_policy = policy;
        self
    }

    /// Set the region types compared during plausibilization
    pub fn with_plausibilize_types(mut self, types: Vec<RegionType>) -> Self {
        self.plausibilize_types = types;
        self
    }

    /// Check the option values
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidParameters`] for thresholds outside
    /// their ranges, an empty id prefix or zero rounds.
    pub fn validate(&self) -> LayoutResult<()> {
        let open_unit = |name: &str, v: f64| {
            if v > 0.0 && v < 1.0 {
                Ok(())
            } else {
                Err(LayoutError::InvalidParameters(format!(
                    "{name} must be in (0, 1), got {v}"
                )))
            }
        };
        open_unit(
            "plausibilize_merge_min_overlap",
            self.plausibilize_merge_min_overlap,
        )?;
        open_unit(
            "detection_supersede_min_overlap",
            self.detection_supersede_min_overlap,
        )?;
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(LayoutError::InvalidParameters(format!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.guard_band_factor < 0.0 || self.equality_tolerance < 0.0 {
            return Err(LayoutError::InvalidParameters(format!(
                "guard_band_factor ({}) and equality_tolerance ({}) must not be negative",
                self.guard_band_factor, self.equality_tolerance
            )));
        }
        if self.candidate_id_prefix.is_empty() {
            return Err(LayoutError::InvalidParameters(
                "candidate_id_prefix must not be empty".to_string(),
            ));
        }
        if self.max_rounds == 0 {
            return Err(LayoutError::InvalidParameters(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        self.vectorize_options().validate()?;
        Ok(())
    }

    /// Relation options used for plausibilization
    pub fn relation_options(&self) -> RelationOptions {
        RelationOptions::default().with_equality_tolerance(self.equality_tolerance)
    }

    /// Vectorizer options derived from these options
    pub fn vectorize_options(&self) -> VectorizeOptions {
        VectorizeOptions::default()
            .with_max_dilation_rounds(self.max_dilation_rounds)
            .with_min_fragment_area_fraction(self.min_fragment_area_fraction)
    }

    /// Name of a detector class
    pub fn class_name(&self, class_id: u32) -> Option<&str> {
        self.class_names
            .get(class_id as usize)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }

    /// Check whether a class keeps only its best detection
    pub fn is_singleton(&self, class_id: u32) -> bool {
        self.singleton_classes.contains(&class_id)
    }

    /// Check whether regions of a type take part in plausibilization
    pub fn compares(&self, region_type: RegionType) -> bool {
        self.plausibilize_types.contains(&region_type)
    }
}
