//! Diagnostics sink
//!
//! Every entry point takes a `&mut Diagnostics` and appends to it. Changes
//! describe what was done to the page; warnings describe problems that were
//! skipped or left for the caller to judge. Everything recorded is also
//! emitted through the `log` facade.

use log::{info, warn};
use serde::Serialize;

/// A modification applied to a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Change {
    /// A region was removed; `redundant_to` names the region that made it
    /// redundant, if any
    Deleted {
        region: String,
        redundant_to: Option<String>,
    },
    /// A region was merged into a surviving region
    Merged { loser: String, survivor: String },
    /// An existing region was replaced by a new detected region
    Superseded { region: String, by: String },
    /// A new region was added to the page
    Inserted { region: String },
    /// A region boundary was replaced
    BoundaryUpdated { region: String },
    /// A reading-order reference now points to another region
    ReadingOrderRedirected { from: String, to: String },
    /// A reading-order reference was dropped
    ReadingOrderRemoved { region: String },
    /// Lines moved from one region to another, with their old and new ids
    LinesReassigned {
        from: String,
        to: String,
        lines: Vec<(String, String)>,
    },
}

/// Category of a recorded warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// A boundary could not be made valid; the previous one was kept
    InvalidGeometry,
    /// A mask or contour set had no area
    EmptyMask,
    /// A mask or line set fell apart into several fragments
    NonContiguousMask,
    /// A reading-order reference did not resolve and was pruned
    DanglingReadingOrderRef,
    /// A merge lost a differing attribute of the merged region
    AttributeConflict,
    /// A segment extends beyond its parent
    CoordsOutsideParent,
    /// A baseline extends beyond its line
    BaselineOutsideLine,
    /// No detection of a singleton class survived
    NoSingletonDetection,
    /// A detection acquired no address lines and was dropped
    GhostDetection,
    /// Two regions overlap without qualifying for a merge
    Overlap,
    /// A region has no lines to derive a boundary from
    RegionWithoutLines,
    /// A region is redundant but was left in place
    RedundantRegion,
}

/// A recorded warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Id of the region, line or detection concerned
    pub subject: String,
    pub message: String,
}

/// Accumulated changes and warnings for one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    changes: Vec<Change>,
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change
    pub fn record(&mut self, change: Change) {
        info!("{:?}", change);
        self.changes.push(change);
    }

    /// Record a warning, unless an identical one is already recorded
    pub fn warn(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            subject: subject.into(),
            message: message.into(),
        };
        if self.warnings.contains(&diagnostic) {
            return;
        }
        warn!("{:?} '{}': {}", kind, diagnostic.subject, diagnostic.message);
        self.warnings.push(diagnostic);
    }

    /// Recorded changes, in order
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Recorded warnings, in order
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Check whether anything was changed
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Count the warnings of one kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    /// Append the contents of another sink
    pub fn extend(&mut self, other: Diagnostics) {
        self.changes.extend(other.changes);
        self.warnings.extend(other.warnings);
    }
}
