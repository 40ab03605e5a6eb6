//! Regions and text lines

use layoutfix_core::{Point, Polygon};
use serde::{Deserialize, Serialize};

/// Structural type of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RegionType {
    #[default]
    Text,
    Image,
    LineDrawing,
    Graphic,
    Table,
    Chart,
    Separator,
    Maths,
    Chem,
    Music,
    Advert,
    Map,
    Noise,
    Custom,
    Unknown,
}

/// Where a region lives in the page hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Parent {
    /// Top level of the page
    #[default]
    Page,
    /// Nested inside the region with this id
    Region(String),
}

/// Prefix of line classification tags that mark address content
const ADDRESS_TAG_PREFIX: &str = "ADDRESS_";

/// Tag of lines classified as containing no address content
const ADDRESS_NONE_TAG: &str = "ADDRESS_NONE";

/// Prefix of a classification stored in a custom attribute
const SUBTYPE_PREFIX: &str = "subtype:";

/// A text line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    pub coords: Polygon,
    /// Baseline as an open polyline
    #[serde(default)]
    pub baseline: Option<Vec<Point>>,
    /// Recognized text
    #[serde(default)]
    pub text: Option<String>,
    /// Free-form classification, e.g. `subtype: ADDRESS_FULL`
    #[serde(default)]
    pub custom: Option<String>,
}

impl Line {
    /// Create a line without text, baseline or classification
    pub fn new(id: impl Into<String>, coords: Polygon) -> Self {
        Self {
            id: id.into(),
            coords,
            baseline: None,
            text: None,
            custom: None,
        }
    }

    /// Set the recognized text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the custom classification attribute
    pub fn with_custom(mut self, custom: impl Into<String>) -> Self {
        self.custom = Some(custom.into());
        self
    }

    /// Set the baseline
    pub fn with_baseline(mut self, baseline: Vec<Point>) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// The classification tag with any `subtype:` prefix removed
    pub fn tag(&self) -> Option<&str> {
        let custom = self.custom.as_deref()?.trim();
        let tag = custom.strip_prefix(SUBTYPE_PREFIX).unwrap_or(custom).trim();
        (!tag.is_empty()).then_some(tag)
    }

    /// Check whether the line was classified as carrying address content
    pub fn is_address(&self) -> bool {
        self.tag()
            .is_some_and(|t| t.starts_with(ADDRESS_TAG_PREFIX) && t != ADDRESS_NONE_TAG)
    }
}

/// A layout region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub region_type: RegionType,
    pub coords: Polygon,
    /// Detector confidence for generated regions
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Lines in document order (text regions only)
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub parent: Parent,
    #[serde(default)]
    pub orientation: Option<f64>,
    /// Finer structural type, e.g. `paragraph` or `other`
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub primary_script: Option<String>,
    #[serde(default)]
    pub primary_language: Option<String>,
    #[serde(default)]
    pub text_style: Option<String>,
    /// Text content of the region as a whole
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub custom: Option<String>,
}

impl Region {
    /// Create a top-level region of the given type
    pub fn new(id: impl Into<String>, region_type: RegionType, coords: Polygon) -> Self {
        Self {
            id: id.into(),
            region_type,
            coords,
            confidence: None,
            lines: Vec::new(),
            parent: Parent::Page,
            orientation: None,
            subtype: None,
            primary_script: None,
            primary_language: None,
            text_style: None,
            text: None,
            custom: None,
        }
    }

    /// Create a top-level text region
    pub fn text(id: impl Into<String>, coords: Polygon) -> Self {
        Self::new(id, RegionType::Text, coords)
    }

    /// Nest the region inside another region
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent = Parent::Region(parent_id.into());
        self
    }

    /// Append a line
    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    /// Set the region text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Boundary area
    pub fn area(&self) -> f64 {
        self.coords.area()
    }

    /// Check whether the region holds lines or text worth preserving
    pub fn has_content(&self) -> bool {
        !self.lines.is_empty() || self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Newline-joined text of all lines that have text
    pub fn line_text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .lines
            .iter()
            .filter_map(|l| l.text.as_deref())
            .collect();
        (!texts.is_empty()).then(|| texts.join("\n"))
    }

    /// Check whether any line carries address content
    pub fn has_address_line(&self) -> bool {
        self.lines.iter().any(Line::is_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::rectangle(0.0, 0.0, 10.0, 10.0).unwrap()
    }

    #[test]
    fn test_line_tag() {
        let line = Line::new("l1", square()).with_custom("subtype: ADDRESS_ZIP_CITY");
        assert_eq!(line.tag(), Some("ADDRESS_ZIP_CITY"));
        assert!(line.is_address());

        let none = Line::new("l2", square()).with_custom("subtype:ADDRESS_NONE");
        assert_eq!(none.tag(), Some("ADDRESS_NONE"));
        assert!(!none.is_address());

        let plain = Line::new("l3", square()).with_custom("ADDRESS_STREET_HOUSENUMBER");
        assert!(plain.is_address());

        assert!(!Line::new("l4", square()).is_address());
        assert!(Line::new("l5", square()).with_custom("subtype: ").tag().is_none());
    }

    #[test]
    fn test_region_content() {
        let empty = Region::text("r1", square());
        assert!(!empty.has_content());
        assert!(empty.line_text().is_none());

        let r = Region::text("r2", square())
            .with_line(Line::new("l1", square()).with_text("Hello"))
            .with_line(Line::new("l2", square()))
            .with_line(Line::new("l3", square()).with_text("World"));
        assert!(r.has_content());
        assert_eq!(r.line_text().as_deref(), Some("Hello\nWorld"));
        assert!(!r.has_address_line());
    }

    #[test]
    fn test_parent() {
        let r = Region::text("r1", square()).with_parent("table1");
        assert_eq!(r.parent, Parent::Region("table1".to_string()));
        assert_eq!(Region::text("r2", square()).parent, Parent::Page);
    }
}
