//! Page arena
//!
//! Regions live in one `Vec` in document order, with a map from id to
//! position. Nesting is expressed through [`Parent`] ids rather than
//! references, so deleting a region is a removal by id followed by an index
//! rebuild.

use crate::error::{LayoutError, LayoutResult};
use crate::reading_order::ReadingOrderTree;
use crate::region::{Parent, Region, RegionType};
use layoutfix_core::Polygon;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A page with its regions and reading order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PageData", into = "PageData")]
pub struct Page {
    pub id: String,
    pub width: u32,
    pub height: u32,
    /// Printable area; regions are validated against it when present
    pub border: Option<Polygon>,
    pub reading_order: ReadingOrderTree,
    regions: Vec<Region>,
    index: HashMap<String, usize>,
}

/// Serialized form of a page
#[derive(Serialize, Deserialize)]
struct PageData {
    id: String,
    width: u32,
    height: u32,
    #[serde(default)]
    border: Option<Polygon>,
    #[serde(default)]
    reading_order: ReadingOrderTree,
    #[serde(default)]
    regions: Vec<Region>,
}

impl TryFrom<PageData> for Page {
    type Error = LayoutError;

    fn try_from(data: PageData) -> LayoutResult<Self> {
        let mut page = Page::new(data.id, data.width, data.height);
        page.border = data.border;
        page.reading_order = data.reading_order;
        // A merge may leave a child stored before its new parent
        let mut pending = data.regions;
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for region in pending {
                match &region.parent {
                    Parent::Region(parent_id) if !page.contains(parent_id) => {
                        deferred.push(region)
                    }
                    _ => page.add_region(region)?,
                }
            }
            if deferred.len() == before {
                let missing = match &deferred[0].parent {
                    Parent::Region(parent_id) => parent_id.clone(),
                    Parent::Page => deferred[0].id.clone(),
                };
                return Err(LayoutError::UnknownRegion(missing));
            }
            pending = deferred;
        }
        Ok(page)
    }
}

impl From<Page> for PageData {
    fn from(page: Page) -> Self {
        PageData {
            id: page.id,
            width: page.width,
            height: page.height,
            border: page.border,
            reading_order: page.reading_order,
            regions: page.regions,
        }
    }
}

impl Page {
    /// Create an empty page
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            border: None,
            reading_order: ReadingOrderTree::empty(),
            regions: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Set the page border
    pub fn with_border(mut self, border: Polygon) -> Self {
        self.border = Some(border);
        self
    }

    /// Set the reading order
    pub fn with_reading_order(mut self, reading_order: ReadingOrderTree) -> Self {
        self.reading_order = reading_order;
        self
    }

    /// Append a region in document order.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::DuplicateRegionId`] if the id is taken
    /// - [`LayoutError::UnknownRegion`] if the parent region does not exist
    pub fn add_region(&mut self, region: Region) -> LayoutResult<()> {
        if self.index.contains_key(&region.id) {
            return Err(LayoutError::DuplicateRegionId(region.id));
        }
        if let Parent::Region(parent_id) = &region.parent
            && !self.index.contains_key(parent_id)
        {
            return Err(LayoutError::UnknownRegion(parent_id.clone()));
        }
        self.index.insert(region.id.clone(), self.regions.len());
        self.regions.push(region);
        Ok(())
    }

    /// Builder form of [`Page::add_region`]
    pub fn with_region(mut self, region: Region) -> LayoutResult<Self> {
        self.add_region(region)?;
        Ok(self)
    }

    /// Get a region by id
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.index.get(id).map(|&i| &self.regions[i])
    }

    /// Get a region by id, mutable
    pub fn region_mut(&mut self, id: &str) -> Option<&mut Region> {
        self.index.get(id).map(|&i| &mut self.regions[i])
    }

    /// All regions in document order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Check whether a region exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of regions at all depths
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check whether the page has no regions
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Ids of the regions directly inside `parent`, in document order
    pub fn children_of(&self, parent: &Parent) -> Vec<String> {
        self.regions
            .iter()
            .filter(|r| &r.parent == parent)
            .map(|r| r.id.clone())
            .collect()
    }

    /// Ids of every region nested (at any depth) inside a region
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut seen = HashSet::from([id.to_string()]);
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            for child in self.children_of(&Parent::Region(current)) {
                if seen.insert(child.clone()) {
                    stack.push(child.clone());
                    found.push(child);
                }
            }
        }
        // Document order
        found.sort_by_key(|rid| self.index.get(rid).copied().unwrap_or(usize::MAX));
        found
    }

    /// Every parent collection that holds at least one region.
    ///
    /// The page top level comes first, then nested collections in the
    /// document order of their owning region.
    pub fn sibling_levels(&self) -> Vec<Parent> {
        let mut seen = HashSet::new();
        let mut levels = vec![Parent::Page];
        seen.insert(Parent::Page);
        for parent in self.regions.iter().map(|r| &r.parent) {
            if seen.insert(parent.clone()) {
                levels.push(parent.clone());
            }
        }
        levels.sort_by_key(|p| match p {
            Parent::Page => 0,
            Parent::Region(id) => self.index.get(id).map_or(usize::MAX, |&i| i + 1),
        });
        levels
    }

    /// Text regions at all depths, in document order
    pub fn text_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions
            .iter()
            .filter(|r| r.region_type == RegionType::Text)
    }

    /// Every line id on the page
    pub fn line_ids(&self) -> HashSet<String> {
        self.regions
            .iter()
            .flat_map(|r| r.lines.iter().map(|l| l.id.clone()))
            .collect()
    }

    /// Text regions sorted by the reading order.
    ///
    /// Regions the reading order does not mention follow in document
    /// order.
    pub fn regions_in_reading_order(&self) -> Vec<&Region> {
        let mut ordered: Vec<&Region> = Vec::new();
        let mut placed = HashSet::new();
        for id in self.reading_order.region_ids_in_order() {
            if let Some(region) = self.region(&id)
                && region.region_type == RegionType::Text
                && placed.insert(id)
            {
                ordered.push(region);
            }
        }
        ordered.extend(self.text_regions().filter(|r| !placed.contains(&r.id)));
        ordered
    }

    /// Drop reading-order references to regions that do not exist,
    /// returning their ids
    pub fn prune_reading_order(&mut self) -> Vec<String> {
        let index = &self.index;
        self.reading_order
            .prune_dangling(|id| index.contains_key(id))
    }

    /// Move the regions nested directly in `from` into `to`
    pub fn reparent_children(&mut self, from: &str, to: &str) -> Vec<String> {
        let old = Parent::Region(from.to_string());
        let mut moved = Vec::new();
        for region in self.regions.iter_mut().filter(|r| r.parent == old) {
            region.parent = Parent::Region(to.to_string());
            moved.push(region.id.clone());
        }
        moved
    }

    /// Remove a region together with everything nested inside it.
    ///
    /// Returns the removed regions in document order. The reading order is
    /// left untouched; callers decide how to update it.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownRegion`] if the region does not exist.
    pub fn remove_region(&mut self, id: &str) -> LayoutResult<Vec<Region>> {
        if !self.contains(id) {
            return Err(LayoutError::UnknownRegion(id.to_string()));
        }
        let mut doomed: HashSet<String> = self.descendants(id).into_iter().collect();
        doomed.insert(id.to_string());

        let (removed, kept): (Vec<Region>, Vec<Region>) = std::mem::take(&mut self.regions)
            .into_iter()
            .partition(|r| doomed.contains(&r.id));
        self.regions = kept;
        self.rebuild_index();
        Ok(removed)
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .regions
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
    }
}
