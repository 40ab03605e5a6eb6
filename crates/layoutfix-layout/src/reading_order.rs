//! Reading-order tree
//!
//! The reading order is a tree of groups. An ordered group lists its
//! children by a dense `index` starting at 0; an unordered group keeps them
//! in storage order without indices. A child is either a reference to a
//! region or a nested group, and a group may itself refer to a region.
//!
//! [`ReadingOrderTree`] keeps a map from referenced region id to the places
//! holding the reference, so references can be found, removed or redirected
//! without searching the tree. Ordered groups are stored in index order
//! from the moment the tree is built, which lets mutations patch the map
//! locally: removing a child only moves the entries of its later siblings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The six kinds of reading-order children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChildKind {
    RegionRef,
    RegionRefIndexed,
    OrderedGroup,
    OrderedGroupIndexed,
    UnorderedGroup,
    UnorderedGroupIndexed,
}

/// Payload of a reading-order child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChildItem {
    /// Reference to a region by id
    RegionRef(String),
    /// A nested group
    Group(Box<ReadingOrderNode>),
}

/// One child of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingOrderChild {
    /// Position within an ordered parent; `None` inside unordered groups
    pub index: Option<usize>,
    pub item: ChildItem,
}

impl ReadingOrderChild {
    /// Kind of this child
    pub fn kind(&self) -> ChildKind {
        let indexed = self.index.is_some();
        match (&self.item, indexed) {
            (ChildItem::RegionRef(_), false) => ChildKind::RegionRef,
            (ChildItem::RegionRef(_), true) => ChildKind::RegionRefIndexed,
            (ChildItem::Group(node), false) if node.is_ordered() => ChildKind::OrderedGroup,
            (ChildItem::Group(_), false) => ChildKind::UnorderedGroup,
            (ChildItem::Group(node), true) if node.is_ordered() => ChildKind::OrderedGroupIndexed,
            (ChildItem::Group(_), true) => ChildKind::UnorderedGroupIndexed,
        }
    }
}

/// Common data of ordered and unordered groups
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupNode {
    pub id: String,
    /// Region the group as a whole refers to
    #[serde(default)]
    pub region_ref: Option<String>,
    #[serde(default)]
    pub children: Vec<ReadingOrderChild>,
}

/// A reading-order group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReadingOrderNode {
    Ordered(GroupNode),
    Unordered(GroupNode),
}

impl ReadingOrderNode {
    /// Create an empty ordered group
    pub fn ordered(id: impl Into<String>) -> Self {
        ReadingOrderNode::Ordered(GroupNode {
            id: id.into(),
            ..GroupNode::default()
        })
    }

    /// Create an empty unordered group
    pub fn unordered(id: impl Into<String>) -> Self {
        ReadingOrderNode::Unordered(GroupNode {
            id: id.into(),
            ..GroupNode::default()
        })
    }

    /// Let the group refer to a region
    pub fn with_region_ref(mut self, region_id: impl Into<String>) -> Self {
        self.group_mut().region_ref = Some(region_id.into());
        self
    }

    /// Append a region reference
    pub fn with_region(mut self, region_id: impl Into<String>) -> Self {
        self.push(ChildItem::RegionRef(region_id.into()));
        self
    }

    /// Append a nested group
    pub fn with_group(mut self, node: ReadingOrderNode) -> Self {
        self.push(ChildItem::Group(Box::new(node)));
        self
    }

    /// Append a child, indexed after the last child of an ordered group
    pub fn push(&mut self, item: ChildItem) {
        let index = self.is_ordered().then(|| {
            self.children()
                .iter()
                .filter_map(|c| c.index)
                .max()
                .map_or(0, |i| i + 1)
        });
        self.group_mut()
            .children
            .push(ReadingOrderChild { index, item });
    }

    /// Check for an ordered group
    pub fn is_ordered(&self) -> bool {
        matches!(self, ReadingOrderNode::Ordered(_))
    }

    /// Shared group data
    pub fn group(&self) -> &GroupNode {
        match self {
            ReadingOrderNode::Ordered(g) | ReadingOrderNode::Unordered(g) => g,
        }
    }

    /// Shared group data, mutable
    pub fn group_mut(&mut self) -> &mut GroupNode {
        match self {
            ReadingOrderNode::Ordered(g) | ReadingOrderNode::Unordered(g) => g,
        }
    }

    /// Children in storage order
    pub fn children(&self) -> &[ReadingOrderChild] {
        &self.group().children
    }

    /// Storage positions of the children in reading sequence
    fn sequence(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = (0..self.children().len()).collect();
        if self.is_ordered() {
            let children = self.children();
            positions.sort_by_key(|&p| children[p].index.unwrap_or(usize::MAX));
        }
        positions
    }

    /// Make the indices of an ordered group dense, keeping their order.
    ///
    /// Children are also stored in index order afterwards. Unordered groups
    /// lose any stray indices.
    fn reindex_self(&mut self) {
        let ordered = self.is_ordered();
        let children = &mut self.group_mut().children;
        if ordered {
            children.sort_by_key(|c| c.index.unwrap_or(usize::MAX));
            for (i, child) in children.iter_mut().enumerate() {
                child.index = Some(i);
            }
        } else {
            for child in children.iter_mut() {
                child.index = None;
            }
        }
    }

    fn reindex_recursive(&mut self) {
        self.reindex_self();
        for child in self.group_mut().children.iter_mut() {
            if let ChildItem::Group(node) = &mut child.item {
                node.reindex_recursive();
            }
        }
    }
}

/// Which slot holds a region reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefTarget {
    /// A region-reference child; the path ends at the child
    Child,
    /// The `region_ref` attribute of the group at the path
    Group,
}

/// Location of a region reference within the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefLocation {
    /// Storage positions from the root down
    pub path: Vec<usize>,
    pub target: RefTarget,
}

/// Callbacks for [`ReadingOrderTree::walk`]
pub trait ReadingOrderVisitor {
    /// Called for every group before its children
    fn visit_group(&mut self, _node: &ReadingOrderNode, _path: &[usize]) {}

    /// Called for every region reference
    fn visit_region_ref(&mut self, _region_id: &str, _location: RefLocation) {}
}

/// Outcome of [`ReadingOrderTree::redirect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// The reference now names the new region
    Redirected,
    /// The new region was already referenced; the old reference was dropped
    Removed,
    /// The old region was not referenced
    NotFound,
}

/// Reading-order tree with an index of region references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<ReadingOrderNode>", into = "Option<ReadingOrderNode>")]
pub struct ReadingOrderTree {
    root: Option<ReadingOrderNode>,
    /// Locations per region id, in reading sequence
    index: HashMap<String, Vec<RefLocation>>,
}

/// Loaded trees get dense indices right away, whatever the input carried
impl From<Option<ReadingOrderNode>> for ReadingOrderTree {
    fn from(root: Option<ReadingOrderNode>) -> Self {
        let mut tree = Self {
            root,
            index: HashMap::new(),
        };
        tree.reindex();
        tree
    }
}

impl From<ReadingOrderTree> for Option<ReadingOrderNode> {
    fn from(tree: ReadingOrderTree) -> Self {
        tree.root
    }
}

impl ReadingOrderTree {
    /// Create a tree with the given root group
    pub fn new(root: ReadingOrderNode) -> Self {
        Some(root).into()
    }

    /// Create an empty tree (no reading order)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the root group
    pub fn root(&self) -> Option<&ReadingOrderNode> {
        self.root.as_ref()
    }

    /// Check whether there is no root group
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of distinct referenced regions
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check whether a region is referenced
    pub fn contains(&self, region_id: &str) -> bool {
        self.index.contains_key(region_id)
    }

    /// Find the reference to a region
    pub fn lookup(&self, region_id: &str) -> Option<&RefLocation> {
        self.index.get(region_id).and_then(|locations| locations.first())
    }

    /// Kind of the child holding the reference to a region.
    ///
    /// For a group's own reference this is the kind of the group; the root
    /// group counts as a plain (non-indexed) group.
    pub fn child_kind(&self, region_id: &str) -> Option<ChildKind> {
        let location = self.lookup(region_id)?;
        let Some((&last, parent_path)) = location.path.split_last() else {
            let root = self.root.as_ref()?;
            return Some(if root.is_ordered() {
                ChildKind::OrderedGroup
            } else {
                ChildKind::UnorderedGroup
            });
        };
        let parent = self.node_at(parent_path)?;
        parent.children().get(last).map(ReadingOrderChild::kind)
    }

    /// Visit every group and reference in reading sequence, depth first
    pub fn walk<V: ReadingOrderVisitor>(&self, visitor: &mut V) {
        if let Some(root) = &self.root {
            let mut path = Vec::new();
            walk_node(root, &mut path, visitor);
        }
    }

    /// Referenced region ids in reading sequence.
    ///
    /// Ordered groups contribute their children by index, unordered groups
    /// in storage order; a group's own reference precedes its children.
    pub fn region_ids_in_order(&self) -> Vec<String> {
        struct Collect(Vec<String>);
        impl ReadingOrderVisitor for Collect {
            fn visit_region_ref(&mut self, region_id: &str, _location: RefLocation) {
                self.0.push(region_id.to_string());
            }
        }
        let mut collect = Collect(Vec::new());
        self.walk(&mut collect);
        collect.0
    }

    /// Remove every reference to a region.
    ///
    /// Ordered groups that lose a child are re-indexed. Returns the number
    /// of references removed.
    pub fn remove(&mut self, region_id: &str) -> usize {
        let mut removed = 0;
        while let Some(location) = self.lookup(region_id).cloned() {
            if !self.remove_at(region_id, &location) {
                break;
            }
            removed += 1;
        }
        removed
    }

    /// Point the references to `from` at `to` instead.
    ///
    /// If `to` is already referenced the references to `from` are removed,
    /// so no region is referenced twice.
    pub fn redirect(&mut self, from: &str, to: &str) -> Redirect {
        if !self.contains(from) {
            return Redirect::NotFound;
        }
        if self.contains(to) {
            self.remove(from);
            return Redirect::Removed;
        }
        if let Some(location) = self.lookup(from).cloned() {
            self.set_at(from, &location, to);
        }
        // Further references to `from` would now duplicate `to`
        self.remove(from);
        Redirect::Redirected
    }

    /// Remove references to regions for which `exists` is false.
    ///
    /// Returns the pruned region ids in reading sequence.
    pub fn prune_dangling<F: Fn(&str) -> bool>(&mut self, exists: F) -> Vec<String> {
        let dangling: Vec<String> = self
            .region_ids_in_order()
            .into_iter()
            .filter(|id| !exists(id))
            .collect();
        let mut pruned = Vec::new();
        for id in dangling {
            if self.remove(&id) > 0 {
                pruned.push(id);
            }
        }
        pruned
    }

    /// Make the indices of every ordered group dense
    pub fn reindex(&mut self) {
        if let Some(root) = &mut self.root {
            root.reindex_recursive();
        }
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        struct Index(HashMap<String, Vec<RefLocation>>);
        impl ReadingOrderVisitor for Index {
            fn visit_region_ref(&mut self, region_id: &str, location: RefLocation) {
                self.0
                    .entry(region_id.to_string())
                    .or_default()
                    .push(location);
            }
        }
        let mut index = Index(HashMap::new());
        self.walk(&mut index);
        self.index = index.0;
    }

    fn forget(&mut self, region_id: &str, location: &RefLocation) {
        if let Some(locations) = self.index.get_mut(region_id) {
            locations.retain(|l| l != location);
            if locations.is_empty() {
                self.index.remove(region_id);
            }
        }
    }

    /// Storage order is reading order, so paths sort in reading sequence
    fn remember(&mut self, region_id: &str, location: RefLocation) {
        let locations = self.index.entry(region_id.to_string()).or_default();
        let at = locations.partition_point(|l| l.path < location.path);
        locations.insert(at, location);
    }

    /// Move the entries below the children that followed the removed child
    /// `pos` of the group at `parent_path` one position down
    fn shift_siblings(&mut self, parent_path: &[usize], pos: usize) {
        struct Moved(Vec<(String, RefLocation)>);
        impl ReadingOrderVisitor for Moved {
            fn visit_region_ref(&mut self, region_id: &str, location: RefLocation) {
                self.0.push((region_id.to_string(), location));
            }
        }
        let Some(parent) = self.node_at(parent_path) else {
            return;
        };
        let mut moved = Moved(Vec::new());
        let mut path = parent_path.to_vec();
        for (new_pos, child) in parent.children().iter().enumerate().skip(pos) {
            path.push(new_pos);
            match &child.item {
                ChildItem::RegionRef(region_id) => moved.visit_region_ref(
                    region_id,
                    RefLocation {
                        path: path.clone(),
                        target: RefTarget::Child,
                    },
                ),
                ChildItem::Group(node) => walk_node(node, &mut path, &mut moved),
            }
            path.pop();
        }

        // Ascending order: an entry is never matched after it has moved
        let depth = parent_path.len();
        for (region_id, location) in moved.0 {
            let Some(locations) = self.index.get_mut(&region_id) else {
                continue;
            };
            let mut old_path = location.path.clone();
            old_path[depth] += 1;
            if let Some(entry) = locations
                .iter_mut()
                .find(|l| l.target == location.target && l.path == old_path)
            {
                entry.path = location.path;
            }
        }
    }

    fn node_at(&self, path: &[usize]) -> Option<&ReadingOrderNode> {
        let mut node = self.root.as_ref()?;
        for &pos in path {
            match &node.children().get(pos)?.item {
                ChildItem::Group(child) => node = child,
                ChildItem::RegionRef(_) => return None,
            }
        }
        Some(node)
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut ReadingOrderNode> {
        let mut node = self.root.as_mut()?;
        for &pos in path {
            match &mut node.group_mut().children.get_mut(pos)?.item {
                ChildItem::Group(child) => node = child,
                ChildItem::RegionRef(_) => return None,
            }
        }
        Some(node)
    }

    fn remove_at(&mut self, region_id: &str, location: &RefLocation) -> bool {
        match location.target {
            RefTarget::Group => {
                let taken = self
                    .node_at_mut(&location.path)
                    .and_then(|node| node.group_mut().region_ref.take())
                    .is_some();
                if taken {
                    self.forget(region_id, location);
                }
                taken
            }
            RefTarget::Child => {
                let Some((&pos, parent_path)) = location.path.split_last() else {
                    return false;
                };
                let Some(parent) = self.node_at_mut(parent_path) else {
                    return false;
                };
                if pos >= parent.children().len() {
                    return false;
                }
                parent.group_mut().children.remove(pos);
                if parent.is_ordered() {
                    parent.reindex_self();
                }
                self.forget(region_id, location);
                self.shift_siblings(parent_path, pos);
                true
            }
        }
    }

    fn set_at(&mut self, from: &str, location: &RefLocation, to: &str) {
        let replaced = match location.target {
            RefTarget::Group => match self.node_at_mut(&location.path) {
                Some(node) => {
                    node.group_mut().region_ref = Some(to.to_string());
                    true
                }
                None => false,
            },
            RefTarget::Child => {
                let child = location.path.split_last().and_then(|(&pos, parent_path)| {
                    self.node_at_mut(parent_path)?
                        .group_mut()
                        .children
                        .get_mut(pos)
                });
                match child {
                    Some(child) => {
                        child.item = ChildItem::RegionRef(to.to_string());
                        true
                    }
                    None => false,
                }
            }
        };
        if replaced {
            self.forget(from, location);
            self.remember(to, location.clone());
        }
    }
}

fn walk_node<V: ReadingOrderVisitor>(
    node: &ReadingOrderNode,
    path: &mut Vec<usize>,
    visitor: &mut V,
) {
    visitor.visit_group(node, path);
    if let Some(region_id) = &node.group().region_ref {
        visitor.visit_region_ref(
            region_id,
            RefLocation {
                path: path.clone(),
                target: RefTarget::Group,
            },
        );
    }
    for pos in node.sequence() {
        path.push(pos);
        match &node.children()[pos].item {
            ChildItem::RegionRef(region_id) => visitor.visit_region_ref(
                region_id,
                RefLocation {
                    path: path.clone(),
                    target: RefTarget::Child,
                },
            ),
            ChildItem::Group(child) => walk_node(child, path, visitor),
        }
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReadingOrderTree {
        ReadingOrderTree::new(
            ReadingOrderNode::ordered("ro")
                .with_region("r1")
                .with_group(
                    ReadingOrderNode::unordered("g1")
                        .with_region_ref("r2")
                        .with_region("r3")
                        .with_region("r4"),
                )
                .with_region("r5"),
        )
    }

    fn indices(node: &ReadingOrderNode) -> Vec<Option<usize>> {
        node.children().iter().map(|c| c.index).collect()
    }

    #[test]
    fn test_order_and_lookup() {
        let tree = sample();
        assert_eq!(tree.region_ids_in_order(), vec!["r1", "r2", "r3", "r4", "r5"]);
        assert_eq!(tree.len(), 5);
        assert_eq!(
            tree.lookup("r3"),
            Some(&RefLocation {
                path: vec![1, 0],
                target: RefTarget::Child
            })
        );
        assert_eq!(tree.lookup("r2").map(|l| l.target), Some(RefTarget::Group));
        assert!(tree.lookup("r9").is_none());
    }

    #[test]
    fn test_child_kinds() {
        let tree = sample();
        assert_eq!(tree.child_kind("r1"), Some(ChildKind::RegionRefIndexed));
        assert_eq!(tree.child_kind("r3"), Some(ChildKind::RegionRef));
        assert_eq!(tree.child_kind("r2"), Some(ChildKind::UnorderedGroupIndexed));

        let root_ref = ReadingOrderTree::new(ReadingOrderNode::unordered("ro").with_region_ref("x"));
        assert_eq!(root_ref.child_kind("x"), Some(ChildKind::UnorderedGroup));
    }

    #[test]
    fn test_ordered_follows_index_not_storage() {
        let mut root = ReadingOrderNode::ordered("ro");
        root.group_mut().children = vec![
            ReadingOrderChild {
                index: Some(1),
                item: ChildItem::RegionRef("b".to_string()),
            },
            ReadingOrderChild {
                index: Some(0),
                item: ChildItem::RegionRef("a".to_string()),
            },
        ];
        let tree = ReadingOrderTree::new(root);
        assert_eq!(tree.region_ids_in_order(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_reindexes() {
        let mut tree = sample();
        assert_eq!(tree.remove("r1"), 1);
        let root = tree.root().unwrap();
        assert_eq!(indices(root), vec![Some(0), Some(1)]);
        assert_eq!(tree.region_ids_in_order(), vec!["r2", "r3", "r4", "r5"]);
        assert_eq!(
            tree.lookup("r5").map(|l| l.path.clone()),
            Some(vec![1])
        );
        assert_eq!(tree.remove("r1"), 0);
    }

    #[test]
    fn test_remove_group_ref_keeps_children() {
        let mut tree = sample();
        assert_eq!(tree.remove("r2"), 1);
        assert_eq!(tree.region_ids_in_order(), vec!["r1", "r3", "r4", "r5"]);
    }

    #[test]
    fn test_redirect() {
        let mut tree = sample();
        assert_eq!(tree.redirect("r3", "new"), Redirect::Redirected);
        assert_eq!(tree.region_ids_in_order(), vec!["r1", "r2", "new", "r4", "r5"]);

        // Target already referenced: the old reference goes away
        assert_eq!(tree.redirect("r4", "new"), Redirect::Removed);
        assert_eq!(tree.region_ids_in_order(), vec!["r1", "r2", "new", "r5"]);

        assert_eq!(tree.redirect("zzz", "r1"), Redirect::NotFound);
    }

    #[test]
    fn test_prune_dangling() {
        let mut tree = sample();
        let pruned = tree.prune_dangling(|id| id != "r3" && id != "r5");
        assert_eq!(pruned, vec!["r3", "r5"]);
        assert_eq!(tree.region_ids_in_order(), vec!["r1", "r2", "r4"]);
        assert_eq!(indices(tree.root().unwrap()), vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_load_makes_indices_dense() {
        let mut inner = ReadingOrderNode::ordered("g1");
        for (i, id) in [(7, "y"), (3, "x")] {
            inner.group_mut().children.push(ReadingOrderChild {
                index: Some(i),
                item: ChildItem::RegionRef(id.to_string()),
            });
        }
        let mut root = ReadingOrderNode::ordered("ro");
        for (i, item) in [
            (5, ChildItem::RegionRef("c".to_string())),
            (0, ChildItem::RegionRef("a".to_string())),
            (2, ChildItem::Group(Box::new(inner))),
            (2, ChildItem::RegionRef("b".to_string())),
        ] {
            root.group_mut().children.push(ReadingOrderChild {
                index: Some(i),
                item,
            });
        }
        let tree = ReadingOrderTree::new(root);
        let root = tree.root().unwrap();
        assert_eq!(indices(root), vec![Some(0), Some(1), Some(2), Some(3)]);
        assert_eq!(tree.region_ids_in_order(), vec!["a", "x", "y", "b", "c"]);
        let ChildItem::Group(inner) = &root.children()[1].item else {
            panic!("expected the nested group second");
        };
        assert_eq!(indices(inner), vec![Some(0), Some(1)]);
        assert_eq!(
            tree.lookup("b"),
            Some(&RefLocation {
                path: vec![2],
                target: RefTarget::Child
            })
        );
    }

    #[test]
    fn test_deserialize_makes_indices_dense() {
        let json = r#"{"Ordered": {"id": "ro", "children": [
            {"index": 4, "item": {"RegionRef": "b"}},
            {"index": 1, "item": {"RegionRef": "a"}}
        ]}}"#;
        let tree: ReadingOrderTree = serde_json::from_str(json).unwrap();
        assert_eq!(indices(tree.root().unwrap()), vec![Some(0), Some(1)]);
        assert_eq!(tree.region_ids_in_order(), vec!["a", "b"]);
    }

    #[test]
    fn test_index_follows_mutations() {
        let mut tree = ReadingOrderTree::new(
            ReadingOrderNode::ordered("ro")
                .with_region("r1")
                .with_region("dup")
                .with_group(
                    ReadingOrderNode::ordered("g1")
                        .with_region_ref("r2")
                        .with_region("r3")
                        .with_region("dup")
                        .with_group(ReadingOrderNode::unordered("g2").with_region("r4")),
                )
                .with_region("r5")
                .with_group(ReadingOrderNode::unordered("g3").with_region_ref("r6")),
        );
        let consistent = |tree: &ReadingOrderTree| {
            let mut rebuilt = tree.clone();
            rebuilt.rebuild_index();
            rebuilt.index == tree.index
        };
        assert!(consistent(&tree));

        tree.remove("r1");
        assert!(consistent(&tree));
        assert_eq!(tree.redirect("r3", "new"), Redirect::Redirected);
        assert!(consistent(&tree));
        assert_eq!(tree.remove("dup"), 2);
        assert!(consistent(&tree));
        tree.remove("r2");
        assert!(consistent(&tree));
        assert_eq!(tree.redirect("r6", "r4"), Redirect::Removed);
        assert!(consistent(&tree));
        assert_eq!(tree.redirect("r5", "r7"), Redirect::Redirected);
        assert!(consistent(&tree));
        assert_eq!(tree.region_ids_in_order(), vec!["new", "r4", "r7"]);
        assert_eq!(
            tree.lookup("r4"),
            Some(&RefLocation {
                path: vec![0, 1, 0],
                target: RefTarget::Child
            })
        );
    }

    #[test]
    fn test_empty_tree() {
        let mut tree = ReadingOrderTree::empty();
        assert!(tree.is_empty());
        assert_eq!(tree.remove("r1"), 0);
        assert_eq!(tree.redirect("r1", "r2"), Redirect::NotFound);
        assert!(tree.region_ids_in_order().is_empty());
    }
}
