//! Arena-backed syntax tree of one Latte template.
//!
//! Nodes live contiguously in a `Vec` and reference each other by
//! [`NodeId`].  Ids are handed out in pre-order, so comparing two ids
//! compares the document position of the nodes' starts (ties broken by
//! nesting depth).  The tree is immutable once [`super::TreeBuilder`]
//! has produced it.

use serde::Serialize;

use super::kind::SyntaxKind;

/// Index of a node inside its [`LatteFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "inverted range {start}..{end}");
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` lies inside the range.  The end offset counts as
    /// inside so that a cursor placed right after an identifier still
    /// hits it.
    pub fn contains_inclusive(&self, offset: u32) -> bool {
        offset >= self.start && offset <= self.end
    }

    /// Shift a range relative to some node start into file coordinates.
    pub fn shifted(&self, by: u32) -> TextRange {
        TextRange::new(self.start + by, self.end + by)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) range: TextRange,
    pub(crate) parent: Option<NodeId>,
    /// Position of this node in its parent's child list.
    pub(crate) slot: u32,
    pub(crate) children: Vec<NodeId>,
}

/// One parsed template: source text plus the node arena.
#[derive(Debug, Clone)]
pub struct LatteFile {
    pub(crate) name: String,
    pub(crate) text: String,
    pub(crate) nodes: Vec<NodeData>,
}

impl LatteFile {
    /// The root `File` node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// File name or URI the tree was built for (used in log output).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.data(id).kind
    }

    pub fn range(&self, id: NodeId) -> TextRange {
        self.data(id).range
    }

    /// Start offset of the node in the file.
    pub fn offset(&self, id: NodeId) -> u32 {
        self.data(id).range.start
    }

    pub fn node_text(&self, id: NodeId) -> &str {
        let range = self.range(id);
        self.text
            .get(range.start as usize..range.end as usize)
            .unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let data = self.data(id);
        let slot = data.slot as usize;
        if slot == 0 {
            return None;
        }
        let parent = data.parent?;
        self.children(parent).get(slot - 1).copied()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let data = self.data(id);
        let parent = data.parent?;
        self.children(parent).get(data.slot as usize + 1).copied()
    }

    /// Strict ancestors of `id`, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// `id` and everything below it, in document order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![id];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.children(next).iter().rev().copied());
            Some(next)
        })
    }

    /// Every node of the given kind, in document order.
    pub fn nodes_of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.kind == kind)
            .map(|(i, _)| NodeId(i as u32))
    }

    // ─── Leaf navigation ────────────────────────────────────────────────

    /// Last non-empty leaf inside `id` (or `id` itself when it is one).
    fn last_leaf_within(&self, id: NodeId) -> Option<NodeId> {
        let children = self.children(id);
        if children.is_empty() {
            return (!self.range(id).is_empty()).then_some(id);
        }
        children
            .iter()
            .rev()
            .find_map(|&child| self.last_leaf_within(child))
    }

    /// First non-empty leaf inside `id` (or `id` itself when it is one).
    fn first_leaf_within(&self, id: NodeId) -> Option<NodeId> {
        let children = self.children(id);
        if children.is_empty() {
            return (!self.range(id).is_empty()).then_some(id);
        }
        children
            .iter()
            .find_map(|&child| self.first_leaf_within(child))
    }

    /// The non-empty leaf that ends right before `id` starts.
    pub fn prev_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            match self.prev_sibling(current) {
                Some(prev) => {
                    if let Some(leaf) = self.last_leaf_within(prev) {
                        return Some(leaf);
                    }
                    current = prev;
                }
                None => current = self.parent(current)?,
            }
        }
    }

    /// The non-empty leaf that starts right after `id` ends.
    pub fn next_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            match self.next_sibling(current) {
                Some(next) => {
                    if let Some(leaf) = self.first_leaf_within(next) {
                        return Some(leaf);
                    }
                    current = next;
                }
                None => current = self.parent(current)?,
            }
        }
    }

    /// The leaf covering `offset`.  At a boundary between two leaves the
    /// right-hand one wins, except at the very end of the file.
    pub fn leaf_at_offset(&self, offset: u32) -> Option<NodeId> {
        let mut current = self.root();
        if !self.range(current).contains_inclusive(offset) {
            return None;
        }
        loop {
            let children = self.children(current);
            if children.is_empty() {
                return Some(current);
            }
            let next = children
                .iter()
                .copied()
                .filter(|&c| !self.range(c).is_empty())
                .find(|&c| {
                    let r = self.range(c);
                    offset >= r.start && offset < r.end
                })
                .or_else(|| {
                    children
                        .iter()
                        .rev()
                        .copied()
                        .find(|&c| !self.range(c).is_empty() && self.range(c).end == offset)
                })?;
            current = next;
        }
    }
}
