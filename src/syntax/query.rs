//! Generic tree queries shared by every analysis pass.
//!
//! These are pure functions over an immutable [`LatteFile`]; none of them
//! look at node semantics beyond kinds and text.

use super::kind::SyntaxKind;
use super::tree::{LatteFile, NodeId};

/// A node whose text is empty or consists only of whitespace.
pub fn is_blank(file: &LatteFile, id: NodeId) -> bool {
    file.node_text(id).trim().is_empty()
}

/// First direct child of `id` with the given kind.
pub fn first_child_of_kind(file: &LatteFile, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
    file.children(id)
        .iter()
        .copied()
        .find(|&child| file.kind(child) == kind)
}

/// Closest strict ancestor of `id` with the given kind.
pub fn ancestor_of_kind(file: &LatteFile, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
    file.ancestors(id).find(|&a| file.kind(a) == kind)
}

/// The nearest non-blank node before `id` in document order.
///
/// Walks previous siblings; when a parent's first child is reached the
/// walk continues with the parent's previous sibling, so the result may
/// live under a different parent than `id`.  Returns `None` at the start
/// of the document.
pub fn skip_whitespace_backward(file: &LatteFile, id: NodeId) -> Option<NodeId> {
    let mut current = id;
    loop {
        match file.prev_sibling(current) {
            Some(prev) if is_blank(file, prev) => current = prev,
            Some(prev) => return Some(prev),
            None => current = file.parent(current)?,
        }
    }
}

/// Forward counterpart of [`skip_whitespace_backward`].
pub fn skip_whitespace_forward(file: &LatteFile, id: NodeId) -> Option<NodeId> {
    let mut current = id;
    loop {
        match file.next_sibling(current) {
            Some(next) if is_blank(file, next) => current = next,
            Some(next) => return Some(next),
            None => current = file.parent(current)?,
        }
    }
}

/// Kind of the nearest non-blank node before `id`, if any.
pub fn prev_kind(file: &LatteFile, id: NodeId) -> Option<SyntaxKind> {
    skip_whitespace_backward(file, id).map(|prev| file.kind(prev))
}

/// Kind of the nearest non-blank node after `id`, if any.
pub fn next_kind(file: &LatteFile, id: NodeId) -> Option<SyntaxKind> {
    skip_whitespace_forward(file, id).map(|next| file.kind(next))
}
