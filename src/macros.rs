//! Macro tag model.
//!
//! A macro tag is one `{...}` construct: an open tag (`{foreach ...}`),
//! a close tag (`{/foreach}`, `{/}`), or a name-less echo tag
//! (`{$product->title}`).  The canonical tag name is derived from the
//! tag's children:
//!
//! 1. an explicit name or short-name token wins (`foreach`, `=`, `_`);
//! 2. a close tag, or a tag without content, is unnamed (`""`);
//! 3. anything else is an echo and named `"="`.
//!
//! [`tag_name`] and [`tag_name_length`] both go through
//! [`tag_name_source`], so they can never disagree on which branch fired.

use crate::syntax::query::{ancestor_of_kind, first_child_of_kind};
use crate::syntax::{LatteFile, NodeId, SyntaxKind};

/// Which rule produced a tag's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagNameSource {
    /// A `MacroName` or `MacroShortName` child.
    Token(NodeId),
    /// Close tag or tag without content.
    Unnamed,
    /// Echo tag such as `{$foo}`.
    Echo,
}

/// Name token of a tag: `MacroName` first, then `MacroShortName`.
pub fn tag_name_token(file: &LatteFile, tag: NodeId) -> Option<NodeId> {
    first_child_of_kind(file, tag, SyntaxKind::MacroName)
        .or_else(|| first_child_of_kind(file, tag, SyntaxKind::MacroShortName))
}

pub fn tag_name_source(file: &LatteFile, tag: NodeId) -> TagNameSource {
    if let Some(token) = tag_name_token(file, tag) {
        return TagNameSource::Token(token);
    }
    if is_close_tag(file, tag) || macro_content(file, tag).is_none() {
        return TagNameSource::Unnamed;
    }
    TagNameSource::Echo
}

/// Canonical tag name.
pub fn tag_name(file: &LatteFile, tag: NodeId) -> &str {
    match tag_name_source(file, tag) {
        TagNameSource::Token(token) => file.node_text(token),
        TagNameSource::Unnamed => "",
        TagNameSource::Echo => "=",
    }
}

/// Length of [`tag_name`] in bytes.
pub fn tag_name_length(file: &LatteFile, tag: NodeId) -> usize {
    match tag_name_source(file, tag) {
        TagNameSource::Token(token) => file.range(token).len() as usize,
        TagNameSource::Unnamed => 0,
        TagNameSource::Echo => 1,
    }
}

/// Exact (case-sensitive) comparison against a tag name.
pub fn tag_matches_name(file: &LatteFile, tag: NodeId, candidate: &str) -> bool {
    tag_name_length(file, tag) == candidate.len() && tag_name(file, tag) == candidate
}

pub fn is_close_tag(file: &LatteFile, tag: NodeId) -> bool {
    file.kind(tag) == SyntaxKind::MacroCloseTag
}

pub fn macro_content(file: &LatteFile, tag: NodeId) -> Option<NodeId> {
    first_child_of_kind(file, tag, SyntaxKind::MacroContent)
}

/// First expression fragment of a tag's content.
pub fn first_php_content(file: &LatteFile, content: NodeId) -> Option<NodeId> {
    first_child_of_kind(file, content, SyntaxKind::PhpContent)
}

/// The tag `node` sits in, if any.
pub fn enclosing_macro_tag(file: &LatteFile, node: NodeId) -> Option<NodeId> {
    file.ancestors(node)
        .find(|&ancestor| file.kind(ancestor).is_macro_tag())
}

/// Whether the tag enclosing `node` is named exactly `name`.
pub fn matches_parent_macro_name(file: &LatteFile, node: NodeId, name: &str) -> bool {
    enclosing_macro_tag(file, node).is_some_and(|tag| tag_matches_name(file, tag, name))
}

/// Whether a filter is applied inside parentheses, e.g. `($name|upper)`,
/// rather than to the whole tag.
pub fn is_variable_modifier(file: &LatteFile, modifier: NodeId) -> bool {
    ancestor_of_kind(file, modifier, SyntaxKind::PhpInBrackets).is_some()
}
