//! Identifier children and normalized names of referenceable nodes.
//!
//! Every referenceable node carries its name in one designated token
//! child (the "identifier"): `$item` in a variable, `getPrice` in a
//! method, `\App\Product` in a class reference.  Names handed to the
//! inference passes are normalized:
//!
//! - variables and static variables lose the `$` sigil,
//! - class names gain exactly one leading `\`,
//! - filter names lose a leading `|`.

use std::borrow::Cow;

use crate::syntax::query::first_child_of_kind;
use crate::syntax::{LatteFile, NodeId, SyntaxKind};

/// Kind of the identifier token for each referenceable node kind.
fn identifier_kind(kind: SyntaxKind) -> Option<SyntaxKind> {
    match kind {
        SyntaxKind::PhpVariable | SyntaxKind::PhpStaticVariable => Some(SyntaxKind::MacroArgsVar),
        SyntaxKind::PhpMethod => Some(SyntaxKind::PhpMethodName),
        SyntaxKind::PhpProperty | SyntaxKind::PhpConstant => Some(SyntaxKind::PhpIdentifier),
        SyntaxKind::PhpClass => Some(SyntaxKind::PhpClassName),
        SyntaxKind::MacroModifier => Some(SyntaxKind::MacroFilters),
        SyntaxKind::MacroOpenTag | SyntaxKind::MacroCloseTag => Some(SyntaxKind::MacroName),
        _ => None,
    }
}

/// The designated identifier child of `node`, if it has one.
pub fn name_identifier(file: &LatteFile, node: NodeId) -> Option<NodeId> {
    let kind = identifier_kind(file.kind(node))?;
    first_child_of_kind(file, node, kind)
}

fn identifier_text(file: &LatteFile, node: NodeId) -> Option<&str> {
    name_identifier(file, node).map(|id| file.node_text(id))
}

/// `$item` → `item`.
pub fn normalize_php_variable(name: &str) -> String {
    let name = name.trim();
    name.strip_prefix('$').unwrap_or(name).to_string()
}

/// `App\Product` → `\App\Product`.
pub fn normalize_class_name(name: &str) -> String {
    let name = name.trim().trim_start_matches('\\');
    format!("\\{name}")
}

/// `|upper` → `upper`.
pub fn normalize_macro_modifier(name: &str) -> String {
    let name = name.trim();
    name.strip_prefix('|').unwrap_or(name).trim().to_string()
}

/// Name of a `PhpVariable` or `PhpStaticVariable`, without `$`.
pub fn variable_name(file: &LatteFile, node: NodeId) -> Option<String> {
    match file.kind(node) {
        SyntaxKind::PhpVariable | SyntaxKind::PhpStaticVariable => {
            identifier_text(file, node).map(normalize_php_variable)
        }
        _ => None,
    }
}

pub fn method_name(file: &LatteFile, node: NodeId) -> Option<&str> {
    match file.kind(node) {
        SyntaxKind::PhpMethod => identifier_text(file, node),
        _ => None,
    }
}

pub fn property_name(file: &LatteFile, node: NodeId) -> Option<&str> {
    match file.kind(node) {
        SyntaxKind::PhpProperty => identifier_text(file, node),
        _ => None,
    }
}

pub fn constant_name(file: &LatteFile, node: NodeId) -> Option<&str> {
    match file.kind(node) {
        SyntaxKind::PhpConstant => identifier_text(file, node),
        _ => None,
    }
}

/// Canonical fully-qualified class name, e.g. `\App\Model\Product`.
pub fn class_name(file: &LatteFile, node: NodeId) -> Option<String> {
    match file.kind(node) {
        SyntaxKind::PhpClass => identifier_text(file, node)
            .filter(|text| !text.trim().is_empty())
            .map(normalize_class_name),
        _ => None,
    }
}

pub fn modifier_name(file: &LatteFile, node: NodeId) -> Option<String> {
    match file.kind(node) {
        SyntaxKind::MacroModifier => identifier_text(file, node).map(normalize_macro_modifier),
        _ => None,
    }
}

/// Normalized name of any referenceable node.
pub fn element_name(file: &LatteFile, node: NodeId) -> Option<Cow<'_, str>> {
    match file.kind(node) {
        SyntaxKind::PhpVariable | SyntaxKind::PhpStaticVariable => {
            variable_name(file, node).map(Cow::Owned)
        }
        SyntaxKind::PhpMethod | SyntaxKind::PhpProperty | SyntaxKind::PhpConstant => {
            identifier_text(file, node).map(Cow::Borrowed)
        }
        SyntaxKind::PhpClass => class_name(file, node).map(Cow::Owned),
        SyntaxKind::MacroModifier => modifier_name(file, node).map(Cow::Owned),
        SyntaxKind::MacroOpenTag | SyntaxKind::MacroCloseTag => {
            Some(Cow::Borrowed(crate::macros::tag_name(file, node)))
        }
        _ => None,
    }
}
