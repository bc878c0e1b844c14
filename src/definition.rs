//! Definition / use classification of template variables.
//!
//! Latte has no nested lexical scopes: a variable comes into existence
//! at a *definition* and every later occurrence is a *use*.  Recognised
//! definition sites:
//!
//!   - **Type pragma**:   `{varType Foo $x}`
//!   - **Capture**:       `{capture $x}`
//!   - **Var / default**: `{var $x = …}` / `{default $x = …}`
//!   - **Destructuring**: `{var [$a, $b] = …}`
//!   - **Foreach**:       `as $x` / `=> $x`, also inside `[$a, $b]`
//!   - **For**:           `{for $i = 0; …}` and `n:for="$i = 0; …"`
//!
//! All predicates are pure functions of the node and its position in the
//! tree.

use crate::macros::matches_parent_macro_name;
use crate::syntax::query::{ancestor_of_kind, next_kind, prev_kind, skip_whitespace_backward};
use crate::syntax::{LatteFile, NodeId, SyntaxKind};

/// Role of a variable occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableRole {
    Definition,
    Use,
}

/// Classify a `PhpVariable`; `None` for any other node kind.
pub fn classify_variable(file: &LatteFile, node: NodeId) -> Option<VariableRole> {
    if file.kind(node) != SyntaxKind::PhpVariable {
        return None;
    }
    Some(if is_definition(file, node) {
        VariableRole::Definition
    } else {
        VariableRole::Use
    })
}

/// Inside `{templateType …}`.
pub fn is_template_type_pragma(file: &LatteFile, node: NodeId) -> bool {
    matches_parent_macro_name(file, node, "templateType")
}

/// Inside `{varType …}`.
pub fn is_var_type_pragma(file: &LatteFile, node: NodeId) -> bool {
    matches_parent_macro_name(file, node, "varType")
}

/// Inside `{var …}` or `{default …}`.
pub fn is_var_or_default_pragma(file: &LatteFile, node: NodeId) -> bool {
    matches_parent_macro_name(file, node, "var") || matches_parent_macro_name(file, node, "default")
}

/// Inside `{capture …}`.
pub fn is_capture_target(file: &LatteFile, node: NodeId) -> bool {
    matches_parent_macro_name(file, node, "capture")
}

fn is_next_definition_operator(file: &LatteFile, node: NodeId) -> bool {
    next_kind(file, node) == Some(SyntaxKind::PhpDefinitionOperator)
}

/// A `foreach` loop target: `as $x`, `=> $x`, or one element of
/// `as [$a, $b]`.
pub fn is_foreach_target(file: &LatteFile, node: NodeId) -> bool {
    let mut subject = node;
    let Some(mut parent) = file.parent(subject) else {
        return false;
    };
    while file.kind(parent) == SyntaxKind::PhpArrayOfVariables {
        subject = parent;
        match file.parent(parent) {
            Some(p) => parent = p,
            None => return false,
        }
    }
    if file.kind(parent) != SyntaxKind::PhpForeach {
        return false;
    }
    matches!(
        prev_kind(file, subject),
        Some(SyntaxKind::PhpAs | SyntaxKind::PhpDoubleArrow)
    )
}

/// A `for` loop variable being initialised or assigned.
///
/// Two independent grammars reach here: the `{for …}` tag and the
/// `n:for="…"` HTML attribute.  A variable inside any `n:` attribute
/// value is judged by the attribute rule only.
pub fn is_for_target(file: &LatteFile, node: NodeId) -> bool {
    if let Some(attr_value) = ancestor_of_kind(file, node, SyntaxKind::NetteAttrValue) {
        return is_n_for_target(file, node, attr_value);
    }
    matches_parent_macro_name(file, node, "for") && is_next_definition_operator(file, node)
}

/// `n:for="$i = 0; …"`: the variable is followed by `=`, and the
/// attribute value is preceded by `=` which is preceded by `n:for`.
fn is_n_for_target(file: &LatteFile, node: NodeId, attr_value: NodeId) -> bool {
    if !is_next_definition_operator(file, node) {
        return false;
    }
    let Some(equals) = skip_whitespace_backward(file, attr_value) else {
        return false;
    };
    if file.kind(equals) != SyntaxKind::PhpDefinitionOperator {
        return false;
    }
    skip_whitespace_backward(file, equals).is_some_and(|name| file.node_text(name) == "n:for")
}

/// One element of a destructuring group that is assigned to:
/// `[$a, $b] = …`.
pub fn is_destructuring_target(file: &LatteFile, node: NodeId) -> bool {
    file.parent(node).is_some_and(|parent| {
        file.kind(parent) == SyntaxKind::PhpArrayOfVariables
            && is_next_definition_operator(file, parent)
    })
}

/// Whether a variable occurrence introduces a binding.
pub fn is_definition(file: &LatteFile, node: NodeId) -> bool {
    if is_var_type_pragma(file, node) || is_capture_target(file, node) {
        return true;
    }
    if is_var_or_default_pragma(file, node) && is_next_definition_operator(file, node) {
        return true;
    }
    if is_destructuring_target(file, node) {
        return true;
    }
    is_foreach_target(file, node) || is_for_target(file, node)
}
