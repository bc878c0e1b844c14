//! Variable types.
//!
//! The type of `$x` at some node is decided by the nearest preceding
//! definition of `$x` that carries a type:
//!
//!   - `{varType Foo $x}`, `{var Foo $x = …}`, `{default Foo $x = …}`:
//!     the declared type text, `mixed` when there is none;
//!   - `{foreach $items as $x}`: the element type of `$items`, skipped
//!     when that is unknown.
//!
//! Other definitions (loop keys, destructuring, `{for}`, `{capture}`)
//! carry no type and the scan moves on.  When nothing typed is found the
//! public properties of the `{templateType}` class are consulted, then
//! the host's default variables.

use crate::Analyzer;
use crate::definition::{
    is_definition, is_destructuring_target, is_foreach_target, is_template_type_pragma,
    is_var_or_default_pragma, is_var_type_pragma,
};
use crate::elements::{class_name, normalize_php_variable, variable_name};
use crate::errors::Result;
use crate::php_type::PhpType;
use crate::syntax::query::{first_child_of_kind, next_kind};
use crate::syntax::{NodeId, SyntaxKind};

/// A variable occurrence together with its start offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedElement {
    pub node: NodeId,
    pub offset: u32,
}

impl Analyzer<'_> {
    // ─── Candidates ─────────────────────────────────────────────────────

    /// All `PhpVariable` nodes named `name` that start at or before
    /// `node`, nearest first.  `node` itself is included when it is such
    /// a variable, so a definition site resolves to its own declared type.
    pub fn find_variables_before(&self, node: NodeId, name: &str) -> Vec<PositionedElement> {
        let file = self.file;
        let limit = file.offset(node);
        let wanted = normalize_php_variable(name);

        let mut found: Vec<PositionedElement> = file
            .nodes_of_kind(SyntaxKind::PhpVariable)
            .filter(|&var| file.offset(var) <= limit)
            .filter(|&var| variable_name(file, var).is_some_and(|n| n == wanted))
            .map(|var| PositionedElement {
                node: var,
                offset: file.offset(var),
            })
            .collect();
        // Pre-order ids break offset ties, so the sort is deterministic.
        found.sort_by(|a, b| b.offset.cmp(&a.offset).then(b.node.cmp(&a.node)));
        found
    }

    // ─── Resolution ─────────────────────────────────────────────────────

    /// Type of the variable `name` as seen from `node`.
    pub fn resolve_variable_type(&self, node: NodeId, name: &str) -> Result<PhpType> {
        let file = self.file;
        let name = normalize_php_variable(name);

        for candidate in self.find_variables_before(node, &name) {
            if !is_definition(file, candidate.node) {
                continue;
            }
            if let Some(ty) = self.definition_type(candidate.node)? {
                tracing::trace!(
                    file = file.name(),
                    variable = %name,
                    offset = candidate.offset,
                    ty = %ty,
                    "variable typed by definition"
                );
                return Ok(ty);
            }
        }

        if let Some(ty) = self.template_type_field(&name)? {
            tracing::trace!(file = file.name(), variable = %name, ty = %ty, "variable typed by templateType");
            return Ok(ty);
        }

        if let Some(ty) = self.config.default_variable_type(&name) {
            tracing::trace!(file = file.name(), variable = %name, ty = %ty, "variable typed by host default");
            return Ok(ty);
        }

        tracing::debug!(file = file.name(), variable = %name, "no type information, using mixed");
        Ok(PhpType::mixed())
    }

    /// The type a definition site gives its variable, or `None` when the
    /// site carries no usable type.
    fn definition_type(&self, definition: NodeId) -> Result<Option<PhpType>> {
        let file = self.file;
        if is_destructuring_target(file, definition) {
            return Ok(None);
        }
        if is_var_type_pragma(file, definition) || is_var_or_default_pragma(file, definition) {
            return Ok(Some(PhpType::parse(&self.declared_type_text(definition))));
        }
        if is_foreach_target(file, definition) {
            let element = self.foreach_element_type(definition)?;
            return Ok(element.filter(|ty| !ty.is_mixed()));
        }
        Ok(None)
    }

    /// Text of the type written in front of a declared variable, e.g.
    /// `?App\Product` for `{varType ?App\Product $item}`.
    ///
    /// Collects the leaves between the tag name (or the previous
    /// top-level `,`) and the variable, ignoring whitespace.  Commas
    /// inside generic arguments such as `array<int, Foo>` belong to the
    /// type.  Empty when no type is written.
    pub fn declared_type_text(&self, definition: NodeId) -> String {
        let file = self.file;
        let mut parts: Vec<&str> = Vec::new();
        let mut current = definition;
        // Unclosed `>` seen so far, walking backward.
        let mut generic_depth: i32 = 0;
        while let Some(leaf) = file.prev_leaf(current) {
            match file.kind(leaf) {
                SyntaxKind::MacroName
                | SyntaxKind::MacroShortName
                | SyntaxKind::MacroTagOpen
                | SyntaxKind::MacroCloseTagOpen => break,
                SyntaxKind::PhpComma if generic_depth <= 0 => break,
                _ => {}
            }
            let text = file.node_text(leaf);
            for c in text.chars() {
                match c {
                    '>' => generic_depth += 1,
                    '<' => generic_depth -= 1,
                    _ => {}
                }
            }
            if !text.trim().is_empty() {
                parts.push(text.trim());
            }
            current = leaf;
        }
        parts.reverse();
        parts.concat()
    }

    /// Element type of the collection a `foreach` value target iterates.
    ///
    /// Keys (`$k => …`) and destructured targets get `None`.
    fn foreach_element_type(&self, target: NodeId) -> Result<Option<PhpType>> {
        let file = self.file;
        let Some(foreach) = file.parent(target) else {
            return Ok(None);
        };
        if file.kind(foreach) != SyntaxKind::PhpForeach {
            return Ok(None);
        }
        if next_kind(file, target) == Some(SyntaxKind::PhpDoubleArrow) {
            return Ok(None);
        }
        let Some(as_keyword) = first_child_of_kind(file, foreach, SyntaxKind::PhpAs) else {
            return Ok(None);
        };
        let Some(subject) = self.preceding_expression(as_keyword) else {
            return Ok(None);
        };
        let collection = self.expression_type(subject)?;
        Ok(Some(collection.element_type()))
    }

    // ─── templateType ───────────────────────────────────────────────────

    /// The class named by the first `{templateType}` tag in the file.
    pub fn template_type(&self) -> Option<PhpType> {
        let file = self.file;
        file.nodes_of_kind(SyntaxKind::PhpClass)
            .find(|&class| is_template_type_pragma(file, class))
            .and_then(|class| class_name(file, class))
            .map(|name| PhpType::from_class_name(&name, false))
            .filter(|ty| !ty.is_mixed())
    }

    /// Declared type of the public instance property `name` on the
    /// `{templateType}` class.
    fn template_type_field(&self, name: &str) -> Result<Option<PhpType>> {
        let Some(template) = self.template_type() else {
            return Ok(None);
        };
        for class in template.resolve(self.index)? {
            if let Some(property) = class.find_template_variable(name) {
                return Ok(Some(PhpType::from_hint(property.type_hint.as_deref())));
            }
        }
        Ok(None)
    }
}
