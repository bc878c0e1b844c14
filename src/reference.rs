//! Reference descriptors and their resolution.
//!
//! A [`Reference`] marks the part of a node an editor highlights and
//! navigates from: the identifier of a variable or member, the class
//! name, the filter name, or the tag name right after `{` / `{/`.
//! [`Analyzer::resolve_reference`] turns it into the things it refers
//! to.

use serde::Serialize;

use crate::Analyzer;
use crate::definition::is_definition;
use crate::elements::{
    class_name, element_name, method_name, modifier_name, name_identifier, normalize_php_variable,
    variable_name,
};
use crate::errors::Result;
use crate::macros::{is_close_tag, tag_name, tag_name_length};
use crate::php_type::PhpType;
use crate::syntax::{LatteFile, NodeId, SyntaxKind, TextRange};

/// What a reference resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReferenceKind {
    Variable,
    Method,
    Property,
    Constant,
    StaticVariable,
    Class,
    MacroTag,
    MacroModifier,
}

impl ReferenceKind {
    fn for_node(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::PhpVariable => Self::Variable,
            SyntaxKind::PhpMethod => Self::Method,
            SyntaxKind::PhpProperty => Self::Property,
            SyntaxKind::PhpConstant => Self::Constant,
            SyntaxKind::PhpStaticVariable => Self::StaticVariable,
            SyntaxKind::PhpClass => Self::Class,
            SyntaxKind::MacroOpenTag | SyntaxKind::MacroCloseTag => Self::MacroTag,
            SyntaxKind::MacroModifier => Self::MacroModifier,
            _ => return None,
        })
    }
}

/// A reference owned by one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub node: NodeId,
    /// Range relative to the start of `node`.
    pub range: TextRange,
    pub kind: ReferenceKind,
}

impl Reference {
    /// The reference range in file coordinates.
    pub fn absolute_range(&self, file: &LatteFile) -> TextRange {
        self.range.shifted(file.offset(self.node))
    }

    /// The referencing text, e.g. `$item` or `foreach`.
    pub fn text<'f>(&self, file: &'f LatteFile) -> &'f str {
        let range = self.absolute_range(file);
        file.text()
            .get(range.start as usize..range.end as usize)
            .unwrap_or_default()
    }
}

/// The reference `node` owns, if any.
///
/// Identifier-bearing nodes reference `[0, len)` of their identifier;
/// tags reference their name after the `{` (or `{/`) opener.  Nodes
/// without an identifier, and unnamed tags, own no reference.
pub fn references_for(file: &LatteFile, node: NodeId) -> Option<Reference> {
    let kind = ReferenceKind::for_node(file.kind(node))?;
    let range = match kind {
        ReferenceKind::MacroTag => {
            let name_len = u32::try_from(tag_name_length(file, node)).ok()?;
            if name_len == 0 {
                return None;
            }
            let extra = if is_close_tag(file, node) { 2 } else { 1 };
            TextRange::new(1, name_len + extra)
        }
        _ => {
            let identifier = name_identifier(file, node)?;
            let len = file.range(identifier).len();
            if len == 0 {
                return None;
            }
            TextRange::new(0, len)
        }
    };
    let node_len = file.range(node).len();
    let range = TextRange::new(range.start.min(node_len), range.end.min(node_len));
    Some(Reference { node, range, kind })
}

/// The innermost reference whose range covers `offset`.
pub fn reference_at_offset(file: &LatteFile, offset: u32) -> Option<Reference> {
    let leaf = file.leaf_at_offset(offset)?;
    std::iter::once(leaf)
        .chain(file.ancestors(leaf))
        .filter_map(|node| references_for(file, node))
        .find(|reference| reference.absolute_range(file).contains_inclusive(offset))
}

/// Something a reference resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReferenceTarget {
    /// A template-local variable definition.
    Definition(NodeId),
    /// A class, by fully-qualified name.
    Class(String),
    Method { class: String, name: String },
    Property { class: String, name: String },
    Constant { class: String, name: String },
    /// A custom template function known to the host.
    Function(String),
    Tag(String),
    Filter(String),
}

impl Analyzer<'_> {
    /// Everything `reference` may refer to; empty when nothing is known.
    ///
    /// Variable definitions come nearest first.  Member references list
    /// every matching declaration across the receiver's classes.
    pub fn resolve_reference(&self, reference: &Reference) -> Result<Vec<ReferenceTarget>> {
        let file = self.file;
        let node = reference.node;
        let targets = match reference.kind {
            ReferenceKind::Variable if self.is_function_call(node) => {
                self.variable_targets(node)?
            }
            ReferenceKind::Variable | ReferenceKind::StaticVariable | ReferenceKind::Property => {
                self.field_targets(node, false)?
            }
            ReferenceKind::Constant => self.field_targets(node, true)?,
            ReferenceKind::Method => self.method_targets(node)?,
            ReferenceKind::Class => match class_name(file, node) {
                Some(name) => PhpType::from_class_name(&name, false)
                    .resolve(self.index)?
                    .into_iter()
                    .map(|class| ReferenceTarget::Class(class.name))
                    .collect(),
                None => Vec::new(),
            },
            ReferenceKind::MacroTag => {
                let name = tag_name(file, node);
                if self.config.is_known_tag(name) {
                    vec![ReferenceTarget::Tag(name.to_string())]
                } else {
                    Vec::new()
                }
            }
            ReferenceKind::MacroModifier => match modifier_name(file, node) {
                Some(name) if self.config.is_known_filter(&name) => {
                    vec![ReferenceTarget::Filter(name)]
                }
                _ => Vec::new(),
            },
        };
        tracing::trace!(
            file = file.name(),
            kind = ?reference.kind,
            targets = targets.len(),
            "resolved reference"
        );
        Ok(targets)
    }

    /// Preceding definitions of a chain-head variable, or the
    /// `{templateType}` property that supplies it.
    fn variable_targets(&self, node: NodeId) -> Result<Vec<ReferenceTarget>> {
        let file = self.file;
        let Some(name) = variable_name(file, node) else {
            return Ok(Vec::new());
        };
        let definitions: Vec<ReferenceTarget> = self
            .find_variables_before(node, &name)
            .into_iter()
            .filter(|candidate| is_definition(file, candidate.node))
            .map(|candidate| ReferenceTarget::Definition(candidate.node))
            .collect();
        if !definitions.is_empty() {
            return Ok(definitions);
        }

        let Some(template) = self.template_type() else {
            return Ok(Vec::new());
        };
        Ok(template
            .resolve(self.index)?
            .into_iter()
            .filter(|class| class.find_template_variable(&name).is_some())
            .map(|class| ReferenceTarget::Property {
                class: class.name,
                name: name.clone(),
            })
            .collect())
    }

    fn field_targets(&self, node: NodeId, constants_only: bool) -> Result<Vec<ReferenceTarget>> {
        let Some(name) = element_name(self.file, node) else {
            return Ok(Vec::new());
        };
        let name = normalize_php_variable(&name);
        let receiver = self.receiver_type(node)?;
        let mut targets = Vec::new();
        for class in receiver.resolve(self.index)? {
            if !constants_only && class.properties.iter().any(|p| p.name == name) {
                targets.push(ReferenceTarget::Property {
                    class: class.name.clone(),
                    name: name.clone(),
                });
            }
            if class.constants.iter().any(|c| c.name == name) {
                targets.push(ReferenceTarget::Constant {
                    class: class.name.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(targets)
    }

    fn method_targets(&self, node: NodeId) -> Result<Vec<ReferenceTarget>> {
        let Some(name) = method_name(self.file, node) else {
            return Ok(Vec::new());
        };
        if self.is_function_call(node) {
            let known = self.config.custom_function_return_type(name).is_some();
            return Ok(if known {
                vec![ReferenceTarget::Function(name.to_string())]
            } else {
                Vec::new()
            });
        }
        let receiver = self.receiver_type(node)?;
        Ok(receiver
            .resolve(self.index)?
            .into_iter()
            .filter(|class| class.find_method(name).is_some())
            .map(|class| ReferenceTarget::Method {
                class: class.name,
                name: name.to_string(),
            })
            .collect())
    }
}
