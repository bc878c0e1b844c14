//! Type inference and reference resolution for Latte templates.
//!
//! Given a parsed template ([`LatteFile`]), the crate answers two kinds
//! of questions a PHP-aware editor asks:
//!
//! - *What is the type of this expression?* `{$product->category->title}`
//!   is resolved link by link, starting from the nearest preceding
//!   definition of `$product` (`{varType}`, `{var}`, `{foreach}`, …) and
//!   falling back to the `{templateType}` class and host-configured
//!   default variables.
//! - *What does this identifier refer to?* Variables, members, classes,
//!   tag names and filters produce a [`Reference`] that can be resolved
//!   to template-local definitions or PHP declarations.
//!
//! Parsing template text is the host's job: it builds the tree through
//! [`TreeBuilder`].  PHP classes come from the host's [`SymbolIndex`] and
//! configuration from a [`HostConfig`]; both are passed in explicitly
//! through [`Analyzer`], so there is no global state.
//!
//! # Modules
//!
//! - [`syntax`]: tree model, builder, and whitespace-skipping queries.
//! - [`macros`]: tag names and tag content.
//! - [`elements`]: identifier children and normalized names.
//! - [`definition`]: definition / use classification of variables.
//! - [`inference`]: backward variable typing and member-chain typing.
//! - [`reference`]: reference descriptors and their resolution.
//! - [`php_type`], [`types`]: type descriptor and class model.
//! - [`index`], [`settings`]: the host capabilities.

pub mod definition;
pub mod elements;
pub mod errors;
pub mod index;
pub mod inference;
pub mod macros;
pub mod php_type;
pub mod reference;
pub mod settings;
pub mod syntax;
pub mod types;

pub use definition::{VariableRole, classify_variable, is_definition};
pub use errors::{IndexError, LatteError, Result, SettingsError};
pub use index::{CachedIndex, InMemoryIndex, SymbolIndex};
pub use inference::PositionedElement;
pub use macros::{tag_matches_name, tag_name, tag_name_length};
pub use php_type::PhpType;
pub use reference::{Reference, ReferenceKind, ReferenceTarget, reference_at_offset, references_for};
pub use settings::{HostConfig, LatteSettings};
pub use syntax::{LatteFile, NodeId, SyntaxKind, TextRange, TreeBuilder};
pub use types::{AccessKind, ClassInfo, ConstantInfo, MethodInfo, PropertyInfo, Visibility};

/// Handle for running queries against one template.
///
/// Bundles the tree with the host capabilities every query may need.
/// It holds no state of its own: two calls with the same arguments on
/// an unchanged tree and index return the same result.
#[derive(Clone, Copy)]
pub struct Analyzer<'a> {
    file: &'a LatteFile,
    index: &'a dyn SymbolIndex,
    config: &'a dyn HostConfig,
}

impl<'a> Analyzer<'a> {
    pub fn new(file: &'a LatteFile, index: &'a dyn SymbolIndex, config: &'a dyn HostConfig) -> Self {
        Self {
            file,
            index,
            config,
        }
    }

    pub fn file(&self) -> &'a LatteFile {
        self.file
    }

    pub fn index(&self) -> &'a dyn SymbolIndex {
        self.index
    }

    pub fn config(&self) -> &'a dyn HostConfig {
        self.config
    }
}
