//! Syntax tree model.
//!
//! - `kind`: the closed [`SyntaxKind`] taxonomy.
//! - `tree`: the immutable arena ([`LatteFile`], [`NodeId`],
//!   [`TextRange`]) with sibling / ancestor / leaf navigation.
//! - `builder`: [`TreeBuilder`], the construction API a parser drives.
//! - [`query`]: kind lookups and whitespace-skipping walks.

mod builder;
mod kind;
pub mod query;
mod tree;

pub use builder::TreeBuilder;
pub use kind::SyntaxKind;
pub use tree::{LatteFile, NodeId, TextRange};
