//! Incremental construction of a [`LatteFile`].
//!
//! The external parser (or a test) drives the builder with
//! `start_node` / `token` / `finish_node` calls in document order.  Text
//! ranges are derived from the accumulated token text, so a finished tree
//! always covers the source exactly.

use super::kind::SyntaxKind;
use super::tree::{LatteFile, NodeData, NodeId, TextRange};

pub struct TreeBuilder {
    name: String,
    text: String,
    nodes: Vec<NodeData>,
    /// Open composite nodes, root first.
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    /// Start a new tree whose root `File` node is already open.
    pub fn new(name: impl Into<String>) -> Self {
        let mut builder = Self {
            name: name.into(),
            text: String::new(),
            nodes: Vec::new(),
            stack: Vec::new(),
        };
        let root = builder.push_node(SyntaxKind::File);
        builder.stack.push(root);
        builder
    }

    fn offset(&self) -> u32 {
        self.text.len() as u32
    }

    fn push_node(&mut self, kind: SyntaxKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let start = self.offset();
        let parent = self.stack.last().copied();
        let slot = match parent {
            Some(p) => {
                let siblings = &mut self.nodes[p.index()].children;
                siblings.push(id);
                (siblings.len() - 1) as u32
            }
            None => 0,
        };
        self.nodes.push(NodeData {
            kind,
            range: TextRange::new(start, start),
            parent,
            slot,
            children: Vec::new(),
        });
        id
    }

    /// Open a composite node.  Everything added until the matching
    /// [`TreeBuilder::finish_node`] becomes its children.
    pub fn start_node(&mut self, kind: SyntaxKind) -> NodeId {
        let id = self.push_node(kind);
        self.stack.push(id);
        id
    }

    /// Append a leaf with the given source text.
    pub fn token(&mut self, kind: SyntaxKind, text: &str) -> NodeId {
        let id = self.push_node(kind);
        self.text.push_str(text);
        self.nodes[id.index()].range.end = self.offset();
        id
    }

    /// Close the innermost open node.  The root is only closed by
    /// [`TreeBuilder::finish`].
    pub fn finish_node(&mut self) {
        if self.stack.len() <= 1 {
            tracing::warn!(file = %self.name, "finish_node called without an open node");
            return;
        }
        if let Some(id) = self.stack.pop() {
            self.nodes[id.index()].range.end = self.offset();
        }
    }

    /// Close every node that is still open and return the tree.
    pub fn finish(mut self) -> LatteFile {
        if self.stack.len() > 1 {
            tracing::warn!(
                file = %self.name,
                open = self.stack.len() - 1,
                "closing nodes left open at end of input"
            );
        }
        let end = self.offset();
        while let Some(id) = self.stack.pop() {
            self.nodes[id.index()].range.end = end;
        }
        LatteFile {
            name: self.name,
            text: self.text,
            nodes: self.nodes,
        }
    }
}
