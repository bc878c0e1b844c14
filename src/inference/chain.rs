//! Member-access chains.
//!
//! In `$category->getProducts()->first()->price` every link is typed by
//! looking its name up on the classes of the link before it.  The head
//! of a chain is a variable (typed by [`super::variable`]), a class
//! name, or a plain function call (typed by the host configuration).

use crate::Analyzer;
use crate::elements::{class_name, element_name, method_name, normalize_php_variable, variable_name};
use crate::errors::Result;
use crate::php_type::PhpType;
use crate::syntax::query::{prev_kind, skip_whitespace_backward};
use crate::syntax::{NodeId, SyntaxKind};
use crate::types::AccessKind;

/// Which member table a lookup goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    Method,
    /// Properties, then constants.
    Field,
}

impl Analyzer<'_> {
    // ─── Access classification ──────────────────────────────────────────

    /// The operator in front of `node`, looking past whitespace.
    pub fn access_kind(&self, node: NodeId) -> AccessKind {
        match prev_kind(self.file, node) {
            Some(SyntaxKind::PhpObjectOperator) => AccessKind::Arrow,
            Some(SyntaxKind::PhpDoubleColon) => AccessKind::DoubleColon,
            _ => AccessKind::Other,
        }
    }

    /// `Foo::bar()`, `Foo::BAR`, `Foo::$bar`.
    pub fn is_static_access(&self, node: NodeId) -> bool {
        self.access_kind(node) == AccessKind::DoubleColon
    }

    /// Whether `node` heads its chain, i.e. no access operator precedes
    /// it.  For a method node this means a plain function call.
    pub fn is_function_call(&self, node: NodeId) -> bool {
        self.access_kind(node) == AccessKind::Other
    }

    // ─── Receivers ──────────────────────────────────────────────────────

    /// Type of the expression `node` is accessed on.
    ///
    /// For a chain head this is the variable's own type (`mixed` for
    /// anything that is not a variable).
    pub fn receiver_type(&self, node: NodeId) -> Result<PhpType> {
        let file = self.file;
        let operator = match skip_whitespace_backward(file, node) {
            Some(prev) if file.kind(prev).is_access_operator() => prev,
            _ => {
                if file.kind(node) == SyntaxKind::PhpVariable
                    && let Some(name) = variable_name(file, node)
                {
                    return self.resolve_variable_type(node, &name);
                }
                return Ok(PhpType::mixed());
            }
        };
        match self.preceding_expression(operator) {
            Some(receiver) => self.expression_type(receiver),
            None => Ok(PhpType::mixed()),
        }
    }

    /// The expression that ends right before `anchor`.
    ///
    /// A call's argument list is stepped over, so for `foo($x)->bar`
    /// anchored at `->` the result is the `foo` method node.  Returns the
    /// closing `)` itself when the call shape is not recognised.
    pub(crate) fn preceding_expression(&self, anchor: NodeId) -> Option<NodeId> {
        let file = self.file;
        let prev = skip_whitespace_backward(file, anchor)?;
        if file.kind(prev) != SyntaxKind::PhpRightBrace {
            return Some(prev);
        }
        let Some(mut before) = skip_whitespace_backward(file, prev) else {
            return Some(prev);
        };
        if file.kind(before) == SyntaxKind::PhpMethodArgs {
            match skip_whitespace_backward(file, before) {
                Some(open) => before = open,
                None => return Some(prev),
            }
        }
        if file.kind(before) == SyntaxKind::PhpLeftBrace {
            return skip_whitespace_backward(file, before).or(Some(prev));
        }
        Some(prev)
    }

    /// Value type of an expression node; `mixed` for anything that is not
    /// a variable, member, or class reference.
    pub(crate) fn expression_type(&self, node: NodeId) -> Result<PhpType> {
        match self.file.kind(node) {
            SyntaxKind::PhpVariable
            | SyntaxKind::PhpStaticVariable
            | SyntaxKind::PhpMethod
            | SyntaxKind::PhpProperty
            | SyntaxKind::PhpConstant
            | SyntaxKind::PhpClass => self.resolve_chained_type(node),
            _ => Ok(PhpType::mixed()),
        }
    }

    // ─── Links ──────────────────────────────────────────────────────────

    /// Value type of one link of a chain.
    ///
    /// - class reference: the class itself;
    /// - chain-head variable: its variable type;
    /// - function call: the host's declared return type;
    /// - anything accessed through `->` or `::`: the member's declared
    ///   type on the receiver's classes.
    ///
    /// Unknown receivers, members, or hints all give `mixed`.
    pub fn resolve_chained_type(&self, node: NodeId) -> Result<PhpType> {
        let file = self.file;
        match file.kind(node) {
            SyntaxKind::PhpClass => Ok(class_name(file, node)
                .map(|name| PhpType::from_class_name(&name, false))
                .unwrap_or_default()),
            SyntaxKind::PhpVariable if self.is_function_call(node) => {
                let Some(name) = variable_name(file, node) else {
                    return Ok(PhpType::mixed());
                };
                self.resolve_variable_type(node, &name)
            }
            SyntaxKind::PhpMethod => {
                let Some(name) = method_name(file, node) else {
                    return Ok(PhpType::mixed());
                };
                if self.is_function_call(node) {
                    return Ok(self
                        .config
                        .custom_function_return_type(name)
                        .unwrap_or_default());
                }
                let receiver = self.receiver_type(node)?;
                self.member_type(&receiver, name, MemberKind::Method)
            }
            SyntaxKind::PhpVariable
            | SyntaxKind::PhpStaticVariable
            | SyntaxKind::PhpProperty
            | SyntaxKind::PhpConstant => {
                let Some(name) = element_name(file, node) else {
                    return Ok(PhpType::mixed());
                };
                let name = normalize_php_variable(&name);
                let receiver = self.receiver_type(node)?;
                self.member_type(&receiver, &name, MemberKind::Field)
            }
            _ => Ok(PhpType::mixed()),
        }
    }

    /// Declared type of member `name` on the first of the receiver's
    /// classes that has it.
    fn member_type(&self, receiver: &PhpType, name: &str, kind: MemberKind) -> Result<PhpType> {
        let classes = receiver.resolve(self.index)?;
        if classes.is_empty() {
            tracing::debug!(
                file = self.file.name(),
                member = name,
                receiver = %receiver,
                "receiver resolves to no known class"
            );
            return Ok(PhpType::mixed());
        }
        for class in &classes {
            let declared = match kind {
                MemberKind::Method => class.find_method(name).map(|m| m.return_type.as_deref()),
                MemberKind::Field => class.find_field(name).map(|f| f.type_hint()),
            };
            if let Some(hint) = declared {
                // Fluent members return the declaring class.
                if hint.is_some_and(|h| {
                    let h = h.trim();
                    h.eq_ignore_ascii_case("self") || h.eq_ignore_ascii_case("static") || h == "$this"
                }) {
                    return Ok(PhpType::from_class_name(&class.name, false));
                }
                return Ok(PhpType::from_hint(hint));
            }
        }
        tracing::trace!(member = name, receiver = %receiver, "member not declared on receiver");
        Ok(PhpType::mixed())
    }
}
