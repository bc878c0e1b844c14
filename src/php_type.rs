//! The PHP type descriptor used by every inference query.
//!
//! A [`PhpType`] is either `mixed` (nothing known) or a union of type
//! names plus a nullability flag.  `null` itself is only the flag.  Names are kept the way they were
//! written minus the leading `\`, so `?\App\Model\Product` and
//! `App\Model\Product|null` produce equal values.
//!
//! String handling follows the docblock type helpers: unions are split
//! at depth 0 only (`array<int, A|B>` stays one member), generic
//! arguments are stripped before looking a class up, and scalars never
//! reach the symbol index.

use std::fmt;

use serde::Serialize;

use crate::errors::Result;
use crate::index::SymbolIndex;
use crate::types::ClassInfo;

/// Built-in and pseudo types that can never name a class.
const NON_CLASS_TYPES: &[&str] = &[
    "int", "integer", "float", "double", "string", "bool", "boolean", "void", "never", "null",
    "false", "true", "array", "list", "callable", "iterable", "resource", "object", "mixed",
    "self", "static", "parent", "scalar", "numeric",
];

/// Generic containers whose last type argument is the element type.
const ITERABLE_GENERICS: &[&str] = &["array", "list", "iterable", "non-empty-array", "non-empty-list"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PhpType {
    /// Union members in declaration order, never `null`.  Empty and not
    /// nullable means `mixed`; empty and nullable is plain `null`.
    types: Vec<String>,
    nullable: bool,
}

impl PhpType {
    /// The "unknown" sentinel.
    pub fn mixed() -> Self {
        Self {
            types: Vec::new(),
            nullable: false,
        }
    }

    /// A single-member type.  `mixed` or an empty name yields [`PhpType::mixed`].
    pub fn from_class_name(name: &str, nullable: bool) -> Self {
        let name = name.trim();
        let name = name.strip_prefix('\\').unwrap_or(name);
        if name.is_empty() || name.eq_ignore_ascii_case("mixed") {
            return Self::mixed();
        }
        if name.eq_ignore_ascii_case("null") {
            return Self {
                types: Vec::new(),
                nullable: true,
            };
        }
        Self {
            types: vec![name.to_string()],
            nullable,
        }
    }

    /// Parse a declared type such as `?Foo`, `Foo|null`, `int|string`,
    /// `\App\Foo[]` or `array<int, Foo>`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let (text, mut nullable) = match text.strip_prefix('?') {
            Some(rest) => (rest.trim_start(), true),
            None => (text, false),
        };

        let mut types: Vec<String> = Vec::new();
        for part in split_union(text) {
            let part = part.trim();
            let part = part.strip_prefix('\\').unwrap_or(part);
            if part.is_empty() {
                continue;
            }
            if part.eq_ignore_ascii_case("mixed") {
                return Self::mixed();
            }
            if part.eq_ignore_ascii_case("null") {
                nullable = true;
                continue;
            }
            if !types.iter().any(|t| t == part) {
                types.push(part.to_string());
            }
        }

        Self { types, nullable }
    }

    /// Type of a declaration whose hint may be absent.
    pub fn from_hint(hint: Option<&str>) -> Self {
        hint.map(Self::parse).unwrap_or_else(Self::mixed)
    }

    pub fn is_mixed(&self) -> bool {
        self.types.is_empty() && !self.nullable
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Union members as written (without leading `\` and without `null`).
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Union members that can name a class, with generic arguments
    /// stripped (`Collection<int, Foo>` gives `Collection`).
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().filter_map(|t| class_like_name(t))
    }

    /// Resolve the class-like members against the symbol index.
    ///
    /// Names the index does not know are simply absent from the result;
    /// a failing index is reported as an error.
    pub fn resolve(&self, index: &dyn SymbolIndex) -> Result<Vec<ClassInfo>> {
        let mut classes: Vec<ClassInfo> = Vec::new();
        for name in self.class_names() {
            for class in index.lookup_classes(name)? {
                if !classes.iter().any(|c| c.name.eq_ignore_ascii_case(&class.name)) {
                    classes.push(class);
                }
            }
        }
        Ok(classes)
    }

    /// The value type produced by iterating over this type.
    ///
    ///   - `Product[]`                 → `Product`
    ///   - `list<Product>`             → `Product`
    ///   - `array<int, Product>`       → `Product`
    ///   - `Collection<int, Product>`  → `Product` (any generic class)
    ///
    /// Members without element information are dropped; when none is
    /// left the result is `mixed`.
    pub fn element_type(&self) -> PhpType {
        let mut elements: Vec<String> = Vec::new();
        let mut nullable = false;
        for member in &self.types {
            let Some(element) = element_of(member) else {
                continue;
            };
            let parsed = PhpType::parse(element);
            if parsed.is_mixed() {
                continue;
            }
            nullable |= parsed.nullable;
            for t in parsed.types {
                if !elements.contains(&t) {
                    elements.push(t);
                }
            }
        }
        if elements.is_empty() {
            return PhpType::mixed();
        }
        PhpType {
            types: elements,
            nullable,
        }
    }
}

impl Default for PhpType {
    fn default() -> Self {
        Self::mixed()
    }
}

impl fmt::Display for PhpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mixed() {
            return f.write_str("mixed");
        }
        if self.types.is_empty() {
            return f.write_str("null");
        }
        f.write_str(&self.types.join("|"))?;
        if self.nullable {
            f.write_str("|null")?;
        }
        Ok(())
    }
}

/// Split a union at `|` characters that are not nested inside `<…>`,
/// `(…)`, `{…}` or `[…]`.
fn split_union(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '<' | '(' | '{' | '[' => depth += 1,
            '>' | ')' | '}' | ']' => depth -= 1,
            '|' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// The class a union member refers to, if any.
fn class_like_name(member: &str) -> Option<&str> {
    if member.ends_with("[]") {
        return None;
    }
    let base = match member.find('<') {
        Some(idx) => &member[..idx],
        None => member,
    };
    let base = base.trim();
    if base.is_empty()
        || !base
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '\\')
    {
        return None;
    }
    let lower = base.to_ascii_lowercase();
    if NON_CLASS_TYPES.contains(&lower.as_str()) {
        return None;
    }
    Some(base)
}

/// Element type text of an iterable union member.
fn element_of(member: &str) -> Option<&str> {
    if let Some(base) = member.strip_suffix("[]") {
        return Some(base);
    }
    let open = member.find('<')?;
    let inner = member.get(open + 1..)?.strip_suffix('>')?.trim();
    if inner.is_empty() {
        return None;
    }
    let container = member[..open].trim().to_ascii_lowercase();
    if NON_CLASS_TYPES.contains(&container.as_str())
        && !ITERABLE_GENERICS.contains(&container.as_str())
    {
        return None;
    }
    Some(last_generic_param(inner).trim())
}

/// Last comma-separated generic argument, respecting `<…>` nesting.
///
/// - `"User"`             → `"User"`
/// - `"int, User"`        → `"User"`
/// - `"int, list<User>"`  → `"list<User>"`
fn last_generic_param(s: &str) -> &str {
    let mut depth = 0i32;
    let mut last_comma = None;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => last_comma = Some(i),
            _ => {}
        }
    }
    match last_comma {
        Some(pos) => &s[pos + 1..],
        None => s,
    }
}
