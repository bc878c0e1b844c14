//! Data types shared by the symbol index and the inference passes.
//!
//! These are the "model" structs the external PHP symbol index hands
//! back (classes, methods, properties, constants) together with the
//! access-kind classification of member nodes inside a template.

use serde::{Deserialize, Serialize};

/// Visibility of a class member (method, property, or constant).
///
/// In PHP, members without an explicit visibility modifier default to `Public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A method declared on a PHP class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    /// The method name (e.g. "getCategory").
    pub name: String,
    /// Optional return type hint string (e.g. "void", "string", "?Category").
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

/// A property declared on a PHP class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    /// The property name WITHOUT the `$` prefix (e.g. "name", "price").
    /// This matches PHP access syntax: `$product->name` not `$product->$name`.
    pub name: String,
    /// Optional type hint string (e.g. "string", "?Category", "Tag[]").
    #[serde(default)]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

/// A class constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantInfo {
    /// The constant name (e.g. "STATUS_ACTIVE").
    pub name: String,
    /// Optional type hint string (e.g. "string", "int").
    #[serde(default)]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

/// A class-like declaration known to the symbol index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Fully-qualified name without the leading `\` (e.g. "App\\Model\\Product").
    pub name: String,
    #[serde(default)]
    pub methods: Vec<MethodInfo>,
    #[serde(default)]
    pub properties: Vec<PropertyInfo>,
    #[serde(default)]
    pub constants: Vec<ConstantInfo>,
}

/// A property or a constant: the two member kinds reachable without a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Property(&'a PropertyInfo),
    Constant(&'a ConstantInfo),
}

impl<'a> FieldRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            FieldRef::Property(p) => &p.name,
            FieldRef::Constant(c) => &c.name,
        }
    }

    pub fn type_hint(&self) -> Option<&'a str> {
        match self {
            FieldRef::Property(p) => p.type_hint.as_deref(),
            FieldRef::Constant(c) => c.type_hint.as_deref(),
        }
    }
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            properties: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Short (unqualified) class name, e.g. "Product" for "App\\Model\\Product".
    pub fn short_name(&self) -> &str {
        self.name.rsplit('\\').next().unwrap_or(&self.name)
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// The property that backs the template variable `$name` when this
    /// class is a `{templateType}`: public instance properties only.
    pub fn find_template_variable(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties
            .iter()
            .find(|p| p.name == name && !p.is_static && p.visibility == Visibility::Public)
    }

    /// Look up a field by name; properties are checked before constants.
    pub fn find_field(&self, name: &str) -> Option<FieldRef<'_>> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(FieldRef::Property)
            .or_else(|| {
                self.constants
                    .iter()
                    .find(|c| c.name == name)
                    .map(FieldRef::Constant)
            })
    }
}

/// Describes the access operator in front of a member node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Instance access after `->`.
    Arrow,
    /// Static access after `::`.
    DoubleColon,
    /// No access operator: the node heads its chain (a variable, a class
    /// name, or a plain function call).
    Other,
}
