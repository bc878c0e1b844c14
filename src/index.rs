//! The external PHP symbol index.
//!
//! The analysis treats class lookup as a black-box capability:
//! [`SymbolIndex::lookup_classes`] maps a fully-qualified class name to
//! the declarations the host knows about.  Two implementations ship with
//! the crate:
//!
//! - [`InMemoryIndex`]: a fixed map of [`ClassInfo`]s, for hosts that
//!   already hold their classes in memory and for tests.
//! - [`CachedIndex`]: wraps any index and memoizes successful lookups.
//!   The core never caches on its own; callers opt in by wrapping.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::errors::{IndexError, LatteError, Result};
use crate::types::ClassInfo;

/// Read-only class lookup provided by the host.
pub trait SymbolIndex {
    /// All classes declared under `name`.
    ///
    /// `name` is fully qualified and never carries a leading `\`.  An
    /// unknown class is an empty vector, not an error.
    fn lookup_classes(&self, name: &str) -> std::result::Result<Vec<ClassInfo>, IndexError>;
}

/// Class names are case-insensitive in PHP.
fn index_key(name: &str) -> String {
    name.strip_prefix('\\').unwrap_or(name).to_ascii_lowercase()
}

/// A fixed set of classes keyed by fully-qualified name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    classes: HashMap<String, Vec<ClassInfo>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class.  Adding a second class under the same name keeps
    /// both (duplicate declarations across files are legal in PHP
    /// projects).
    pub fn add_class(&mut self, class: ClassInfo) {
        self.classes
            .entry(index_key(&class.name))
            .or_default()
            .push(class);
    }

    /// Build an index from a JSON array of classes.
    ///
    /// ```json
    /// [{ "name": "App\\Model\\Product",
    ///    "properties": [{ "name": "title", "type_hint": "string" }] }]
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let classes: Vec<ClassInfo> = serde_json::from_str(json).map_err(LatteError::IndexJson)?;
        let mut index = Self::new();
        for class in classes {
            index.add_class(class);
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl SymbolIndex for InMemoryIndex {
    fn lookup_classes(&self, name: &str) -> std::result::Result<Vec<ClassInfo>, IndexError> {
        Ok(self
            .classes
            .get(&index_key(name))
            .cloned()
            .unwrap_or_default())
    }
}

/// Memoizing wrapper around another index.
///
/// Successful lookups (including "not found") are cached per name;
/// failures are passed through and retried on the next call.
pub struct CachedIndex<I> {
    inner: I,
    cache: Mutex<HashMap<String, Vec<ClassInfo>>>,
}

impl<I: SymbolIndex> CachedIndex<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every cached entry, e.g. after the host re-indexed files.
    pub fn invalidate(&self) {
        self.cache.lock().clear();
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: SymbolIndex> SymbolIndex for CachedIndex<I> {
    fn lookup_classes(&self, name: &str) -> std::result::Result<Vec<ClassInfo>, IndexError> {
        let key = index_key(name);
        if let Some(hit) = self.cache.lock().get(&key) {
            return Ok(hit.clone());
        }
        // The lock is released while the inner index runs.
        let classes = self.inner.lookup_classes(name)?;
        self.cache.lock().insert(key, classes.clone());
        Ok(classes)
    }
}
