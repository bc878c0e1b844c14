//! Host configuration: default variable types, custom functions, and the
//! tags and filters a project knows about.
//!
//! Inference consults configuration only through the [`HostConfig`]
//! trait, so hosts can back it with whatever settings store they have.
//! [`LatteSettings`] is the bundled implementation.  It is loaded in
//! layers (last wins):
//!
//! 1. Built-in defaults (core Latte tags and filters)
//! 2. Global settings from `<config dir>/phpantom/latte.toml`
//! 3. Project settings from `<root>/.latte.toml`
//! 4. The `extra.latte` object of `<root>/composer.json`
//!
//! Each layer only adds or overrides the entries it names.
//!
//! ```toml
//! tags = ["money"]
//! filters = ["price"]
//!
//! [variables]
//! basePath = "string"
//! user = "Nette\\Security\\User"
//!
//! [functions]
//! isLinkCurrent = "bool"
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};
use serde::Deserialize;

use crate::elements::{normalize_macro_modifier, normalize_php_variable};
use crate::errors::{Result, SettingsError};
use crate::php_type::PhpType;

/// Configuration lookups the inference engine needs from its host.
pub trait HostConfig {
    /// Type of a variable the host injects into every template
    /// (e.g. `$basePath`), keyed by name without `$`.
    fn default_variable_type(&self, name: &str) -> Option<PhpType>;

    /// Return type of a custom template function.
    fn custom_function_return_type(&self, name: &str) -> Option<PhpType>;

    /// Whether a tag name (e.g. `foreach`, `money`) is known.
    fn is_known_tag(&self, _name: &str) -> bool {
        false
    }

    /// Whether a filter name (e.g. `upper`) is known.
    fn is_known_filter(&self, _name: &str) -> bool {
        false
    }
}

const CORE_TAGS: &[&str] = &[
    "=", "_", "block", "breakIf", "capture", "case", "contentType", "continueIf", "debugbreak",
    "default", "define", "do", "dump", "else", "elseif", "elseifset", "embed", "extends", "first",
    "for", "foreach", "if", "ifchanged", "ifset", "import", "include", "iterateWhile", "l",
    "last", "layout", "parameters", "php", "r", "rollback", "sandbox", "sep", "skipIf",
    "snippet", "snippetArea", "spaceless", "switch", "syntax", "templatePrint", "templateType",
    "trace", "translate", "try", "var", "varPrint", "varType", "while",
];

const CORE_FILTERS: &[&str] = &[
    "batch", "breakLines", "bytes", "capitalize", "ceil", "checkUrl", "clamp", "dataStream",
    "date", "escapeUrl", "explode", "first", "firstUpper", "floor", "implode", "indent", "join",
    "last", "length", "lower", "noescape", "number", "padLeft", "padRight", "query", "random",
    "repeat", "replace", "replaceRE", "reverse", "round", "slice", "sort", "spaceless", "split",
    "strip", "stripHtml", "substr", "trim", "truncate", "upper", "webalize",
];

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LatteSettings {
    /// Variable name (without `$`) → declared type.
    pub variables: BTreeMap<String, String>,
    /// Function name → declared return type.
    pub functions: BTreeMap<String, String>,
    pub tags: BTreeSet<String>,
    pub filters: BTreeSet<String>,
}

impl Default for LatteSettings {
    fn default() -> Self {
        Self {
            variables: BTreeMap::new(),
            functions: BTreeMap::new(),
            tags: CORE_TAGS.iter().map(|t| t.to_string()).collect(),
            filters: CORE_FILTERS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Partial settings as found in one layer.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SettingsOverlay {
    variables: Option<HashMap<String, String>>,
    functions: Option<HashMap<String, String>>,
    tags: Option<Vec<String>>,
    filters: Option<Vec<String>>,
}

impl LatteSettings {
    /// Built-in defaults with one TOML layer applied.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let mut settings = Self::default();
        settings.apply(parse_toml(toml_str, "<string>")?);
        Ok(settings)
    }

    /// Load every layer for a project.  Missing files are skipped.
    pub fn load(project_root: Option<&Path>) -> Result<Self> {
        Self::load_with_global(global_settings_path().as_deref(), project_root)
    }

    /// [`LatteSettings::load`] with an explicit global settings file, or
    /// none at all.
    pub fn load_with_global(global: Option<&Path>, project_root: Option<&Path>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(global) = global {
            settings.apply_toml_file(global)?;
        }

        if let Some(root) = project_root {
            settings.apply_toml_file(&root.join(".latte.toml"))?;
            settings.apply_composer_json(root)?;
        }

        Ok(settings)
    }

    /// Apply a TOML settings file.  Returns `false` when it does not exist.
    pub fn apply_toml_file(&mut self, path: &Path) -> Result<bool> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                }
                .into());
            }
        };
        let overlay = parse_toml(&content, &path.display().to_string())?;
        self.apply(overlay);
        tracing::debug!(path = %path.display(), "applied latte settings file");
        Ok(true)
    }

    /// Apply the `extra.latte` object of `<root>/composer.json`.
    ///
    /// Returns `false` when there is no composer.json or it has no
    /// `extra.latte` section.
    pub fn apply_composer_json(&mut self, root: &Path) -> Result<bool> {
        let path = root.join("composer.json");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(source) => return Err(SettingsError::Io { path, source }.into()),
        };

        let json: serde_json::Value =
            serde_json::from_str(&content).map_err(SettingsError::from)?;
        let Some(section) = json.get("extra").and_then(|extra| extra.get("latte")) else {
            return Ok(false);
        };

        let overlay: SettingsOverlay =
            serde_json::from_value(section.clone()).map_err(SettingsError::from)?;
        self.apply(overlay);
        tracing::debug!(path = %path.display(), "applied composer.json latte settings");
        Ok(true)
    }

    fn apply(&mut self, overlay: SettingsOverlay) {
        if let Some(variables) = overlay.variables {
            for (name, ty) in variables {
                self.variables.insert(normalize_php_variable(&name), ty);
            }
        }
        if let Some(functions) = overlay.functions {
            self.functions.extend(functions);
        }
        if let Some(tags) = overlay.tags {
            self.tags.extend(tags);
        }
        if let Some(filters) = overlay.filters {
            self.filters
                .extend(filters.iter().map(|f| normalize_macro_modifier(f)));
        }
    }

    /// Declare a default variable type.
    pub fn with_variable(mut self, name: &str, ty: &str) -> Self {
        self.variables
            .insert(normalize_php_variable(name), ty.to_string());
        self
    }

    /// Declare a custom function and its return type.
    pub fn with_function(mut self, name: &str, return_type: &str) -> Self {
        self.functions
            .insert(name.to_string(), return_type.to_string());
        self
    }
}

impl HostConfig for LatteSettings {
    fn default_variable_type(&self, name: &str) -> Option<PhpType> {
        self.variables
            .get(&normalize_php_variable(name))
            .map(|ty| PhpType::parse(ty))
    }

    fn custom_function_return_type(&self, name: &str) -> Option<PhpType> {
        self.functions.get(name).map(|ty| PhpType::parse(ty))
    }

    fn is_known_tag(&self, name: &str) -> bool {
        self.tags.contains(name)
    }

    fn is_known_filter(&self, name: &str) -> bool {
        self.filters.contains(&normalize_macro_modifier(name))
    }
}

/// `<config dir>/phpantom/latte.toml`, when a home directory exists.
pub fn global_settings_path() -> Option<PathBuf> {
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("phpantom").join("latte.toml"))
}

fn parse_toml(content: &str, origin: &str) -> Result<SettingsOverlay> {
    toml::from_str(content).map_err(|source| {
        SettingsError::Toml {
            origin: origin.to_string(),
            source,
        }
        .into()
    })
}
