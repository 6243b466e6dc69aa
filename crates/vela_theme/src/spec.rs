//! Theme specifications
//!
//! A [`ThemeSpec`] is an ordered list of qualified entries. Declaration order
//! is precedence order: when two matching entries set the same field, the
//! later one wins.
//!
//! Specs are built in code or loaded from TOML:
//!
//! ```toml
//! name = "example"
//!
//! [[entry]]
//! key = "base"
//! values = { background = "white", gutter = 16 }
//!
//! [[entry]]
//! key = "sw600-land"
//! values = { gutter = 32 }
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::conditions::ConditionSet;
use crate::error::{Result, ThemeError};
use crate::qualifier::Qualifier;
use crate::resolver::{resolve, FlatTheme, OverrideMap};

/// A concrete style value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<StyleValue>),
    /// Nested group (e.g. a palette). Merged as a single value, never field by field.
    Table(IndexMap<String, StyleValue>),
}

impl StyleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&IndexMap<String, StyleValue>> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// The fields one entry contributes
pub type StyleFragment = IndexMap<String, StyleValue>;

/// Build a [`StyleFragment`] from `(name, value)` pairs
pub fn fragment<K, V, I>(pairs: I) -> StyleFragment
where
    K: Into<String>,
    V: Into<StyleValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// One qualified entry of a spec
#[derive(Clone, Debug, PartialEq)]
pub struct SpecEntry {
    qualifier: Qualifier,
    values: StyleFragment,
}

impl SpecEntry {
    pub fn new(key: &str, values: StyleFragment) -> Self {
        Self {
            qualifier: Qualifier::parse(key),
            values,
        }
    }

    pub fn key(&self) -> &str {
        self.qualifier.key()
    }

    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }

    pub fn values(&self) -> &StyleFragment {
        &self.values
    }
}

#[derive(Deserialize)]
struct RawSpec {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "entry")]
    entries: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    key: String,
    #[serde(default)]
    values: StyleFragment,
}

/// Ordered collection of qualified entries
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemeSpec {
    name: Option<String>,
    entries: Vec<SpecEntry>,
}

impl ThemeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name given in the TOML source, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append an entry; it takes precedence over every entry before it
    pub fn with_entry(mut self, key: &str, values: StyleFragment) -> Self {
        self.push(key, values);
        self
    }

    pub fn push(&mut self, key: &str, values: StyleFragment) {
        self.entries.push(SpecEntry::new(key, values));
    }

    /// Entries in precedence order
    pub fn entries(&self) -> &[SpecEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct entry keys in precedence order (first appearance wins the slot)
    pub fn ordered_keys(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.entries
            .iter()
            .map(SpecEntry::key)
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// Every breakpoint tag of every entry key, in precedence order
    pub fn breakpoints(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries
            .iter()
            .flat_map(|entry| entry.qualifier().breakpoints())
    }

    /// Resolve this spec against `conditions` and `overrides`
    pub fn resolve(&self, conditions: &ConditionSet, overrides: &OverrideMap) -> FlatTheme {
        resolve(self, conditions, overrides)
    }

    /// Parse a spec from TOML source
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let raw: RawSpec = toml::from_str(src)?;
        let mut spec = Self {
            name: raw.name,
            entries: Vec::with_capacity(raw.entries.len()),
        };
        for entry in raw.entries {
            spec.push(&entry.key, entry.values);
        }
        tracing::debug!(name = ?spec.name, entries = spec.len(), "parsed theme spec");
        Ok(spec)
    }

    /// Load a spec from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }
}
