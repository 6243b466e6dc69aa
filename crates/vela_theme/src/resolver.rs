//! Theme resolution
//!
//! Flattens a [`ThemeSpec`] into a single field map for one set of conditions:
//!
//! 1. Collect the active tags: the known built-in conditions plus every
//!    override value.
//! 2. Walk entries in precedence order, keeping those whose tags are all active.
//! 3. Shallow-merge each kept entry over the result so far.
//!
//! Resolution is total. Entries that don't match are skipped, and override
//! values no entry mentions are inert.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::conditions::ConditionSet;
use crate::qualifier::{normalize_tag, Qualifier};
use crate::spec::{StyleValue, ThemeSpec};

/// Fully merged field map.
///
/// Field order is first-insertion order, so equal inputs also give equal ordering.
pub type FlatTheme = IndexMap<String, StyleValue>;

/// Caller-supplied named theme axes, e.g. `scheme = "dark"`.
///
/// The value is the tag; the name only identifies the axis.
pub type OverrideMap = BTreeMap<String, String>;

/// The set of tags an entry may require
#[derive(Clone, Debug, Default)]
pub struct ActiveQualifiers {
    tags: FxHashSet<String>,
}

impl ActiveQualifiers {
    pub fn new(conditions: &ConditionSet, overrides: &OverrideMap) -> Self {
        let tags = conditions
            .tags()
            .map(normalize_tag)
            .chain(overrides.values().map(|value| normalize_tag(value)))
            .filter(|tag| !tag.is_empty())
            .collect();
        Self { tags }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Every tag of `qualifier` is active (vacuously true when unqualified)
    pub fn matches(&self, qualifier: &Qualifier) -> bool {
        qualifier.tags().iter().all(|tag| self.contains(tag))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Resolve `spec` for the given conditions and overrides
pub fn resolve(
    spec: &ThemeSpec,
    conditions: &ConditionSet,
    overrides: &OverrideMap,
) -> FlatTheme {
    let active = ActiveQualifiers::new(conditions, overrides);
    let mut theme = FlatTheme::new();
    let mut applied = 0usize;

    for entry in spec.entries() {
        if !active.matches(entry.qualifier()) {
            continue;
        }
        for (name, value) in entry.values() {
            theme.insert(name.clone(), value.clone());
        }
        applied += 1;
    }

    tracing::trace!(
        active = active.len(),
        applied,
        fields = theme.len(),
        "resolved theme"
    );
    theme
}
