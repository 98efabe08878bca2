//! Static hierarchy source enumeration

use std::sync::Arc;

use super::traits::{SourceEnumerator, SourceRef};
use crate::interpolation::{PassthroughInterpolator, SharedInterpolator};
use crate::types::Scope;

/// Hierarchy used when none is configured
pub const DEFAULT_HIERARCHY: &[&str] = &["common"];

/// Enumerates sources from a configured hierarchy
///
/// Each entry is a template interpolated against the scope. Entries that
/// expand to an empty string, or to a path with an empty segment (leading
/// or trailing `/`, or `//`), are dropped: they mean a scope variable was
/// missing.
pub struct HierarchySources {
    hierarchy: Vec<String>,
    interpolator: SharedInterpolator,
}

impl HierarchySources {
    /// Create an enumerator for the given hierarchy entries
    pub fn new<I, S>(hierarchy: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hierarchy: hierarchy.into_iter().map(Into::into).collect(),
            interpolator: Arc::new(PassthroughInterpolator),
        }
    }

    /// Set the interpolator used to expand hierarchy entries
    pub fn with_interpolator(mut self, interpolator: SharedInterpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Get the configured (uninterpolated) hierarchy
    pub fn hierarchy(&self) -> &[String] {
        &self.hierarchy
    }
}

impl Default for HierarchySources {
    fn default() -> Self {
        Self::new(DEFAULT_HIERARCHY.iter().copied())
    }
}

fn is_usable_source(source: &str) -> bool {
    !(source.is_empty() || source.starts_with('/') || source.ends_with('/') || source.contains("//"))
}

impl SourceEnumerator for HierarchySources {
    fn enumerate_sources(&self, scope: &Scope, order_override: Option<&str>) -> Vec<SourceRef> {
        order_override
            .into_iter()
            .chain(self.hierarchy.iter().map(String::as_str))
            .map(|entry| self.interpolator.interpolate(entry, scope))
            .filter(|source| is_usable_source(source))
            .map(SourceRef::new)
            .collect()
    }
}

impl std::fmt::Debug for HierarchySources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchySources")
            .field("hierarchy", &self.hierarchy)
            .finish()
    }
}
