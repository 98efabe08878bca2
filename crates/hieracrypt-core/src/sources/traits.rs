//! Collaborator traits for finding and loading data documents

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LookupResult;
use crate::types::{ConfigValue, Scope};

/// Document kind requested by this backend
pub const EYAML_DOCUMENT_KIND: &str = "eyaml";

/// One entry of the lookup hierarchy, already interpolated
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Yields data sources in precedence order (first = highest priority)
pub trait SourceEnumerator: Send + Sync {
    /// Sources to consult for a lookup
    ///
    /// `order_override`, when present, is consulted before every other source.
    fn enumerate_sources(&self, scope: &Scope, order_override: Option<&str>) -> Vec<SourceRef>;
}

/// Maps a source to the document that holds its data
pub trait DocumentLocator: Send + Sync {
    /// Path of the document for `source`, or `None` when it has no document
    fn locate_document(&self, kind: &str, scope: &Scope, source: &SourceRef) -> Option<PathBuf>;
}

/// Loads and parses a data document
pub trait DocumentLoader: Send + Sync {
    /// Parse the document at `path`
    ///
    /// Returns `Ok(None)` for a missing or empty document. A document that
    /// exists but cannot be read or parsed is `DocumentUnreadable`.
    fn load_document(&self, path: &Path) -> LookupResult<Option<ConfigValue>>;
}

pub type SharedSourceEnumerator = Arc<dyn SourceEnumerator>;
pub type SharedDocumentLocator = Arc<dyn DocumentLocator>;
pub type SharedDocumentLoader = Arc<dyn DocumentLoader>;
