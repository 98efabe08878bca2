//! In-memory data documents

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::traits::{DocumentLoader, DocumentLocator, SourceRef};
use crate::error::LookupResult;
use crate::types::{ConfigValue, Scope};

/// In-memory documents keyed by source name, for testing and embedding
///
/// Acts as both locator and loader: a source with a stored document locates
/// to a path equal to its name. Every load is recorded so callers can check
/// which documents a lookup actually read.
///
/// # Example
///
/// ```
/// use hieracrypt_core::sources::{DocumentLoader, DocumentLocator, MemoryDatastore, SourceRef};
/// use hieracrypt_core::types::{ConfigValue, Scope};
///
/// let store = MemoryDatastore::new();
/// store.insert("common", ConfigValue::mapping([("ntp", ConfigValue::from("pool.ntp.org"))]));
///
/// let path = store.locate_document("eyaml", &Scope::new(), &SourceRef::new("common")).unwrap();
/// assert!(store.load_document(&path).unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    documents: RwLock<HashMap<String, Option<ConfigValue>>>,
    loads: RwLock<Vec<PathBuf>>,
}

impl MemoryDatastore {
    /// Create a new empty datastore
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoned guards are recovered; a stored document never reads as absent
    fn documents(&self) -> RwLockReadGuard<'_, HashMap<String, Option<ConfigValue>>> {
        self.documents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn documents_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, Option<ConfigValue>>> {
        self.documents.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn loads_mut(&self) -> RwLockWriteGuard<'_, Vec<PathBuf>> {
        self.loads.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a document for a source
    pub fn insert(&self, source: impl Into<String>, document: ConfigValue) {
        self.documents_mut().insert(source.into(), Some(document));
    }

    /// Register a source whose document exists but is empty
    pub fn insert_empty(&self, source: impl Into<String>) {
        self.documents_mut().insert(source.into(), None);
    }

    /// Remove a source's document
    pub fn remove(&self, source: &str) {
        self.documents_mut().remove(source);
    }

    /// Paths loaded so far, in load order
    pub fn loaded_paths(&self) -> Vec<PathBuf> {
        self.loads.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether a source's document has been loaded
    pub fn was_loaded(&self, source: &str) -> bool {
        self.loaded_paths().iter().any(|p| p == Path::new(source))
    }

    /// Forget recorded loads
    pub fn clear_loads(&self) {
        self.loads_mut().clear();
    }
}

impl DocumentLocator for MemoryDatastore {
    fn locate_document(&self, _kind: &str, _scope: &Scope, source: &SourceRef) -> Option<PathBuf> {
        self.documents()
            .contains_key(source.name())
            .then(|| PathBuf::from(source.name()))
    }
}

impl DocumentLoader for MemoryDatastore {
    fn load_document(&self, path: &Path) -> LookupResult<Option<ConfigValue>> {
        self.loads_mut().push(path.to_path_buf());

        let key = path.to_string_lossy();
        Ok(self.documents().get(&*key).cloned().flatten())
    }
}
