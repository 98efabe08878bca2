//! Data source collaborators
//!
//! A lookup consults three collaborators, each behind its own trait:
//! - `SourceEnumerator`: which sources to consult, in precedence order
//! - `DocumentLocator`: where a source's document lives
//! - `DocumentLoader`: how a document is parsed into a `ConfigValue`
//!
//! Built-in implementations: `HierarchySources`, `DatadirLocator`,
//! `YamlDocumentLoader`, and `MemoryDatastore` for tests.

mod traits;
mod hierarchy;
mod datadir;
mod yaml_loader;
mod memory;

pub use traits::{
    DocumentLoader, DocumentLocator, SourceEnumerator, SourceRef,
    SharedDocumentLoader, SharedDocumentLocator, SharedSourceEnumerator,
    EYAML_DOCUMENT_KIND,
};
pub use hierarchy::{HierarchySources, DEFAULT_HIERARCHY};
pub use datadir::{DatadirLocator, DEFAULT_DATADIR};
pub use yaml_loader::YamlDocumentLoader;
pub use memory::MemoryDatastore;
