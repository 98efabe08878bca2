//! Datadir-based document location

use std::path::PathBuf;
use std::sync::Arc;

use super::traits::{DocumentLocator, SourceRef};
use crate::interpolation::{PassthroughInterpolator, SharedInterpolator};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::types::Scope;

/// Data directory used when none is configured
#[cfg(unix)]
pub const DEFAULT_DATADIR: &str = "/var/lib/hiera";
#[cfg(windows)]
pub const DEFAULT_DATADIR: &str = "C:\\ProgramData\\PuppetLabs\\hiera\\var";

/// Locates `<datadir>/<source>.<extension>` on disk
///
/// The datadir is a template interpolated per scope. The extension defaults
/// to the requested document kind.
pub struct DatadirLocator {
    datadir: String,
    extension: Option<String>,
    interpolator: SharedInterpolator,
    logger: SharedLogger,
}

impl DatadirLocator {
    /// Create a locator rooted at a datadir template
    pub fn new(datadir: impl Into<String>) -> Self {
        Self {
            datadir: datadir.into(),
            extension: None,
            interpolator: Arc::new(PassthroughInterpolator),
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Use a fixed file extension instead of the document kind
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Set the interpolator used to expand the datadir template
    pub fn with_interpolator(mut self, interpolator: SharedInterpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Set the diagnostics sink
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Resolve the datadir for a scope
    pub fn datadir(&self, scope: &Scope) -> PathBuf {
        PathBuf::from(self.interpolator.interpolate(&self.datadir, scope))
    }

    /// Path a source's document would have, whether or not it exists
    pub fn document_path(&self, kind: &str, scope: &Scope, source: &SourceRef) -> PathBuf {
        let extension = self.extension.as_deref().unwrap_or(kind);
        self.datadir(scope)
            .join(format!("{}.{}", source.name(), extension))
    }
}

impl Default for DatadirLocator {
    fn default() -> Self {
        Self::new(DEFAULT_DATADIR)
    }
}

impl DocumentLocator for DatadirLocator {
    fn locate_document(&self, kind: &str, scope: &Scope, source: &SourceRef) -> Option<PathBuf> {
        let path = self.document_path(kind, scope, source);
        if !path.is_file() {
            crate::log_debug!(
                self.logger,
                "Cannot find datafile {}, skipping",
                path.display()
            );
            return None;
        }
        Some(path)
    }
}

impl std::fmt::Debug for DatadirLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatadirLocator")
            .field("datadir", &self.datadir)
            .field("extension", &self.extension)
            .finish()
    }
}
