//! YAML document loading

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::traits::DocumentLoader;
use crate::error::{LookupError, LookupResult};
use crate::types::ConfigValue;

/// Loads data documents with `serde_yaml`
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDocumentLoader;

impl YamlDocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse YAML text into a config tree
    ///
    /// Blank documents and documents holding only `null` yield `None`.
    pub fn parse(path: &Path, content: &str) -> LookupResult<Option<ConfigValue>> {
        if content.trim().is_empty() {
            return Ok(None);
        }

        let yaml: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| LookupError::document(path, format!("Failed to parse YAML: {}", e)))?;
        let value = ConfigValue::from_yaml(yaml).map_err(|e| LookupError::document(path, e))?;

        Ok(if value.is_null() { None } else { Some(value) })
    }
}

impl DocumentLoader for YamlDocumentLoader {
    fn load_document(&self, path: &Path) -> LookupResult<Option<ConfigValue>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LookupError::document(path, e.to_string())),
        };
        Self::parse(path, &content)
    }
}
