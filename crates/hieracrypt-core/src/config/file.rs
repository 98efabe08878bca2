//! File-based backend configuration (YAML)
//!
//! Reads the resolver host's configuration file: the hierarchy, the enabled
//! backends and the `eyaml` section. Hiera writes top-level keys with a
//! leading colon (`:hierarchy:`); both spellings are accepted.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use super::error::{ConfigResult, ConfigError};
use crate::crypto::KeyPaths;

/// System-wide configuration file
#[cfg(unix)]
pub const SYSTEM_CONFIG_PATH: &str = "/etc/hiera.yaml";
#[cfg(windows)]
pub const SYSTEM_CONFIG_PATH: &str = "C:\\ProgramData\\PuppetLabs\\hiera\\etc\\hiera.yaml";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HieraConfigFile {
    /// Enabled backends, in order
    #[serde(default, alias = ":backends", deserialize_with = "string_or_list")]
    pub backends: Vec<String>,

    /// Hierarchy entries, highest priority first
    #[serde(default, alias = ":hierarchy", deserialize_with = "string_or_list")]
    pub hierarchy: Vec<String>,

    /// Settings for this backend
    #[serde(default, alias = ":eyaml")]
    pub eyaml: EyamlSettings,
}

/// The `eyaml` section of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EyamlSettings {
    /// Directory holding one document per hierarchy source
    #[serde(default, alias = ":datadir", skip_serializing_if = "Option::is_none")]
    pub datadir: Option<String>,

    /// Document file extension (defaults to `eyaml`)
    #[serde(default, alias = ":extension", skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// PEM RSA private key path template
    #[serde(default, alias = ":private_key", skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    /// PEM X.509 certificate path template
    #[serde(default, alias = ":public_key", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl EyamlSettings {
    /// Key path templates from this section
    pub fn key_paths(&self) -> KeyPaths {
        KeyPaths {
            private_key: self.private_key.clone(),
            public_key: self.public_key.clone(),
        }
    }
}

impl HieraConfigFile {
    /// Parse configuration from YAML text
    ///
    /// A blank document yields the defaults.
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Whether a backend is listed in `backends`
    pub fn has_backend(&self, name: &str) -> bool {
        self.backends
            .iter()
            .any(|b| b.trim_start_matches(':').eq_ignore_ascii_case(name))
    }

    /// Serialize to YAML
    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Config level (where the file was found)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// System config (/etc/hiera.yaml)
    System,
    /// User-level config (~/.config/hieracrypt/hiera.yaml)
    User,
    /// Explicitly supplied path
    Explicit,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::System => "system",
            ConfigLevel::User => "user",
            ConfigLevel::Explicit => "explicit",
        }
    }
}

/// Reads a `HieraConfigFile` from disk
///
/// # Example
///
/// ```no_run
/// use hieracrypt_core::config::ConfigFileLoader;
///
/// // User-level config, falling back to the system file
/// let config = ConfigFileLoader::discover().load().unwrap();
///
/// // Explicit path
/// let config = ConfigFileLoader::explicit("/etc/puppetlabs/puppet/hiera.yaml").load().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigFileLoader {
    path: PathBuf,
    level: ConfigLevel,
}

impl ConfigFileLoader {
    /// Create a loader for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
        }
    }

    /// Loader for an explicitly supplied path
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ConfigLevel::Explicit)
    }

    /// Loader for the system configuration file
    pub fn system() -> Self {
        Self::new(SYSTEM_CONFIG_PATH, ConfigLevel::System)
    }

    /// Loader for the user configuration file (~/.config/hieracrypt/hiera.yaml)
    pub fn user() -> Self {
        // Use XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        let path = config_dir.join("hieracrypt").join("hiera.yaml");
        Self::new(path, ConfigLevel::User)
    }

    /// User config if present, otherwise the system config
    pub fn discover() -> Self {
        let user = Self::user();
        if user.exists() {
            user
        } else {
            Self::system()
        }
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the config level
    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load config from file
    ///
    /// A missing file yields the defaults. The file is read on every call.
    pub fn load(&self) -> ConfigResult<HieraConfigFile> {
        if !self.path.exists() {
            return Ok(HieraConfigFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        HieraConfigFile::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::Yaml(err) => ConfigError::Other(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                err
            )),
            other => other,
        })
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}
