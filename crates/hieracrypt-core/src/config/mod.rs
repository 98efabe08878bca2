//! Backend configuration
//!
//! - `HieraConfigFile`: the hierarchy, backends and `eyaml` section
//! - `ConfigFileLoader`: reads it from the system, user or an explicit path

mod error;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use file::{ConfigFileLoader, ConfigLevel, EyamlSettings, HieraConfigFile, SYSTEM_CONFIG_PATH};
