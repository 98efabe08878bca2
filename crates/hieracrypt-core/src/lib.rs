//! hieracrypt Core
//!
//! Encrypted-value lookup backend for hierarchical configuration data.
//! Answers "what is the value of key K", consulting every configured data
//! source in priority order and transparently decrypting `ENC[...]` values
//! anywhere inside the answer.
//!
//! ## Lookup
//!
//! ```rust,ignore
//! use hieracrypt_core::{LookupEngine, ResolutionStrategy, Scope};
//!
//! let engine = LookupEngine::from_config(&config, interpolator, logger);
//! let scope = Scope::new().with_var("environment", "production");
//!
//! // First source holding the key wins
//! let password = engine.lookup("db::password", &scope, None, ResolutionStrategy::Priority)?;
//!
//! // One element per source, highest priority first
//! let servers = engine.lookup("ntp_servers", &scope, None, ResolutionStrategy::ArrayMerge)?;
//! ```
//!
//! Collaborators (source enumeration, document location and loading,
//! interpolation, diagnostics) are traits with default implementations, so
//! hosts can swap in their own.

pub mod types;
pub mod error;
pub mod logging;
pub mod interpolation;
pub mod crypto;
pub mod sources;
pub mod config;
pub mod resolver;

// Re-export commonly used types
pub use types::{ConfigMap, ConfigValue, ResolutionStrategy, Scope};

pub use error::{LookupError, LookupResult};

pub use logging::{Logger, NoOpLogger, ConsoleLogger, MemoryLogger};

pub use interpolation::{Interpolator, PassthroughInterpolator};

pub use crypto::{Decryptor, KeyPaths, Pkcs7Decryptor};

pub use sources::{
    DocumentLoader, DocumentLocator, SourceEnumerator, SourceRef,
    DatadirLocator, HierarchySources, MemoryDatastore, YamlDocumentLoader,
};

pub use config::{ConfigError, ConfigFileLoader, HieraConfigFile};

pub use resolver::{AnswerResolver, LookupEngine};
