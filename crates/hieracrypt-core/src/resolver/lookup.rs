//! Hierarchical lookup across data sources
//!
//! Sources are consulted in the order the enumerator yields them (first =
//! highest priority). Each source's value for the key is resolved, then
//! combined into the running answer according to the requested strategy:
//!
//! - `Priority`: first source holding the key wins; iteration stops
//! - `ArrayMerge`: each source contributes one element, in source order
//! - `HashMerge`: keys from earlier sources win; later sources only add
//!   keys not seen yet

use std::sync::Arc;

use super::answer::AnswerResolver;
use crate::config::HieraConfigFile;
use crate::crypto::Pkcs7Decryptor;
use crate::error::{LookupError, LookupResult};
use crate::interpolation::SharedInterpolator;
use crate::logging::{NoOpLogger, SharedLogger};
use crate::sources::{
    DatadirLocator, HierarchySources, SharedDocumentLoader, SharedDocumentLocator,
    SharedSourceEnumerator, YamlDocumentLoader, EYAML_DOCUMENT_KIND,
};
use crate::types::{ConfigMap, ConfigValue, ResolutionStrategy, Scope};

const LOG_PREFIX: &str = "[eyaml_backend]:";

/// Running answer of a lookup
#[derive(Debug)]
enum Answer {
    Absent,
    Value(ConfigValue),
    Array(Vec<ConfigValue>),
    Hash(ConfigMap),
}

impl Answer {
    fn into_value(self) -> Option<ConfigValue> {
        match self {
            Answer::Absent => None,
            Answer::Value(value) => Some(value),
            Answer::Array(items) => Some(ConfigValue::Sequence(items)),
            Answer::Hash(map) => Some(ConfigValue::Mapping(map)),
        }
    }
}

/// The lookup backend
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use hieracrypt_core::config::ConfigFileLoader;
/// use hieracrypt_core::interpolation::PassthroughInterpolator;
/// use hieracrypt_core::logging::ConsoleLogger;
/// use hieracrypt_core::resolver::LookupEngine;
/// use hieracrypt_core::types::{ResolutionStrategy, Scope};
///
/// let config = ConfigFileLoader::discover().load().unwrap();
/// let engine = LookupEngine::from_config(
///     &config,
///     Arc::new(PassthroughInterpolator),
///     Arc::new(ConsoleLogger::new()),
/// );
///
/// let scope = Scope::new().with_var("environment", "production");
/// let password = engine
///     .lookup("db::password", &scope, None, ResolutionStrategy::Priority)
///     .unwrap();
/// ```
pub struct LookupEngine {
    sources: SharedSourceEnumerator,
    locator: SharedDocumentLocator,
    loader: SharedDocumentLoader,
    resolver: AnswerResolver,
    logger: SharedLogger,
}

impl LookupEngine {
    /// Create an engine from its collaborators
    pub fn new(
        sources: SharedSourceEnumerator,
        locator: SharedDocumentLocator,
        loader: SharedDocumentLoader,
        resolver: AnswerResolver,
    ) -> Self {
        Self {
            sources,
            locator,
            loader,
            resolver,
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Set the diagnostics sink
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Build an engine with the default collaborators from a config file
    ///
    /// Uses the configured hierarchy (default `common`), a datadir locator
    /// for the `eyaml` section's datadir and extension, the YAML loader, and
    /// PKCS7 decryption with the configured key paths.
    pub fn from_config(
        config: &HieraConfigFile,
        interpolator: SharedInterpolator,
        logger: SharedLogger,
    ) -> Self {
        let sources = if config.hierarchy.is_empty() {
            HierarchySources::default()
        } else {
            HierarchySources::new(config.hierarchy.iter().cloned())
        };
        let sources = sources.with_interpolator(interpolator.clone());

        let locator = match &config.eyaml.datadir {
            Some(datadir) => DatadirLocator::new(datadir.clone()),
            None => DatadirLocator::default(),
        };
        let mut locator = locator
            .with_interpolator(interpolator.clone())
            .with_logger(logger.clone());
        if let Some(extension) = &config.eyaml.extension {
            locator = locator.with_extension(extension.clone());
        }

        let decryptor = Pkcs7Decryptor::new(config.eyaml.key_paths())
            .with_interpolator(interpolator.clone())
            .with_logger(logger.clone());

        Self::new(
            Arc::new(sources),
            Arc::new(locator),
            Arc::new(YamlDocumentLoader::new()),
            AnswerResolver::new(interpolator, Arc::new(decryptor)),
        )
        .with_logger(logger)
    }

    /// Get the answer resolver
    pub fn resolver(&self) -> &AnswerResolver {
        &self.resolver
    }

    /// Look up `key` across all sources
    ///
    /// Returns `Ok(None)` when no source holds the key. A key bound to an
    /// explicit null is found: under `Priority` it yields `Ok(Some(Null))`
    /// and stops the walk. Missing or empty documents are skipped. Any error aborts the whole lookup; no partial
    /// answer is returned.
    pub fn lookup(
        &self,
        key: &str,
        scope: &Scope,
        order_override: Option<&str>,
        strategy: ResolutionStrategy,
    ) -> LookupResult<Option<ConfigValue>> {
        self.debug(&format!("Lookup called for key {}", key));
        let mut answer = Answer::Absent;

        for source in self.sources.enumerate_sources(scope, order_override) {
            let Some(path) = self.locator.locate_document(EYAML_DOCUMENT_KIND, scope, &source) else {
                continue;
            };

            self.debug(&format!("Processing datasource: {}", path.display()));

            let data = match self.loader.load_document(&path)? {
                Some(ConfigValue::Mapping(data)) if !data.is_empty() => data,
                Some(ConfigValue::Mapping(_)) | None => continue,
                Some(other) => {
                    self.warn(&format!(
                        "Skipping datasource {}: expected a Hash document, found {}",
                        path.display(),
                        other.shape_name()
                    ));
                    continue;
                }
            };
            self.debug("Data contains valid YAML");

            let Some(raw) = data.get(key) else {
                continue;
            };
            self.debug(&format!("Key {} found in YAML document", key));

            let parsed = self.resolver.resolve(raw, scope)?;

            match strategy {
                ResolutionStrategy::ArrayMerge => {
                    self.debug("Appending answer array");
                    answer = append_to_array(answer, parsed)?;
                }
                ResolutionStrategy::HashMerge => {
                    self.debug("Merging answer hash");
                    answer = merge_into_hash(answer, parsed)?;
                }
                ResolutionStrategy::Priority => {
                    self.debug("Assigning answer variable");
                    answer = Answer::Value(parsed);
                    break;
                }
            }
        }

        Ok(answer.into_value())
    }

    fn debug(&self, message: &str) {
        crate::log_debug!(self.logger, "{} {}", LOG_PREFIX, message);
    }

    fn warn(&self, message: &str) {
        crate::log_warn!(self.logger, "{} {}", LOG_PREFIX, message);
    }
}

fn append_to_array(answer: Answer, parsed: ConfigValue) -> LookupResult<Answer> {
    if !matches!(parsed, ConfigValue::Sequence(_) | ConfigValue::String(_)) {
        return Err(LookupError::TypeMismatch(format!(
            "expected Array-compatible value, found {}",
            parsed.shape_name()
        )));
    }

    let mut items = match answer {
        Answer::Array(items) => items,
        _ => Vec::new(),
    };
    items.push(parsed);
    Ok(Answer::Array(items))
}

fn merge_into_hash(answer: Answer, parsed: ConfigValue) -> LookupResult<Answer> {
    let incoming = match parsed {
        ConfigValue::Mapping(map) => map,
        other => {
            return Err(LookupError::TypeMismatch(format!(
                "expected Hash, found {}",
                other.shape_name()
            )))
        }
    };

    let mut merged = match answer {
        Answer::Hash(map) => map,
        _ => ConfigMap::new(),
    };
    // Keys already in the answer came from higher-priority sources
    for (key, value) in incoming {
        merged.entry(key).or_insert(value);
    }
    Ok(Answer::Hash(merged))
}

impl std::fmt::Debug for LookupEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupEngine")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::test_support::TestKeys;
    use crate::crypto::KeyPaths;
    use crate::interpolation::PassthroughInterpolator;
    use crate::logging::{LogLevel, MemoryLogger};
    use crate::sources::MemoryDatastore;
    use std::fs;

    struct Fixture {
        store: Arc<MemoryDatastore>,
        engine: LookupEngine,
        logger: Arc<MemoryLogger>,
    }

    fn fixture(hierarchy: &[&str], key_paths: KeyPaths) -> Fixture {
        let store = Arc::new(MemoryDatastore::new());
        let logger = Arc::new(MemoryLogger::new());
        let resolver = AnswerResolver::new(
            Arc::new(PassthroughInterpolator),
            Arc::new(Pkcs7Decryptor::new(key_paths)),
        );
        let engine = LookupEngine::new(
            Arc::new(HierarchySources::new(hierarchy.iter().copied())),
            store.clone(),
            store.clone(),
            resolver,
        )
        .with_logger(logger.clone());

        Fixture { store, engine, logger }
    }

    fn doc(key: &str, value: ConfigValue) -> ConfigValue {
        ConfigValue::mapping([(key, value)])
    }

    #[test]
    fn test_priority_first_source_wins_and_stops() {
        let f = fixture(&["a", "b"], KeyPaths::new());
        f.store.insert("a", doc("k", ConfigValue::from("from a")));
        f.store.insert("b", doc("k", ConfigValue::from("from b")));

        let answer = f
            .engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::Priority)
            .unwrap();
        assert_eq!(answer, Some(ConfigValue::from("from a")));
        assert!(f.store.was_loaded("a"));
        assert!(!f.store.was_loaded("b"));
    }

    #[test]
    fn test_priority_skips_sources_without_key() {
        let f = fixture(&["a", "b", "c"], KeyPaths::new());
        f.store.insert_empty("a");
        f.store.insert("b", doc("other", ConfigValue::from("x")));
        f.store.insert("c", doc("k", ConfigValue::Integer(3)));

        let answer = f
            .engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::Priority)
            .unwrap();
        assert_eq!(answer, Some(ConfigValue::Integer(3)));
    }

    #[test]
    fn test_priority_explicit_null_is_an_answer() {
        let f = fixture(&["a", "b"], KeyPaths::new());
        f.store.insert("a", doc("k", ConfigValue::Null));
        f.store.insert("b", doc("k", ConfigValue::from("from b")));

        let answer = f
            .engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::Priority)
            .unwrap();
        assert_eq!(answer, Some(ConfigValue::Null));
        assert!(!f.store.was_loaded("b"));
    }

    #[test]
    fn test_order_override_is_consulted_first() {
        let f = fixture(&["a"], KeyPaths::new());
        f.store.insert("a", doc("k", ConfigValue::from("from a")));
        f.store.insert("override", doc("k", ConfigValue::from("from override")));

        let answer = f
            .engine
            .lookup("k", &Scope::new(), Some("override"), ResolutionStrategy::Priority)
            .unwrap();
        assert_eq!(answer, Some(ConfigValue::from("from override")));
    }

    #[test]
    fn test_missing_key_everywhere_is_none() {
        let f = fixture(&["a", "missing-doc"], KeyPaths::new());
        f.store.insert("a", doc("other", ConfigValue::from("x")));

        for strategy in [
            ResolutionStrategy::Priority,
            ResolutionStrategy::ArrayMerge,
            ResolutionStrategy::HashMerge,
        ] {
            assert_eq!(f.engine.lookup("k", &Scope::new(), None, strategy).unwrap(), None);
        }
    }

    #[test]
    fn test_array_merge_in_source_order() {
        let f = fixture(&["a", "b", "c"], KeyPaths::new());
        f.store.insert("a", doc("k", ConfigValue::from("va")));
        f.store.insert("c", doc("k", ConfigValue::Sequence(vec![ConfigValue::from("vc1"), ConfigValue::from("vc2")])));
        f.store.insert("b", doc("k", ConfigValue::from("vb")));

        let answer = f
            .engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::ArrayMerge)
            .unwrap();
        assert_eq!(
            answer,
            Some(ConfigValue::Sequence(vec![
                ConfigValue::from("va"),
                ConfigValue::from("vb"),
                ConfigValue::Sequence(vec![ConfigValue::from("vc1"), ConfigValue::from("vc2")]),
            ]))
        );
        assert_eq!(f.store.loaded_paths().len(), 3);
    }

    #[test]
    fn test_array_merge_rejects_hash_without_partial_answer() {
        let f = fixture(&["a", "b"], KeyPaths::new());
        f.store.insert("a", doc("k", ConfigValue::mapping([("x", ConfigValue::Integer(1))])));
        f.store.insert("b", doc("k", ConfigValue::from("vb")));

        let err = f
            .engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::ArrayMerge)
            .unwrap_err();
        match err {
            LookupError::TypeMismatch(message) => {
                assert_eq!(message, "expected Array-compatible value, found Hash")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!f.store.was_loaded("b"));
    }

    #[test]
    fn test_array_merge_mismatch_after_first_source_aborts() {
        let f = fixture(&["a", "b"], KeyPaths::new());
        f.store.insert("a", doc("k", ConfigValue::from("va")));
        f.store.insert("b", doc("k", ConfigValue::Integer(2)));

        let err = f
            .engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::ArrayMerge)
            .unwrap_err();
        assert!(matches!(err, LookupError::TypeMismatch(ref m) if m.ends_with("found Integer")));
    }

    #[test]
    fn test_hash_merge_first_source_wins_on_conflict() {
        let f = fixture(&["a", "b"], KeyPaths::new());
        f.store.insert(
            "a",
            doc("k", ConfigValue::mapping([("x", ConfigValue::Integer(1)), ("y", ConfigValue::Integer(2))])),
        );
        f.store.insert(
            "b",
            doc("k", ConfigValue::mapping([("y", ConfigValue::Integer(3)), ("z", ConfigValue::Integer(4))])),
        );

        let answer = f
            .engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::HashMerge)
            .unwrap()
            .unwrap();
        assert_eq!(
            answer,
            ConfigValue::mapping([
                ("x", ConfigValue::Integer(1)),
                ("y", ConfigValue::Integer(2)),
                ("z", ConfigValue::Integer(4)),
            ])
        );
    }

    #[test]
    fn test_hash_merge_is_shallow() {
        let f = fixture(&["a", "b"], KeyPaths::new());
        f.store.insert(
            "a",
            doc("k", ConfigValue::mapping([("db", ConfigValue::mapping([("host", ConfigValue::from("a"))]))])),
        );
        f.store.insert(
            "b",
            doc("k", ConfigValue::mapping([("db", ConfigValue::mapping([("port", ConfigValue::Integer(5432))]))])),
        );

        let answer = f
            .engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::HashMerge)
            .unwrap()
            .unwrap();
        let db = answer.get("db").unwrap();
        assert_eq!(db.get("host"), Some(&ConfigValue::from("a")));
        assert_eq!(db.get("port"), None);
    }

    #[test]
    fn test_hash_merge_rejects_non_hash() {
        let f = fixture(&["a"], KeyPaths::new());
        f.store.insert("a", doc("k", ConfigValue::from("not a hash")));

        let err = f
            .engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::HashMerge)
            .unwrap_err();
        assert!(matches!(err, LookupError::TypeMismatch(ref m) if m == "expected Hash, found String"));
    }

    #[test]
    fn test_non_hash_document_is_skipped_with_warning() {
        let f = fixture(&["a", "b"], KeyPaths::new());
        f.store.insert("a", ConfigValue::Sequence(vec![ConfigValue::from("k")]));
        f.store.insert("b", doc("k", ConfigValue::from("from b")));

        let answer = f
            .engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::Priority)
            .unwrap();
        assert_eq!(answer, Some(ConfigValue::from("from b")));
        assert_eq!(f.logger.messages(LogLevel::Warn).len(), 1);
    }

    #[test]
    fn test_encrypted_values_are_decrypted_during_lookup() {
        let keys = TestKeys::generate();
        let f = fixture(&["a", "b"], keys.key_paths());
        f.store.insert(
            "a",
            doc("db", ConfigValue::mapping([("password", ConfigValue::from(keys.encrypt("p@ss")))])),
        );
        f.store.insert(
            "b",
            doc("db", ConfigValue::mapping([("user", ConfigValue::from("app")), ("password", ConfigValue::from("ignored"))])),
        );

        let answer = f
            .engine
            .lookup("db", &Scope::new(), None, ResolutionStrategy::HashMerge)
            .unwrap()
            .unwrap();
        assert_eq!(answer.get("password"), Some(&ConfigValue::from("p@ss")));
        assert_eq!(answer.get("user"), Some(&ConfigValue::from("app")));
    }

    #[test]
    fn test_decryption_failure_aborts_lookup() {
        let encrypting = TestKeys::generate_named("encrypting");
        let other = TestKeys::generate_named("other");
        let f = fixture(&["a"], other.key_paths());
        f.store.insert("a", doc("secret", ConfigValue::from(encrypting.encrypt("nope"))));

        let err = f
            .engine
            .lookup("secret", &Scope::new(), None, ResolutionStrategy::Priority)
            .unwrap_err();
        assert!(matches!(err, LookupError::DecryptionFailed));
    }

    #[test]
    fn test_unused_encrypted_values_are_never_decrypted() {
        // Key files do not exist; only the requested key is resolved
        let f = fixture(
            &["a"],
            KeyPaths::new()
                .with_private_key("/nonexistent/private_key.pem")
                .with_public_key("/nonexistent/public_key.pem"),
        );
        f.store.insert(
            "a",
            ConfigValue::mapping([
                ("plain", ConfigValue::from("visible")),
                ("secret", ConfigValue::from("ENC[aGVsbG8=]")),
            ]),
        );

        let answer = f
            .engine
            .lookup("plain", &Scope::new(), None, ResolutionStrategy::Priority)
            .unwrap();
        assert_eq!(answer, Some(ConfigValue::from("visible")));

        let err = f
            .engine
            .lookup("secret", &Scope::new(), None, ResolutionStrategy::Priority)
            .unwrap_err();
        assert!(matches!(err, LookupError::KeyMaterialUnavailable { .. }));
    }

    #[test]
    fn test_logs_lookup_progress() {
        let f = fixture(&["a"], KeyPaths::new());
        f.store.insert("a", doc("k", ConfigValue::from("v")));

        f.engine
            .lookup("k", &Scope::new(), None, ResolutionStrategy::Priority)
            .unwrap();
        assert!(f.logger.contains("[eyaml_backend]: Lookup called for key k"));
        assert!(f.logger.contains("Processing datasource: a"));
        assert!(f.logger.contains("Assigning answer variable"));
    }

    #[test]
    fn test_from_config_end_to_end() {
        let keys = TestKeys::generate();
        let datadir = tempfile::tempdir().unwrap();
        fs::create_dir_all(datadir.path().join("env")).unwrap();
        fs::write(
            datadir.path().join("env/production.eyaml"),
            format!(
                "db::password: '{}'\nntp_servers:\n  - ntp1.prod\n",
                keys.encrypt("prod-password")
            ),
        )
        .unwrap();
        fs::write(
            datadir.path().join("common.eyaml"),
            "db::password: default\nntp_servers:\n  - ntp.common\nsettings:\n  level: \"%{environment}\"\n",
        )
        .unwrap();

        let config = HieraConfigFile::from_yaml_str(&format!(
            ":hierarchy:\n  - \"env/%{{environment}}\"\n  - common\n:eyaml:\n  :datadir: {}\n  :private_key: {}\n  :public_key: {}\n",
            datadir.path().display(),
            keys.private_key_path.display(),
            keys.public_key_path.display(),
        ))
        .unwrap();

        let interpolator: SharedInterpolator = Arc::new(|text: &str, scope: &Scope| {
            text.replace("%{environment}", scope.get("environment").unwrap_or_default())
        });
        let engine = LookupEngine::from_config(&config, interpolator, Arc::new(NoOpLogger));
        let scope = Scope::new().with_var("environment", "production");

        let password = engine
            .lookup("db::password", &scope, None, ResolutionStrategy::Priority)
            .unwrap();
        assert_eq!(password, Some(ConfigValue::from("prod-password")));

        let servers = engine
            .lookup("ntp_servers", &scope, None, ResolutionStrategy::ArrayMerge)
            .unwrap();
        assert_eq!(
            servers,
            Some(ConfigValue::Sequence(vec![
                ConfigValue::Sequence(vec![ConfigValue::from("ntp1.prod")]),
                ConfigValue::Sequence(vec![ConfigValue::from("ntp.common")]),
            ]))
        );

        let settings = engine
            .lookup("settings", &scope, None, ResolutionStrategy::Priority)
            .unwrap()
            .unwrap();
        assert_eq!(settings.get("level"), Some(&ConfigValue::from("production")));
    }
}
