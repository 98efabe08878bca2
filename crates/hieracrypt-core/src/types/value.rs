//! Generic configuration value tree

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping type used for hash values
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A node in a loaded data document
///
/// Documents are parsed into this tree by a `DocumentLoader`. Resolution
/// walks the tree and rewrites only `String` nodes; every other node keeps
/// its variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit null or an absent value
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Integer(i64),
    /// Floating point scalar
    Float(f64),
    /// String scalar, possibly templated or encrypted
    String(String),
    /// Ordered list of values
    Sequence(Vec<ConfigValue>),
    /// String-keyed map of values
    Mapping(ConfigMap),
}

impl ConfigValue {
    /// Build a mapping from key/value pairs
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConfigValue)>,
    {
        ConfigValue::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Name of the variant, as reported in type mismatch errors
    pub fn shape_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "Null",
            ConfigValue::Bool(_) => "Boolean",
            ConfigValue::Integer(_) => "Integer",
            ConfigValue::Float(_) => "Float",
            ConfigValue::String(_) => "String",
            ConfigValue::Sequence(_) => "Array",
            ConfigValue::Mapping(_) => "Hash",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Convert a parsed YAML value into a config tree
    ///
    /// Scalar map keys (booleans, numbers) are stringified. Tags are dropped
    /// and the tagged value is kept. Keys that are themselves collections or
    /// null are rejected.
    pub fn from_yaml(value: serde_yaml::Value) -> Result<Self, String> {
        use serde_yaml::Value as Yaml;

        Ok(match value {
            Yaml::Null => ConfigValue::Null,
            Yaml::Bool(b) => ConfigValue::Bool(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => ConfigValue::String(s),
            Yaml::Sequence(items) => ConfigValue::Sequence(
                items
                    .into_iter()
                    .map(ConfigValue::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            Yaml::Mapping(mapping) => {
                let mut map = ConfigMap::with_capacity(mapping.len());
                for (key, val) in mapping {
                    map.insert(yaml_key_to_string(key)?, ConfigValue::from_yaml(val)?);
                }
                ConfigValue::Mapping(map)
            }
            Yaml::Tagged(tagged) => ConfigValue::from_yaml(tagged.value)?,
        })
    }

    /// Convert to a JSON value (non-finite floats become null)
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            ConfigValue::Null => Json::Null,
            ConfigValue::Bool(b) => Json::Bool(*b),
            ConfigValue::Integer(i) => Json::from(*i),
            ConfigValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            ConfigValue::String(s) => Json::String(s.clone()),
            ConfigValue::Sequence(items) => Json::Array(items.iter().map(|v| v.to_json()).collect()),
            ConfigValue::Mapping(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn yaml_key_to_string(key: serde_yaml::Value) -> Result<String, String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Tagged(tagged) => yaml_key_to_string(tagged.value),
        other => Err(format!("unsupported mapping key: {:?}", other)),
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => ConfigValue::Null,
            Json::Bool(b) => ConfigValue::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => ConfigValue::String(s),
            Json::Array(items) => ConfigValue::Sequence(items.into_iter().map(Into::into).collect()),
            Json::Object(map) => {
                ConfigValue::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        ConfigValue::Sequence(value)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(value: ConfigMap) -> Self {
        ConfigValue::Mapping(value)
    }
}
