use crate::error::{Result, SiamError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Document body: an arbitrary JSON object.
pub type Content = Map<String, Value>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    /// Objects, arrays and `null`.
    Object,
    Any,
}

impl FieldType {
    /// Runtime type of a JSON value. Never returns `Any`.
    pub fn of(value: &Value) -> FieldType {
        match value {
            Value::String(_) => FieldType::String,
            Value::Number(_) => FieldType::Number,
            Value::Bool(_) => FieldType::Boolean,
            Value::Null | Value::Array(_) | Value::Object(_) => FieldType::Object,
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        *self == FieldType::Any || *self == FieldType::of(value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Any => "any",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = SiamError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_value(Value::String(s.to_string()))?)
    }
}

/// A stored document: its content and the number of writes it has seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: Content,
    pub version: u64,
}

impl Document {
    pub fn new(content: Content) -> Self {
        Self { content, version: 1 }
    }

    /// Shallow merge: keys in `patch` overwrite, the rest are kept.
    pub fn merge(&mut self, patch: &Content) {
        for (key, value) in patch {
            self.content.insert(key.clone(), value.clone());
        }
        self.version += 1;
    }
}

/// Owned projection of a stored document handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDoc {
    pub id: String,
    pub content: Content,
    pub version: u64,
}

impl ResponseDoc {
    pub fn from_document(id: &str, doc: &Document) -> Self {
        Self {
            id: id.to_string(),
            content: doc.content.clone(),
            version: doc.version,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.content.get(field)
    }
}

impl fmt::Display for ResponseDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ \"id\": \"{}\", \"version\": {}, \"content\": {} }}",
            self.id,
            self.version,
            Value::Object(self.content.clone())
        )
    }
}

/// How a collection names new documents.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IdStrategy {
    /// `count + 1` as a decimal string.
    #[default]
    #[serde(rename = "autoinc")]
    AutoIncrement,
    /// UUID v4.
    #[serde(rename = "uuid")]
    RandomUnique,
}

/// Configuration for a siam database
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiamConfig {
    #[serde(alias = "generateIds", alias = "generate_ids")]
    pub id_strategy: IdStrategy,
}

impl SiamConfig {
    pub fn with_id_strategy(id_strategy: IdStrategy) -> Self {
        Self { id_strategy }
    }

    /// Parse a configuration from JSON, e.g. `{"generate_ids": "uuid"}`.
    /// Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
