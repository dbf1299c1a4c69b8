use crate::error::{Result, SiamError};
use crate::types::{Content, FieldType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field name -> expected type. Keys not listed are accepted unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: HashMap<String, FieldType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    pub fn get(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check `content` against the declared fields. An empty schema accepts
    /// anything, including no content at all.
    pub fn validate(&self, content: Option<&Content>) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        let content = match content {
            Some(content) if !content.is_empty() => content,
            _ => return Err(SiamError::EmptyContent),
        };

        for (key, value) in content {
            if let Some(expected) = self.fields.get(key)
                && !expected.accepts(value)
            {
                return Err(SiamError::TypeMismatch {
                    key: key.clone(),
                    expected: expected.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, FieldType)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, FieldType)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, t)| (k.into(), t)).collect(),
        }
    }
}
