use crate::collection::Collection;
use crate::error::{Result, SiamError};
use crate::schema::Schema;
use crate::types::SiamConfig;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Collection name -> schema, as declared when the database is built.
pub type DatabaseSchema = HashMap<String, Schema>;

/// A collection shared out of the registry. Take `read()` for queries and
/// `write()` for create/update/delete.
pub type SharedCollection = Arc<RwLock<Collection>>;

/// Registry of named collections.
///
/// Collections declared in the schema set exist from the start; any other
/// name gets a schemaless collection on first access. The registry lock is
/// released before [`SiamDatabase::collection`] returns, so handles to
/// several collections can be held at once; writers to the same collection
/// are serialized by its own lock.
pub struct SiamDatabase {
    config: SiamConfig,
    collections: DashMap<String, SharedCollection>,
}

impl SiamDatabase {
    pub fn new(config: SiamConfig, schemas: DatabaseSchema) -> Self {
        let collections = DashMap::with_capacity(schemas.len());
        for (name, schema) in schemas {
            log::debug!("declaring collection {} with {} fields", name, schema.len());
            collections.insert(
                name,
                Arc::new(RwLock::new(Collection::new(schema, config.id_strategy))),
            );
        }

        Self {
            config,
            collections,
        }
    }

    /// Build from a JSON configuration and a JSON schema set such as
    /// `{"users": {"name": "string", "age": "number"}}`.
    pub fn from_json_str(config: &str, schemas: &str) -> Result<Self> {
        let config = SiamConfig::from_json_str(config)?;
        let schemas: DatabaseSchema = serde_json::from_str(schemas)?;
        Ok(Self::new(config, schemas))
    }

    pub fn config(&self) -> &SiamConfig {
        &self.config
    }

    pub fn collection(&self, name: &str) -> Result<SharedCollection> {
        if name.is_empty() {
            log::error!("collection name must not be empty");
            return Err(SiamError::EmptyCollectionName);
        }

        if let Some(existing) = self.collections.get(name) {
            return Ok(Arc::clone(existing.value()));
        }

        let entry = self
            .collections
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("creating schemaless collection {}", name);
                Arc::new(RwLock::new(Collection::new(
                    Schema::new(),
                    self.config.id_strategy,
                )))
            });
        Ok(Arc::clone(entry.value()))
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Sorted names of every collection created so far.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl Default for SiamDatabase {
    fn default() -> Self {
        Self::new(SiamConfig::default(), DatabaseSchema::new())
    }
}
