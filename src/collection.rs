use crate::error::{Result, SiamError};
use crate::id::next_id;
use crate::query::{self, Filter, Queryable};
use crate::schema::Schema;
use crate::types::{Content, Document, IdStrategy, ResponseDoc};
use indexmap::IndexMap;
use serde_json::Value;

/// A set of versioned documents sharing one optional schema.
///
/// Documents are kept in insertion order. Every read hands back owned
/// copies, so callers can never reach into the stored content.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    schema: Schema,
    id_strategy: IdStrategy,
    documents: IndexMap<String, Document>,
}

impl Collection {
    pub fn new(schema: Schema, id_strategy: IdStrategy) -> Self {
        Self {
            schema,
            id_strategy,
            documents: IndexMap::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.id_strategy
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<ResponseDoc> {
        self.documents
            .get(id)
            .map(|doc| ResponseDoc::from_document(id, doc))
    }

    /// Documents matching `filter`, in insertion order.
    ///
    /// A filter carrying an `id` is a direct lookup and ignores every other
    /// key. `null` or `{}` matches everything. A miss is an empty result,
    /// never an error.
    pub fn find(&self, filter: &Value) -> Vec<ResponseDoc> {
        let clauses = match filter {
            Value::Null => return self.find_by(&|_: &Content| true),
            Value::Object(clauses) => clauses,
            other => {
                log::warn!("find expects an object filter, got {}", other);
                return Vec::new();
            }
        };

        if let Some(id) = lookup_id(clauses) {
            return self.get(&id).into_iter().collect();
        }

        self.find_by(&Filter::new(clauses))
    }

    /// Scan with any [`Queryable`], e.g. a closure over the content.
    pub fn find_by<Q: Queryable>(&self, query: &Q) -> Vec<ResponseDoc> {
        let found: Vec<ResponseDoc> = self
            .documents
            .iter()
            .filter(|(_, doc)| query.matches(&doc.content))
            .map(|(id, doc)| ResponseDoc::from_document(id, doc))
            .collect();

        log::trace!("scanned {} documents, {} matched", self.documents.len(), found.len());
        found
    }

    /// Insert a new document at version 1 and return its id.
    pub fn create(&mut self, content: Value) -> Result<String> {
        let content = into_content(content)?;
        self.validate(content.as_ref(), "create")?;

        let id = next_id(self.documents.len(), self.id_strategy);
        self.documents
            .insert(id.clone(), Document::new(content.unwrap_or_default()));

        log::debug!("created document {}", id);
        Ok(id)
    }

    /// Merge `content` into every document selected by `filter` and bump
    /// their versions.
    ///
    /// Without an `id`, selection is plain equality on the top-level keys;
    /// query operators are not interpreted here.
    pub fn update(&mut self, filter: &Value, content: Value) -> Result<Vec<ResponseDoc>> {
        let clauses = required_where(filter, "update")?;
        let patch = into_content(content)?;
        self.validate(patch.as_ref(), "update")?;
        let patch = patch.unwrap_or_default();

        if let Some(id) = lookup_id(clauses) {
            let Some(doc) = self.documents.get_mut(&id) else {
                log::error!("update: no document with id {}", id);
                return Err(SiamError::NotFound("update"));
            };
            doc.merge(&patch);
            log::debug!("updated document {} to version {}", id, doc.version);
            return Ok(vec![ResponseDoc::from_document(&id, doc)]);
        }

        let mut updated = Vec::new();
        for (id, doc) in self.documents.iter_mut() {
            if query::matches_exact(&doc.content, clauses) {
                doc.merge(&patch);
                updated.push(ResponseDoc::from_document(id, doc));
            }
        }

        if updated.is_empty() {
            log::error!("update: no document matches {}", filter);
            return Err(SiamError::NotFound("update"));
        }

        log::debug!("updated {} documents", updated.len());
        Ok(updated)
    }

    /// Remove the documents selected by `filter` and return their ids.
    /// Selection follows the same rules as [`Collection::update`].
    pub fn delete(&mut self, filter: &Value) -> Result<Vec<String>> {
        let clauses = required_where(filter, "delete")?;

        if let Some(id) = lookup_id(clauses) {
            if self.documents.shift_remove(&id).is_none() {
                log::error!("delete: no document with id {}", id);
                return Err(SiamError::NotFound("delete"));
            }
            log::debug!("deleted document {}", id);
            return Ok(vec![id]);
        }

        let mut removed = Vec::new();
        self.documents.retain(|id, doc| {
            if query::matches_exact(&doc.content, clauses) {
                removed.push(id.clone());
                false
            } else {
                true
            }
        });

        if removed.is_empty() {
            log::error!("delete: no document matches {}", filter);
            return Err(SiamError::NotFound("delete"));
        }

        log::debug!("deleted {} documents", removed.len());
        Ok(removed)
    }

    fn validate(&self, content: Option<&Content>, op: &str) -> Result<()> {
        self.schema.validate(content).inspect_err(|err| {
            log::error!("{} rejected: {}", op, err);
        })
    }
}

/// `null` means no content; anything else must be an object.
fn into_content(value: Value) -> Result<Option<Content>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(content) => Ok(Some(content)),
        other => Err(SiamError::InvalidContent(type_name(&other).to_string())),
    }
}

fn required_where<'a>(filter: &'a Value, op: &'static str) -> Result<&'a Content> {
    match filter.as_object() {
        Some(clauses) if !clauses.is_empty() => Ok(clauses),
        _ => {
            log::error!("{} called without a where clause", op);
            Err(SiamError::MissingWhere(op))
        }
    }
}

/// The key for a direct lookup. Only a non-empty string or a non-zero
/// number counts; any other `id` value is matched like an ordinary field.
/// Whole floats use their integer form, so `1.0` finds key "1".
fn lookup_id(clauses: &Content) -> Option<String> {
    match clauses.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => {
            if let Some(n) = id.as_i64() {
                (n != 0).then(|| n.to_string())
            } else if let Some(n) = id.as_u64() {
                Some(n.to_string())
            } else {
                let f = id.as_f64()?;
                if f == 0.0 {
                    None
                } else if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Some((f as i64).to_string())
                } else {
                    Some(id.to_string())
                }
            }
        }
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
