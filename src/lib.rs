pub mod collection;
pub mod db;
pub mod error;
pub mod id;
pub mod query;
pub mod schema;
pub mod types;

pub use collection::Collection;
pub use db::{DatabaseSchema, SharedCollection, SiamDatabase};
pub use error::{Result, SiamError};
pub use query::{Filter, Queryable};
pub use schema::Schema;
pub use types::{Content, Document, FieldType, IdStrategy, ResponseDoc, SiamConfig};
