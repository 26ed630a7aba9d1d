#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Index backfill job deriving the id-to-title table.
pub mod backfill;
/// Batched write path shared by import and backfill.
pub mod batch;
/// Import and backfill job settings.
pub mod config;
/// Centralized schema, key, and import constants.
pub mod constants;
/// Reusable demo runners shared by the example binaries.
pub mod example_apps;
/// Import pipeline streaming record sources into the store.
pub mod import;
/// Row-key codec for composite and identity keys.
pub mod keys;
/// Query engine implementing the three read patterns.
pub mod query;
/// Schema manager declaring tables and column families.
pub mod schema;
/// Record source traits and built-in CSV/in-memory sources.
pub mod source;
/// Store capability trait, mutation/row types, and the in-memory store.
pub mod store;
/// Shared type aliases.
pub mod types;

mod errors;

pub use backfill::sync_id_to_title_index;
pub use batch::BatchWriter;
pub use config::ImportConfig;
pub use errors::AccessError;
pub use import::{DualWriteState, ImportSummary, Importer};
pub use keys::{id_key, item_user_key, scan_prefix, split_prefixed_key, title_key, user_item_key};
pub use query::{ItemDetail, ItemRating, QueryEngine, UserRating};
pub use schema::SchemaManager;
pub use source::{CsvFileSource, FieldedRecord, InMemorySource, RecordSource};
pub use store::{Cell, MemoryStore, Mutation, Store, StoreRow};
pub use types::{Categories, ItemId, Title, UserId};
