//! Shared fixtures for integration tests.

use std::sync::Arc;

use widetable::{
    Importer, InMemorySource, MemoryStore, SchemaManager, Store, sync_id_to_title_index,
};

pub const BATCH: usize = 2;

/// Store with every table declared.
pub fn fresh_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    SchemaManager::new(store.clone() as Arc<dyn Store>)
        .ensure_all_tables()
        .expect("schema declared");
    store
}

pub fn items_source(rows: &[&[&str]]) -> InMemorySource {
    InMemorySource::new(&["itemId", "title", "categories"], rows)
}

pub fn ratings_source(rows: &[&[&str]]) -> InMemorySource {
    InMemorySource::new(&["userId", "itemId", "score", "observedAt"], rows)
}

/// Import the given fixtures and backfill the id index.
pub fn populate(store: &Arc<MemoryStore>, items: &[&[&str]], ratings: &[&[&str]]) {
    let mut importer = Importer::new(store.clone() as Arc<dyn Store>, BATCH);
    importer
        .import_items(&mut items_source(items))
        .expect("items imported");
    importer
        .import_ratings(&mut ratings_source(ratings))
        .expect("ratings imported");
    sync_id_to_title_index(store.clone() as Arc<dyn Store>, BATCH).expect("index synced");
}
