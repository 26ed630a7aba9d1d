use std::sync::Arc;

use widetable::{
    Importer, Mutation, QueryEngine, SchemaManager, Store, sync_id_to_title_index, title_key,
};

mod common;
use common::{fresh_store, items_source, populate};

#[test]
fn backfill_creates_index_table_lazily() {
    let store = Arc::new(widetable::MemoryStore::new());
    // Only the items table exists; the index table must be created by the job.
    SchemaManager::new(store.clone() as Arc<dyn Store>)
        .ensure_table("items_by_title", &["info"], &[])
        .expect("items table declared");
    let mut importer = Importer::new(store.clone() as Arc<dyn Store>, common::BATCH);
    importer
        .import_items(&mut items_source(&[
            &["1", "Toy Story (1995)", "Animation|Comedy"][..],
            &["2", "Jumanji (1995)", "Adventure"][..],
        ]))
        .expect("items imported");

    let synced = sync_id_to_title_index(store.clone() as Arc<dyn Store>, common::BATCH)
        .expect("backfill succeeds");
    assert_eq!(synced, 2);
    assert!(store.table_exists("id_to_title").expect("exists check"));
}

#[test]
fn backfill_is_idempotent() {
    let store = fresh_store();
    populate(
        &store,
        &[
            &["1", "Toy Story (1995)", "Animation|Comedy"][..],
            &["2", "Jumanji (1995)", "Adventure"][..],
        ],
        &[&["4", "2", "3.0", "500"][..]],
    );

    let queries = QueryEngine::new(store.clone() as Arc<dyn Store>);
    let first = queries.ratings_by_user("4").expect("query succeeds");

    let synced = sync_id_to_title_index(store.clone() as Arc<dyn Store>, common::BATCH)
        .expect("second run succeeds");
    assert_eq!(synced, 2);

    let second = queries.ratings_by_user("4").expect("query succeeds");
    assert_eq!(first, second);
}

#[test]
fn backfill_skips_rows_with_empty_id() {
    let store = fresh_store();
    let rows = vec![
        Mutation::new(title_key("Has Id")).with_cell("info", "id", "31"),
        Mutation::new(title_key("No Id")).with_cell("info", "id", "  "),
        Mutation::new(title_key("Only Categories")).with_cell("info", "categories", "Drama"),
    ];
    store.put_all("items_by_title", &rows).expect("direct put");

    let synced = sync_id_to_title_index(store.clone() as Arc<dyn Store>, common::BATCH)
        .expect("backfill succeeds");
    assert_eq!(synced, 1);
    assert_eq!(store.row_count("id_to_title"), 1);
}

#[test]
fn rerun_reflects_retitled_items() {
    let store = fresh_store();
    populate(
        &store,
        &[&["8", "Alpha Title", "Drama"][..]],
        &[&["2", "8", "4.5", "600"][..]],
    );

    // Re-import under a new title, then re-sync. The old title-keyed row is
    // never deleted, so both rows carry id 8 and the one scanned last wins
    // the index mapping ("Zulu Title" sorts after "Alpha Title").
    let mut importer = Importer::new(store.clone() as Arc<dyn Store>, common::BATCH);
    importer
        .import_items(&mut items_source(&[&["8", "Zulu Title", "Drama"][..]]))
        .expect("re-import succeeds");
    sync_id_to_title_index(store.clone() as Arc<dyn Store>, common::BATCH)
        .expect("re-sync succeeds");

    let queries = QueryEngine::new(store as Arc<dyn Store>);
    let ratings = queries.ratings_by_user("2").expect("query succeeds");
    assert_eq!(ratings[0].item_title, "Zulu Title");
}
