use std::sync::Arc;

use widetable::{Importer, QueryEngine, Store};

mod common;
use common::{fresh_store, populate, ratings_source};

#[test]
fn missing_title_returns_none_not_error() {
    let store = fresh_store();
    populate(
        &store,
        &[&["1", "Toy Story (1995)", "Animation|Comedy"][..]],
        &[],
    );
    let queries = QueryEngine::new(store as Arc<dyn Store>);
    let result = queries
        .item_detail("Nonexistent Movie")
        .expect("transport succeeds");
    assert!(result.is_none());
}

#[test]
fn blank_inputs_short_circuit() {
    let store = fresh_store();
    let queries = QueryEngine::new(store as Arc<dyn Store>);
    assert!(queries.item_detail("   ").expect("ok").is_none());
    assert!(queries.ratings_by_user("").expect("ok").is_empty());
    assert!(queries.ratings_by_item(" ").expect("ok").is_empty());
}

#[test]
fn user_prefix_scan_does_not_leak_longer_user_ids() {
    let store = fresh_store();
    populate(
        &store,
        &[&["7", "Alien (1979)", "Horror|Sci-Fi"][..]],
        &[
            &["12", "7", "4.0", "100"][..],
            &["123", "7", "1.0", "101"][..],
        ],
    );
    let queries = QueryEngine::new(store as Arc<dyn Store>);

    let ratings = queries.ratings_by_user("12").expect("query succeeds");
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].user_id, "12");
    assert_eq!(ratings[0].score, "4.0");

    let ratings = queries.ratings_by_user("123").expect("query succeeds");
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].score, "1.0");
}

#[test]
fn results_follow_byte_string_key_order() {
    let store = fresh_store();
    populate(
        &store,
        &[
            &["2", "Jumanji (1995)", "Adventure"][..],
            &["9", "Sudden Death (1995)", "Action"][..],
            &["10", "GoldenEye (1995)", "Action|Thriller"][..],
        ],
        &[
            &["1", "9", "3.0", "300"][..],
            &["1", "2", "3.5", "301"][..],
            &["1", "10", "4.0", "302"][..],
            &["2", "2", "1.0", "303"][..],
            &["10", "2", "2.0", "304"][..],
        ],
    );
    let queries = QueryEngine::new(store as Arc<dyn Store>);

    // Items ordered lexicographically by id: "10" < "2" < "9".
    let by_user: Vec<String> = queries
        .ratings_by_user("1")
        .expect("query succeeds")
        .into_iter()
        .map(|r| r.item_id)
        .collect();
    assert_eq!(by_user, vec!["10", "2", "9"]);

    // Users ordered lexicographically: "1" < "10" < "2".
    let by_item: Vec<String> = queries
        .ratings_by_item("Jumanji (1995)")
        .expect("query succeeds")
        .into_iter()
        .map(|r| r.user_id)
        .collect();
    assert_eq!(by_item, vec!["1", "10", "2"]);
}

#[test]
fn unresolved_item_id_falls_back_to_placeholder() {
    let store = fresh_store();
    // Ratings only; no items imported, so the id index stays empty.
    let mut importer = Importer::new(store.clone() as Arc<dyn Store>, common::BATCH);
    importer
        .import_ratings(&mut ratings_source(&[&["3", "99", "5.0", "400"][..]]))
        .expect("ratings imported");

    let queries = QueryEngine::new(store as Arc<dyn Store>);
    let ratings = queries.ratings_by_user("3").expect("query succeeds");
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].item_title, "unknown item (id: 99)");
}

#[test]
fn unknown_title_yields_empty_rating_list() {
    let store = fresh_store();
    populate(
        &store,
        &[&["1", "Toy Story (1995)", "Animation|Comedy"][..]],
        &[&["1", "1", "4.0", "100000"][..]],
    );
    let queries = QueryEngine::new(store as Arc<dyn Store>);
    let ratings = queries
        .ratings_by_item("Nonexistent Movie")
        .expect("transport succeeds");
    assert!(ratings.is_empty());
}

#[test]
fn item_detail_tolerates_missing_columns() {
    let store = fresh_store();
    // A row written with only the id column; categories must read as "".
    let mutation = widetable::Mutation::new(widetable::title_key("Bare Row"))
        .with_cell("info", "id", "55");
    store
        .put_all("items_by_title", &[mutation])
        .expect("direct put");

    let queries = QueryEngine::new(store as Arc<dyn Store>);
    let detail = queries
        .item_detail("Bare Row")
        .expect("query succeeds")
        .expect("row present");
    assert_eq!(detail.id, "55");
    assert_eq!(detail.categories, "");
}
