//! Populate an in-process store from the env-configured CSV paths, then
//! answer queries. Demonstrates the read path in isolation from CLI import
//! flags.
//!
//! ```bash
//! WIDETABLE_ITEMS_PATH=data/items.csv WIDETABLE_RATINGS_PATH=data/ratings.csv \
//!     cargo run --example query_demo -- --title "Toy Story (1995)"
//! ```

use std::error::Error;
use std::sync::Arc;

use widetable::example_apps::run_query_demo;
use widetable::{
    CsvFileSource, ImportConfig, Importer, MemoryStore, SchemaManager, Store,
    sync_id_to_title_index,
};

fn main() -> Result<(), Box<dyn Error>> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let config = ImportConfig::from_env().validated()?;

    SchemaManager::new(store.clone()).ensure_all_tables()?;
    let mut importer = Importer::new(store.clone(), config.batch_threshold);
    let mut items = CsvFileSource::open(config.items_path()?)?;
    importer.import_items(&mut items)?;
    let mut ratings = CsvFileSource::open(config.ratings_path()?)?;
    importer.import_ratings(&mut ratings)?;
    sync_id_to_title_index(store.clone(), config.batch_threshold)?;

    run_query_demo(std::env::args().skip(1), store)
}
