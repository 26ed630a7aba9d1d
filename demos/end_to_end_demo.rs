//! Import the CSV datasets into an in-process store and run the query
//! patterns. Swap the `MemoryStore` for a real store client to run against a
//! live cluster.
//!
//! ```bash
//! cargo run --example end_to_end_demo -- \
//!     --items data/items.csv --ratings data/ratings.csv \
//!     --title "Toy Story (1995)" --user 1
//! ```

use std::error::Error;
use std::sync::Arc;

use widetable::example_apps::run_end_to_end_demo;
use widetable::{MemoryStore, Store};

fn main() -> Result<(), Box<dyn Error>> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    run_end_to_end_demo(std::env::args().skip(1), store)
}
