//! Backfill of the id-to-title index from the populated items table.

use std::sync::Arc;

use tracing::{info, warn};

use crate::batch::BatchWriter;
use crate::constants::schema::{
    COL_ITEM_ID, COL_TITLE, ID_TO_TITLE_TABLE, INDEX_FAMILY, INFO_FAMILY, ITEMS_BY_TITLE_TABLE,
};
use crate::errors::AccessError;
use crate::keys::id_key;
use crate::schema::SchemaManager;
use crate::store::{Mutation, Store};

/// Derive the `id_to_title` index from `items_by_title`, creating the index
/// table when missing.
///
/// The scan reads only the id column to minimize transferred bytes; the row
/// key of each scanned row is the title. Rows with an empty id are logged
/// and skipped, not counted as failures. Re-running overwrites each id's
/// mapping with the then-current title, so the job is safe to repeat and to
/// run concurrently with further imports (eventual consistency, no isolation).
///
/// Returns the number of index rows synced.
pub fn sync_id_to_title_index(
    store: Arc<dyn Store>,
    batch_threshold: usize,
) -> Result<usize, AccessError> {
    SchemaManager::new(store.clone()).ensure_table(ID_TO_TITLE_TABLE, &[INDEX_FAMILY], &[])?;

    let rows = store.scan_prefix(
        ITEMS_BY_TITLE_TABLE,
        b"",
        Some(INFO_FAMILY),
        Some(COL_ITEM_ID),
    )?;

    let mut writer = BatchWriter::new(store, batch_threshold);
    let mut synced = 0usize;
    for row in rows {
        let title = row.key_text();
        let item_id = row.text_value(INFO_FAMILY, COL_ITEM_ID);
        let item_id = item_id.trim();
        if item_id.is_empty() {
            warn!(title = %title, "skipping item row with empty id");
            continue;
        }
        let mutation =
            Mutation::new(id_key(item_id)).with_cell(INDEX_FAMILY, COL_TITLE, &title);
        writer.stage(ID_TO_TITLE_TABLE, mutation);
        synced += 1;
        if writer.flush_if_full(ID_TO_TITLE_TABLE)? {
            info!(synced, "index backfill progress");
        }
    }
    writer.flush_all()?;
    info!(synced, "id-to-title index backfill complete");
    Ok(synced)
}
