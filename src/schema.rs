//! Idempotent table and column-family declaration.

use std::sync::Arc;

use tracing::info;

use crate::constants::schema::{
    ID_TO_TITLE_TABLE, INDEX_FAMILY, INFO_FAMILY, ITEMS_BY_TITLE_TABLE, RATING_SPLIT_POINTS,
    RATINGS_BY_ITEM_TABLE, RATINGS_BY_USER_TABLE, REF_FAMILY, SCORE_FAMILY,
};
use crate::errors::AccessError;
use crate::store::Store;
use crate::types::RowKeyBytes;

/// Declares tables against the store, skipping ones that already exist.
///
/// Schema is applied once, out of the hot path; creation failures propagate
/// without retry, and there is no alter-table path for existing tables.
pub struct SchemaManager {
    store: Arc<dyn Store>,
}

impl SchemaManager {
    /// Build a manager over an owned store handle.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create `table` with `families` unless it already exists.
    ///
    /// Non-empty `split_points` pre-split the keyspace at those sorted
    /// boundaries, one region per interval.
    pub fn ensure_table(
        &self,
        table: &str,
        families: &[&str],
        split_points: &[RowKeyBytes],
    ) -> Result<(), AccessError> {
        if self.store.table_exists(table)? {
            info!(table, "table already exists, skipping creation");
            return Ok(());
        }
        self.store.create_table(table, families, split_points)?;
        if split_points.is_empty() {
            info!(table, "table created (single region)");
        } else {
            info!(
                table,
                regions = split_points.len() + 1,
                "table created with pre-split regions"
            );
        }
        Ok(())
    }

    /// Declare every table the import and query paths rely on.
    ///
    /// The items table takes no pre-split: title keys are not monotonic, so
    /// content hashing already spreads load. The two rating tables share the
    /// fixed numeric-prefix boundaries.
    pub fn ensure_all_tables(&self) -> Result<(), AccessError> {
        self.ensure_table(ITEMS_BY_TITLE_TABLE, &[INFO_FAMILY], &[])?;
        let splits = rating_split_points();
        self.ensure_table(RATINGS_BY_USER_TABLE, &[SCORE_FAMILY], &splits)?;
        self.ensure_table(RATINGS_BY_ITEM_TABLE, &[REF_FAMILY], &splits)?;
        self.ensure_table(ID_TO_TITLE_TABLE, &[INDEX_FAMILY], &[])?;
        Ok(())
    }
}

/// Pre-split boundaries for the rating tables as raw keys.
pub fn rating_split_points() -> Vec<RowKeyBytes> {
    RATING_SPLIT_POINTS
        .iter()
        .map(|boundary| boundary.as_bytes().to_vec())
        .collect()
}
