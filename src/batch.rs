//! Batched write path shared by the import pipeline and the backfill job.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::errors::AccessError;
use crate::store::{Mutation, Store};
use crate::types::TableName;

/// Buffers mutations per table and flushes them as bounded-size batches.
///
/// Batching trades memory for round trips; the threshold is a fixed setting,
/// not adaptive. A failed flush fails the whole batch and surfaces to the
/// caller — already-flushed batches are not rolled back, since the store
/// offers no cross-batch atomicity.
pub struct BatchWriter {
    store: Arc<dyn Store>,
    threshold: usize,
    buffers: IndexMap<TableName, Vec<Mutation>>,
}

impl BatchWriter {
    /// Build a writer flushing each table at `threshold` staged mutations.
    pub fn new(store: Arc<dyn Store>, threshold: usize) -> Self {
        Self {
            store,
            threshold: threshold.max(1),
            buffers: IndexMap::new(),
        }
    }

    /// Configured flush threshold.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Append `mutation` to the in-memory buffer for `table`.
    pub fn stage(&mut self, table: &str, mutation: Mutation) {
        self.buffers
            .entry(table.to_string())
            .or_default()
            .push(mutation);
    }

    /// Number of mutations currently staged for `table`.
    pub fn staged_len(&self, table: &str) -> usize {
        self.buffers.get(table).map(Vec::len).unwrap_or(0)
    }

    /// Flush `table` when its buffer has reached the threshold.
    ///
    /// Returns whether a flush happened.
    pub fn flush_if_full(&mut self, table: &str) -> Result<bool, AccessError> {
        if self.staged_len(table) < self.threshold {
            return Ok(false);
        }
        self.flush_table(table)?;
        Ok(true)
    }

    /// Unconditionally send and clear the buffer for `table`.
    ///
    /// Returns the number of mutations written; a no-op for empty buffers.
    pub fn flush_table(&mut self, table: &str) -> Result<usize, AccessError> {
        let Some(buffer) = self.buffers.get_mut(table) else {
            return Ok(0);
        };
        if buffer.is_empty() {
            return Ok(0);
        }
        let batch = std::mem::take(buffer);
        self.store.put_all(table, &batch)?;
        debug!(table, batch_size = batch.len(), "flushed mutation batch");
        Ok(batch.len())
    }

    /// Send and clear every non-empty buffer, in staging order.
    ///
    /// Returns the total number of mutations written.
    pub fn flush_all(&mut self) -> Result<usize, AccessError> {
        let tables: Vec<TableName> = self.buffers.keys().cloned().collect();
        let mut written = 0;
        for table in tables {
            written += self.flush_table(&table)?;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn writer_with_table(threshold: usize) -> (Arc<MemoryStore>, BatchWriter) {
        let store = Arc::new(MemoryStore::new());
        store.create_table("t", &["f"], &[]).expect("create table");
        let writer = BatchWriter::new(store.clone(), threshold);
        (store, writer)
    }

    fn mutation(key: &str) -> Mutation {
        Mutation::new(key.as_bytes().to_vec()).with_cell("f", "q", "v")
    }

    #[test]
    fn stage_does_not_write_until_threshold() {
        let (store, mut writer) = writer_with_table(3);
        writer.stage("t", mutation("a"));
        writer.stage("t", mutation("b"));
        assert!(!writer.flush_if_full("t").expect("no flush"));
        assert_eq!(store.row_count("t"), 0);

        writer.stage("t", mutation("c"));
        assert!(writer.flush_if_full("t").expect("flush"));
        assert_eq!(store.row_count("t"), 3);
        assert_eq!(writer.staged_len("t"), 0);
    }

    #[test]
    fn flush_all_drains_every_buffer() {
        let (store, mut writer) = writer_with_table(100);
        store.create_table("u", &["f"], &[]).expect("create table");
        writer.stage("t", mutation("a"));
        writer.stage("u", mutation("b"));
        let written = writer.flush_all().expect("flush all");
        assert_eq!(written, 2);
        assert_eq!(store.row_count("t"), 1);
        assert_eq!(store.row_count("u"), 1);
    }

    #[test]
    fn flush_of_missing_table_is_noop() {
        let (_, mut writer) = writer_with_table(1);
        assert_eq!(writer.flush_table("never_staged").expect("noop"), 0);
    }
}
