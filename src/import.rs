//! Streaming CSV import into the denormalized tables.
//!
//! Each rating is one logical fact materialized as two physical rows with
//! swapped key component order, so both scan directions stay cheap. The two
//! rating tables are always flushed together and therefore never drift more
//! than one batch apart in write progress; the store offers no cross-row
//! atomicity, so the flush pair is tracked by an explicit [`DualWriteState`]
//! and the state reached is logged on failure to ease manual reconciliation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::batch::BatchWriter;
use crate::constants::import::{
    FIELD_CATEGORIES, FIELD_ITEM_ID, FIELD_OBSERVED_AT, FIELD_SCORE, FIELD_TITLE, FIELD_USER_ID,
};
use crate::constants::schema::{
    COL_CATEGORIES, COL_ITEM_ID, COL_OBSERVED_AT, COL_SCORE, ITEMS_BY_TITLE_TABLE, INFO_FAMILY,
    RATINGS_BY_ITEM_TABLE, RATINGS_BY_USER_TABLE, REF_FAMILY, SCORE_FAMILY,
};
use crate::errors::AccessError;
use crate::keys::{item_user_key, title_key, user_item_key};
use crate::source::RecordSource;
use crate::store::{Mutation, Store};

/// Outcome of one import run: rows staged successfully and rows skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records staged into the store.
    pub imported: usize,
    /// Malformed records skipped without failing the run.
    pub skipped: usize,
}

/// Progress of one rating-table flush pair.
///
/// The store applies the two batches independently; this records how far a
/// flush got so an operator can reconcile the tables after a partial failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DualWriteState {
    /// Neither rating table has received the batch.
    NotStarted,
    /// The user-keyed table holds the batch, the item-keyed table does not.
    UserTableWritten,
    /// Both rating tables hold the batch.
    BothWritten,
    /// The flush pair aborted; see the logged reached state.
    Failed,
}

/// Streams fielded records from a source into the store via batched writes.
pub struct Importer {
    writer: BatchWriter,
}

impl Importer {
    /// Build an importer flushing batches of `batch_threshold` mutations.
    pub fn new(store: Arc<dyn Store>, batch_threshold: usize) -> Self {
        Self {
            writer: BatchWriter::new(store, batch_threshold),
        }
    }

    /// Import item records into the title-keyed items table.
    ///
    /// Records missing a required field or carrying an empty title are
    /// skipped and counted; a later record with a duplicate title silently
    /// overwrites the earlier one (last-write-wins, by store semantics).
    pub fn import_items(
        &mut self,
        source: &mut dyn RecordSource,
    ) -> Result<ImportSummary, AccessError> {
        let mut summary = ImportSummary::default();
        let writer = &mut self.writer;
        source.for_each_record(&mut |record| {
            let fields = (
                record.field(FIELD_ITEM_ID),
                record.field(FIELD_TITLE),
                record.field(FIELD_CATEGORIES),
            );
            let (Some(id), Some(title), Some(categories)) = fields else {
                summary.skipped += 1;
                warn!(fields = record.len(), "skipping short item record");
                return Ok(());
            };
            let id = id.trim();
            let title = strip_surrounding_quotes(title.trim());
            let categories = categories.trim();
            if title.is_empty() {
                summary.skipped += 1;
                warn!(item_id = id, "skipping item record with empty title");
                return Ok(());
            }
            let mutation = Mutation::new(title_key(title))
                .with_cell(INFO_FAMILY, COL_ITEM_ID, id)
                .with_cell(INFO_FAMILY, COL_CATEGORIES, categories);
            writer.stage(ITEMS_BY_TITLE_TABLE, mutation);
            summary.imported += 1;
            writer.flush_if_full(ITEMS_BY_TITLE_TABLE)?;
            Ok(())
        })?;
        self.writer.flush_all()?;
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "item import complete"
        );
        Ok(summary)
    }

    /// Import rating records into both rating tables.
    ///
    /// Every record becomes two mutations, one per key ordering. Both tables
    /// flush together when either buffer reaches the threshold.
    pub fn import_ratings(
        &mut self,
        source: &mut dyn RecordSource,
    ) -> Result<ImportSummary, AccessError> {
        let mut summary = ImportSummary::default();
        let writer = &mut self.writer;
        let threshold = writer.threshold();
        source.for_each_record(&mut |record| {
            let fields = (
                record.field(FIELD_USER_ID),
                record.field(FIELD_ITEM_ID),
                record.field(FIELD_SCORE),
                record.field(FIELD_OBSERVED_AT),
            );
            let (Some(user_id), Some(item_id), Some(score), Some(observed_at)) = fields else {
                summary.skipped += 1;
                warn!(fields = record.len(), "skipping short rating record");
                return Ok(());
            };
            let user_id = user_id.trim();
            let item_id = item_id.trim();
            let score = score.trim();
            let observed_at = observed_at.trim();
            if user_id.is_empty() || item_id.is_empty() {
                summary.skipped += 1;
                warn!("skipping rating record with empty user or item id");
                return Ok(());
            }
            let by_user = Mutation::new(user_item_key(user_id, item_id))
                .with_cell(SCORE_FAMILY, COL_SCORE, score)
                .with_cell(SCORE_FAMILY, COL_OBSERVED_AT, observed_at);
            let by_item = Mutation::new(item_user_key(item_id, user_id))
                .with_cell(REF_FAMILY, COL_SCORE, score)
                .with_cell(REF_FAMILY, COL_OBSERVED_AT, observed_at);
            writer.stage(RATINGS_BY_USER_TABLE, by_user);
            writer.stage(RATINGS_BY_ITEM_TABLE, by_item);
            summary.imported += 1;
            if writer.staged_len(RATINGS_BY_USER_TABLE) >= threshold
                || writer.staged_len(RATINGS_BY_ITEM_TABLE) >= threshold
            {
                flush_rating_batches(writer)?;
            }
            Ok(())
        })?;
        if let Err(err) = flush_rating_batches(&mut self.writer) {
            warn!(
                state = ?DualWriteState::Failed,
                imported = summary.imported,
                "rating import aborted on final flush"
            );
            return Err(err);
        }
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "rating import complete"
        );
        Ok(summary)
    }
}

/// Flush the two rating tables as one logical step, user table first.
///
/// On failure the state reached is logged; already-written batches are not
/// rolled back.
fn flush_rating_batches(writer: &mut BatchWriter) -> Result<DualWriteState, AccessError> {
    if let Err(err) = writer.flush_table(RATINGS_BY_USER_TABLE) {
        warn!(
            reached = ?DualWriteState::NotStarted,
            "rating flush failed; neither rating table was written"
        );
        return Err(err);
    }
    if let Err(err) = writer.flush_table(RATINGS_BY_ITEM_TABLE) {
        warn!(
            reached = ?DualWriteState::UserTableWritten,
            "rating flush failed partway; user table holds the batch, item table does not"
        );
        return Err(err);
    }
    debug!(reached = ?DualWriteState::BothWritten, "rating batch pair flushed");
    Ok(DualWriteState::BothWritten)
}

/// Strip a single pair of surrounding double quotes, leaving inner quoting
/// to the record source.
fn strip_surrounding_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}
