//! The three fixed read patterns over the denormalized tables.
//!
//! All operations are pure reads over a shared store handle and are safe to
//! invoke concurrently. Not-found surfaces as `None` or an empty sequence,
//! never as an error; only store transport failures propagate as `Err`.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::constants::query::{MISSING_ID_TITLE, MISSING_TITLE, unresolved_title};
use crate::constants::schema::{
    COL_CATEGORIES, COL_ITEM_ID, COL_OBSERVED_AT, COL_SCORE, COL_TITLE, ID_TO_TITLE_TABLE,
    INDEX_FAMILY, INFO_FAMILY, ITEMS_BY_TITLE_TABLE, RATINGS_BY_ITEM_TABLE,
    RATINGS_BY_USER_TABLE, REF_FAMILY, SCORE_FAMILY,
};
use crate::errors::AccessError;
use crate::keys::{id_key, scan_prefix, split_prefixed_key, title_key};
use crate::store::Store;
use crate::types::{Categories, ItemId, Title, UserId};

/// Item detail reconstructed from one `items_by_title` row.
///
/// Missing columns decode as empty strings, never as a partial-record error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemDetail {
    /// Item title (the row key).
    pub title: Title,
    /// Item domain identifier.
    pub id: ItemId,
    /// Serialized category tags.
    pub categories: Categories,
}

/// One rating from a user-prefix scan, with the item title resolved through
/// the id-to-title index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserRating {
    /// User who produced the rating.
    pub user_id: UserId,
    /// Rated item id, decoded from the row-key suffix.
    pub item_id: ItemId,
    /// Resolved item title, or a placeholder describing the unresolved id.
    pub item_title: Title,
    /// Decimal score as stored text.
    pub score: String,
    /// Observation timestamp as stored text.
    pub observed_at: String,
}

/// One rating from an item-prefix scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemRating {
    /// Rated item title as queried.
    pub item_title: Title,
    /// Rated item id resolved from the title.
    pub item_id: ItemId,
    /// User decoded from the row-key suffix.
    pub user_id: UserId,
    /// Decimal score as stored text.
    pub score: String,
    /// Observation timestamp as stored text.
    pub observed_at: String,
}

/// Read-side engine chaining point lookups and prefix scans.
pub struct QueryEngine {
    store: Arc<dyn Store>,
}

impl QueryEngine {
    /// Build an engine over an owned store handle.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Point lookup of one item by exact title (after trim).
    ///
    /// Returns `Ok(None)` for a blank title or a missing row.
    pub fn item_detail(&self, title: &str) -> Result<Option<ItemDetail>, AccessError> {
        let title = title.trim();
        if title.is_empty() {
            warn!("item detail requested with empty title");
            return Ok(None);
        }
        let Some(row) =
            self.store
                .get(ITEMS_BY_TITLE_TABLE, &title_key(title), Some(INFO_FAMILY))?
        else {
            info!(title, "no item found for title");
            return Ok(None);
        };
        Ok(Some(ItemDetail {
            title: title.to_string(),
            id: row.text_value(INFO_FAMILY, COL_ITEM_ID),
            categories: row.text_value(INFO_FAMILY, COL_CATEGORIES),
        }))
    }

    /// All ratings one user has produced, in the store's key order
    /// (lexicographic over the item id as a byte string).
    pub fn ratings_by_user(&self, user_id: &str) -> Result<Vec<UserRating>, AccessError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            warn!("user ratings requested with empty user id");
            return Ok(Vec::new());
        }
        let rows = self.store.scan_prefix(
            RATINGS_BY_USER_TABLE,
            &scan_prefix(user_id),
            Some(SCORE_FAMILY),
            None,
        )?;
        let mut ratings = Vec::with_capacity(rows.len());
        for row in rows {
            let Some((_, item_id)) = split_prefixed_key(row.row_key()) else {
                warn!(key = %row.key_text(), "skipping rating row with malformed key");
                continue;
            };
            let item_title = self.title_for_item_id(&item_id)?;
            ratings.push(UserRating {
                user_id: user_id.to_string(),
                item_id,
                item_title,
                score: row.text_value(SCORE_FAMILY, COL_SCORE),
                observed_at: row.text_value(SCORE_FAMILY, COL_OBSERVED_AT),
            });
        }
        info!(user_id, count = ratings.len(), "user ratings query complete");
        Ok(ratings)
    }

    /// All ratings one item has received, located by title, in the store's
    /// key order (lexicographic over the user id as a byte string).
    ///
    /// Returns an empty sequence when the title resolves to no item.
    pub fn ratings_by_item(&self, title: &str) -> Result<Vec<ItemRating>, AccessError> {
        let title = title.trim();
        if title.is_empty() {
            warn!("item ratings requested with empty title");
            return Ok(Vec::new());
        }
        let Some(item_id) = self.item_id_for_title(title)? else {
            info!(title, "no item id resolvable for title, returning no ratings");
            return Ok(Vec::new());
        };
        let rows = self.store.scan_prefix(
            RATINGS_BY_ITEM_TABLE,
            &scan_prefix(&item_id),
            Some(REF_FAMILY),
            None,
        )?;
        let mut ratings = Vec::with_capacity(rows.len());
        for row in rows {
            let Some((_, user_id)) = split_prefixed_key(row.row_key()) else {
                warn!(key = %row.key_text(), "skipping rating row with malformed key");
                continue;
            };
            ratings.push(ItemRating {
                item_title: title.to_string(),
                item_id: item_id.clone(),
                user_id,
                score: row.text_value(REF_FAMILY, COL_SCORE),
                observed_at: row.text_value(REF_FAMILY, COL_OBSERVED_AT),
            });
        }
        info!(title, count = ratings.len(), "item ratings query complete");
        Ok(ratings)
    }

    /// Resolve a title from the id-to-title index, falling back to a
    /// placeholder describing the unresolved id.
    fn title_for_item_id(&self, item_id: &str) -> Result<Title, AccessError> {
        let item_id = item_id.trim();
        if item_id.is_empty() {
            return Ok(MISSING_ID_TITLE.to_string());
        }
        match self
            .store
            .get(ID_TO_TITLE_TABLE, &id_key(item_id), Some(INDEX_FAMILY))?
        {
            Some(row) => {
                let title = row.text_value(INDEX_FAMILY, COL_TITLE);
                if title.is_empty() {
                    Ok(MISSING_TITLE.to_string())
                } else {
                    Ok(title)
                }
            }
            None => Ok(unresolved_title(item_id)),
        }
    }

    /// Resolve a trimmed title to its item id via the items table.
    fn item_id_for_title(&self, title: &str) -> Result<Option<ItemId>, AccessError> {
        let Some(row) =
            self.store
                .get(ITEMS_BY_TITLE_TABLE, &title_key(title), Some(INFO_FAMILY))?
        else {
            return Ok(None);
        };
        let item_id = row.text_value(INFO_FAMILY, COL_ITEM_ID);
        if item_id.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(item_id.trim().to_string()))
        }
    }
}
