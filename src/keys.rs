//! Row-key codec: the single source of truth for composite key layout.
//!
//! Every writer and reader of the rating tables goes through these functions
//! so the two key orderings stay in sync. All functions are pure and perform
//! no validation: components containing the separator are not rejected, and
//! `split_prefixed_key` splits at the *first* separator, so such components
//! silently decode wrong. Callers must pre-validate.

use crate::constants::keys::KEY_SEPARATOR;
use crate::types::RowKeyBytes;

/// Encode the `ratings_by_user` row key: `userId` + separator + `itemId`.
pub fn user_item_key(user_id: &str, item_id: &str) -> RowKeyBytes {
    join_components(user_id, item_id)
}

/// Encode the `ratings_by_item` row key: `itemId` + separator + `userId`.
pub fn item_user_key(item_id: &str, user_id: &str) -> RowKeyBytes {
    join_components(item_id, user_id)
}

/// Encode the `items_by_title` row key: the trimmed title itself.
pub fn title_key(title: &str) -> RowKeyBytes {
    title.trim().as_bytes().to_vec()
}

/// Encode the `id_to_title` row key: the trimmed item id itself.
pub fn id_key(id: &str) -> RowKeyBytes {
    id.trim().as_bytes().to_vec()
}

/// Build the scan prefix for one leading component: the component plus the
/// trailing separator.
///
/// The trailing separator is what keeps a scan for user `12` from matching
/// rows of user `123`.
pub fn scan_prefix(component: &str) -> RowKeyBytes {
    let mut prefix = component.trim().as_bytes().to_vec();
    prefix.extend_from_slice(KEY_SEPARATOR.as_bytes());
    prefix
}

/// Split a composite row key at the first separator.
///
/// Returns `(prefix, suffix)` where the suffix is everything after the first
/// separator, or `None` when the key contains no separator at all.
pub fn split_prefixed_key(key: &[u8]) -> Option<(String, String)> {
    let text = String::from_utf8_lossy(key);
    let at = text.find(KEY_SEPARATOR)?;
    let prefix = text[..at].to_string();
    let suffix = text[at + KEY_SEPARATOR.len()..].to_string();
    Some((prefix, suffix))
}

fn join_components(first: &str, second: &str) -> RowKeyBytes {
    let mut key = Vec::with_capacity(first.len() + KEY_SEPARATOR.len() + second.len());
    key.extend_from_slice(first.as_bytes());
    key.extend_from_slice(KEY_SEPARATOR.as_bytes());
    key.extend_from_slice(second.as_bytes());
    key
}
