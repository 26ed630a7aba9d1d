/// Constants used by the row-key codec.
pub mod keys {
    /// Separator joining composite row-key components (for example `1_318`).
    ///
    /// Must never occur inside a key component; the codec splits at the first
    /// occurrence and does not validate embedded separators.
    pub const KEY_SEPARATOR: &str = "_";
}

/// Constants shared byte-for-byte between the write path and the read path.
pub mod schema {
    /// Table keyed by item title, holding item id and categories.
    pub const ITEMS_BY_TITLE_TABLE: &str = "items_by_title";
    /// Table keyed by `userId_itemId`, scanned by user prefix.
    pub const RATINGS_BY_USER_TABLE: &str = "ratings_by_user";
    /// Table keyed by `itemId_userId`, scanned by item prefix.
    pub const RATINGS_BY_ITEM_TABLE: &str = "ratings_by_item";
    /// Secondary index table keyed by item id, resolving ids back to titles.
    pub const ID_TO_TITLE_TABLE: &str = "id_to_title";

    /// Column family for item detail columns.
    pub const INFO_FAMILY: &str = "info";
    /// Column family for user-keyed rating columns.
    pub const SCORE_FAMILY: &str = "score";
    /// Column family for item-keyed rating columns.
    pub const REF_FAMILY: &str = "ref";
    /// Column family for the id-to-title index column.
    pub const INDEX_FAMILY: &str = "idx";

    /// Qualifier holding an item's domain identifier.
    pub const COL_ITEM_ID: &str = "id";
    /// Qualifier holding an item's serialized category tags.
    pub const COL_CATEGORIES: &str = "categories";
    /// Qualifier holding a rating's decimal score (stored as text).
    pub const COL_SCORE: &str = "score";
    /// Qualifier holding a rating's observation timestamp (stored as text).
    pub const COL_OBSERVED_AT: &str = "observed_at";
    /// Qualifier holding a title in the id-to-title index.
    pub const COL_TITLE: &str = "title";

    /// Pre-split boundaries for the two rating tables, sized for the expected
    /// numeric identifier range. Five regions spread bulk-import write load
    /// across the id range instead of hot-spotting a single region. Title keys
    /// are not monotonic, so the items table needs no pre-split.
    pub const RATING_SPLIT_POINTS: [&str; 4] = ["20000_", "40000_", "60000_", "80000_"];
}

/// Constants used by the import pipeline and record sources.
pub mod import {
    /// Default number of staged mutations per table before a batch is flushed.
    pub const DEFAULT_BATCH_THRESHOLD: usize = 1000;

    /// Header name for the item identifier field.
    pub const FIELD_ITEM_ID: &str = "itemId";
    /// Header name for the item title field.
    pub const FIELD_TITLE: &str = "title";
    /// Header name for the item categories field.
    pub const FIELD_CATEGORIES: &str = "categories";
    /// Header name for the rating user identifier field.
    pub const FIELD_USER_ID: &str = "userId";
    /// Header name for the rating score field.
    pub const FIELD_SCORE: &str = "score";
    /// Header name for the rating observation timestamp field.
    pub const FIELD_OBSERVED_AT: &str = "observedAt";

    /// Environment variable naming the items CSV path for demo runners.
    pub const ITEMS_PATH_ENV: &str = "WIDETABLE_ITEMS_PATH";
    /// Environment variable naming the ratings CSV path for demo runners.
    pub const RATINGS_PATH_ENV: &str = "WIDETABLE_RATINGS_PATH";
}

/// Constants used by the query engine.
pub mod query {
    /// Placeholder title used when a rating row key carries an empty item id.
    pub const MISSING_ID_TITLE: &str = "unknown item (missing id)";
    /// Placeholder title used when the index row exists but its title cell is empty.
    pub const MISSING_TITLE: &str = "unknown item (missing title)";

    /// Placeholder title describing an id the id-to-title index cannot resolve.
    pub fn unresolved_title(item_id: &str) -> String {
        format!("unknown item (id: {item_id})")
    }
}
