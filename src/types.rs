/// Domain identifier of the user who produced a rating.
/// Examples: `1`, `42871`
pub type UserId = String;
/// Domain identifier of a rated item.
/// Examples: `1`, `318`
pub type ItemId = String;
/// Display name of an item, also used as the primary row key of the items table.
/// Example: `Toy Story (1995)`
pub type Title = String;
/// Ordered category tags serialized as a delimited string.
/// Example: `Animation|Comedy`
pub type Categories = String;
/// Name of a physical table owned by the store.
/// Examples: `items_by_title`, `ratings_by_user`
pub type TableName = String;
/// Name of a column family within a table.
/// Examples: `info`, `score`
pub type FamilyName = String;
/// Column qualifier within a column family.
/// Examples: `id`, `observed_at`
pub type Qualifier = String;
/// Raw row key bytes as the store sees them.
/// Example: `b"1_318"`
pub type RowKeyBytes = Vec<u8>;
