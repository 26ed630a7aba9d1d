//! Store capability and mutation/row value types.
//!
//! Ownership model:
//! - [`Store`] is the crate-facing interface of the external wide-column
//!   store; implementations own the connection and serialize per-row writes.
//! - [`Mutation`] and [`StoreRow`] are the in-memory shapes this layer owns
//!   while staging writes and decoding reads; all key and value encoding
//!   happens on this side of the trait.
//! - [`MemoryStore`] is an in-process implementation backed by ordered maps,
//!   used by tests and demos.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::errors::AccessError;
use crate::types::{FamilyName, Qualifier, RowKeyBytes};

/// One column value staged for a row write.
#[derive(Clone, Debug)]
pub struct Cell {
    /// Column family the value belongs to.
    pub family: FamilyName,
    /// Column qualifier within the family.
    pub qualifier: Qualifier,
    /// Raw value bytes.
    pub value: Vec<u8>,
}

/// A staged write against one row: the row key plus its column values.
///
/// The store applies a whole mutation atomically (single-row atomicity is the
/// only guarantee the store offers).
#[derive(Clone, Debug)]
pub struct Mutation {
    /// Row key the cells are written under.
    pub row_key: RowKeyBytes,
    /// Column values written to the row.
    pub cells: Vec<Cell>,
}

impl Mutation {
    /// Start a mutation for `row_key` with no cells.
    pub fn new(row_key: RowKeyBytes) -> Self {
        Self {
            row_key,
            cells: Vec::new(),
        }
    }

    /// Append one text-valued cell.
    pub fn with_cell(mut self, family: &str, qualifier: &str, value: &str) -> Self {
        self.cells.push(Cell {
            family: family.to_string(),
            qualifier: qualifier.to_string(),
            value: value.as_bytes().to_vec(),
        });
        self
    }
}

/// One row returned by a point get or a prefix scan.
#[derive(Clone, Debug, Default)]
pub struct StoreRow {
    row_key: RowKeyBytes,
    cells: BTreeMap<(FamilyName, Qualifier), Vec<u8>>,
}

impl StoreRow {
    /// Build a row for `row_key` with no cells.
    pub fn new(row_key: RowKeyBytes) -> Self {
        Self {
            row_key,
            cells: BTreeMap::new(),
        }
    }

    /// Raw row key bytes.
    pub fn row_key(&self) -> &[u8] {
        &self.row_key
    }

    /// Row key decoded as text (lossy for non-UTF-8 keys).
    pub fn key_text(&self) -> String {
        String::from_utf8_lossy(&self.row_key).into_owned()
    }

    /// Insert one cell value.
    pub fn insert_cell(&mut self, family: &str, qualifier: &str, value: Vec<u8>) {
        self.cells
            .insert((family.to_string(), qualifier.to_string()), value);
    }

    /// Text value of one cell, or the empty string when the cell is absent.
    ///
    /// Missing columns decode to empty strings rather than errors so a row
    /// written with fewer columns never yields a partial-record failure.
    pub fn text_value(&self, family: &str, qualifier: &str) -> String {
        self.cells
            .get(&(family.to_string(), qualifier.to_string()))
            .map(|value| String::from_utf8_lossy(value).into_owned())
            .unwrap_or_default()
    }

    /// True when the row carries no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Wide-column store capability consumed by every component of this crate.
///
/// The two native access paths are exact-key `get` and ordered key-prefix
/// `scan_prefix`; all keys and values are raw byte strings and this layer
/// owns their encoding. Handles are shared (`Arc<dyn Store>`) and safe for
/// concurrent readers; the store serializes per-row mutations on its own.
pub trait Store: Send + Sync {
    /// Create `table` with the given column families.
    ///
    /// Non-empty `split_points` pre-split the keyspace at those sorted
    /// boundaries, one region per interval.
    fn create_table(
        &self,
        table: &str,
        families: &[&str],
        split_points: &[RowKeyBytes],
    ) -> Result<(), AccessError>;

    /// True when `table` already exists.
    fn table_exists(&self, table: &str) -> Result<bool, AccessError>;

    /// Point lookup by exact key, optionally restricted to one family.
    ///
    /// Returns `Ok(None)` when the row does not exist or carries no cells in
    /// the requested family.
    fn get(
        &self,
        table: &str,
        key: &[u8],
        family: Option<&str>,
    ) -> Result<Option<StoreRow>, AccessError>;

    /// Write a batch of mutations in one round trip.
    ///
    /// A failure fails the whole batch; there is no partial-batch result.
    fn put_all(&self, table: &str, mutations: &[Mutation]) -> Result<(), AccessError>;

    /// Ordered scan of every row whose key starts with `prefix`.
    ///
    /// `family`/`qualifier` restrict the returned cells to cut transferred
    /// bytes; rows with no matching cells are omitted. Results follow the
    /// store's native lexicographic key order.
    fn scan_prefix(
        &self,
        table: &str,
        prefix: &[u8],
        family: Option<&str>,
        qualifier: Option<&str>,
    ) -> Result<Vec<StoreRow>, AccessError>;
}

type CellMap = BTreeMap<(FamilyName, Qualifier), Vec<u8>>;

struct MemoryTable {
    families: Vec<FamilyName>,
    // BTreeMap keys give the lexicographic ordering prefix scans rely on.
    rows: BTreeMap<RowKeyBytes, CellMap>,
}

/// In-process [`Store`] backed by ordered maps.
///
/// Faithful to the external store's contract: exact-key get, lexicographic
/// prefix scan, last-write-wins overwrite per cell, and rejection of writes
/// to undeclared tables or column families. Pre-split boundaries are accepted
/// and ignored (a single process has no regions to balance).
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, MemoryTable>>,
}

impl MemoryStore {
    /// Create an empty store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored in `table` (test/diagnostic helper).
    pub fn row_count(&self, table: &str) -> usize {
        let tables = self.tables.read().expect("memory store poisoned");
        tables.get(table).map(|t| t.rows.len()).unwrap_or(0)
    }
}

impl Store for MemoryStore {
    fn create_table(
        &self,
        table: &str,
        families: &[&str],
        _split_points: &[RowKeyBytes],
    ) -> Result<(), AccessError> {
        let mut tables = self.tables.write().expect("memory store poisoned");
        if tables.contains_key(table) {
            return Err(AccessError::store(table, "table already exists"));
        }
        tables.insert(
            table.to_string(),
            MemoryTable {
                families: families.iter().map(|f| f.to_string()).collect(),
                rows: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn table_exists(&self, table: &str) -> Result<bool, AccessError> {
        let tables = self.tables.read().expect("memory store poisoned");
        Ok(tables.contains_key(table))
    }

    fn get(
        &self,
        table: &str,
        key: &[u8],
        family: Option<&str>,
    ) -> Result<Option<StoreRow>, AccessError> {
        let tables = self.tables.read().expect("memory store poisoned");
        let found = tables
            .get(table)
            .ok_or_else(|| AccessError::store(table, "table does not exist"))?;
        let Some(cells) = found.rows.get(key) else {
            return Ok(None);
        };
        let row = project_row(key, cells, family, None);
        if row.is_empty() { Ok(None) } else { Ok(Some(row)) }
    }

    fn put_all(&self, table: &str, mutations: &[Mutation]) -> Result<(), AccessError> {
        let mut tables = self.tables.write().expect("memory store poisoned");
        let found = tables
            .get_mut(table)
            .ok_or_else(|| AccessError::store(table, "table does not exist"))?;
        for mutation in mutations {
            for cell in &mutation.cells {
                if !found.families.contains(&cell.family) {
                    return Err(AccessError::store(
                        table,
                        format!("unknown column family '{}'", cell.family),
                    ));
                }
            }
            let row = found.rows.entry(mutation.row_key.clone()).or_default();
            for cell in &mutation.cells {
                row.insert(
                    (cell.family.clone(), cell.qualifier.clone()),
                    cell.value.clone(),
                );
            }
        }
        Ok(())
    }

    fn scan_prefix(
        &self,
        table: &str,
        prefix: &[u8],
        family: Option<&str>,
        qualifier: Option<&str>,
    ) -> Result<Vec<StoreRow>, AccessError> {
        let tables = self.tables.read().expect("memory store poisoned");
        let found = tables
            .get(table)
            .ok_or_else(|| AccessError::store(table, "table does not exist"))?;
        let mut rows = Vec::new();
        for (key, cells) in found.rows.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            let row = project_row(key, cells, family, qualifier);
            if !row.is_empty() {
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

fn project_row(
    key: &[u8],
    cells: &CellMap,
    family: Option<&str>,
    qualifier: Option<&str>,
) -> StoreRow {
    let mut row = StoreRow::new(key.to_vec());
    for ((cell_family, cell_qualifier), value) in cells {
        if family.is_some_and(|f| f != cell_family.as_str()) {
            continue;
        }
        if qualifier.is_some_and(|q| q != cell_qualifier.as_str()) {
            continue;
        }
        row.insert_cell(cell_family, cell_qualifier, value.clone());
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_table("t", &["a", "b"], &[])
            .expect("create table");
        let mutations = vec![
            Mutation::new(b"12_7".to_vec()).with_cell("a", "x", "one"),
            Mutation::new(b"123_7".to_vec()).with_cell("a", "x", "two"),
            Mutation::new(b"12_9".to_vec()).with_cell("b", "y", "three"),
        ];
        store.put_all("t", &mutations).expect("put batch");
        store
    }

    #[test]
    fn scan_is_ordered_and_prefix_bounded() {
        let store = seeded_store();
        let rows = store
            .scan_prefix("t", b"12_", None, None)
            .expect("scan succeeds");
        let keys: Vec<String> = rows.iter().map(StoreRow::key_text).collect();
        assert_eq!(keys, vec!["12_7", "12_9"]);
    }

    #[test]
    fn family_projection_drops_cellless_rows() {
        let store = seeded_store();
        let rows = store
            .scan_prefix("t", b"12_", Some("a"), None)
            .expect("scan succeeds");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key_text(), "12_7");

        // Row exists but has no cells in family "b".
        assert!(
            store
                .get("t", b"12_7", Some("b"))
                .expect("get succeeds")
                .is_none()
        );
    }

    #[test]
    fn put_overwrites_by_key() {
        let store = seeded_store();
        let overwrite = vec![Mutation::new(b"12_7".to_vec()).with_cell("a", "x", "updated")];
        store.put_all("t", &overwrite).expect("put batch");
        let row = store
            .get("t", b"12_7", Some("a"))
            .expect("get succeeds")
            .expect("row present");
        assert_eq!(row.text_value("a", "x"), "updated");
    }

    #[test]
    fn unknown_family_rejects_whole_batch() {
        let store = seeded_store();
        let bad = vec![Mutation::new(b"k".to_vec()).with_cell("nope", "x", "v")];
        assert!(store.put_all("t", &bad).is_err());
    }

    #[test]
    fn missing_cell_reads_as_empty_string() {
        let store = seeded_store();
        let row = store
            .get("t", b"12_7", None)
            .expect("get succeeds")
            .expect("row present");
        assert_eq!(row.text_value("a", "missing"), "");
    }
}
