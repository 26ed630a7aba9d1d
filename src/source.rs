//! Record sources feeding the import pipeline.
//!
//! A source produces a lazy, finite sequence of fielded records with
//! named-field access. Quoting and unescaping of CSV mechanics are the
//! source's concern; deciding what a malformed record means is the import
//! pipeline's. A header line, when present, is consumed before the first
//! data record and never reaches the visitor.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::AccessError;

/// One record with named-field access against its source's header row.
///
/// A short record simply lacks trailing fields; `field` returns `None` for
/// them rather than failing, so the import pipeline can count the skip.
#[derive(Clone, Debug)]
pub struct FieldedRecord {
    headers: Arc<Vec<String>>,
    values: Vec<String>,
}

impl FieldedRecord {
    /// Build a record over `headers` with positional `values`.
    pub fn new(headers: Arc<Vec<String>>, values: Vec<String>) -> Self {
        Self { headers, values }
    }

    /// Value of the field named `name`, or `None` when the header is unknown
    /// or the record is too short to carry it.
    pub fn field(&self, name: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|header| header == name)?;
        self.values.get(idx).map(String::as_str)
    }

    /// Number of values the record actually carries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the record carries no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Visitor-style record stream consumed exactly once per call.
pub trait RecordSource {
    /// Drive `visit` over every data record in order.
    ///
    /// A visitor error aborts the stream and propagates; source-level errors
    /// (I/O, irrecoverable parse state) surface as [`AccessError::Source`].
    fn for_each_record(
        &mut self,
        visit: &mut dyn FnMut(&FieldedRecord) -> Result<(), AccessError>,
    ) -> Result<(), AccessError>;
}

/// CSV-file-backed record source using the first row as headers.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    /// Open a source over `path`, failing fast when the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AccessError> {
        let path = path.into();
        if !path.is_file() {
            return Err(AccessError::Configuration(format!(
                "data file does not exist: {}",
                path.display()
            )));
        }
        Ok(Self { path })
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvFileSource {
    fn for_each_record(
        &mut self,
        visit: &mut dyn FnMut(&FieldedRecord) -> Result<(), AccessError>,
    ) -> Result<(), AccessError> {
        let file = File::open(&self.path)?;
        // flexible: short rows flow through as short records so the import
        // pipeline can skip-count them instead of the parse aborting.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        let headers: Arc<Vec<String>> = Arc::new(
            reader
                .headers()
                .map_err(|err| AccessError::Source(err.to_string()))?
                .iter()
                .map(|header| header.trim().to_string())
                .collect(),
        );
        for result in reader.records() {
            let row = result.map_err(|err| AccessError::Source(err.to_string()))?;
            let values: Vec<String> = row.iter().map(|value| value.to_string()).collect();
            let record = FieldedRecord::new(headers.clone(), values);
            visit(&record)?;
        }
        Ok(())
    }
}

/// In-memory record source for tests and demos.
pub struct InMemorySource {
    headers: Arc<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl InMemorySource {
    /// Build a source over `headers` and positional `rows`.
    pub fn new(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: Arc::new(headers.iter().map(|h| h.to_string()).collect()),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| v.to_string()).collect())
                .collect(),
        }
    }
}

impl RecordSource for InMemorySource {
    fn for_each_record(
        &mut self,
        visit: &mut dyn FnMut(&FieldedRecord) -> Result<(), AccessError>,
    ) -> Result<(), AccessError> {
        for row in &self.rows {
            let record = FieldedRecord::new(self.headers.clone(), row.clone());
            visit(&record)?;
        }
        Ok(())
    }
}
