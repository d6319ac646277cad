//! In-memory content provider.
//!
//! Serves bytes and metadata rows registered up front. Every stream and
//! cursor it hands out is counted on open and on drop, so callers can check
//! that a fetch released everything it acquired.

use crate::plugins::{ContentQuery, ContentSource, QueryCursor};
use crate::types::ResourceRef;
use crate::{MediaFetchError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Value of one column in a [`MemoryRow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Null,
    Text(String),
    Integer(i64),
}

/// A loosely-typed metadata row: named columns in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRow {
    columns: Vec<(String, ColumnValue)>,
}

impl MemoryRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.column(name, ColumnValue::Text(value.into()))
    }

    pub fn integer(self, name: impl Into<String>, value: i64) -> Self {
        self.column(name, ColumnValue::Integer(value))
    }

    pub fn null(self, name: impl Into<String>) -> Self {
        self.column(name, ColumnValue::Null)
    }

    pub fn column(mut self, name: impl Into<String>, value: ColumnValue) -> Self {
        self.columns.push((name.into(), value));
        self
    }
}

#[derive(Debug, Clone)]
enum QueryBehavior {
    NoResult,
    Rows(Vec<MemoryRow>),
    Fail(String),
}

/// Registration for one resource.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    bytes: Option<Arc<[u8]>>,
    query: QueryBehavior,
}

impl MemoryEntry {
    /// Readable content; the query returns no result set until a row is set.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            bytes: Some(Arc::from(bytes)),
            query: QueryBehavior::NoResult,
        }
    }

    /// Content that fails to open.
    pub fn unreadable() -> Self {
        Self {
            bytes: None,
            query: QueryBehavior::NoResult,
        }
    }

    /// Query returns a result set holding `row`.
    pub fn row(mut self, row: MemoryRow) -> Self {
        self.query = QueryBehavior::Rows(vec![row]);
        self
    }

    /// Query returns a result set with no rows.
    pub fn empty_result(mut self) -> Self {
        self.query = QueryBehavior::Rows(Vec::new());
        self
    }

    /// Query fails with a `Query` error carrying `message`.
    pub fn failing_query(mut self, message: impl Into<String>) -> Self {
        self.query = QueryBehavior::Fail(message.into());
        self
    }
}

/// Open/release counters of handed-out handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandleCounts {
    pub streams_opened: usize,
    pub streams_released: usize,
    pub cursors_opened: usize,
    pub cursors_released: usize,
}

impl HandleCounts {
    pub fn all_released(&self) -> bool {
        self.streams_opened == self.streams_released && self.cursors_opened == self.cursors_released
    }
}

#[derive(Debug, Default)]
struct Counters {
    streams_opened: AtomicUsize,
    streams_released: AtomicUsize,
    cursors_opened: AtomicUsize,
    cursors_released: AtomicUsize,
}

/// Content provider backed by a map of registered resources.
#[derive(Debug, Default)]
pub struct MemoryContentProvider {
    entries: RwLock<HashMap<ResourceRef, MemoryEntry>>,
    counters: Arc<Counters>,
}

impl MemoryContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, resource: ResourceRef, entry: MemoryEntry) {
        self.entries.write().insert(resource, entry);
    }

    pub fn remove(&self, resource: &ResourceRef) -> Option<MemoryEntry> {
        self.entries.write().remove(resource)
    }

    pub fn handle_counts(&self) -> HandleCounts {
        HandleCounts {
            streams_opened: self.counters.streams_opened.load(Ordering::Acquire),
            streams_released: self.counters.streams_released.load(Ordering::Acquire),
            cursors_opened: self.counters.cursors_opened.load(Ordering::Acquire),
            cursors_released: self.counters.cursors_released.load(Ordering::Acquire),
        }
    }

    fn entry(&self, resource: &ResourceRef) -> Option<MemoryEntry> {
        self.entries.read().get(resource).cloned()
    }
}

impl ContentSource for MemoryContentProvider {
    fn open(&self, resource: &ResourceRef) -> Result<Box<dyn Read + Send + '_>> {
        let entry = self.entry(resource).ok_or_else(|| not_found(resource))?;
        let bytes = entry.bytes.ok_or_else(|| {
            MediaFetchError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("Cannot open {}", resource),
            ))
        })?;

        self.counters.streams_opened.fetch_add(1, Ordering::AcqRel);
        Ok(Box::new(MemoryStream {
            inner: Cursor::new(bytes),
            counters: Arc::clone(&self.counters),
        }))
    }
}

impl ContentQuery for MemoryContentProvider {
    fn query(&self, resource: &ResourceRef) -> Result<Option<Box<dyn QueryCursor + '_>>> {
        let entry = self.entry(resource).ok_or_else(|| not_found(resource))?;
        match entry.query {
            QueryBehavior::NoResult => Ok(None),
            QueryBehavior::Fail(message) => Err(MediaFetchError::query(message)),
            QueryBehavior::Rows(rows) => {
                self.counters.cursors_opened.fetch_add(1, Ordering::AcqRel);
                Ok(Some(Box::new(MemoryCursor {
                    rows,
                    position: None,
                    counters: Arc::clone(&self.counters),
                })))
            }
        }
    }
}

fn not_found(resource: &ResourceRef) -> MediaFetchError {
    MediaFetchError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("No content registered for {}", resource),
    ))
}

struct MemoryStream {
    inner: Cursor<Arc<[u8]>>,
    counters: Arc<Counters>,
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for MemoryStream {
    fn drop(&mut self) {
        self.counters.streams_released.fetch_add(1, Ordering::AcqRel);
    }
}

/// Cursor over registered rows.
pub struct MemoryCursor {
    rows: Vec<MemoryRow>,
    position: Option<usize>,
    counters: Arc<Counters>,
}

impl MemoryCursor {
    /// Cursor whose release is not tracked by any provider.
    pub(crate) fn untracked(rows: Vec<MemoryRow>) -> Self {
        Self {
            rows,
            position: None,
            counters: Arc::new(Counters::default()),
        }
    }

    fn value(&self, index: usize) -> Result<&ColumnValue> {
        let row = self
            .position
            .and_then(|position| self.rows.get(position))
            .ok_or_else(|| MediaFetchError::query("Cursor is not positioned on a row"))?;
        row.columns
            .get(index)
            .map(|(_, value)| value)
            .ok_or_else(|| MediaFetchError::query(format!("Column index {} out of range", index)))
    }
}

impl QueryCursor for MemoryCursor {
    fn move_to_first(&mut self) -> bool {
        self.position = if self.rows.is_empty() { None } else { Some(0) };
        self.position.is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.rows
            .first()?
            .columns
            .iter()
            .position(|(column, _)| column == name)
    }

    fn get_string(&self, index: usize) -> Result<Option<String>> {
        Ok(match self.value(index)? {
            ColumnValue::Null => None,
            ColumnValue::Text(text) => Some(text.clone()),
            ColumnValue::Integer(value) => Some(value.to_string()),
        })
    }

    fn get_i64(&self, index: usize) -> Result<Option<i64>> {
        match self.value(index)? {
            ColumnValue::Null => Ok(None),
            ColumnValue::Integer(value) => Ok(Some(*value)),
            ColumnValue::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| MediaFetchError::query_with_source(format!("Column {} is not an integer", index), e)),
        }
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        self.counters.cursors_released.fetch_add(1, Ordering::AcqRel);
    }
}
