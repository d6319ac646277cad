//! Access to the content-indexing service.

use crate::Result;
use crate::types::ResourceRef;
use std::io::Read;

/// Opens byte streams for resources.
///
/// Streams may be one-shot (a pipe from another process, an MMS part). Use a
/// [`PreviewMaterializer`](crate::plugins::PreviewMaterializer) when the bytes
/// must be read more than once.
pub trait ContentSource: Send + Sync {
    /// Open a fresh stream positioned at the first byte.
    ///
    /// # Errors
    ///
    /// `MediaFetchError::Io` when the resource cannot be opened,
    /// `MediaFetchError::UnsupportedScheme` when this source does not serve it.
    fn open(&self, resource: &ResourceRef) -> Result<Box<dyn Read + Send + '_>>;
}

/// Row-oriented metadata lookup.
///
/// Queries are always issued without a column projection: some providers
/// reject a projection naming columns they do not carry, so the caller asks
/// for everything and probes for the columns it cares about.
pub trait ContentQuery: Send + Sync {
    /// Query the metadata row of a resource.
    ///
    /// `Ok(None)` means the provider returned no result set at all, which is a
    /// normal outcome. The returned cursor is released when dropped.
    ///
    /// # Errors
    ///
    /// Any error here is fatal to the fetch.
    fn query(&self, resource: &ResourceRef) -> Result<Option<Box<dyn QueryCursor + '_>>>;
}

/// Cursor over a loosely-typed result set.
///
/// Columns are looked up by name; an absent column is `None`, never an error.
pub trait QueryCursor {
    /// Move to the first row, returning false when the result set is empty.
    fn move_to_first(&mut self) -> bool;

    /// Index of a named column, if the provider carries it.
    fn column_index(&self, name: &str) -> Option<usize>;

    /// Read a column of the current row as text. `Ok(None)` is SQL NULL.
    fn get_string(&self, index: usize) -> Result<Option<String>>;

    /// Read a column of the current row as an integer. `Ok(None)` is SQL NULL.
    fn get_i64(&self, index: usize) -> Result<Option<i64>>;
}
