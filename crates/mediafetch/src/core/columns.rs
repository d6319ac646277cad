//! Defensive metadata column reading.
//!
//! The row returned by a content provider is loosely typed and its columns
//! vary by provider and platform version. Only three columns are of interest,
//! and each of them may be missing.

use crate::Result;
use crate::plugins::ContentQuery;
use crate::types::{FieldKey, FieldMap, FieldMapExt, ResourceRef};

pub const DISPLAY_NAME_COLUMN: &str = "_display_name";
pub const SIZE_COLUMN: &str = "_size";
pub const DATA_COLUMN: &str = "_data";

/// Metadata columns copied into the field map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    DisplayName,
    Size,
    Data,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::DisplayName, Column::Size, Column::Data];

    pub fn name(&self) -> &'static str {
        match self {
            Column::DisplayName => DISPLAY_NAME_COLUMN,
            Column::Size => SIZE_COLUMN,
            Column::Data => DATA_COLUMN,
        }
    }

    pub fn field_key(&self) -> FieldKey {
        match self {
            Column::DisplayName => FieldKey::Title,
            Column::Size => FieldKey::SizeBytes,
            Column::Data => FieldKey::Path,
        }
    }
}

/// Query the metadata row of `resource` and copy the known columns.
///
/// Missing columns, NULL values, an empty result set and no result set at all
/// simply leave keys out. The cursor is dropped before this returns, whether
/// reading succeeded or not.
///
/// # Errors
///
/// Errors from the query itself or from reading a present column are
/// returned unchanged; they are fatal to the fetch.
pub fn query_fields(query: &dyn ContentQuery, resource: &ResourceRef) -> Result<FieldMap> {
    let mut fields = FieldMap::new();

    let Some(mut cursor) = query.query(resource)? else {
        tracing::debug!(uri = %resource, "Query returned no result set");
        return Ok(fields);
    };

    if !cursor.move_to_first() {
        tracing::debug!(uri = %resource, "Query returned no rows");
        return Ok(fields);
    }

    for column in Column::ALL {
        let Some(index) = cursor.column_index(column.name()) else {
            tracing::trace!(uri = %resource, column = column.name(), "Column not provided");
            continue;
        };

        match column {
            Column::DisplayName | Column::Data => {
                if let Some(value) = cursor.get_string(index)? {
                    fields.set(column.field_key(), value);
                }
            }
            Column::Size => {
                if let Some(value) = cursor.get_i64(index)? {
                    fields.set(column.field_key(), value);
                }
            }
        }
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MediaFetchError;
    use crate::extraction::memory::{MemoryContentProvider, MemoryEntry, MemoryRow};

    fn uri() -> ResourceRef {
        ResourceRef::parse("content://media/external/images/media/42").unwrap()
    }

    #[test]
    fn test_all_columns_present() {
        let provider = MemoryContentProvider::new();
        provider.insert(
            uri(),
            MemoryEntry::with_bytes(Vec::new()).row(
                MemoryRow::new()
                    .text(DISPLAY_NAME_COLUMN, "IMG_0042.jpg")
                    .integer(SIZE_COLUMN, 123_456)
                    .text(DATA_COLUMN, "/storage/emulated/0/DCIM/IMG_0042.jpg"),
            ),
        );

        let fields = query_fields(&provider, &uri()).unwrap();
        assert_eq!(fields.get_str(FieldKey::Title), Some("IMG_0042.jpg"));
        assert_eq!(fields.get_i64(FieldKey::SizeBytes), Some(123_456));
        assert_eq!(
            fields.get_str(FieldKey::Path),
            Some("/storage/emulated/0/DCIM/IMG_0042.jpg")
        );
        assert!(provider.handle_counts().all_released());
    }

    #[test]
    fn test_missing_columns_are_omitted() {
        let provider = MemoryContentProvider::new();
        provider.insert(
            uri(),
            MemoryEntry::with_bytes(Vec::new()).row(MemoryRow::new().integer(SIZE_COLUMN, 10).text("mime_type", "x")),
        );

        let fields = query_fields(&provider, &uri()).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get_i64(FieldKey::SizeBytes), Some(10));
    }

    #[test]
    fn test_null_values_are_omitted() {
        let provider = MemoryContentProvider::new();
        provider.insert(
            uri(),
            MemoryEntry::with_bytes(Vec::new()).row(MemoryRow::new().null(DISPLAY_NAME_COLUMN).null(SIZE_COLUMN)),
        );

        let fields = query_fields(&provider, &uri()).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_no_result_set() {
        let provider = MemoryContentProvider::new();
        provider.insert(uri(), MemoryEntry::with_bytes(Vec::new()));

        let fields = query_fields(&provider, &uri()).unwrap();
        assert!(fields.is_empty());
        assert_eq!(provider.handle_counts().cursors_opened, 0);
    }

    #[test]
    fn test_empty_result_set_releases_cursor() {
        let provider = MemoryContentProvider::new();
        provider.insert(uri(), MemoryEntry::with_bytes(Vec::new()).empty_result());

        let fields = query_fields(&provider, &uri()).unwrap();
        assert!(fields.is_empty());
        let counts = provider.handle_counts();
        assert_eq!(counts.cursors_opened, 1);
        assert!(counts.all_released());
    }

    #[test]
    fn test_query_failure_propagates() {
        let provider = MemoryContentProvider::new();
        provider.insert(
            uri(),
            MemoryEntry::with_bytes(Vec::new()).failing_query("projection rejected"),
        );

        let err = query_fields(&provider, &uri()).unwrap_err();
        assert!(matches!(err, MediaFetchError::Query { .. }));
        assert!(err.to_string().contains("projection rejected"));
    }

    #[test]
    fn test_column_read_failure_releases_cursor() {
        let provider = MemoryContentProvider::new();
        provider.insert(
            uri(),
            MemoryEntry::with_bytes(Vec::new()).row(MemoryRow::new().text(SIZE_COLUMN, "twelve")),
        );

        let err = query_fields(&provider, &uri()).unwrap_err();
        assert!(matches!(err, MediaFetchError::Query { .. }));
        assert!(provider.handle_counts().all_released());
    }

    #[test]
    fn test_column_mapping() {
        assert_eq!(Column::DisplayName.field_key(), FieldKey::Title);
        assert_eq!(Column::Size.field_key(), FieldKey::SizeBytes);
        assert_eq!(Column::Data.field_key(), FieldKey::Path);
    }
}
