//! Content provider for `file://` references.

use crate::core::columns::{DATA_COLUMN, DISPLAY_NAME_COLUMN, SIZE_COLUMN};
use crate::extraction::memory::{MemoryCursor, MemoryRow};
use crate::plugins::{ContentQuery, ContentSource, QueryCursor};
use crate::types::ResourceRef;
use crate::{MediaFetchError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file";

/// Serves local files addressed as `file:///absolute/path`.
///
/// The metadata row carries the display name (file name), size and absolute
/// path, like a media index row for the same file would.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileContentProvider;

impl FileContentProvider {
    pub fn new() -> Self {
        Self
    }

    /// Build a `file://` reference for a local path.
    pub fn resource_for(path: impl AsRef<Path>) -> Result<ResourceRef> {
        let path = std::path::absolute(path.as_ref())?;
        ResourceRef::parse(format!("file://{}", percent_encode(&path.to_string_lossy())))
    }

    /// Local path addressed by a `file://` reference.
    pub fn path_of(resource: &ResourceRef) -> Result<PathBuf> {
        if !resource.scheme().eq_ignore_ascii_case(FILE_SCHEME) {
            return Err(MediaFetchError::UnsupportedScheme(resource.scheme().to_string()));
        }

        let rest = &resource.as_str()[FILE_SCHEME.len() + 1..];
        let rest = rest.strip_prefix("//localhost").or_else(|| rest.strip_prefix("//")).unwrap_or(rest);
        let path = PathBuf::from(percent_decode(rest)?);
        if !path.is_absolute() {
            return Err(MediaFetchError::validation(format!(
                "File reference is not absolute: {}",
                resource
            )));
        }
        Ok(path)
    }
}

impl ContentSource for FileContentProvider {
    fn open(&self, resource: &ResourceRef) -> Result<Box<dyn Read + Send + '_>> {
        let file = File::open(Self::path_of(resource)?)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

impl ContentQuery for FileContentProvider {
    fn query(&self, resource: &ResourceRef) -> Result<Option<Box<dyn QueryCursor + '_>>> {
        let path = Self::path_of(resource)?;
        let metadata = std::fs::metadata(&path)
            .map_err(|e| MediaFetchError::query_with_source(format!("Failed to stat {}", path.display()), e))?;
        if !metadata.is_file() {
            return Ok(None);
        }

        let mut row = MemoryRow::new();
        if let Some(name) = path.file_name() {
            row = row.text(DISPLAY_NAME_COLUMN, name.to_string_lossy());
        }
        row = row
            .integer(SIZE_COLUMN, size_column(metadata.len())?)
            .text(DATA_COLUMN, path.to_string_lossy());

        Ok(Some(Box::new(MemoryCursor::untracked(vec![row]))))
    }
}

fn percent_encode(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

fn percent_decode(value: &str) -> Result<String> {
    let bytes = value.as_bytes();
    let malformed = bytes.iter().enumerate().any(|(i, byte)| {
        *byte == b'%'
            && !bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    });
    if malformed {
        return Err(MediaFetchError::validation(format!("Invalid percent escape in {}", value)));
    }

    String::from_utf8(urlencoding::decode_binary(bytes).into_owned())
        .map_err(|e| MediaFetchError::validation_with_source("Path is not UTF-8", e))
}

fn size_column(len: u64) -> Result<i64> {
    i64::try_from(len).map_err(|e| MediaFetchError::query_with_source(format!("File size {} out of range", len), e))
}
