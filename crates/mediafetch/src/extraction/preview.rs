//! Temporary-file previews.
//!
//! Content streams may not be seekable or re-openable, and sniffers expect a
//! plain readable file. A preview copies the head of the resource into a
//! named temporary file that is deleted when the preview is dropped.

use crate::core::config::FetchConfig;
use crate::plugins::{ContentSource, LocalPreview, PreviewMaterializer};
use crate::types::ResourceRef;
use crate::{MediaFetchError, Result};
use std::io::{BufReader, Read, Write};
use tempfile::NamedTempFile;

const PREVIEW_PREFIX: &str = "mediafetch-preview-";

/// Materializes previews as temporary files in `FetchConfig::preview_dir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TempFilePreviewMaterializer;

impl PreviewMaterializer for TempFilePreviewMaterializer {
    fn materialize(
        &self,
        source: &dyn ContentSource,
        resource: &ResourceRef,
        config: &FetchConfig,
    ) -> Result<Box<dyn LocalPreview>> {
        let input = source
            .open(resource)
            .map_err(|e| MediaFetchError::preview_with_source(format!("Failed to open {}", resource), e))?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(PREVIEW_PREFIX);
        let mut file = match &config.preview_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| MediaFetchError::preview_with_source("Failed to create preview file", e))?;

        let mut limited = input.take(config.preview_size_bytes);
        let len = std::io::copy(&mut limited, &mut file)
            .map_err(|e| MediaFetchError::preview_with_source(format!("Failed to copy {}", resource), e))?;
        file.flush()
            .map_err(|e| MediaFetchError::preview_with_source("Failed to flush preview file", e))?;

        tracing::trace!(uri = %resource, path = %file.path().display(), len, "Materialized preview");
        Ok(Box::new(TempFilePreview { file, len }))
    }
}

/// Preview backed by a named temporary file.
#[derive(Debug)]
pub struct TempFilePreview {
    file: NamedTempFile,
    len: u64,
}

impl TempFilePreview {
    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

impl LocalPreview for TempFilePreview {
    fn open(&self) -> Result<Box<dyn Read + '_>> {
        let file = self.file.reopen()?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn len(&self) -> u64 {
        self.len
    }
}
