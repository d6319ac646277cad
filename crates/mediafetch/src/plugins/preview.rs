use crate::Result;
use crate::core::config::FetchConfig;
use crate::plugins::ContentSource;
use crate::types::ResourceRef;
use std::io::Read;

/// Produces a local copy of a resource that can be read repeatedly.
pub trait PreviewMaterializer: Send + Sync {
    /// Copy (a prefix of) the resource into local storage.
    ///
    /// # Errors
    ///
    /// Failures are degradable: the resolver skips sniffing and continues
    /// with the declared type.
    fn materialize(
        &self,
        source: &dyn ContentSource,
        resource: &ResourceRef,
        config: &FetchConfig,
    ) -> Result<Box<dyn LocalPreview>>;
}

/// A materialized preview. Dropping it releases the backing storage.
pub trait LocalPreview: Send {
    /// Open a new reader over the preview bytes, starting at offset 0.
    fn open(&self) -> Result<Box<dyn Read + '_>>;

    /// Number of bytes held by the preview.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
