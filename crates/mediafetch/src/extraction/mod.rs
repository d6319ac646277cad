//! Default collaborator implementations.
//!
//! - [`sniff::InferSniffer`] - magic-number sniffing via `infer`
//! - [`preview::TempFilePreviewMaterializer`] - temporary-file previews
//! - [`image::ImageIntrospector`] - raster dimensions and EXIF
//! - [`file::FileContentProvider`] - `file://` references
//! - [`memory::MemoryContentProvider`] - registered in-memory resources

pub mod file;
pub mod image;
pub mod memory;
pub mod preview;
pub mod sniff;

pub use file::FileContentProvider;
pub use image::ImageIntrospector;
pub use memory::{ColumnValue, HandleCounts, MemoryContentProvider, MemoryEntry, MemoryRow};
pub use preview::{TempFilePreview, TempFilePreviewMaterializer};
pub use sniff::InferSniffer;
