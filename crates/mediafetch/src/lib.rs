//! mediafetch - resolve opaque content references into validated media
//! descriptors.
//!
//! A content reference (`content://...`, `file://...`) comes with a MIME type
//! declared by whoever handed it over. That type is often wrong. mediafetch
//! sniffs the bytes for a second opinion, reads what the content service
//! knows about the item, and checks the result is a displayable image,
//! vector image, or video before handing back a field map.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mediafetch::{ContentFetcher, FileContentProvider, ResourceRef};
//! use std::sync::Arc;
//!
//! # fn main() -> mediafetch::Result<()> {
//! let fetcher = ContentFetcher::from_provider(Arc::new(FileContentProvider::new()));
//! let uri = ResourceRef::parse("file:///sdcard/DCIM/IMG_0001.jpg")?;
//! match fetcher.fetch_single(&uri, Some("image/jpeg")) {
//!     Ok(fields) => println!("{:?}", fields),
//!     Err(e) => eprintln!("rejected: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core** (`core`): resolver, column reader, entry builder, fetcher, config
//! - **Plugins** (`plugins`): collaborator traits at every external seam
//! - **Extraction** (`extraction`): default collaborators (infer sniffer,
//!   temp-file previews, image introspection, file and in-memory providers)

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod extraction;
pub mod plugins;
pub mod types;

pub use error::{MediaFetchError, Result};
pub use types::*;

pub use core::config::FetchConfig;
pub use core::entry::{EntryBuilder, SourceEntry};
pub use core::fetcher::{ContentFetcher, FetchCallback, FetchResult, MediaProvider, dispatch};
pub use core::resolver::{MimeOrigin, MimeResolver, ResolvedMime};

pub use plugins::{
    ByteSniffer, ContentQuery, ContentSource, LocalPreview, MediaIntrospector, MediaProbe, PreviewMaterializer, QueryCursor,
};

pub use extraction::{
    FileContentProvider, ImageIntrospector, InferSniffer, MemoryContentProvider, MemoryEntry, MemoryRow,
    TempFilePreviewMaterializer,
};
