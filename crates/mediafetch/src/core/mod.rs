//! Resolution pipeline.
//!
//! - **Resolver** (`resolver`): declared vs sniffed MIME reconciliation
//! - **Columns** (`columns`): defensive metadata row reading
//! - **Entry** (`entry`): source entries and pre-catalog enrichment
//! - **Fetcher** (`fetcher`): the single-item entry point
//! - **Configuration** (`config`) and **MIME helpers** (`mime`)

pub mod columns;
pub mod config;
pub mod entry;
pub mod fetcher;
pub mod mime;
pub mod resolver;

pub use config::FetchConfig;
pub use entry::{EntryBuilder, SourceEntry};
pub use fetcher::{ContentFetcher, FetchCallback, FetchResult, MediaProvider, dispatch};
pub use resolver::{MimeOrigin, MimeResolver, ResolvedMime};
