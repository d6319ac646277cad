//! Collaborator traits for the fetch pipeline.
//!
//! The fetcher never touches a platform service directly. Everything it needs
//! from the outside world comes through one of these seams:
//!
//! - [`ContentSource`] - open a byte stream for a resource
//! - [`ContentQuery`] / [`QueryCursor`] - loosely-typed metadata row lookup
//! - [`ByteSniffer`] - best-effort MIME detection from bytes
//! - [`PreviewMaterializer`] / [`LocalPreview`] - safe, re-readable local copy
//! - [`MediaIntrospector`] - dimensions and orientation for pre-catalog checks
//!
//! Collaborators are shared as `Arc<dyn Trait>` so one fetcher can serve
//! concurrent calls; implementations must therefore be `Send + Sync`.
//!
//! Handles returned by collaborators (cursors, streams, previews) are released
//! by `Drop`. The fetcher scopes each of them so release happens on every
//! exit path.

pub mod introspector;
pub mod preview;
pub mod sniffer;
pub mod source;

pub use introspector::{MediaIntrospector, MediaProbe};
pub use preview::{LocalPreview, PreviewMaterializer};
pub use sniffer::ByteSniffer;
pub use source::{ContentQuery, ContentSource, QueryCursor};
