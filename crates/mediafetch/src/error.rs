//! Error types for mediafetch.
//!
//! All fallible operations return [`MediaFetchError`]. The variants fall into
//! three groups that callers treat very differently:
//!
//! **Degraded-input errors** never reach the caller of
//! [`fetch_single`](crate::core::fetcher::ContentFetcher::fetch_single):
//! - `Sniffing` - the byte sniffer failed, panicked, or could not read
//! - `Preview` - no re-readable local copy of the resource could be made
//! - `Probe` - media introspection could not read dimensions
//!
//! They are logged at the point of call and the resolution continues with
//! less information. [`MediaFetchError::is_degradable`] identifies them.
//!
//! **Fatal errors** terminate a fetch and are handed to the caller:
//! - `Query` - the row query against the content service failed
//! - `MissingMimeType` - neither a sniffed nor a declared type is available
//! - `NoSize` - the built entry is not a sized image, an SVG, or a video
//!
//! **System errors** (`Io`) bubble up unchanged wherever `?` meets them.
//!
//! # Example
//!
//! ```rust
//! use mediafetch::{MediaFetchError, Result};
//!
//! fn require_title(title: Option<&str>) -> Result<&str> {
//!     title.ok_or_else(|| MediaFetchError::validation("entry has no title"))
//! }
//!
//! assert!(require_title(None).is_err());
//! ```
use thiserror::Error;

/// Result type alias using `MediaFetchError`.
pub type Result<T> = std::result::Result<T, MediaFetchError>;

/// Main error type for all mediafetch operations.
#[derive(Debug, Error)]
pub enum MediaFetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Query error: {message}")]
    Query {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Sniffing error: {message}")]
    Sniffing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Preview error: {message}")]
    Preview {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Probe error: {message}")]
    Probe {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("MIME type is null for uri={uri}")]
    MissingMimeType { uri: String },

    #[error("entry has no size")]
    NoSize { uri: String },

    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for MediaFetchError {
    fn from(err: serde_json::Error) -> Self {
        MediaFetchError::Validation {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl MediaFetchError {
    error_constructor!(query, Query);
    error_constructor!(sniffing, Sniffing);
    error_constructor!(preview, Preview);
    error_constructor!(probe, Probe);
    error_constructor!(validation, Validation);

    /// Whether this error only degrades a resolution instead of failing it.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            MediaFetchError::Sniffing { .. } | MediaFetchError::Preview { .. } | MediaFetchError::Probe { .. }
        )
    }
}
