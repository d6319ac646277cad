use crate::Result;
use serde::{Deserialize, Serialize};

/// Lightweight structural facts about a media item.
///
/// Every field is optional: introspection fills what it can read cheaply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaProbe {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Clockwise rotation to apply for display, from EXIF orientation.
    pub rotation_degrees: Option<i32>,
    /// Capture time in milliseconds since the Unix epoch.
    pub date_taken_millis: Option<i64>,
}

/// Reads pre-catalog metadata from the head of a resource.
pub trait MediaIntrospector: Send + Sync {
    /// Whether `probe` has anything to say about this MIME type. When false
    /// the entry builder does not read any bytes.
    fn needs_bytes(&self, mime_type: &str) -> bool;

    /// Probe the leading bytes of a resource of the given MIME type.
    ///
    /// # Errors
    ///
    /// `MediaFetchError::Probe` when the bytes cannot be decoded. The entry
    /// builder logs it and leaves the entry unsized.
    fn probe(&self, mime_type: &str, head: &[u8]) -> Result<MediaProbe>;
}
