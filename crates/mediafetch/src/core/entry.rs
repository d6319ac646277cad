//! Media entries and pre-catalog enrichment.

use crate::core::config::FetchConfig;
use crate::core::mime;
use crate::plugins::{ContentSource, MediaIntrospector, MediaProbe};
use crate::types::{FieldKey, FieldMap, FieldMapExt, ResourceRef};
use crate::{MediaFetchError, Result};
use serde::Serialize;
use std::io::Read;

/// Structured view of a fetched media item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    pub uri: String,
    pub source_mime_type: String,
    pub title: Option<String>,
    pub size_bytes: Option<i64>,
    pub path: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub source_rotation_degrees: Option<i32>,
    pub source_date_taken_millis: Option<i64>,
}

impl SourceEntry {
    /// Read an entry out of a field map, ignoring values of the wrong type.
    pub fn from_fields(fields: &FieldMap) -> Self {
        let dimension = |key: FieldKey| {
            fields
                .get_i64(key)
                .and_then(|value| u32::try_from(value).ok())
        };

        Self {
            uri: fields.get_str(FieldKey::Uri).unwrap_or_default().to_string(),
            source_mime_type: fields
                .get_str(FieldKey::SourceMimeType)
                .unwrap_or_default()
                .to_string(),
            title: fields.get_str(FieldKey::Title).map(str::to_string),
            size_bytes: fields.get_i64(FieldKey::SizeBytes),
            path: fields.get_str(FieldKey::Path).map(str::to_string),
            width: dimension(FieldKey::Width),
            height: dimension(FieldKey::Height),
            source_rotation_degrees: fields
                .get_i64(FieldKey::SourceRotationDegrees)
                .and_then(|value| i32::try_from(value).ok()),
            source_date_taken_millis: fields.get_i64(FieldKey::SourceDateTakenMillis),
        }
    }

    /// Has known, non-zero pixel dimensions.
    pub fn is_sized(&self) -> bool {
        matches!((self.width, self.height), (Some(w), Some(h)) if w > 0 && h > 0)
    }

    pub fn is_svg(&self) -> bool {
        mime::is_svg(&self.source_mime_type)
    }

    pub fn is_video(&self) -> bool {
        mime::is_video(&self.source_mime_type)
    }

    /// A displayable media item: sized, vector, or video.
    pub fn is_valid_media(&self) -> bool {
        self.is_sized() || self.is_svg() || self.is_video()
    }

    /// Fill fields the probe knows and the entry does not.
    pub fn apply_probe(&mut self, probe: MediaProbe) {
        self.width = self.width.or(probe.width);
        self.height = self.height.or(probe.height);
        self.source_rotation_degrees = self.source_rotation_degrees.or(probe.rotation_degrees);
        self.source_date_taken_millis = self.source_date_taken_millis.or(probe.date_taken_millis);
    }

    /// Key/value representation used as the fetch payload.
    pub fn to_map(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.set(FieldKey::Uri, self.uri.as_str());
        fields.set(FieldKey::SourceMimeType, self.source_mime_type.as_str());
        if let Some(title) = &self.title {
            fields.set(FieldKey::Title, title.as_str());
        }
        if let Some(size) = self.size_bytes {
            fields.set(FieldKey::SizeBytes, size);
        }
        if let Some(path) = &self.path {
            fields.set(FieldKey::Path, path.as_str());
        }
        if let Some(width) = self.width {
            fields.set(FieldKey::Width, i64::from(width));
        }
        if let Some(height) = self.height {
            fields.set(FieldKey::Height, i64::from(height));
        }
        if let Some(rotation) = self.source_rotation_degrees {
            fields.set(FieldKey::SourceRotationDegrees, i64::from(rotation));
        }
        if let Some(date) = self.source_date_taken_millis {
            fields.set(FieldKey::SourceDateTakenMillis, date);
        }
        fields
    }
}

/// Builds entries and enriches them with pre-catalog metadata.
pub struct EntryBuilder<'a> {
    source: &'a dyn ContentSource,
    introspector: &'a dyn MediaIntrospector,
    config: &'a FetchConfig,
}

impl<'a> EntryBuilder<'a> {
    pub fn new(source: &'a dyn ContentSource, introspector: &'a dyn MediaIntrospector, config: &'a FetchConfig) -> Self {
        Self {
            source,
            introspector,
            config,
        }
    }

    /// Build an entry from `fields` and run pre-catalog enrichment.
    ///
    /// Enrichment never fails the build: an unreadable or undecodable
    /// resource leaves the entry unsized and the caller's validation decides.
    pub fn build(&self, resource: &ResourceRef, fields: &FieldMap) -> SourceEntry {
        let mut entry = SourceEntry::from_fields(fields);
        self.fill_pre_catalog_metadata(resource, &mut entry);
        entry
    }

    fn fill_pre_catalog_metadata(&self, resource: &ResourceRef, entry: &mut SourceEntry) {
        if !self.config.probe_dimensions || entry.is_sized() {
            return;
        }
        if !self.introspector.needs_bytes(&entry.source_mime_type) {
            return;
        }

        match self.probe(resource, &entry.source_mime_type) {
            Ok(probe) => {
                tracing::trace!(uri = %resource, ?probe, "Pre-catalog probe");
                entry.apply_probe(probe);
            }
            Err(e) => {
                tracing::warn!(uri = %resource, mime_type = %entry.source_mime_type, error = %e, "Failed to probe media");
            }
        }
    }

    fn probe(&self, resource: &ResourceRef, mime_type: &str) -> Result<MediaProbe> {
        let input = self
            .source
            .open(resource)
            .map_err(|e| MediaFetchError::probe_with_source(format!("Failed to open {}", resource), e))?;

        let mut head = Vec::new();
        input
            .take(self.config.probe_max_bytes)
            .read_to_end(&mut head)
            .map_err(|e| MediaFetchError::probe_with_source(format!("Failed to read {}", resource), e))?;

        self.introspector.probe(mime_type, &head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::memory::{MemoryContentProvider, MemoryEntry};

    struct StubIntrospector {
        probe: Option<MediaProbe>,
    }

    impl MediaIntrospector for StubIntrospector {
        fn needs_bytes(&self, mime_type: &str) -> bool {
            mime::is_image(mime_type) && !mime::is_svg(mime_type)
        }

        fn probe(&self, _mime_type: &str, _head: &[u8]) -> Result<MediaProbe> {
            self.probe.clone().ok_or_else(|| MediaFetchError::probe("corrupt header"))
        }
    }

    fn fields(mime_type: &str) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.set(FieldKey::Uri, "content://media/7");
        fields.set(FieldKey::SourceMimeType, mime_type);
        fields
    }

    fn build(mime_type: &str, introspector: &StubIntrospector) -> (SourceEntry, MemoryContentProvider) {
        let provider = MemoryContentProvider::new();
        let uri = ResourceRef::parse("content://media/7").unwrap();
        provider.insert(uri.clone(), MemoryEntry::with_bytes(vec![0u8; 16]));
        let config = FetchConfig::default();
        let entry = EntryBuilder::new(&provider, introspector, &config).build(&uri, &fields(mime_type));
        (entry, provider)
    }

    #[test]
    fn test_introspection_makes_entry_sized() {
        let introspector = StubIntrospector {
            probe: Some(MediaProbe {
                width: Some(640),
                height: Some(480),
                rotation_degrees: Some(90),
                ..MediaProbe::default()
            }),
        };
        let (entry, provider) = build("image/jpeg", &introspector);

        assert!(entry.is_sized());
        assert!(entry.is_valid_media());
        assert_eq!(entry.source_rotation_degrees, Some(90));
        assert!(provider.handle_counts().all_released());
    }

    #[test]
    fn test_introspection_failure_leaves_entry_unsized() {
        let (entry, provider) = build("image/png", &StubIntrospector { probe: None });
        assert!(!entry.is_sized());
        assert!(!entry.is_valid_media());
        assert_eq!(provider.handle_counts().streams_opened, 1);
        assert!(provider.handle_counts().all_released());
    }

    #[test]
    fn test_svg_and_video_skip_probing() {
        let introspector = StubIntrospector { probe: None };

        let (svg, provider) = build("image/svg+xml", &introspector);
        assert!(svg.is_svg());
        assert!(svg.is_valid_media());
        assert_eq!(provider.handle_counts().streams_opened, 0);

        let (video, provider) = build("video/mp4", &introspector);
        assert!(video.is_video());
        assert!(video.is_valid_media());
        assert_eq!(provider.handle_counts().streams_opened, 0);
    }

    #[test]
    fn test_zero_dimensions_are_not_sized() {
        let entry = SourceEntry {
            width: Some(0),
            height: Some(100),
            ..SourceEntry::default()
        };
        assert!(!entry.is_sized());
    }

    #[test]
    fn test_to_map_keeps_known_order_and_skips_absent() {
        let mut input = fields("image/png");
        input.set(FieldKey::SizeBytes, 99_i64);
        input.set(FieldKey::Title, "a.png");

        let mut entry = SourceEntry::from_fields(&input);
        entry.width = Some(2);
        entry.height = Some(3);
        let map = entry.to_map();

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["uri", "sourceMimeType", "title", "sizeBytes", "width", "height"]);
        assert_eq!(map.get_i64(FieldKey::Width), Some(2));
    }

    #[test]
    fn test_from_fields_ignores_wrong_types() {
        let mut input = fields("image/png");
        input.set(FieldKey::SizeBytes, "large");
        input.set(FieldKey::Width, -5_i64);

        let entry = SourceEntry::from_fields(&input);
        assert_eq!(entry.size_bytes, None);
        assert_eq!(entry.width, None);
    }
}
