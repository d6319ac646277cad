//! Raster image introspection.
//!
//! Reads dimensions from the image header without decoding pixels, plus the
//! EXIF orientation and capture date when present.

use crate::core::mime;
use crate::plugins::{MediaIntrospector, MediaProbe};
use crate::{MediaFetchError, Result};
use chrono::NaiveDate;
use exif::{DateTime, In, Reader, Tag, Value};
use image::ImageReader;
use std::io::Cursor;

/// Introspector for raster formats the `image` crate can read.
///
/// SVG and video entries are classified by MIME type alone, so they are not
/// probed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageIntrospector;

impl MediaIntrospector for ImageIntrospector {
    fn needs_bytes(&self, mime_type: &str) -> bool {
        mime::is_decodable_image(mime_type)
    }

    fn probe(&self, _mime_type: &str, head: &[u8]) -> Result<MediaProbe> {
        let reader = ImageReader::new(Cursor::new(head))
            .with_guessed_format()
            .map_err(|e| MediaFetchError::probe_with_source("Failed to read image format", e))?;

        if reader.format().is_none() {
            return Err(MediaFetchError::probe("Could not determine image format"));
        }

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| MediaFetchError::probe_with_source("Failed to read image dimensions", e))?;

        let mut probe = MediaProbe {
            width: Some(width),
            height: Some(height),
            ..MediaProbe::default()
        };

        if let Ok(exif) = Reader::new().read_from_container(&mut Cursor::new(head)) {
            probe.rotation_degrees = exif
                .get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
                .map(rotation_degrees);
            probe.date_taken_millis = exif
                .get_field(Tag::DateTimeOriginal, In::PRIMARY)
                .and_then(|field| match &field.value {
                    Value::Ascii(values) => values.first().and_then(|raw| DateTime::from_ascii(raw).ok()),
                    _ => None,
                })
                .and_then(|date| epoch_millis(&date));
        }

        Ok(probe)
    }
}

/// Clockwise display rotation for an EXIF orientation value.
///
/// Mirrored orientations map to the rotation of their non-mirrored
/// counterpart.
fn rotation_degrees(orientation: u32) -> i32 {
    match orientation {
        3 | 4 => 180,
        5 | 6 => 90,
        7 | 8 => 270,
        _ => 0,
    }
}

/// EXIF dates without an offset are taken as UTC.
fn epoch_millis(date: &DateTime) -> Option<i64> {
    let local = NaiveDate::from_ymd_opt(i32::from(date.year), u32::from(date.month), u32::from(date.day))?
        .and_hms_opt(u32::from(date.hour), u32::from(date.minute), u32::from(date.second))?;
    let millis = local.and_utc().timestamp_millis();
    let offset_millis = date.offset.map_or(0, |minutes| i64::from(minutes) * 60_000);
    Some(millis - offset_millis)
}
