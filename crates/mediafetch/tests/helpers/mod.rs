//! Shared fixtures for integration tests.

#![allow(dead_code)]

use image::{ImageBuffer, ImageFormat, Rgb};
use mediafetch::{ContentFetcher, FetchConfig, MemoryContentProvider, ResourceRef};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

pub const SVG_DOCUMENT: &[u8] =
    br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"></svg>"#;

/// `ftyp` box of an ISO base media file.
pub const MP4_HEADER: &[u8] = b"\x00\x00\x00\x18ftypisom\x00\x00\x02\x00isomiso2";

/// Encode a small gradient raster in `format`.
pub fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 128u8]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format)
        .expect("Failed to encode test image");
    bytes
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::Jpeg)
}

pub fn uri(value: &str) -> ResourceRef {
    ResourceRef::parse(value).expect("Invalid test URI")
}

/// Fetcher over `provider` writing previews into `preview_dir`.
pub fn fetcher(provider: &Arc<MemoryContentProvider>, preview_dir: &Path) -> ContentFetcher {
    let config = FetchConfig {
        preview_dir: Some(preview_dir.to_path_buf()),
        ..FetchConfig::default()
    };
    ContentFetcher::from_provider(Arc::clone(provider)).with_config(config)
}

/// Every stream and cursor released and no preview file left behind.
pub fn assert_no_leaks(provider: &MemoryContentProvider, preview_dir: &Path) {
    let counts = provider.handle_counts();
    assert!(counts.all_released(), "Leaked handles: {:?}", counts);

    let leftovers: Vec<_> = std::fs::read_dir(preview_dir)
        .expect("Preview dir should exist")
        .collect();
    assert!(leftovers.is_empty(), "Leftover preview files: {:?}", leftovers);
}
