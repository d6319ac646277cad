//! MIME type constants and classification.
//!
//! Comparison helpers here are ASCII case-insensitive and ignore MIME
//! parameters (`image/jpeg; charset=binary` classifies like `image/jpeg`).

use std::path::Path;

pub const TIFF_MIME_TYPE: &str = "image/tiff";
pub const SVG_MIME_TYPE: &str = "image/svg+xml";
pub const JPEG_MIME_TYPE: &str = "image/jpeg";
pub const PNG_MIME_TYPE: &str = "image/png";
pub const GIF_MIME_TYPE: &str = "image/gif";
pub const WEBP_MIME_TYPE: &str = "image/webp";
pub const BMP_MIME_TYPE: &str = "image/bmp";
pub const HEIC_MIME_TYPE: &str = "image/heic";
pub const AVIF_MIME_TYPE: &str = "image/avif";
pub const MP4_MIME_TYPE: &str = "video/mp4";
pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";

/// Raster formats whose header the default introspector can decode.
const DECODABLE_IMAGE_TYPES: &[&str] = &[
    JPEG_MIME_TYPE,
    "image/pjpeg",
    PNG_MIME_TYPE,
    GIF_MIME_TYPE,
    WEBP_MIME_TYPE,
    BMP_MIME_TYPE,
    "image/x-ms-bmp",
    TIFF_MIME_TYPE,
];

/// Strip parameters and surrounding whitespace.
pub fn essence(mime_type: &str) -> &str {
    mime_type.split(';').next().unwrap_or_default().trim()
}

pub fn same_type(a: &str, b: &str) -> bool {
    essence(a).eq_ignore_ascii_case(essence(b))
}

pub fn is_image(mime_type: &str) -> bool {
    starts_with_ignore_case(essence(mime_type), "image/")
}

pub fn is_video(mime_type: &str) -> bool {
    starts_with_ignore_case(essence(mime_type), "video/")
}

pub fn is_svg(mime_type: &str) -> bool {
    same_type(mime_type, SVG_MIME_TYPE)
}

/// Whether a raster decoder is expected to read dimensions for this type.
pub fn is_decodable_image(mime_type: &str) -> bool {
    DECODABLE_IMAGE_TYPES.iter().any(|known| same_type(known, mime_type))
}

/// Guess a MIME type from a path's extension.
///
/// Used where a provider has only a file name to go on, which is exactly the
/// kind of declared type the resolver is designed to distrust.
pub fn mime_from_path(path: impl AsRef<Path>) -> Option<String> {
    mime_guess::from_path(path.as_ref()).first().map(|mime| mime.to_string())
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_essence_strips_parameters() {
        assert_eq!(essence("image/jpeg; q=0.9"), "image/jpeg");
        assert_eq!(essence("  video/mp4 "), "video/mp4");
    }

    #[test]
    fn test_classification() {
        assert!(is_image("image/png"));
        assert!(is_image("IMAGE/PNG"));
        assert!(!is_image("video/mp4"));
        assert!(is_video("video/mp4"));
        assert!(is_video("Video/QuickTime"));
        assert!(is_svg("image/svg+xml"));
        assert!(is_svg("image/SVG+XML; charset=utf-8"));
        assert!(!is_svg("image/png"));
    }

    #[test]
    fn test_same_type() {
        assert!(same_type("image/tiff", "IMAGE/TIFF"));
        assert!(same_type("image/tiff;x=1", "image/tiff"));
        assert!(!same_type("image/tiff", "image/tif"));
    }

    #[test]
    fn test_decodable_images() {
        assert!(is_decodable_image("image/jpeg"));
        assert!(is_decodable_image("image/webp"));
        assert!(!is_decodable_image("image/svg+xml"));
        assert!(!is_decodable_image("image/heic"));
    }

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path("IMG_0001.JPG").as_deref(), Some("image/jpeg"));
        assert_eq!(mime_from_path("clip.mp4").as_deref(), Some("video/mp4"));
        assert_eq!(mime_from_path("noext"), None);
    }
}
