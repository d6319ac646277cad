//! Magic-number MIME sniffing.

use crate::core::mime::SVG_MIME_TYPE;
use crate::plugins::ByteSniffer;
use crate::{MediaFetchError, Result};
use std::io::Read;

const INITIAL_CAPACITY: usize = 8 * 1024;

/// Byte sniffer backed by the `infer` crate.
///
/// A textual check for an `<svg` element in the header runs before the
/// signature table, which has no SVG matcher.
///
/// The default sniffer reads the whole stream it is handed. The resolver
/// bounds that stream by `FetchConfig::sniff_header_bytes`, so the configured
/// value is the only cap. Use [`InferSniffer::new`] for a sniffer with its
/// own cap.
#[derive(Debug, Clone, Default)]
pub struct InferSniffer {
    header_bytes: Option<usize>,
}

impl InferSniffer {
    /// Sniffer that never looks past `header_bytes`.
    pub fn new(header_bytes: usize) -> Self {
        Self {
            header_bytes: Some(header_bytes.max(1)),
        }
    }
}

impl ByteSniffer for InferSniffer {
    fn name(&self) -> &str {
        "infer"
    }

    fn sniff(&self, input: &mut dyn Read) -> Result<Option<String>> {
        let limit = self.header_bytes.map_or(u64::MAX, |bytes| bytes as u64);
        let mut head = Vec::with_capacity(self.header_bytes.unwrap_or(INITIAL_CAPACITY).min(INITIAL_CAPACITY));
        input
            .take(limit)
            .read_to_end(&mut head)
            .map_err(|e| MediaFetchError::sniffing_with_source("Failed to read header", e))?;

        if head.is_empty() {
            return Ok(None);
        }

        // infer reports SVG documents as generic XML
        if looks_like_svg(&head) {
            return Ok(Some(SVG_MIME_TYPE.to_string()));
        }

        Ok(infer::get(&head).map(|kind| kind.mime_type().to_string()))
    }
}

fn looks_like_svg(head: &[u8]) -> bool {
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if !text.starts_with('<') {
        return false;
    }
    text.to_ascii_lowercase().contains("<svg")
}
