//! MIME type reconciliation.
//!
//! Declared types from content providers are often wrong (MMS parts, legacy
//! providers) or missing, so the resolver asks a byte sniffer for a second
//! opinion. Precedence:
//!
//! 1. A sniffed type wins over the declared one, agreeing or not.
//! 2. Sniffed types in [`FetchConfig::distrusted_sniffed_types`] are thrown
//!    away before rule 1 applies (TIFF by default: the sniffer produces both
//!    false positives and false negatives for it).
//! 3. Without a usable sniffed type, the declared type is used.
//! 4. Without either, resolution fails.
//!
//! Sniffing is best-effort. A failing materializer, an unreadable preview, a
//! sniffer error, or a sniffer panic all degrade to "no opinion" with a
//! warning; none of them fails the resolution.

use crate::core::config::FetchConfig;
use crate::plugins::{ByteSniffer, ContentSource, PreviewMaterializer};
use crate::types::ResourceRef;
use crate::{MediaFetchError, Result};
use serde::Serialize;
use std::any::Any;
use std::io::Read;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Where the resolved MIME type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeOrigin {
    Sniffed,
    Declared,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMime {
    pub mime_type: String,
    pub origin: MimeOrigin,
}

/// Combines the declared MIME type with a sniffed one.
pub struct MimeResolver<'a> {
    source: &'a dyn ContentSource,
    materializer: &'a dyn PreviewMaterializer,
    sniffer: &'a dyn ByteSniffer,
    config: &'a FetchConfig,
}

impl<'a> MimeResolver<'a> {
    pub fn new(
        source: &'a dyn ContentSource,
        materializer: &'a dyn PreviewMaterializer,
        sniffer: &'a dyn ByteSniffer,
        config: &'a FetchConfig,
    ) -> Self {
        Self {
            source,
            materializer,
            sniffer,
            config,
        }
    }

    /// Resolve the authoritative MIME type of `resource`.
    ///
    /// A blank `declared` value counts as absent.
    ///
    /// # Errors
    ///
    /// `MediaFetchError::MissingMimeType` when neither a trusted sniffed type
    /// nor a declared type is available. No other error escapes.
    pub fn resolve(&self, resource: &ResourceRef, declared: Option<&str>) -> Result<ResolvedMime> {
        let declared = declared.map(str::trim).filter(|d| !d.is_empty());

        if let Some(sniffed) = self.sniff(resource) {
            if declared != Some(sniffed.as_str()) {
                tracing::debug!(
                    uri = %resource,
                    declared = declared.unwrap_or("none"),
                    sniffed = %sniffed,
                    "source MIME type is {} but sniffed MIME type is {}",
                    declared.unwrap_or("none"),
                    sniffed
                );
            }
            return Ok(ResolvedMime {
                mime_type: sniffed,
                origin: MimeOrigin::Sniffed,
            });
        }

        match declared {
            Some(declared) => Ok(ResolvedMime {
                mime_type: declared.to_string(),
                origin: MimeOrigin::Declared,
            }),
            None => Err(MediaFetchError::MissingMimeType {
                uri: resource.to_string(),
            }),
        }
    }

    /// Sniff a trusted MIME type, collapsing every failure to `None`.
    pub fn sniff(&self, resource: &ResourceRef) -> Option<String> {
        if !self.config.sniff_enabled {
            return None;
        }

        match self.try_sniff(resource) {
            Ok(Some(sniffed)) if self.config.is_distrusted(&sniffed) => {
                tracing::debug!(uri = %resource, sniffed = %sniffed, "Discarding distrusted sniffed MIME type");
                None
            }
            Ok(sniffed) => sniffed,
            Err(e) => {
                tracing::warn!(
                    uri = %resource,
                    sniffer = self.sniffer.name(),
                    error = %e,
                    "failed to get MIME type by sniffing for uri={}",
                    resource
                );
                None
            }
        }
    }

    /// The preview and its reader are dropped when this returns, on every path.
    fn try_sniff(&self, resource: &ResourceRef) -> Result<Option<String>> {
        let preview = self.materializer.materialize(self.source, resource, self.config)?;
        let input = preview.open()?;
        let mut header = input.take(self.config.sniff_header_bytes as u64);

        let sniffed = catch_unwind(AssertUnwindSafe(|| self.sniffer.sniff(&mut header))).map_err(|payload| {
            MediaFetchError::sniffing(format!(
                "Sniffer '{}' panicked: {}",
                self.sniffer.name(),
                panic_message(payload.as_ref())
            ))
        })??;

        Ok(sniffed.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}
