use crate::Result;
use std::io::Read;

/// Best-effort MIME detection from content bytes.
///
/// A sniffer may fail in any way it likes, including panicking inside a
/// third-party parser. The resolver treats every failure as "no opinion", so
/// implementations should not try to recover on their own.
pub trait ByteSniffer: Send + Sync {
    /// Short identifier used in log output.
    fn name(&self) -> &str;

    /// Inspect `input` and return a MIME type, or `Ok(None)` when the bytes
    /// are not recognised.
    fn sniff(&self, input: &mut dyn Read) -> Result<Option<String>>;
}
