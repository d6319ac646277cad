//! Log events emitted on the degradation and mismatch paths.

mod helpers;

use helpers::*;
use mediafetch::{ByteSniffer, MediaFetchError, MemoryContentProvider, MemoryEntry, Result};
use std::io::Read;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Clone)]
struct Captured {
    level: Level,
    message: String,
}

/// Collects the level and rendered message of every event.
struct EventCollector {
    events: Arc<Mutex<Vec<Captured>>>,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for EventCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<Captured>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector { events: events.clone() };
    let subscriber = tracing_subscriber::registry().with(collector);

    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    (result, captured)
}

struct BrokenSniffer;

impl ByteSniffer for BrokenSniffer {
    fn name(&self) -> &str {
        "broken"
    }

    fn sniff(&self, _input: &mut dyn Read) -> Result<Option<String>> {
        Err(MediaFetchError::sniffing("unsupported container"))
    }
}

#[test]
fn test_mismatch_is_logged_at_debug() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(MemoryContentProvider::new());
    let resource = uri("content://mms/part/21");
    provider.insert(resource.clone(), MemoryEntry::with_bytes(jpeg(5, 5)));
    let fetcher = fetcher(&provider, dir.path());

    let (result, events) = capture(|| fetcher.fetch_single(&resource, Some("image/png")));

    assert!(result.is_ok());
    assert!(
        events.iter().any(|e| e.level == Level::DEBUG
            && e.message == "source MIME type is image/png but sniffed MIME type is image/jpeg"),
        "Expected mismatch event, got {:?}",
        events
    );
    assert!(!events.iter().any(|e| e.level == Level::WARN));
}

#[test]
fn test_matching_types_are_not_reported() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(MemoryContentProvider::new());
    let resource = uri("content://mms/part/22");
    provider.insert(resource.clone(), MemoryEntry::with_bytes(jpeg(5, 5)));
    let fetcher = fetcher(&provider, dir.path());

    let (_, events) = capture(|| fetcher.fetch_single(&resource, Some("image/jpeg")));

    assert!(!events.iter().any(|e| e.message.contains("but sniffed MIME type is")));
}

#[test]
fn test_sniffing_failure_is_logged_at_warn() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(MemoryContentProvider::new());
    let resource = uri("content://mms/part/23");
    provider.insert(resource.clone(), MemoryEntry::with_bytes(jpeg(5, 5)));
    let fetcher = fetcher(&provider, dir.path()).with_sniffer(Arc::new(BrokenSniffer));

    let (result, events) = capture(|| fetcher.fetch_single(&resource, Some("image/jpeg")));

    let fields = result.expect("Declared type should carry the fetch");
    assert_eq!(fields.get("sourceMimeType").and_then(|v| v.as_str()), Some("image/jpeg"));
    assert!(
        events.iter().any(|e| e.level == Level::WARN
            && e.message == "failed to get MIME type by sniffing for uri=content://mms/part/23"),
        "Expected sniffing warning, got {:?}",
        events
    );
    assert_no_leaks(&provider, dir.path());
}

#[test]
fn test_introspection_failure_is_logged_at_warn() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(MemoryContentProvider::new());
    let resource = uri("content://mms/part/24");
    provider.insert(resource.clone(), MemoryEntry::with_bytes(b"not an image".to_vec()));
    let fetcher = fetcher(&provider, dir.path());

    let (result, events) = capture(|| fetcher.fetch_single(&resource, Some("image/png")));

    assert!(matches!(result, Err(MediaFetchError::NoSize { .. })));
    assert!(events.iter().any(|e| e.level == Level::WARN && e.message == "Failed to probe media"));
}
