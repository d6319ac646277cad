//! Fetching from async contexts.

#![cfg(feature = "tokio-runtime")]

mod helpers;

use helpers::*;
use mediafetch::{FieldKey, FieldMapExt, MediaFetchError, MemoryContentProvider, MemoryEntry};
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn test_fetch_single_async() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(MemoryContentProvider::new());
    let resource = uri("content://media/external/images/media/77");
    provider.insert(resource.clone(), MemoryEntry::with_bytes(jpeg(12, 7)));

    let fields = fetcher(&provider, dir.path())
        .fetch_single_async(resource, None)
        .await
        .unwrap();

    assert_eq!(fields.get_i64(FieldKey::Width), Some(12));
    assert_no_leaks(&provider, dir.path());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_async_fetches_each_resolve_once() {
    let dir = tempdir().unwrap();
    let provider = Arc::new(MemoryContentProvider::new());
    for i in 0..6 {
        provider.insert(uri(&format!("content://mms/part/{}", i)), MemoryEntry::with_bytes(jpeg(2, 2)));
    }
    provider.insert(uri("content://mms/part/bad"), MemoryEntry::with_bytes(b"?".to_vec()));
    let fetcher = fetcher(&provider, dir.path());

    let mut handles = Vec::new();
    for name in ["0", "1", "2", "3", "4", "5", "bad"] {
        let fetcher = fetcher.clone();
        handles.push(tokio::spawn(async move {
            fetcher
                .fetch_single_async(uri(&format!("content://mms/part/{}", name)), None)
                .await
        }));
    }

    let mut successes = 0;
    let mut failures = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => failures.push(e),
        }
    }

    assert_eq!(successes, 6);
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0], MediaFetchError::MissingMimeType { .. }));
    assert_no_leaks(&provider, dir.path());
}
