//! Single-item fetch orchestration.
//!
//! A fetch runs one pass with no retries:
//!
//! ```text
//! RESOLVE_MIME -> QUERY_FIELDS -> BUILD_ENTRY -> VALIDATE -> Ok(fields) | Err(reason)
//! ```
//!
//! Every call yields exactly one [`FetchResult`]. Callers that prefer
//! callbacks hand the result to [`dispatch`].

use crate::core::columns::query_fields;
use crate::core::config::FetchConfig;
use crate::core::entry::EntryBuilder;
use crate::core::resolver::MimeResolver;
use crate::extraction::image::ImageIntrospector;
use crate::extraction::preview::TempFilePreviewMaterializer;
use crate::extraction::sniff::InferSniffer;
use crate::plugins::{ByteSniffer, ContentQuery, ContentSource, MediaIntrospector, PreviewMaterializer};
use crate::types::{FieldKey, FieldMap, FieldMapExt, ResourceRef};
use crate::MediaFetchError;
use std::sync::Arc;

/// Terminal outcome of a fetch: the entry's fields, or why there are none.
pub type FetchResult = std::result::Result<FieldMap, MediaFetchError>;

/// Common interface of the providers behind a gallery catalog.
pub trait MediaProvider: Send + Sync {
    /// Resolve one resource into a validated media descriptor.
    fn fetch_single(&self, resource: &ResourceRef, declared_mime_type: Option<&str>) -> FetchResult;
}

/// Callback-style receiver of a [`FetchResult`].
pub trait FetchCallback {
    fn on_success(&self, fields: FieldMap);
    fn on_failure(&self, error: MediaFetchError);
}

/// Deliver `result` to exactly one of the callback's methods, exactly once.
pub fn dispatch(result: FetchResult, callback: &dyn FetchCallback) {
    match result {
        Ok(fields) => callback.on_success(fields),
        Err(error) => callback.on_failure(error),
    }
}

/// Resolves content references through a content source and a row query
/// service.
///
/// # Example
///
/// ```rust,no_run
/// use mediafetch::{ContentFetcher, FileContentProvider, ResourceRef};
/// use std::sync::Arc;
///
/// # fn main() -> mediafetch::Result<()> {
/// let fetcher = ContentFetcher::from_provider(Arc::new(FileContentProvider::new()));
/// let uri = ResourceRef::parse("file:///tmp/photo.jpg")?;
/// let fields = fetcher.fetch_single(&uri, Some("image/jpeg"))?;
/// println!("{}", serde_json::to_string(&fields)?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ContentFetcher {
    source: Arc<dyn ContentSource>,
    query: Arc<dyn ContentQuery>,
    sniffer: Arc<dyn ByteSniffer>,
    materializer: Arc<dyn PreviewMaterializer>,
    introspector: Arc<dyn MediaIntrospector>,
    config: Arc<FetchConfig>,
}

impl ContentFetcher {
    /// Create a fetcher with the default sniffer, materializer and
    /// introspector.
    pub fn new(source: Arc<dyn ContentSource>, query: Arc<dyn ContentQuery>) -> Self {
        Self {
            source,
            query,
            sniffer: Arc::new(InferSniffer::default()),
            materializer: Arc::new(TempFilePreviewMaterializer),
            introspector: Arc::new(ImageIntrospector),
            config: Arc::new(FetchConfig::default()),
        }
    }

    /// Create a fetcher over one provider serving both bytes and rows.
    pub fn from_provider<P>(provider: Arc<P>) -> Self
    where
        P: ContentSource + ContentQuery + 'static,
    {
        let source: Arc<dyn ContentSource> = provider.clone();
        let query: Arc<dyn ContentQuery> = provider;
        Self::new(source, query)
    }

    pub fn with_sniffer(mut self, sniffer: Arc<dyn ByteSniffer>) -> Self {
        self.sniffer = sniffer;
        self
    }

    pub fn with_materializer(mut self, materializer: Arc<dyn PreviewMaterializer>) -> Self {
        self.materializer = materializer;
        self
    }

    pub fn with_introspector(mut self, introspector: Arc<dyn MediaIntrospector>) -> Self {
        self.introspector = introspector;
        self
    }

    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Resolve `resource` into its validated field map.
    ///
    /// # Errors
    ///
    /// - `MissingMimeType` when no MIME type can be resolved
    /// - the query error, unchanged, when the row query fails
    /// - `NoSize` when the entry is neither sized, SVG, nor video
    pub fn fetch_single(&self, resource: &ResourceRef, declared_mime_type: Option<&str>) -> FetchResult {
        let result = self.run(resource, declared_mime_type);
        match &result {
            Ok(fields) => tracing::debug!(uri = %resource, fields = fields.len(), "Fetch succeeded"),
            Err(e) => tracing::debug!(uri = %resource, error = %e, "Fetch failed"),
        }
        result
    }

    /// Run [`fetch_single`](Self::fetch_single) on the blocking thread pool.
    #[cfg(feature = "tokio-runtime")]
    pub async fn fetch_single_async(&self, resource: ResourceRef, declared_mime_type: Option<String>) -> FetchResult {
        let fetcher = self.clone();
        tokio::task::spawn_blocking(move || fetcher.fetch_single(&resource, declared_mime_type.as_deref()))
            .await
            .map_err(|e| MediaFetchError::Other(format!("Fetch task failed: {}", e)))?
    }

    fn run(&self, resource: &ResourceRef, declared_mime_type: Option<&str>) -> FetchResult {
        tracing::trace!(uri = %resource, "Resolving MIME type");
        let resolved = MimeResolver::new(
            self.source.as_ref(),
            self.materializer.as_ref(),
            self.sniffer.as_ref(),
            &self.config,
        )
        .resolve(resource, declared_mime_type)?;

        let mut fields = FieldMap::new();
        fields.set(FieldKey::Uri, resource.as_str());
        fields.set(FieldKey::SourceMimeType, resolved.mime_type);

        tracing::trace!(uri = %resource, "Querying metadata columns");
        fields.extend(query_fields(self.query.as_ref(), resource)?);

        tracing::trace!(uri = %resource, "Building entry");
        let entry = EntryBuilder::new(self.source.as_ref(), self.introspector.as_ref(), &self.config)
            .build(resource, &fields);

        if !entry.is_valid_media() {
            return Err(MediaFetchError::NoSize {
                uri: resource.to_string(),
            });
        }

        Ok(entry.to_map())
    }
}

impl MediaProvider for ContentFetcher {
    fn fetch_single(&self, resource: &ResourceRef, declared_mime_type: Option<&str>) -> FetchResult {
        ContentFetcher::fetch_single(self, resource, declared_mime_type)
    }
}
