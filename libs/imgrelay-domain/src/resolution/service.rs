//! Resolution service - Business logic orchestration
//!
//! This module contains the core cache-aside engine of the transcoding proxy.
//! The service coordinates the resolution cache, the artifact store, the
//! source fetcher and the transcoder behind a single `resolve` entry point.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::cache::ResolutionCache;
use super::error::ResolutionError;
use super::key::{path_extension, StorageKey};
use crate::ports::{ArtifactStore, ImageTranscoder, SourceFetcher};

/// Configuration for the resolution service
#[derive(Debug, Clone)]
pub struct ResolutionConfig {
    /// Origin to fetch uncached source assets from (e.g. `https://origin.example.com`)
    pub upstream_origin: String,
    /// Lowercased extensions that qualify for conversion
    pub convertible_extensions: Vec<String>,
    /// Target compressed extension, without a leading dot
    pub target_extension: String,
}

impl ResolutionConfig {
    /// Create a configuration for the given upstream origin with default
    /// extension sets (raster photographic/bitmap formats to WebP)
    pub fn new(upstream_origin: impl Into<String>) -> Self {
        Self {
            upstream_origin: upstream_origin.into(),
            convertible_extensions: ["jpg", "jpeg", "png", "gif", "bmp", "tiff"]
                .into_iter()
                .map(String::from)
                .collect(),
            target_extension: "webp".to_string(),
        }
    }

    /// Whether a request path denotes a convertible image
    fn is_convertible(&self, request_path: &str) -> bool {
        match path_extension(request_path) {
            Some(ext) => self.convertible_extensions.iter().any(|c| *c == ext),
            None => false,
        }
    }

    /// Absolute upstream URL for a request path
    fn upstream_url(&self, request_path: &str) -> String {
        format!(
            "{}/{}",
            self.upstream_origin.trim_end_matches('/'),
            request_path.trim_start_matches('/')
        )
    }
}

/// Cache-aside engine turning request paths into destination URLs
///
/// The resolution pipeline:
/// 1. Resolution cache lookup (fast path, no I/O)
/// 2. Pass-through classification by extension
/// 3. Existence probe on the converted storage key
/// 4. On miss: fetch source, transcode, write artifact
/// 5. Cache population, strictly after every prior step succeeded
///
/// Concurrent resolutions of the same uncached path may each run the full
/// pipeline; the store write and the cache write are both idempotent per key,
/// so duplication is tolerated rather than prevented.
///
/// ## Static Dispatch
///
/// The service is generic over its port implementations. The compiler
/// monomorphizes each combination, resulting in zero-cost abstractions.
pub struct ResolutionService<S, F, T> {
    store: S,
    fetcher: F,
    transcoder: T,
    cache: Arc<ResolutionCache>,
    config: ResolutionConfig,
}

impl<S, F, T> ResolutionService<S, F, T>
where
    S: ArtifactStore,
    F: SourceFetcher,
    T: ImageTranscoder,
{
    /// Create a new ResolutionService
    ///
    /// The cache is injected by handle so it can be shared across handlers
    /// and swapped out in tests.
    pub fn new(
        store: S,
        fetcher: F,
        transcoder: T,
        cache: Arc<ResolutionCache>,
        config: ResolutionConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            transcoder,
            cache,
            config,
        }
    }

    /// Resolve a request path to its final destination URL
    ///
    /// This is the single entry point invoked once per incoming request.
    ///
    /// # Errors
    ///
    /// - `ResolutionError::Fetch` / `FetchTimeout` if the source asset is unreachable
    /// - `ResolutionError::Transcode` if the source bytes cannot be converted
    /// - `ResolutionError::StoreWrite` if persisting the artifact fails
    ///
    /// A failed resolution leaves the cache untouched.
    pub async fn resolve(&self, request_path: &str) -> Result<String, ResolutionError> {
        if let Some(url) = self.cache.get(request_path) {
            debug!(path = %request_path, "Resolution cache hit");
            return Ok(url);
        }

        let destination = if self.config.is_convertible(request_path) {
            self.resolve_convertible(request_path).await?
        } else {
            debug!(path = %request_path, "Pass-through path");
            self.config.upstream_url(request_path)
        };

        self.cache.put(request_path, &destination);
        Ok(destination)
    }

    /// Resolve a convertible path: probe, then fetch + transcode + store on miss
    async fn resolve_convertible(&self, request_path: &str) -> Result<String, ResolutionError> {
        let key = StorageKey::from_path(request_path)
            .with_extension(&self.config.target_extension);

        let present = match self.store.exists(key.as_str()).await {
            Ok(present) => present,
            Err(err) => {
                // A failed probe costs a redundant reconversion, never data loss
                warn!(key = %key, error = %err, "Store probe failed, treating as absent");
                false
            }
        };

        if present {
            debug!(key = %key, "Artifact already stored");
            return Ok(self.store.public_url(key.as_str()));
        }

        let source_url = self.config.upstream_url(request_path);
        let source_bytes = self.fetcher.fetch(&source_url).await?;
        let converted = self.transcoder.transcode(&source_bytes)?;
        self.store.put(key.as_str(), converted).await?;

        info!(key = %key, "Converted and stored artifact");
        Ok(self.store.public_url(key.as_str()))
    }

    /// Get the service configuration
    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// Get a handle to the resolution cache
    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // In-memory artifact store for testing, with call counters
    #[derive(Default)]
    struct InMemoryStore {
        objects: Arc<Mutex<HashMap<String, Bytes>>>,
        probes: AtomicUsize,
        writes: AtomicUsize,
        fail_probe: bool,
        fail_write: bool,
    }

    impl InMemoryStore {
        fn with_object(key: &str) -> Self {
            let store = Self::default();
            store
                .objects
                .lock()
                .unwrap()
                .insert(key.to_string(), Bytes::from_static(b"stored"));
            store
        }
    }

    impl ArtifactStore for &InMemoryStore {
        fn exists(&self, key: &str) -> impl Future<Output = Result<bool, ResolutionError>> + Send {
            self.probes.fetch_add(1, Ordering::SeqCst);
            let result = if self.fail_probe {
                Err(ResolutionError::store_probe("probe unavailable"))
            } else {
                Ok(self.objects.lock().unwrap().contains_key(key))
            };
            async move { result }
        }

        fn put(
            &self,
            key: &str,
            data: Bytes,
        ) -> impl Future<Output = Result<(), ResolutionError>> + Send {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let result = if self.fail_write {
                Err(ResolutionError::store_write("access denied"))
            } else {
                self.objects.lock().unwrap().insert(key.to_string(), data);
                Ok(())
            };
            async move { result }
        }

        fn public_url(&self, key: &str) -> String {
            format!("https://cdn.example.com/{}", key)
        }
    }

    // Counting fetcher returning canned bytes or a canned failure
    #[derive(Default)]
    struct StubFetcher {
        calls: AtomicUsize,
        fail: bool,
        last_url: Mutex<Option<String>>,
    }

    impl SourceFetcher for &StubFetcher {
        fn fetch(
            &self,
            source_url: &str,
        ) -> impl Future<Output = Result<Bytes, ResolutionError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_url.lock().unwrap() = Some(source_url.to_string());
            let result = if self.fail {
                Err(ResolutionError::fetch("origin returned 404"))
            } else {
                Ok(Bytes::from_static(b"source-bytes"))
            };
            async move { result }
        }
    }

    // Counting transcoder prefixing the input to prove it ran on fetched bytes
    #[derive(Default)]
    struct StubTranscoder {
        calls: AtomicUsize,
        fail: bool,
    }

    impl ImageTranscoder for &StubTranscoder {
        fn transcode(&self, data: &[u8]) -> Result<Bytes, ResolutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ResolutionError::transcode("malformed input"));
            }
            let mut out = b"webp:".to_vec();
            out.extend_from_slice(data);
            Ok(Bytes::from(out))
        }
    }

    fn service<'a>(
        store: &'a InMemoryStore,
        fetcher: &'a StubFetcher,
        transcoder: &'a StubTranscoder,
    ) -> ResolutionService<&'a InMemoryStore, &'a StubFetcher, &'a StubTranscoder> {
        ResolutionService::new(
            store,
            fetcher,
            transcoder,
            Arc::new(ResolutionCache::new(64)),
            ResolutionConfig::new("https://origin.example.com"),
        )
    }

    #[tokio::test]
    async fn test_pass_through_resolves_to_upstream_without_store_interaction() {
        let (store, fetcher, transcoder) = Default::default();
        let svc = service(&store, &fetcher, &transcoder);

        let url = svc.resolve("/styles/app.css").await.unwrap();

        assert_eq!(url, "https://origin.example.com/styles/app.css");
        assert_eq!(store.probes.load(Ordering::SeqCst), 0);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_path_without_extension_is_pass_through() {
        let (store, fetcher, transcoder) = Default::default();
        let svc = service(&store, &fetcher, &transcoder);

        let url = svc.resolve("/api/health").await.unwrap();

        assert_eq!(url, "https://origin.example.com/api/health");
        assert_eq!(store.probes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stored_artifact_short_circuits_fetch_and_transcode() {
        let store = InMemoryStore::with_object("img/photo.webp");
        let (fetcher, transcoder) = Default::default();
        let svc = service(&store, &fetcher, &transcoder);

        let url = svc.resolve("/img/photo.jpg").await.unwrap();

        assert_eq!(url, "https://cdn.example.com/img/photo.webp");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_artifact_is_fetched_transcoded_and_stored() {
        let (store, fetcher, transcoder) = Default::default();
        let svc = service(&store, &fetcher, &transcoder);

        let url = svc.resolve("/img/photo.jpg").await.unwrap();

        assert_eq!(url, "https://cdn.example.com/img/photo.webp");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert_eq!(
            fetcher.last_url.lock().unwrap().as_deref(),
            Some("https://origin.example.com/img/photo.jpg")
        );
        // The converted artifact landed at the converted key
        assert_eq!(
            store.objects.lock().unwrap().get("img/photo.webp"),
            Some(&Bytes::from_static(b"webp:source-bytes"))
        );
    }

    #[tokio::test]
    async fn test_second_resolve_is_served_from_cache() {
        let (store, fetcher, transcoder) = Default::default();
        let svc = service(&store, &fetcher, &transcoder);

        let first = svc.resolve("/img/photo.jpg").await.unwrap();
        let second = svc.resolve("/img/photo.jpg").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.probes.load(Ordering::SeqCst), 1);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_successful_resolution_populates_cache_with_same_url() {
        let (store, fetcher, transcoder) = Default::default();
        let svc = service(&store, &fetcher, &transcoder);

        let url = svc.resolve("/img/photo.jpg").await.unwrap();

        assert_eq!(svc.cache().get("/img/photo.jpg"), Some(url));
    }

    #[tokio::test]
    async fn test_pass_through_is_cached_once_per_path() {
        let (store, fetcher, transcoder) = Default::default();
        let svc = service(&store, &fetcher, &transcoder);

        svc.resolve("/styles/app.css").await.unwrap();
        svc.resolve("/styles/app.css").await.unwrap();
        svc.resolve("/scripts/app.js").await.unwrap();

        assert_eq!(svc.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_store_and_cache_untouched() {
        let store = InMemoryStore::default();
        let fetcher = StubFetcher {
            fail: true,
            ..Default::default()
        };
        let transcoder = StubTranscoder::default();
        let svc = service(&store, &fetcher, &transcoder);

        let err = svc.resolve("/img/photo.jpg").await.unwrap_err();

        assert!(matches!(err, ResolutionError::Fetch(_)));
        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert_eq!(svc.cache().get("/img/photo.jpg"), None);
    }

    #[tokio::test]
    async fn test_transcode_failure_is_not_cached() {
        let store = InMemoryStore::default();
        let fetcher = StubFetcher::default();
        let transcoder = StubTranscoder {
            fail: true,
            ..Default::default()
        };
        let svc = service(&store, &fetcher, &transcoder);

        let err = svc.resolve("/img/photo.jpg").await.unwrap_err();

        assert!(matches!(err, ResolutionError::Transcode(_)));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert_eq!(svc.cache().get("/img/photo.jpg"), None);
    }

    #[tokio::test]
    async fn test_store_write_failure_is_not_cached() {
        let store = InMemoryStore {
            fail_write: true,
            ..Default::default()
        };
        let (fetcher, transcoder) = Default::default();
        let svc = service(&store, &fetcher, &transcoder);

        let err = svc.resolve("/img/photo.jpg").await.unwrap_err();

        assert!(matches!(err, ResolutionError::StoreWrite(_)));
        assert_eq!(svc.cache().get("/img/photo.jpg"), None);
    }

    #[tokio::test]
    async fn test_probe_failure_is_treated_as_absent() {
        let store = InMemoryStore {
            fail_probe: true,
            ..Default::default()
        };
        let (fetcher, transcoder) = Default::default();
        let svc = service(&store, &fetcher, &transcoder);

        // The failed probe triggers the creation path instead of an error
        let url = svc.resolve("/img/photo.jpg").await.unwrap();

        assert_eq!(url, "https://cdn.example.com/img/photo.webp");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_uppercase_extension_is_convertible() {
        let (store, fetcher, transcoder) = Default::default();
        let svc = service(&store, &fetcher, &transcoder);

        let url = svc.resolve("/img/PHOTO.JPG").await.unwrap();

        assert_eq!(url, "https://cdn.example.com/img/PHOTO.webp");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }
}
