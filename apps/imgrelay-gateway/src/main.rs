//! ImgRelay Gateway - On-demand image transcoding proxy
//!
//! HTTP service that resolves asset paths against a two-tier cache:
//! a bounded in-process resolution cache in front of durable S3 artifacts,
//! converting qualifying images to WebP on first demand.

mod config;
mod dto;
mod handlers;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use aws_sdk_s3::config::Credentials;
use tracing::info;

use imgrelay_domain::resolution::{ResolutionCache, ResolutionConfig, ResolutionService};
use imgrelay_media::{HttpSourceFetcher, WebpTranscoder};
use imgrelay_s3::S3ArtifactStore;

use crate::config::GatewayConfig;

/// The fully wired resolution engine
pub type Resolver = ResolutionService<S3ArtifactStore, HttpSourceFetcher, WebpTranscoder>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("Starting ImgRelay gateway");

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = GatewayConfig::from_env()?;

    // Initialize AWS S3 client with MinIO-compatible configuration
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    // Path-style addressing is required for MinIO
    let mut s3_builder =
        aws_sdk_s3::config::Builder::from(&aws_config).force_path_style(true);

    // Explicit credentials override the default provider chain
    if let (Some(access_key_id), Some(secret_access_key)) =
        (&config.access_key_id, &config.secret_access_key)
    {
        s3_builder = s3_builder.credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "environment",
        ));
    }

    let s3_client = aws_sdk_s3::Client::from_conf(s3_builder.build());

    info!(bucket = %config.bucket, "Initializing S3 artifact store");

    let store = S3ArtifactStore::new(
        s3_client,
        config.bucket.clone(),
        config.public_base_url.clone(),
    );
    let fetcher = HttpSourceFetcher::with_timeout(config.fetch_timeout)?;
    let transcoder = WebpTranscoder::new();

    // The resolution cache lives for the whole process and is injected by handle
    let cache = Arc::new(ResolutionCache::new(config.cache_capacity));

    let resolution_config = ResolutionConfig {
        upstream_origin: config.upstream_origin.clone(),
        convertible_extensions: config.convertible_extensions.clone(),
        target_extension: config.target_extension.clone(),
    };

    let resolver = ResolutionService::new(store, fetcher, transcoder, cache, resolution_config);

    // Create shared application state
    let state = AppState {
        resolver: Arc::new(resolver),
    };

    // Build HTTP router
    let app = routes::create_router(state);

    let addr = config.bind_addr();
    info!(addr = %addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
