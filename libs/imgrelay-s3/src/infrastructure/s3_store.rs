//! S3 Artifact Store Implementation
//!
//! This module implements the `ArtifactStore` trait using AWS S3 (or any
//! S3-compatible backend) and converts AWS errors to domain errors.

use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl, Client};
use bytes::Bytes;
use tracing::{debug, error, info, instrument};

use imgrelay_domain::{ports::ArtifactStore, resolution::error::ResolutionError};

/// S3-based implementation of the ArtifactStore port
///
/// This adapter translates domain storage operations into AWS S3 API calls.
/// Artifacts are written with the `public-read` canned ACL so the derived
/// public URL is directly servable.
///
/// ## Configuration
///
/// The adapter requires:
/// - An AWS SDK S3 Client (configured with region, credentials, endpoint)
/// - An S3 bucket name
/// - A public base URL (CDN or bucket endpoint) for URL derivation
///
/// ## Error Handling
///
/// `head_object` "not found" responses map to `Ok(false)`; any other probe
/// failure maps to `ResolutionError::StoreProbe`, which the resolution engine
/// downgrades to "absent". Write failures map to `ResolutionError::StoreWrite`.
#[derive(Clone)]
pub struct S3ArtifactStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3ArtifactStore {
    /// Create a new S3 artifact store
    ///
    /// # Arguments
    ///
    /// * `client` - Configured AWS S3 client
    /// * `bucket` - Name of the S3 bucket to use
    /// * `public_base_url` - Base URL the stored artifacts are served from
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use aws_sdk_s3::Client;
    /// use imgrelay_s3::S3ArtifactStore;
    ///
    /// # async fn example() {
    /// let config = aws_config::load_from_env().await;
    /// let s3_client = Client::new(&config);
    /// let store = S3ArtifactStore::new(
    ///     s3_client,
    ///     "my-bucket".to_string(),
    ///     "https://my-bucket.s3.amazonaws.com".to_string(),
    /// );
    /// # }
    /// ```
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        info!(bucket = %bucket, public_base_url = %public_base_url, "Initializing S3ArtifactStore");
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Guess the content type for a key from its extension
    fn content_type_for(key: &str) -> &'static str {
        match key.rsplit('.').next() {
            Some("webp") => "image/webp",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            _ => "application/octet-stream",
        }
    }
}

impl ArtifactStore for S3ArtifactStore {
    #[instrument(skip(self), fields(key = %key, bucket = %self.bucket))]
    fn exists(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<bool, ResolutionError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let key = key.to_string();

        async move {
            debug!("Probing artifact existence in S3");

            match client.head_object().bucket(&bucket).key(&key).send().await {
                Ok(_) => {
                    debug!(key = %key, "Artifact exists in S3");
                    Ok(true)
                }
                Err(err) => {
                    // Check if it's a "Not Found" error (404)
                    let err_str = err.to_string();
                    if err_str.contains("NotFound") || err_str.contains("404") {
                        debug!(key = %key, "Artifact does not exist in S3");
                        Ok(false)
                    } else {
                        error!(key = %key, error = ?err, "Failed to probe artifact existence in S3");
                        Err(ResolutionError::store_probe(format!(
                            "S3 head_object failed for key '{}': {}",
                            key, err
                        )))
                    }
                }
            }
        }
    }

    #[instrument(skip(self, data), fields(key = %key, bucket = %self.bucket, data_size = data.len()))]
    fn put(
        &self,
        key: &str,
        data: Bytes,
    ) -> impl std::future::Future<Output = Result<(), ResolutionError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let content_type = Self::content_type_for(key);
        let key = key.to_string();

        async move {
            debug!("Writing artifact to S3");

            let body = ByteStream::from(data);

            match client
                .put_object()
                .bucket(&bucket)
                .key(&key)
                .acl(ObjectCannedAcl::PublicRead)
                .content_type(content_type)
                .body(body)
                .send()
                .await
            {
                Ok(_) => {
                    info!(key = %key, "Successfully wrote artifact to S3");
                    Ok(())
                }
                Err(err) => {
                    error!(key = %key, error = ?err, "Failed to write artifact to S3");
                    Err(ResolutionError::store_write(format!(
                        "S3 put_object failed for key '{}': {}",
                        key, err
                    )))
                }
            }
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }
}
