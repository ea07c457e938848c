//! Ports (trait definitions) for external dependencies
//!
//! This module defines the contracts (ports) that external adapters must
//! implement. Following hexagonal architecture, the domain defines what it
//! needs, and the infrastructure provides implementations.
//!
//! ## Static Dispatch
//!
//! We use native Rust async traits with `impl Future` return types instead of
//! `async_trait` to ensure zero-cost abstractions and static dispatch.

use std::future::Future;

use bytes::Bytes;

use crate::resolution::error::ResolutionError;

/// Port for the durable artifact store
///
/// This trait abstracts away the object-storage backend (S3, MinIO,
/// filesystem, etc.). Implementations must handle:
/// - Probing for an object's existence at a key
/// - Writing immutable artifacts with public-read visibility
/// - Deriving the public URL of a key without any network call
///
/// ## Consistency Note
///
/// `exists` distinguishes "definitely absent" (`Ok(false)`) from "probe
/// failed" (`Err(StoreProbe)`). The resolution engine downgrades probe
/// failures to "absent": a false negative costs a redundant reconversion,
/// never data loss.
pub trait ArtifactStore: Send + Sync {
    /// Check whether an artifact is retrievable at `key`
    ///
    /// # Returns
    ///
    /// `true` if an object exists at the key, `false` if the backend
    /// affirmatively reports it missing
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::StoreProbe` when the backend could not
    /// answer (transient failure, auth error, ...)
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool, ResolutionError>> + Send;

    /// Write an artifact at `key` with public-read visibility
    ///
    /// Writes are idempotent per key (last write wins); concurrent duplicate
    /// writes of the same converted artifact are tolerated by design.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::StoreWrite` if the write fails
    fn put(&self, key: &str, data: Bytes)
        -> impl Future<Output = Result<(), ResolutionError>> + Send;

    /// Derive the public URL for `key`
    ///
    /// Pure derivation from the key and a configured base URL; never touches
    /// the network.
    fn public_url(&self, key: &str) -> String;
}

/// Port for fetching original source assets over HTTP
pub trait SourceFetcher: Send + Sync {
    /// Fetch the raw bytes of the asset at `source_url`
    ///
    /// A single GET, no retry. Every code path settles: success yields the
    /// body bytes, anything else yields an error. A non-success status is an
    /// error, not an empty body.
    ///
    /// # Errors
    ///
    /// - `ResolutionError::FetchTimeout` if the bounded timeout elapses
    /// - `ResolutionError::Fetch` for transport errors or non-2xx responses
    fn fetch(&self, source_url: &str)
        -> impl Future<Output = Result<Bytes, ResolutionError>> + Send;
}

/// Port for converting image bytes to the target compressed format
///
/// Pure function over input bytes; implementations retain no state between
/// calls. Synchronous because transcoding is CPU-bound with no I/O.
pub trait ImageTranscoder: Send + Sync {
    /// Convert `data` to the target format
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::Transcode` if the input is malformed or in
    /// an unsupported format
    fn transcode(&self, data: &[u8]) -> Result<Bytes, ResolutionError>;
}
