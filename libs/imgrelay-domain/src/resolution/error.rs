//! Domain errors for resolution operations
//!
//! This module defines all possible errors that can occur while resolving a
//! request path. These are domain-level errors that abstract away
//! infrastructure details.

use thiserror::Error;

/// Errors that can occur during path resolution
///
/// These errors represent business-level failures and are independent of
/// infrastructure implementation details (e.g., no AWS SDK or reqwest error
/// types here).
///
/// None of these is fatal to the process: a failure aborts one resolution
/// attempt and is never written to the resolution cache.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The upstream origin was unreachable or responded with a non-success status
    #[error("Upstream fetch failed: {0}")]
    Fetch(String),

    /// The upstream fetch exceeded its bounded timeout
    #[error("Upstream fetch timed out: {0}")]
    FetchTimeout(String),

    /// The fetched bytes could not be converted to the target format
    #[error("Transcode failed: {0}")]
    Transcode(String),

    /// The artifact store could not answer an existence probe
    ///
    /// The resolution engine downgrades this to "not present" rather than
    /// failing the request; it never reaches the HTTP surface.
    #[error("Store probe failed: {0}")]
    StoreProbe(String),

    /// Writing the converted artifact to the store failed
    #[error("Store write failed: {0}")]
    StoreWrite(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResolutionError {
    /// Create a fetch error with a message
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a fetch timeout error with a message
    pub fn fetch_timeout(msg: impl Into<String>) -> Self {
        Self::FetchTimeout(msg.into())
    }

    /// Create a transcode error with a message
    pub fn transcode(msg: impl Into<String>) -> Self {
        Self::Transcode(msg.into())
    }

    /// Create a store probe error with a message
    pub fn store_probe(msg: impl Into<String>) -> Self {
        Self::StoreProbe(msg.into())
    }

    /// Create a store write error with a message
    pub fn store_write(msg: impl Into<String>) -> Self {
        Self::StoreWrite(msg.into())
    }

    /// Create a config error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias for resolution operations
pub type Result<T> = std::result::Result<T, ResolutionError>;
