//! # ImgRelay Domain Layer
//!
//! This crate contains the pure business logic for the imgrelay on-demand
//! image transcoding proxy. It follows hexagonal architecture principles:
//!
//! - **Resolution**: The core cache-aside engine turning request paths into
//!   destination URLs
//! - **Ports**: Trait definitions for external dependencies (ArtifactStore,
//!   SourceFetcher, ImageTranscoder)
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (AWS, S3, HTTP,
//! image codecs). All external dependencies are expressed as traits (ports)
//! that are implemented by adapter layers.
//!
//! ## Example
//!
//! ```rust,ignore
//! use imgrelay_domain::resolution::ResolutionService;
//! use imgrelay_domain::ports::{ArtifactStore, ImageTranscoder, SourceFetcher};
//!
//! // The service is generic over any set of port implementations
//! async fn example<S, F, T>(service: ResolutionService<S, F, T>)
//! where
//!     S: ArtifactStore,
//!     F: SourceFetcher,
//!     T: ImageTranscoder,
//! {
//!     let url = service.resolve("/img/photo.jpg").await.unwrap();
//!     println!("Resolved to: {}", url);
//! }
//! ```

pub mod ports;
pub mod resolution;

// Re-export commonly used types
pub use ports::{ArtifactStore, ImageTranscoder, SourceFetcher};
pub use resolution::{
    ResolutionCache, ResolutionConfig, ResolutionError, ResolutionService, StorageKey,
};
