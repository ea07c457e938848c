//! Resolution domain module
//!
//! This module contains the core cache-aside logic of the transcoding proxy:
//! classifying request paths, deriving storage keys, and orchestrating the
//! probe/fetch/transcode/store pipeline behind a bounded in-process cache.

pub mod cache;
pub mod error;
pub mod key;
pub mod service;

pub use cache::ResolutionCache;
pub use error::{ResolutionError, Result};
pub use key::StorageKey;
pub use service::{ResolutionConfig, ResolutionService};
