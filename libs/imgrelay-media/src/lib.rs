//! # ImgRelay Media Adapters
//!
//! Implementations of the `SourceFetcher` and `ImageTranscoder` ports defined
//! by `imgrelay-domain`: an HTTP source fetcher over `reqwest` with a bounded
//! timeout, and a WebP transcoder over the `image` and `webp` crates.

pub mod infrastructure;

pub use infrastructure::{HttpSourceFetcher, WebpTranscoder};
