//! # ImgRelay S3 Adapter
//!
//! S3-compatible implementation of the `ArtifactStore` port defined by
//! `imgrelay-domain`. Works against AWS S3 and MinIO.

pub mod infrastructure;

pub use infrastructure::S3ArtifactStore;
