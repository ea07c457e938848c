//! Infrastructure implementations of domain ports

mod s3_store;

pub use s3_store::S3ArtifactStore;
