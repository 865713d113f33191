//! Object storage for uploaded photos.
//!
//! Wraps an S3-compatible bucket (MinIO in development) behind a small
//! client that knows how photo keys and public URLs are laid out.

mod s3_client;

pub use s3_client::{ObjectPaths, StorageClient};
