//! Blob storage implementations

pub mod local;

pub use local::LocalBlobStorage;
