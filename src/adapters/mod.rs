// Adapters layer: concrete implementations of the domain ports.

pub mod database;
pub mod local_storage;
#[cfg(feature = "lambda")]
pub mod s3;
pub mod sheets;
