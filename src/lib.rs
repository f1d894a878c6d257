pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

#[cfg(feature = "lambda")]
pub use adapters::s3::S3Storage;

pub use adapters::{
    database::SqlTableLoader, local_storage::LocalStorage, sheets::GoogleSheetsClient,
};
pub use config::{credentials::DbCredentials, lambda::LambdaConfig, EtlSettings};
pub use crate::core::{
    etl::EtlEngine,
    extract_job::ExtractJob,
    handler::{handle_extract, handle_load},
    load_job::LoadJob,
};
pub use utils::error::{EtlError, Result};
