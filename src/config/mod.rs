#[cfg(feature = "cli")]
pub mod cli;
pub mod credentials;
pub mod lambda;
pub mod toml_config;

use crate::adapters::sheets::DEFAULT_SHEETS_ENDPOINT;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_url, Validate};

pub const DEFAULT_GOOGLE_CREDENTIALS: &str = "google-credentials.json";
pub const DEFAULT_DB_CREDENTIALS: &str = "db-credentials.json";
pub const DEFAULT_STORAGE_ROOT: &str = "./blobs";

/// Settings for a local run, merged from flags, a settings file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlSettings {
    pub google_credentials_path: String,
    pub db_credentials_path: String,
    pub sheets_endpoint: String,
    pub storage_root: String,
}

impl Default for EtlSettings {
    fn default() -> Self {
        Self {
            google_credentials_path: DEFAULT_GOOGLE_CREDENTIALS.to_string(),
            db_credentials_path: DEFAULT_DB_CREDENTIALS.to_string(),
            sheets_endpoint: DEFAULT_SHEETS_ENDPOINT.to_string(),
            storage_root: DEFAULT_STORAGE_ROOT.to_string(),
        }
    }
}

impl ConfigProvider for EtlSettings {
    fn google_credentials_path(&self) -> &str {
        &self.google_credentials_path
    }

    fn db_credentials_path(&self) -> &str {
        &self.db_credentials_path
    }

    fn sheets_endpoint(&self) -> &str {
        &self.sheets_endpoint
    }

    fn storage_root(&self) -> Option<&str> {
        Some(&self.storage_root)
    }
}

impl Validate for EtlSettings {
    fn validate(&self) -> Result<()> {
        validate_path("google_credentials", &self.google_credentials_path)?;
        validate_path("db_credentials", &self.db_credentials_path)?;
        validate_url("sheets_endpoint", &self.sheets_endpoint)?;
        validate_path("storage_root", &self.storage_root)?;
        Ok(())
    }
}
