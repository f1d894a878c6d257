use crate::adapters::sheets::DEFAULT_SHEETS_ENDPOINT;
use crate::config::{DEFAULT_DB_CREDENTIALS, DEFAULT_GOOGLE_CREDENTIALS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};
use std::env;

/// Lambda settings, read from the function's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaConfig {
    pub google_credentials_path: String,
    pub db_credentials_path: String,
    pub sheets_endpoint: String,
    pub s3_region: String,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|name| env::var(name).ok()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            google_credentials_path: lookup("GOOGLE_CREDENTIALS_PATH")
                .unwrap_or_else(|| DEFAULT_GOOGLE_CREDENTIALS.to_string()),
            db_credentials_path: lookup("DB_CREDENTIALS_PATH")
                .unwrap_or_else(|| DEFAULT_DB_CREDENTIALS.to_string()),
            sheets_endpoint: lookup("SHEETS_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_SHEETS_ENDPOINT.to_string()),
            s3_region: lookup("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        }
    }
}

impl ConfigProvider for LambdaConfig {
    fn google_credentials_path(&self) -> &str {
        &self.google_credentials_path
    }

    fn db_credentials_path(&self) -> &str {
        &self.db_credentials_path
    }

    fn sheets_endpoint(&self) -> &str {
        &self.sheets_endpoint
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_path("GOOGLE_CREDENTIALS_PATH", &self.google_credentials_path)?;
        validate_path("DB_CREDENTIALS_PATH", &self.db_credentials_path)?;
        validate_url("SHEETS_ENDPOINT", &self.sheets_endpoint)?;
        validate_non_empty_string("S3_REGION", &self.s3_region)?;

        tracing::debug!("Lambda configuration validation passed");
        Ok(())
    }
}
