use crate::utils::error::{EtlError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// `table` or `schema.table`, unquoted.
static SQL_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("identifier pattern is valid")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Table names are spliced into SQL text, so only plain identifiers pass.
pub fn validate_sql_identifier(field_name: &str, value: &str) -> Result<()> {
    if !SQL_IDENTIFIER.is_match(value) {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected a table name like `table` or `schema.table`".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("sheets_endpoint", "https://sheets.googleapis.com").is_ok());
        assert!(validate_url("sheets_endpoint", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("sheets_endpoint", "").is_err());
        assert!(validate_url("sheets_endpoint", "invalid-url").is_err());
        assert!(validate_url("sheets_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("db_credentials", "db-credentials.json").is_ok());
        assert!(validate_path("db_credentials", "").is_err());
        assert!(validate_path("db_credentials", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_sql_identifier() {
        assert!(validate_sql_identifier("table", "food").is_ok());
        assert!(validate_sql_identifier("table", "dbo.food_log").is_ok());
        assert!(validate_sql_identifier("table", "_staging2").is_ok());
        assert!(validate_sql_identifier("table", "").is_err());
        assert!(validate_sql_identifier("table", "1food").is_err());
        assert!(validate_sql_identifier("table", "food; DROP TABLE users").is_err());
        assert!(validate_sql_identifier("table", "a.b.c").is_err());
    }
}
