use crate::config::toml_config::TomlConfig;
use crate::config::EtlSettings;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "sheets-etl")]
#[command(about = "Land Google Sheets ranges as CSV and load CSV objects into database tables")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML settings file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Google service-account key file")]
    pub google_credentials: Option<String>,

    #[arg(long, global = true, help = "Database credentials JSON file")]
    pub db_credentials: Option<String>,

    #[arg(long, global = true)]
    pub sheets_endpoint: Option<String>,

    #[arg(long, global = true, help = "Directory holding one sub-directory per bucket")]
    pub storage_root: Option<String>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch sheet ranges and write them as CSV objects
    Extract {
        #[arg(long, help = "JSON payload: {\"data\": [...]}")]
        payload: String,
    },
    /// Insert CSV objects into database tables
    Load {
        #[arg(long, help = "JSON payload: {\"data\": [...]}")]
        payload: String,
    },
}

impl CliConfig {
    pub fn payload_path(&self) -> &str {
        match &self.command {
            Command::Extract { payload } | Command::Load { payload } => payload,
        }
    }

    /// Flags win over the settings file, which wins over defaults.
    pub fn settings(&self) -> Result<EtlSettings> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let mut settings = EtlSettings::default();
        if let Some(v) = self.google_credentials.clone().or(file.credentials.google) {
            settings.google_credentials_path = v;
        }
        if let Some(v) = self.db_credentials.clone().or(file.credentials.database) {
            settings.db_credentials_path = v;
        }
        if let Some(v) = self.sheets_endpoint.clone().or(file.sheets.endpoint) {
            settings.sheets_endpoint = v;
        }
        if let Some(v) = self.storage_root.clone().or(file.storage.root) {
            settings.storage_root = v;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_load_command() {
        let cli = CliConfig::parse_from(["sheets-etl", "load", "--payload", "load.json", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Load { .. }));
        assert_eq!(cli.payload_path(), "load.json");
    }

    #[test]
    fn test_defaults_without_file() {
        let cli = CliConfig::parse_from(["sheets-etl", "extract", "--payload", "p.json"]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings, EtlSettings::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[credentials]\ngoogle = \"file-google.json\"\ndatabase = \"file-db.json\"\n[storage]\nroot = \"/data\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "sheets-etl",
            "--config",
            &path,
            "--db-credentials",
            "flag-db.json",
            "load",
            "--payload",
            "p.json",
        ]);
        let settings = cli.settings().unwrap();

        assert_eq!(settings.google_credentials_path, "file-google.json");
        assert_eq!(settings.db_credentials_path, "flag-db.json");
        assert_eq!(settings.storage_root, "/data");
    }
}
