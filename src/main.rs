use anyhow::Context;
use clap::Parser;
use sheets_etl::config::cli::Command;
use sheets_etl::config::DEFAULT_STORAGE_ROOT;
use sheets_etl::domain::ports::ConfigProvider;
use sheets_etl::utils::{logger, validation::Validate};
use sheets_etl::{
    handle_extract, handle_load, CliConfig, DbCredentials, EtlEngine, ExtractJob,
    GoogleSheetsClient, LoadJob, LocalStorage, SqlTableLoader,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting sheets-etl CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let settings = cli.settings()?;
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let payload_path = cli.payload_path();
    let payload: serde_json::Value = serde_json::from_str(
        &tokio::fs::read_to_string(payload_path)
            .await
            .with_context(|| format!("reading payload {}", payload_path))?,
    )
    .with_context(|| format!("parsing payload {}", payload_path))?;

    let storage = LocalStorage::new(
        settings
            .storage_root()
            .unwrap_or(DEFAULT_STORAGE_ROOT)
            .to_string(),
    );

    let (status, body) = match &cli.command {
        Command::Extract { .. } => {
            let sheets = GoogleSheetsClient::from_service_account_file(
                settings.sheets_endpoint(),
                settings.google_credentials_path(),
            )
            .await?;
            let engine = EtlEngine::new(ExtractJob::new(sheets, storage));
            let response = handle_extract(&engine, payload).await;
            (response.status_code(), serde_json::to_string_pretty(&response)?)
        }
        Command::Load { .. } => {
            let credentials = DbCredentials::from_file(settings.db_credentials_path())?;
            let engine = EtlEngine::new(LoadJob::new(storage, SqlTableLoader::new(credentials)));
            let response = handle_load(&engine, payload).await;
            (response.status_code(), serde_json::to_string_pretty(&response)?)
        }
    };

    println!("{}", body);
    if status != 200 {
        std::process::exit(1);
    }
    Ok(())
}
