use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use sheets_etl::domain::job::ExtractResponse;
use sheets_etl::domain::ports::ConfigProvider;
use sheets_etl::utils::{logger, validation::Validate};
use sheets_etl::{handle_extract, EtlEngine, ExtractJob, GoogleSheetsClient, LambdaConfig, S3Storage};

async fn function_handler(event: LambdaEvent<Value>) -> Result<ExtractResponse, Error> {
    tracing::info!("Starting sheets-to-S3 Lambda function");

    let lambda_config = LambdaConfig::from_env()?;
    if let Err(e) = lambda_config.validate() {
        return Ok(ExtractResponse::failed(e.to_string()));
    }

    let sheets = match GoogleSheetsClient::from_service_account_file(
        lambda_config.sheets_endpoint(),
        lambda_config.google_credentials_path(),
    )
    .await
    {
        Ok(sheets) => sheets,
        Err(e) => {
            tracing::error!("Google authentication failed: {}", e);
            return Ok(ExtractResponse::failed(e.to_string()));
        }
    };

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let config = aws_sdk_s3::config::Builder::from(&config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .build();
    let storage = S3Storage::new(S3Client::from_conf(config));

    let engine = EtlEngine::new(ExtractJob::new(sheets, storage));
    let response = handle_extract(&engine, event.payload).await;

    tracing::info!("Sheets-to-S3 Lambda function finished with {}", response.status_code());
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();
    run(service_fn(function_handler)).await
}
