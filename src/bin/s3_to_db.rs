use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use sheets_etl::domain::job::LoadResponse;
use sheets_etl::domain::ports::ConfigProvider;
use sheets_etl::utils::{logger, validation::Validate};
use sheets_etl::{handle_load, DbCredentials, EtlEngine, LambdaConfig, LoadJob, S3Storage, SqlTableLoader};

async fn function_handler(event: LambdaEvent<Value>) -> Result<LoadResponse, Error> {
    tracing::info!("Starting S3-to-database Lambda function");

    let lambda_config = LambdaConfig::from_env()?;
    if let Err(e) = lambda_config.validate() {
        return Ok(LoadResponse::failed(e.to_string()));
    }

    let credentials = match DbCredentials::from_file(lambda_config.db_credentials_path()) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("Database credentials unavailable: {}", e);
            return Ok(LoadResponse::failed(e.to_string()));
        }
    };

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let config = aws_sdk_s3::config::Builder::from(&config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .build();
    let storage = S3Storage::new(S3Client::from_conf(config));

    let engine = EtlEngine::new(LoadJob::new(storage, SqlTableLoader::new(credentials)));
    let response = handle_load(&engine, event.payload).await;

    tracing::info!("S3-to-database Lambda function finished with {}", response.status_code());
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();
    run(service_fn(function_handler)).await
}
