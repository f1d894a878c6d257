//! Invocation payload -> response, shared by the Lambda binaries and the CLI.
//!
//! Everything checked here fails the whole invocation, and is checked before
//! any descriptor runs: a 500 response means nothing was written.

use crate::core::etl::EtlEngine;
use crate::core::extract_job::ExtractJob;
use crate::core::load_job::{LoadJob, LoadTask};
use crate::domain::job::{
    ExtractDescriptor, ExtractRequest, ExtractResponse, LoadRequest, LoadResponse,
};
use crate::domain::ports::{BlobStore, SheetSource, TableLoader};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::validate_non_empty_string;

pub async fn handle_extract<S, B>(
    engine: &EtlEngine<ExtractJob<S, B>>,
    payload: serde_json::Value,
) -> ExtractResponse
where
    S: SheetSource,
    B: BlobStore,
{
    let request: ExtractRequest = match serde_json::from_value(payload) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Rejected extract payload: {}", e);
            return ExtractResponse::failed(format!("Invalid payload: {}", e));
        }
    };

    for (index, descriptor) in request.data.iter().enumerate() {
        if let Err(e) = check_extract_descriptor(descriptor) {
            tracing::error!("Rejected extract descriptor #{}: {}", index + 1, e);
            return ExtractResponse::failed(format!("Invalid descriptor #{}: {}", index + 1, e));
        }
    }

    ExtractResponse::completed(engine.run(&request.data).await)
}

pub async fn handle_load<B, T>(
    engine: &EtlEngine<LoadJob<B, T>>,
    payload: serde_json::Value,
) -> LoadResponse
where
    B: BlobStore,
    T: TableLoader,
{
    let request: LoadRequest = match serde_json::from_value(payload) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Rejected load payload: {}", e);
            return LoadResponse::failed(format!("Invalid payload: {}", e));
        }
    };

    let tasks = match request
        .data
        .iter()
        .map(LoadTask::from_descriptor)
        .collect::<Result<Vec<_>>>()
    {
        Ok(tasks) => tasks,
        Err(e) => {
            let message = match e {
                EtlError::ValidationError { message } => message,
                other => other.to_string(),
            };
            tracing::error!("Rejected load batch: {}", message);
            return LoadResponse::failed(message);
        }
    };

    LoadResponse::completed(engine.run(&tasks).await)
}

fn check_extract_descriptor(descriptor: &ExtractDescriptor) -> Result<()> {
    validate_non_empty_string("s3.bucket", &descriptor.s3.bucket)?;
    validate_non_empty_string("s3.key", &descriptor.s3.key)?;
    validate_non_empty_string("sheet.id", &descriptor.sheet.id)?;
    validate_non_empty_string("sheet.sheet", &descriptor.sheet.sheet)?;
    if descriptor.sheet.schema.is_empty() {
        return Err(EtlError::validation(
            "sheet.schema must name at least one column",
        ));
    }
    Ok(())
}
