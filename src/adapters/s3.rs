use crate::domain::ports::BlobStore;
use crate::utils::error::{EtlError, Result};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
}

impl S3Storage {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

impl BlobStore for S3Storage {
    async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                EtlError::storage(format!(
                    "Failed to read s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        let data = resp.body.collect().await.map_err(|e| {
            EtlError::storage(format!("Failed to collect s3://{}/{}: {}", bucket, key, e))
        })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type("text/csv")
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| {
                EtlError::storage(format!(
                    "Failed to write s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }
}
