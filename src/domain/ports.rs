use crate::domain::job::LoadMethod;
use crate::domain::model::RecordSet;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Reads a cell range out of a spreadsheet as rows of display strings.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>>;
}

/// Object storage addressed by bucket and key.
pub trait BlobStore: Send + Sync {
    fn read_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Writes a record set into a database table. Returns the number of rows inserted.
#[async_trait]
pub trait TableLoader: Send + Sync {
    async fn load(&self, table: &str, records: &RecordSet, method: LoadMethod) -> Result<u64>;
}

pub trait ConfigProvider: Send + Sync {
    fn google_credentials_path(&self) -> &str;
    fn db_credentials_path(&self) -> &str;
    fn sheets_endpoint(&self) -> &str;
    /// Root of the filesystem blob store; `None` when objects live in S3.
    fn storage_root(&self) -> Option<&str> {
        None
    }
}
