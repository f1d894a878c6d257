use crate::core::etl::BatchJob;
use crate::domain::job::{JobOutcome, LoadDescriptor, LoadMethod, S3Location};
use crate::domain::model::RecordSet;
use crate::domain::ports::{BlobStore, TableLoader};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_sql_identifier};
use async_trait::async_trait;

/// A load descriptor whose method and table name have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTask {
    pub table: String,
    pub s3: S3Location,
    pub method: LoadMethod,
}

impl LoadTask {
    pub fn from_descriptor(descriptor: &LoadDescriptor) -> Result<Self> {
        let method = LoadMethod::parse(descriptor.method.as_deref()).ok_or_else(|| {
            EtlError::validation(format!(
                "Invalid insertion method '{}'. Valid methods: {:?}",
                descriptor.method.as_deref().unwrap_or("None"),
                LoadMethod::VALID
            ))
        })?;

        validate_sql_identifier("table", &descriptor.table)?;
        validate_non_empty_string("s3.bucket", &descriptor.s3.bucket)?;
        validate_non_empty_string("s3.key", &descriptor.s3.key)?;

        Ok(Self {
            table: descriptor.table.clone(),
            s3: descriptor.s3.clone(),
            method,
        })
    }
}

/// CSV object -> database table, replacing or appending.
pub struct LoadJob<B: BlobStore, T: TableLoader> {
    storage: B,
    loader: T,
}

impl<B: BlobStore, T: TableLoader> LoadJob<B, T> {
    pub fn new(storage: B, loader: T) -> Self {
        Self { storage, loader }
    }

    pub fn loader(&self) -> &T {
        &self.loader
    }

    async fn load(&self, task: &LoadTask) -> Result<u64> {
        let data = self
            .storage
            .read_object(&task.s3.bucket, &task.s3.key)
            .await?;
        let records = RecordSet::from_csv(&data)?;
        tracing::debug!(
            "Parsed {} data rows with columns {:?} from {}",
            records.len(),
            records.columns(),
            task.s3
        );
        self.loader.load(&task.table, &records, task.method).await
    }
}

#[async_trait]
impl<B: BlobStore, T: TableLoader> BatchJob for LoadJob<B, T> {
    type Descriptor = LoadTask;

    fn name(&self) -> &'static str {
        "load"
    }

    fn describe(&self, task: &LoadTask) -> String {
        format!("{} {} -> {}", task.method, task.s3, task.table)
    }

    async fn run_descriptor(&self, task: &LoadTask) -> JobOutcome {
        let method = task.method.as_str().to_uppercase();
        match self.load(task).await {
            Ok(rows) => {
                tracing::debug!("Inserted {} rows into {}", rows, task.table);
                JobOutcome::Success(format!(
                    "{} Successful: Contents from {} altered with payload.",
                    method, task.table
                ))
            }
            Err(e) => JobOutcome::Error(format!(
                "{} Failed: Contents from {} unchanged. {}",
                method, task.table, e
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{MockStorage, RecordingLoader};

    fn descriptor(table: &str, method: Option<&str>) -> LoadDescriptor {
        LoadDescriptor {
            table: table.to_string(),
            s3: S3Location {
                bucket: "b".to_string(),
                key: "food.csv".to_string(),
            },
            method: method.map(str::to_string),
        }
    }

    #[test]
    fn test_task_rejects_invalid_method() {
        match LoadTask::from_descriptor(&descriptor("food", Some("bogus"))) {
            Err(EtlError::ValidationError { message }) => assert_eq!(
                message,
                "Invalid insertion method 'bogus'. Valid methods: [\"replace\", \"append\"]"
            ),
            other => panic!("expected a validation error, got {:?}", other),
        }

        let err = LoadTask::from_descriptor(&descriptor("food", None)).unwrap_err();
        assert!(err.to_string().contains("'None'"));
    }

    #[test]
    fn test_task_rejects_unsafe_table() {
        assert!(matches!(
            LoadTask::from_descriptor(&descriptor("food; DELETE FROM x", Some("append"))),
            Err(EtlError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_task_normalizes_method() {
        let task = LoadTask::from_descriptor(&descriptor("food", Some("RePlAcE"))).unwrap();
        assert_eq!(task.method, LoadMethod::Replace);
    }

    #[tokio::test]
    async fn test_load_passes_data_rows_only() {
        let storage = MockStorage::new();
        storage
            .put("b", "food.csv", "Name,Calories\nApple,95\nPear,101\n")
            .await;
        let job = LoadJob::new(storage, RecordingLoader::new());
        let task = LoadTask::from_descriptor(&descriptor("food", Some("append"))).unwrap();

        let outcome = job.run_descriptor(&task).await;

        assert_eq!(
            outcome,
            JobOutcome::Success(
                "APPEND Successful: Contents from food altered with payload.".to_string()
            )
        );
        let calls = job.loader().calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "food");
        assert_eq!(calls[0].1.len(), 2);
        assert_eq!(calls[0].2, LoadMethod::Append);
    }

    #[tokio::test]
    async fn test_missing_object_is_reported() {
        let job = LoadJob::new(MockStorage::new(), RecordingLoader::new());
        let task = LoadTask::from_descriptor(&descriptor("food", Some("replace"))).unwrap();

        let outcome = job.run_descriptor(&task).await;

        assert!(!outcome.is_success());
        assert!(outcome
            .message()
            .starts_with("REPLACE Failed: Contents from food unchanged."));
        assert!(job.loader().calls().await.is_empty());
    }
}
