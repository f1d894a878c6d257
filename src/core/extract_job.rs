use crate::core::etl::BatchJob;
use crate::core::transform::transform_records;
use crate::domain::job::{ExtractDescriptor, JobOutcome};
use crate::domain::model::RecordSet;
use crate::domain::ports::{BlobStore, SheetSource};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Sheet range -> record set -> transform -> CSV object.
pub struct ExtractJob<S: SheetSource, B: BlobStore> {
    sheets: S,
    storage: B,
}

impl<S: SheetSource, B: BlobStore> ExtractJob<S, B> {
    pub fn new(sheets: S, storage: B) -> Self {
        Self { sheets, storage }
    }

    async fn land(&self, descriptor: &ExtractDescriptor, values: Vec<Vec<String>>) -> Result<usize> {
        let records = RecordSet::from_sheet_values(&descriptor.sheet.schema, values)?;
        let records = transform_records(&descriptor.name, records)?;
        let csv = records.to_csv()?;

        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            records.len(),
            csv.len(),
            descriptor.s3
        );
        self.storage
            .write_object(&descriptor.s3.bucket, &descriptor.s3.key, csv.as_bytes())
            .await?;
        Ok(records.len())
    }
}

#[async_trait]
impl<S: SheetSource, B: BlobStore> BatchJob for ExtractJob<S, B> {
    type Descriptor = ExtractDescriptor;

    fn name(&self) -> &'static str {
        "extract"
    }

    fn describe(&self, descriptor: &ExtractDescriptor) -> String {
        format!(
            "{}: sheet {}:{} -> {}",
            descriptor.name, descriptor.sheet.id, descriptor.sheet.sheet, descriptor.s3
        )
    }

    async fn run_descriptor(&self, descriptor: &ExtractDescriptor) -> JobOutcome {
        // A failed fetch must not reach the transform, or an empty object would be uploaded.
        let values = match self
            .sheets
            .fetch_range(&descriptor.sheet.id, &descriptor.sheet.sheet)
            .await
        {
            Ok(values) => values,
            Err(e) => {
                return JobOutcome::Error(format!(
                    "Unable to read sheet {}:{}. {}",
                    descriptor.sheet.id, descriptor.sheet.sheet, e
                ))
            }
        };

        match self.land(descriptor, values).await {
            Ok(rows) => {
                tracing::debug!("Landed {} rows for '{}'", rows, descriptor.name);
                JobOutcome::Success(format!(
                    "Successfully put data to S3:{}.",
                    descriptor.s3
                ))
            }
            Err(e) => JobOutcome::Error(format!(
                "Unable to put data to S3:{}. {}",
                descriptor.s3, e
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{MockSheets, MockStorage};
    use crate::domain::job::{S3Location, SheetRange};

    fn descriptor(name: &str, sheet_id: &str, key: &str) -> ExtractDescriptor {
        ExtractDescriptor {
            name: name.to_string(),
            s3: S3Location {
                bucket: "b".to_string(),
                key: key.to_string(),
            },
            sheet: SheetRange {
                id: sheet_id.to_string(),
                sheet: "Sheet1".to_string(),
                schema: [
                    "Name",
                    "Type",
                    "Protein",
                    "Carbohydrates",
                    "Fat",
                    "Fiber",
                    "Servings",
                    "Calories",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            },
        }
    }

    #[tokio::test]
    async fn test_food_sheet_lands_as_csv() {
        let sheets = MockSheets::new().with_range(
            "X",
            &[&["Apple", "Fruit", "0.3", "25", "0.2", "4", "1", "95"]],
        );
        let storage = MockStorage::new();
        let job = ExtractJob::new(sheets, storage.clone());

        let outcome = job.run_descriptor(&descriptor("food", "X", "food.csv")).await;

        assert_eq!(
            outcome,
            JobOutcome::Success("Successfully put data to S3:b/food.csv.".to_string())
        );
        let csv = storage.get_text("b", "food.csv").await.unwrap();
        assert_eq!(
            csv,
            "Name,Type,Protein,Carbohydrates,Fat,Fiber,Servings,Calories\n\
             Apple,Fruit,0.3,25,0.2,4,1,95\n"
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_uploads_nothing() {
        let storage = MockStorage::new();
        let job = ExtractJob::new(MockSheets::new(), storage.clone());

        let outcome = job.run_descriptor(&descriptor("food", "missing", "food.csv")).await;

        assert!(!outcome.is_success());
        assert!(outcome.message().starts_with("Unable to read sheet missing:Sheet1."));
        assert!(storage.get_text("b", "food.csv").await.is_none());
    }

    #[tokio::test]
    async fn test_write_failure_names_location() {
        let sheets = MockSheets::new().with_range("X", &[&["a", "b", "1", "2", "3", "4", "5", "6"]]);
        let job = ExtractJob::new(sheets, MockStorage::failing_writes());

        let outcome = job.run_descriptor(&descriptor("food", "X", "food.csv")).await;

        assert!(!outcome.is_success());
        assert!(outcome.message().starts_with("Unable to put data to S3:b/food.csv."));
    }

    #[tokio::test]
    async fn test_unknown_name_lands_raw_values() {
        let sheets = MockSheets::new().with_range(
            "X",
            &[
                &["Name", "Type", "Protein", "Carbohydrates", "Fat", "Fiber", "Servings", "Calories"],
                &["Apple", "Fruit", "?", "25", "0.2", "4", "1", "95"],
            ],
        );
        let storage = MockStorage::new();
        let job = ExtractJob::new(sheets, storage.clone());

        let outcome = job.run_descriptor(&descriptor("raw", "X", "raw.csv")).await;

        assert!(outcome.is_success());
        let csv = storage.get_text("b", "raw.csv").await.unwrap();
        // identity keeps the sheet's own header row as data
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("Apple,Fruit,?,25"));
    }
}
