//! In-memory stand-ins for the ports, shared by the unit tests.

use crate::domain::job::LoadMethod;
use crate::domain::model::RecordSet;
use crate::domain::ports::{BlobStore, SheetSource, TableLoader};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_writes: bool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub async fn put(&self, bucket: &str, key: &str, text: &str) {
        let mut objects = self.objects.lock().await;
        objects.insert(format!("{}/{}", bucket, key), text.as_bytes().to_vec());
    }

    pub async fn get_text(&self, bucket: &str, key: &str) -> Option<String> {
        let objects = self.objects.lock().await;
        objects
            .get(&format!("{}/{}", bucket, key))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl BlobStore for MockStorage {
    async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let objects = self.objects.lock().await;
        objects
            .get(&format!("{}/{}", bucket, key))
            .cloned()
            .ok_or_else(|| EtlError::storage(format!("No such object: {}/{}", bucket, key)))
    }

    async fn write_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(EtlError::storage("Access Denied"));
        }
        let mut objects = self.objects.lock().await;
        objects.insert(format!("{}/{}", bucket, key), data.to_vec());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockSheets {
    ranges: HashMap<String, Vec<Vec<String>>>,
}

impl MockSheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, spreadsheet_id: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect();
        self.ranges.insert(spreadsheet_id.to_string(), rows);
        self
    }
}

#[async_trait]
impl SheetSource for MockSheets {
    async fn fetch_range(&self, spreadsheet_id: &str, _range: &str) -> Result<Vec<Vec<String>>> {
        self.ranges
            .get(spreadsheet_id)
            .cloned()
            .ok_or_else(|| EtlError::SheetsApiError {
                status: 404,
                message: "Requested entity was not found.".to_string(),
            })
    }
}

#[derive(Default)]
pub struct RecordingLoader {
    calls: Mutex<Vec<(String, RecordSet, LoadMethod)>>,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn calls(&self) -> Vec<(String, RecordSet, LoadMethod)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl TableLoader for RecordingLoader {
    async fn load(&self, table: &str, records: &RecordSet, method: LoadMethod) -> Result<u64> {
        let mut calls = self.calls.lock().await;
        calls.push((table.to_string(), records.clone(), method));
        Ok(records.len() as u64)
    }
}
