use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl fmt::Display for S3Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Where to read a sheet from and which column names to give it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRange {
    /// Spreadsheet id.
    pub id: String,
    /// A1 range, e.g. `Sheet1` or `Sheet1!A2:H`.
    pub sheet: String,
    pub schema: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractDescriptor {
    pub name: String,
    pub s3: S3Location,
    pub sheet: SheetRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub data: Vec<ExtractDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadDescriptor {
    pub table: String,
    pub s3: S3Location,
    /// Raw method as sent by the caller; see [`LoadMethod::parse`].
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub data: Vec<LoadDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMethod {
    Replace,
    Append,
}

impl LoadMethod {
    pub const VALID: [&'static str; 2] = ["replace", "append"];

    /// Case-insensitive; anything but `replace`/`append` is rejected,
    /// including an empty or missing value.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw?.to_ascii_lowercase().as_str() {
            "replace" => Some(LoadMethod::Replace),
            "append" => Some(LoadMethod::Append),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadMethod::Replace => "replace",
            LoadMethod::Append => "append",
        }
    }
}

impl fmt::Display for LoadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one descriptor, serialized as `{"SUCCESS": msg}` or `{"ERROR": msg}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobOutcome {
    #[serde(rename = "SUCCESS")]
    Success(String),
    #[serde(rename = "ERROR")]
    Error(String),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            JobOutcome::Success(m) | JobOutcome::Error(m) => m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractResponse {
    Completed {
        #[serde(rename = "statusCode")]
        status_code: u16,
        results: Vec<JobOutcome>,
    },
    Failed {
        #[serde(rename = "statusCode")]
        status_code: u16,
        #[serde(rename = "ERROR")]
        error: String,
    },
}

impl ExtractResponse {
    pub fn completed(results: Vec<JobOutcome>) -> Self {
        ExtractResponse::Completed {
            status_code: 200,
            results,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        ExtractResponse::Failed {
            status_code: 500,
            error: error.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ExtractResponse::Completed { status_code, .. }
            | ExtractResponse::Failed { status_code, .. } => *status_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LoadResponse {
    Completed {
        #[serde(rename = "StatusCode")]
        status_code: u16,
        results: Vec<JobOutcome>,
    },
    Failed {
        #[serde(rename = "StatusCode")]
        status_code: u16,
        error: String,
    },
}

impl LoadResponse {
    pub fn completed(results: Vec<JobOutcome>) -> Self {
        LoadResponse::Completed {
            status_code: 200,
            results,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        LoadResponse::Failed {
            status_code: 500,
            error: error.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            LoadResponse::Completed { status_code, .. }
            | LoadResponse::Failed { status_code, .. } => *status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_method_parse() {
        assert_eq!(LoadMethod::parse(Some("replace")), Some(LoadMethod::Replace));
        assert_eq!(LoadMethod::parse(Some("REPLACE")), Some(LoadMethod::Replace));
        assert_eq!(LoadMethod::parse(Some("Append")), Some(LoadMethod::Append));
        assert_eq!(LoadMethod::parse(Some("")), None);
        assert_eq!(LoadMethod::parse(Some(" append")), None);
        assert_eq!(LoadMethod::parse(Some("upsert")), None);
        assert_eq!(LoadMethod::parse(None), None);
    }

    #[test]
    fn test_extract_request_shape() {
        let request: ExtractRequest = serde_json::from_value(json!({
            "data": [{
                "name": "food",
                "s3": {"bucket": "b", "key": "food.csv"},
                "sheet": {"id": "X", "sheet": "Sheet1", "schema": ["Name", "Type"]}
            }]
        }))
        .unwrap();

        let descriptor = &request.data[0];
        assert_eq!(descriptor.sheet.schema, vec!["Name", "Type"]);
        assert_eq!(descriptor.s3.to_string(), "b/food.csv");
    }

    #[test]
    fn test_load_request_without_method() {
        let request: LoadRequest = serde_json::from_value(json!({
            "data": [{"table": "food", "s3": {"bucket": "b", "key": "food.csv"}}]
        }))
        .unwrap();
        assert_eq!(request.data[0].method, None);
    }

    #[test]
    fn test_response_serialization() {
        let ok = ExtractResponse::completed(vec![
            JobOutcome::Success("done".to_string()),
            JobOutcome::Error("broken".to_string()),
        ]);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"statusCode": 200, "results": [{"SUCCESS": "done"}, {"ERROR": "broken"}]})
        );

        let failed = LoadResponse::failed("bad method");
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"StatusCode": 500, "error": "bad method"})
        );
        assert_eq!(failed.status_code(), 500);
    }
}
