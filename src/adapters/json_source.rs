use crate::domain::model::{RawRow, SourceRows};
use crate::domain::ports::RowSource;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// A local file holding a JSON array of flat objects.
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RowSource for JsonSource {
    fn describe(&self) -> String {
        format!("JSON file {}", self.path.display())
    }

    async fn fetch_rows(&self) -> Result<SourceRows> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let data: Value = serde_json::from_str(&content)?;
        rows_from_json(data, &self.path.display().to_string())
    }
}

pub fn rows_from_json(data: Value, source_name: &str) -> Result<SourceRows> {
    let Value::Array(items) = data else {
        return Err(EtlError::SourceFormatError {
            source_name: source_name.to_string(),
            message: "expected a JSON array of objects".to_string(),
        });
    };

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(obj) = item else {
            tracing::warn!("⚠️ {}: skipping entry {} (not an object)", source_name, index);
            continue;
        };

        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        rows.push(obj.into_iter().collect::<RawRow>());
    }

    Ok(SourceRows { headers, rows })
}
