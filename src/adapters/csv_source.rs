use crate::domain::model::{RawRow, SourceRows};
use crate::domain::ports::RowSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum CsvLocation {
    /// e.g. a published spreadsheet's `?output=csv` export link
    Url(String),
    File(PathBuf),
}

pub struct CsvSource {
    location: CsvLocation,
    client: Client,
}

impl CsvSource {
    pub fn from_url(url: impl Into<String>, client: Client) -> Self {
        Self {
            location: CsvLocation::Url(url.into()),
            client,
        }
    }

    pub fn from_file(path: impl Into<PathBuf>, client: Client) -> Self {
        Self {
            location: CsvLocation::File(path.into()),
            client,
        }
    }

    async fn download(&self, url: &str) -> Result<String> {
        tracing::debug!("📡 Downloading CSV from: {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        tracing::debug!("API response status: {}", response.status());
        Ok(response.text().await?)
    }
}

#[async_trait]
impl RowSource for CsvSource {
    fn describe(&self) -> String {
        match &self.location {
            CsvLocation::Url(url) => format!("CSV export {}", url),
            CsvLocation::File(path) => format!("CSV file {}", path.display()),
        }
    }

    async fn fetch_rows(&self) -> Result<SourceRows> {
        let text = match &self.location {
            CsvLocation::Url(url) => self.download(url).await?,
            CsvLocation::File(path) => tokio::fs::read_to_string(path).await?,
        };
        parse_csv(&text)
    }
}

/// Header row plus string cells. Short rows only carry the columns they
/// have; extra trailing cells are ignored.
pub fn parse_csv(text: &str) -> Result<SourceRows> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(SourceRows { headers, rows })
}
