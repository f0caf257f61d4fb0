use crate::domain::model::{BatchError, InsertReport, Record};
use crate::domain::ports::RecordSink;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Bulk insert against a PostgREST-style `/rest/v1/{table}` endpoint.
pub struct RestSink {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestSink {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Ok(()) on 200/201, otherwise (status, truncated body). Transport
    /// failures use status 0.
    async fn post_batch(&self, url: &str, batch: &[Record]) -> std::result::Result<(), (u16, String)> {
        let response = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(batch)
            .send()
            .await
            .map_err(|e| (0, truncate(&e.to_string())))?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err((status.as_u16(), truncate(&body)))
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[async_trait]
impl RecordSink for RestSink {
    async fn insert(&self, table: &str, records: &[Record], batch_size: usize) -> InsertReport {
        let mut report = InsertReport::default();

        if records.is_empty() {
            tracing::info!("No records to insert for {}", table);
            return report;
        }

        let url = self.table_url(table);
        let batch_size = batch_size.max(1);

        for (batch_index, batch) in records.chunks(batch_size).enumerate() {
            match self.post_batch(&url, batch).await {
                Ok(()) => {
                    report.inserted += batch.len();
                    tracing::info!(
                        "  ✓ Inserted batch {} ({} records) into {}",
                        batch_index + 1,
                        batch.len(),
                        table
                    );
                }
                Err((status, message)) => {
                    tracing::error!(
                        "  ✗ Error inserting batch {} into {}: {} {}",
                        batch_index + 1,
                        table,
                        status,
                        message
                    );
                    report.errors.push(BatchError {
                        batch_index,
                        status,
                        message,
                    });
                }
            }
        }

        tracing::info!("Total inserted into {}: {}", table, report.inserted);
        report
    }
}
