use crate::domain::model::{InsertReport, Record, SourceRows};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Anything that can produce raw header-keyed rows.
#[async_trait]
pub trait RowSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch_rows(&self) -> Result<SourceRows>;
}

/// Append-only destination. Records go out in chunks of `batch_size`;
/// failures are reported per chunk, never raised.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn insert(&self, table: &str, records: &[Record], batch_size: usize) -> InsertReport;
}
