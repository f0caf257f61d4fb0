// Adapters layer: concrete sources and the REST sink.

pub mod csv_source;
pub mod http;
pub mod json_source;
pub mod rest_sink;
pub mod sheet_source;

use crate::config::{SourceConfig, SourceType};
use crate::domain::ports::RowSource;
use reqwest::Client;

pub use csv_source::CsvSource;
pub use json_source::JsonSource;
pub use rest_sink::RestSink;
pub use sheet_source::{SheetLayout, SheetSource};

/// Picks the adapter for a configured source.
pub fn build_source(config: &SourceConfig, client: &Client) -> Box<dyn RowSource> {
    match config.r#type {
        SourceType::Csv if config.is_remote() => {
            Box::new(CsvSource::from_url(config.location.clone(), client.clone()))
        }
        SourceType::Csv => Box::new(CsvSource::from_file(config.location.clone(), client.clone())),
        SourceType::Json => Box::new(JsonSource::new(config.location.clone())),
        SourceType::Sheet => {
            let layout = match config.kind.fixed_kind() {
                Some(kind) if config.is_positional() => SheetLayout::Positional(kind),
                _ => SheetLayout::Header,
            };
            Box::new(SheetSource::new(
                config.location.clone(),
                config.sheet.clone(),
                layout,
            ))
        }
    }
}
