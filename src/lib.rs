pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{build_source, RestSink};
pub use config::ImportConfig;
pub use core::etl::{ImportEngine, ImportSource, ImportSummary};
pub use utils::error::{EtlError, Result};
