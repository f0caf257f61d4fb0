pub mod classify;
pub mod coerce;
pub mod etl;
pub mod mapping;
pub mod normalize;

pub use crate::domain::model::{Record, RecordKind, SourceKind, SourceRows};
pub use crate::domain::ports::{RecordSink, RowSource};
pub use crate::utils::error::Result;
