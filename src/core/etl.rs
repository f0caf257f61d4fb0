use crate::config::TableNames;
use crate::core::classify::{classify_headers, classify_row};
use crate::core::mapping::map_row;
use crate::core::normalize::{normalize_key, NormalizedRow};
use crate::domain::model::{InsertReport, Record, RecordKind, SourceKind, SourceRows};
use crate::domain::ports::{RecordSink, RowSource};
use serde::Serialize;

const ALL_KINDS: [RecordKind; 3] = [
    RecordKind::Financial,
    RecordKind::Therapy,
    RecordKind::Inspiration,
];

/// Records of one source, grouped by destination.
#[derive(Debug, Clone, Default)]
pub struct MappedRecords {
    pub financial: Vec<Record>,
    pub therapy: Vec<Record>,
    pub inspiration: Vec<Record>,
    /// Rows that could not be classified or lacked an id/name.
    pub dropped: usize,
}

impl MappedRecords {
    fn push(&mut self, record: Record) {
        match record.kind() {
            RecordKind::Financial => self.financial.push(record),
            RecordKind::Therapy => self.therapy.push(record),
            RecordKind::Inspiration => self.inspiration.push(record),
        }
    }

    pub fn records(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Financial => &self.financial,
            RecordKind::Therapy => &self.therapy,
            RecordKind::Inspiration => &self.inspiration,
        }
    }

    pub fn len(&self) -> usize {
        self.financial.len() + self.therapy.len() + self.inspiration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize, classify and map every row of a source.
pub fn map_source_rows(kind: SourceKind, source: &SourceRows) -> MappedRecords {
    let whole_source_kind = match kind {
        SourceKind::Resources => None,
        SourceKind::Auto => {
            let keys: Vec<String> = source.headers.iter().map(|h| normalize_key(h)).collect();
            Some(classify_headers(keys.iter().map(String::as_str)))
        }
        fixed => fixed.fixed_kind(),
    };

    let mut mapped = MappedRecords::default();
    for raw in &source.rows {
        let row = NormalizedRow::from_raw(raw);
        let record = whole_source_kind
            .or_else(|| classify_row(&row))
            .and_then(|kind| map_row(kind, &row));

        match record {
            Some(record) => mapped.push(record),
            None => mapped.dropped += 1,
        }
    }
    mapped
}

#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub kind: RecordKind,
    pub table: String,
    pub parsed: usize,
    pub report: InsertReport,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceReport {
    pub name: String,
    pub rows: usize,
    pub dropped: usize,
    pub fetch_error: Option<String>,
    pub tables: Vec<TableReport>,
}

impl SourceReport {
    pub fn inserted(&self, kind: RecordKind) -> usize {
        self.tables
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.report.inserted)
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.fetch_error.is_some() || self.tables.iter().any(|t| !t.report.is_success())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub started_at: String,
    pub dry_run: bool,
    pub sources: Vec<SourceReport>,
}

impl ImportSummary {
    pub fn inserted(&self, kind: RecordKind) -> usize {
        self.sources.iter().map(|s| s.inserted(kind)).sum()
    }

    pub fn total_inserted(&self) -> usize {
        ALL_KINDS.iter().map(|kind| self.inserted(*kind)).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.sources.iter().any(SourceReport::has_failures)
    }
}

/// A configured source ready to run.
pub struct ImportSource {
    pub name: String,
    pub kind: SourceKind,
    pub source: Box<dyn RowSource>,
}

pub struct ImportEngine<K: RecordSink> {
    sink: K,
    tables: TableNames,
    batch_size: usize,
    dry_run: bool,
}

impl<K: RecordSink> ImportEngine<K> {
    pub fn new(sink: K, tables: TableNames, batch_size: usize) -> Self {
        Self {
            sink,
            tables,
            batch_size,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sources run one after another; a failing source only zeroes itself.
    pub async fn run(&self, sources: &[ImportSource]) -> ImportSummary {
        let started_at = chrono::Local::now().to_rfc3339();
        tracing::info!("🚀 Starting import of {} sources at {}", sources.len(), started_at);

        let mut reports = Vec::with_capacity(sources.len());
        for source in sources {
            reports.push(self.run_source(source).await);
        }

        let summary = ImportSummary {
            started_at,
            dry_run: self.dry_run,
            sources: reports,
        };

        for kind in ALL_KINDS {
            tracing::info!("  {}: {}", kind.label(), summary.inserted(kind));
        }
        tracing::info!("📊 Total inserted: {}", summary.total_inserted());
        summary
    }

    pub async fn run_source(&self, source: &ImportSource) -> SourceReport {
        tracing::info!("📥 {}: loading {}", source.name, source.source.describe());

        let mut report = SourceReport {
            name: source.name.clone(),
            ..Default::default()
        };

        let rows = match source.source.fetch_rows().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("❌ {}: could not load source: {}", source.name, e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                report.fetch_error = Some(e.to_string());
                return report;
            }
        };

        tracing::info!("{}: {} rows, {} columns", source.name, rows.rows.len(), rows.headers.len());
        for (i, header) in rows.headers.iter().enumerate() {
            tracing::debug!("    {}. {}", i + 1, header);
        }

        let mapped = map_source_rows(source.kind, &rows);
        report.rows = rows.rows.len();
        report.dropped = mapped.dropped;
        if mapped.dropped > 0 {
            tracing::debug!("{}: skipped {} rows without id or name", source.name, mapped.dropped);
        }

        for kind in ALL_KINDS {
            let records = mapped.records(kind);
            if records.is_empty() {
                continue;
            }

            let table = self.tables.for_kind(kind).to_string();
            tracing::info!("  Parsed {} {}", records.len(), kind.label());

            let insert_report = if self.dry_run {
                tracing::info!("🔍 DRY RUN: would insert {} records into {}", records.len(), table);
                InsertReport::default()
            } else {
                self.sink.insert(&table, records, self.batch_size).await
            };

            report.tables.push(TableReport {
                kind,
                table,
                parsed: records.len(),
                report: insert_report,
            });
        }

        report
    }
}
