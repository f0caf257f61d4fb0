use crate::domain::model::{RawRow, RecordKind, SourceRows};
use crate::domain::ports::RowSource;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::{Number, Value};
use std::path::{Path, PathBuf};

/// Legacy column-index layouts of the verified workbooks. Indices missing
/// from a table are not imported.
const FINANCIAL_COLUMNS: &[(usize, &str)] = &[
    (0, "program_id"),
    (1, "program_name"),
    (2, "organization_type"),
    (3, "website"),
    (4, "phone"),
    (5, "email"),
    (6, "address"),
    (7, "geographic_coverage"),
    (8, "states_available"),
    (9, "program_category"),
    (10, "assistance_type"),
    (11, "award_amount_min"),
    (12, "award_amount_max"),
    (13, "annual_cap"),
    (14, "lifetime_cap"),
    (15, "age_range_min"),
    (16, "age_range_max"),
    (17, "diagnosis_required"),
    (18, "income_limit"),
    (19, "income_limit_details"),
    (20, "asset_limit"),
    (21, "other_eligibility"),
    (22, "covered_expenses"),
    (23, "application_deadline"),
    (24, "application_type"),
    (25, "application_url"),
    (26, "reapplication_allowed"),
    (27, "processing_time"),
    (28, "program_description"),
    (29, "application_process"),
    (30, "key_features"),
    (31, "real_world_context"),
    (32, "special_notes"),
];

const THERAPY_COLUMNS: &[(usize, &str)] = &[
    (0, "resource_id"),
    (1, "resource_name"),
    (2, "organization_name"),
    (3, "organization_type"),
    (4, "primary_category"),
    (5, "subcategories"),
    (6, "resource_type"),
    (7, "ds_specificity"),
    (8, "website"),
    (9, "phone"),
    (10, "email"),
    (11, "address"),
    (12, "jurisdiction_level"),
    (13, "states_available"),
    (14, "service_area_notes"),
    (15, "lifecycle_stages"),
    (16, "age_min"),
    (17, "age_max"),
    (18, "eligibility_criteria"),
    (19, "cost_type"),
    (20, "cost_details"),
    (21, "application_status"),
    (22, "short_description"),
    (23, "full_description"),
    (24, "key_features"),
    (25, "practical_notes"),
    (30, "tags"),
];

const INSPIRATION_COLUMNS: &[(usize, &str)] = &[
    (0, "profile_id"),
    (1, "full_name"),
    (2, "known_as"),
    (3, "birth_year"),
    (4, "location_city"),
    (5, "location_state"),
    (6, "location_country"),
    (7, "primary_field"),
    (8, "secondary_fields"),
    (9, "specific_achievements"),
    (10, "active_status"),
    (11, "active_since"),
    (12, "website"),
    (13, "instagram"),
    (14, "tiktok"),
    (15, "youtube"),
    (16, "facebook"),
    (17, "short_bio"),
    (18, "notable_quotes"),
    (19, "key_accomplishments"),
    (20, "speaking_available"),
    (21, "awards_honors"),
    (22, "include_in_directory"),
    (23, "directory_categories"),
    (24, "featured_profile"),
];

pub fn positional_columns(kind: RecordKind) -> &'static [(usize, &'static str)] {
    match kind {
        RecordKind::Financial => FINANCIAL_COLUMNS,
        RecordKind::Therapy => THERAPY_COLUMNS,
        RecordKind::Inspiration => INSPIRATION_COLUMNS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLayout {
    /// First row holds the headers.
    Header,
    /// Deprecated: fixed column positions, header row ignored.
    Positional(RecordKind),
}

pub struct SheetSource {
    path: PathBuf,
    sheet: Option<String>,
    layout: SheetLayout,
}

impl SheetSource {
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>, layout: SheetLayout) -> Self {
        Self {
            path: path.into(),
            sheet,
            layout,
        }
    }

    fn read_cells(&self) -> Result<Vec<Vec<Data>>> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let sheet_name = select_sheet(
            &workbook.sheet_names(),
            self.sheet.as_deref(),
            &file_name(&self.path),
        )?;

        tracing::debug!("📄 Reading sheet '{}' from {}", sheet_name, self.path.display());
        let range = workbook.worksheet_range(&sheet_name)?;
        Ok(range.rows().map(|row| row.to_vec()).collect())
    }
}

#[async_trait]
impl RowSource for SheetSource {
    fn describe(&self) -> String {
        format!("spreadsheet {}", self.path.display())
    }

    async fn fetch_rows(&self) -> Result<SourceRows> {
        if let SheetLayout::Positional(kind) = self.layout {
            tracing::warn!(
                "⚠️ {}: positional {} layout is deprecated, add a header row and drop `positional`",
                file_name(&self.path),
                kind.label()
            );
        }

        let cells = self.read_cells()?;
        Ok(rows_from_cells(cells, self.layout))
    }
}

/// The requested sheet when given, otherwise the first one.
fn select_sheet(names: &[String], requested: Option<&str>, source_name: &str) -> Result<String> {
    let found = match requested {
        Some(wanted) => names.iter().find(|name| name.as_str() == wanted),
        None => names.first(),
    };

    found.cloned().ok_or_else(|| EtlError::SourceFormatError {
        source_name: source_name.to_string(),
        message: match requested {
            Some(wanted) => format!("sheet '{}' not found (have: {})", wanted, names.join(", ")),
            None => "workbook has no sheets".to_string(),
        },
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Applies the layout to raw sheet rows. The first row is always treated
/// as the header row.
pub fn rows_from_cells(cells: Vec<Vec<Data>>, layout: SheetLayout) -> SourceRows {
    let mut iter = cells.into_iter();
    let header_row = iter.next().unwrap_or_default();

    match layout {
        SheetLayout::Header => {
            let headers: Vec<String> = header_row.iter().map(header_text).collect();
            let rows = iter
                .filter(|row| !row.iter().all(is_blank))
                .map(|row| {
                    headers
                        .iter()
                        .zip(row.iter())
                        .filter(|(header, _)| !header.is_empty())
                        .map(|(header, cell)| (header.clone(), cell_to_value(cell)))
                        .collect::<RawRow>()
                })
                .collect();
            SourceRows { headers, rows }
        }
        SheetLayout::Positional(kind) => {
            let columns = positional_columns(kind);
            let headers = columns.iter().map(|(_, name)| name.to_string()).collect();
            let rows = iter
                .filter(|row| !row.iter().all(is_blank))
                .map(|row| {
                    columns
                        .iter()
                        .filter_map(|(index, name)| {
                            row.get(*index).map(|cell| (*name, cell_to_value(cell)))
                        })
                        .collect::<RawRow>()
                })
                .collect();
            SourceRows { headers, rows }
        }
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn header_text(cell: &Data) -> String {
    match cell_to_value(cell) {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Nearest JSON scalar for a cell. Dates become ISO-8601 strings and
/// whole-number floats become integers so ids do not grow a ".0".
pub fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => float_to_value(*f),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Value::String(d.format("%Y-%m-%dT%H:%M:%S").to_string()))
            .unwrap_or(Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}

fn float_to_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Value::Number((f as i64).into())
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}
