use crate::core::coerce::clean_text;
use crate::core::normalize::NormalizedRow;
use crate::domain::model::RecordKind;

/// `resource_id` prefixes that mark a therapy service row.
pub const THERAPY_ID_PREFIXES: [&str; 2] = ["HLT", "THR"];

/// Row-level decision for the mixed resources directory. `None` means the
/// row carries neither a therapy id nor a program id and is skipped.
pub fn classify_row(row: &NormalizedRow) -> Option<RecordKind> {
    if let Some(resource_id) = clean_text(row.get("resource_id")) {
        if THERAPY_ID_PREFIXES
            .iter()
            .any(|prefix| resource_id.starts_with(prefix))
        {
            return Some(RecordKind::Therapy);
        }
    }

    clean_text(row.get("program_id")).map(|_| RecordKind::Financial)
}

/// Header-level decision, made once per source before any row is read.
/// `program_*` headers and unrecognised layouts both land on financial.
pub fn classify_headers<'a, I>(keys: I) -> RecordKind
where
    I: IntoIterator<Item = &'a str>,
{
    if keys
        .into_iter()
        .any(|key| key == "resource_id" || key == "resource_name")
    {
        RecordKind::Therapy
    } else {
        RecordKind::Financial
    }
}
