use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One source row, keyed by the raw header text in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub cells: Vec<(String, Value)>,
}

impl RawRow {
    pub fn get(&self, header: &str) -> Option<&Value> {
        self.cells
            .iter()
            .rev()
            .find(|(key, _)| key == header)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// What a `RowSource` hands back: the header row plus every data row.
#[derive(Debug, Clone, Default)]
pub struct SourceRows {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Financial,
    Therapy,
    Inspiration,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Financial => "financial resources",
            RecordKind::Therapy => "therapy services",
            RecordKind::Inspiration => "inspiration profiles",
        }
    }
}

/// How rows of a source are routed to a mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Mixed financial/therapy directory, classified row by row.
    Resources,
    Financial,
    Therapy,
    Inspiration,
    /// One mapper for the whole source, chosen from its headers.
    Auto,
}

impl SourceKind {
    pub fn fixed_kind(&self) -> Option<RecordKind> {
        match self {
            SourceKind::Financial => Some(RecordKind::Financial),
            SourceKind::Therapy => Some(RecordKind::Therapy),
            SourceKind::Inspiration => Some(RecordKind::Inspiration),
            SourceKind::Resources | SourceKind::Auto => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialResource {
    pub program_id: String,
    pub program_name: String,
    pub organization_type: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub geographic_coverage: Option<String>,
    pub states_available: Option<String>,
    pub program_category: Option<String>,
    pub assistance_type: Option<String>,
    pub award_amount_min: Option<f64>,
    pub award_amount_max: Option<f64>,
    pub annual_cap: Option<f64>,
    pub lifetime_cap: Option<f64>,
    pub age_range_min: i64,
    pub age_range_max: i64,
    pub diagnosis_required: Option<String>,
    pub income_limit: Option<String>,
    pub income_limit_details: Option<String>,
    pub asset_limit: Option<String>,
    pub other_eligibility: Option<String>,
    pub covered_expenses: Option<String>,
    pub application_deadline: Option<String>,
    pub application_type: Option<String>,
    pub application_url: Option<String>,
    pub reapplication_allowed: Option<String>,
    pub processing_time: Option<String>,
    pub program_description: Option<String>,
    pub application_process: Option<String>,
    pub key_features: Option<String>,
    pub real_world_context: Option<String>,
    pub special_notes: Option<String>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapyService {
    pub resource_id: String,
    pub resource_name: String,
    pub organization_name: Option<String>,
    pub organization_type: Option<String>,
    pub primary_category: String,
    pub subcategories: Option<String>,
    pub resource_type: Option<String>,
    pub ds_specificity: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub jurisdiction_level: Option<String>,
    pub states_available: Option<String>,
    pub service_area_notes: Option<String>,
    pub lifecycle_stages: Option<String>,
    pub age_min: i64,
    pub age_max: i64,
    pub eligibility_criteria: Option<String>,
    pub cost_type: Option<String>,
    pub cost_details: Option<String>,
    pub application_status: Option<String>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub key_features: Option<String>,
    pub practical_notes: Option<String>,
    pub date_added: Option<String>,
    pub last_verified: Option<String>,
    pub verification_source: Option<String>,
    pub data_quality_score: Option<i64>,
    pub tags: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspirationProfile {
    pub profile_id: String,
    pub full_name: String,
    pub known_as: Option<String>,
    pub birth_year: Option<i64>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: String,
    pub primary_field: Option<String>,
    pub secondary_fields: Option<String>,
    pub specific_achievements: Option<String>,
    pub active_status: Option<String>,
    pub active_since: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub facebook: Option<String>,
    pub short_bio: Option<String>,
    pub notable_quotes: Option<String>,
    pub key_accomplishments: Option<String>,
    pub speaking_available: bool,
    pub awards_honors: Option<String>,
    pub include_in_directory: bool,
    pub directory_categories: Option<String>,
    pub featured_profile: bool,
}

/// A destination record; serializes as the bare row object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Financial(FinancialResource),
    Therapy(TherapyService),
    Inspiration(InspirationProfile),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Financial(_) => RecordKind::Financial,
            Record::Therapy(_) => RecordKind::Therapy,
            Record::Inspiration(_) => RecordKind::Inspiration,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Financial(r) => &r.program_id,
            Record::Therapy(r) => &r.resource_id,
            Record::Inspiration(r) => &r.profile_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchError {
    pub batch_index: usize,
    /// HTTP status, or 0 when the request never got a response.
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InsertReport {
    pub inserted: usize,
    pub errors: Vec<BatchError>,
}

impl InsertReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
