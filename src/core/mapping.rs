//! Normalized row -> destination record. A mapper returns `None` only when
//! the identity or name column is missing; any other bad cell becomes null.

use crate::core::coerce::{clean_bool, clean_int, clean_numeric, clean_text};
use crate::core::normalize::NormalizedRow;
use crate::domain::model::{
    FinancialResource, InspirationProfile, Record, RecordKind, TherapyService,
};

pub const DEFAULT_AGE_MIN: i64 = 0;
pub const DEFAULT_AGE_MAX: i64 = 999;
pub const DEFAULT_THERAPY_CATEGORY: &str = "Healthcare & Therapy";
pub const DEFAULT_COUNTRY: &str = "USA";

pub fn map_row(kind: RecordKind, row: &NormalizedRow) -> Option<Record> {
    match kind {
        RecordKind::Financial => map_financial(row).map(Record::Financial),
        RecordKind::Therapy => map_therapy(row).map(Record::Therapy),
        RecordKind::Inspiration => map_inspiration(row).map(Record::Inspiration),
    }
}

pub fn map_financial(row: &NormalizedRow) -> Option<FinancialResource> {
    let text = |key: &str| clean_text(row.get(key));
    let money = |key: &str| clean_numeric(row.get(key));

    Some(FinancialResource {
        program_id: text("program_id")?,
        program_name: text("program_name")?,
        organization_type: text("organization_type"),
        website: text("website"),
        phone: text("phone"),
        email: text("email"),
        address: text("address"),
        geographic_coverage: text("geographic_coverage"),
        states_available: text("states_available"),
        program_category: text("program_category"),
        assistance_type: text("assistance_type"),
        award_amount_min: money("award_amount_min"),
        award_amount_max: money("award_amount_max"),
        annual_cap: money("annual_cap"),
        lifetime_cap: money("lifetime_cap"),
        age_range_min: clean_int(row.get("age_range_min")).unwrap_or(DEFAULT_AGE_MIN),
        age_range_max: clean_int(row.get("age_range_max")).unwrap_or(DEFAULT_AGE_MAX),
        diagnosis_required: text("diagnosis_required"),
        income_limit: text("income_limit"),
        income_limit_details: text("income_limit_details"),
        asset_limit: text("asset_limit"),
        other_eligibility: text("other_eligibility"),
        covered_expenses: text("covered_expenses"),
        application_deadline: text("application_deadline"),
        application_type: text("application_type"),
        application_url: text("application_url"),
        reapplication_allowed: text("reapplication_allowed"),
        processing_time: text("processing_time"),
        program_description: text("program_description"),
        application_process: text("application_process"),
        key_features: clean_text(row.first(&["key_features", "key_features_and_benefits"])),
        real_world_context: text("real_world_context"),
        special_notes: text("special_notes"),
        last_updated: text("last_updated"),
    })
}

pub fn map_therapy(row: &NormalizedRow) -> Option<TherapyService> {
    let text = |key: &str| clean_text(row.get(key));

    Some(TherapyService {
        resource_id: text("resource_id")?,
        resource_name: text("resource_name")?,
        organization_name: text("organization_name"),
        organization_type: text("organization_type"),
        primary_category: text("primary_category")
            .unwrap_or_else(|| DEFAULT_THERAPY_CATEGORY.to_string()),
        subcategories: text("subcategories"),
        resource_type: text("resource_type"),
        ds_specificity: text("ds_specificity"),
        website: text("website"),
        phone: text("phone"),
        email: text("email"),
        address: text("address"),
        jurisdiction_level: text("jurisdiction_level"),
        states_available: text("states_available"),
        service_area_notes: text("service_area_notes"),
        lifecycle_stages: text("lifecycle_stages"),
        age_min: clean_int(row.get("age_min")).unwrap_or(DEFAULT_AGE_MIN),
        age_max: clean_int(row.get("age_max")).unwrap_or(DEFAULT_AGE_MAX),
        eligibility_criteria: text("eligibility_criteria"),
        cost_type: text("cost_type"),
        cost_details: text("cost_details"),
        application_status: text("application_status"),
        short_description: text("short_description"),
        full_description: text("full_description"),
        key_features: text("key_features"),
        practical_notes: text("practical_notes"),
        date_added: text("date_added"),
        last_verified: text("last_verified"),
        verification_source: text("verification_source"),
        data_quality_score: clean_int(row.get("data_quality_score")),
        tags: text("tags"),
    })
}

pub fn map_inspiration(row: &NormalizedRow) -> Option<InspirationProfile> {
    let text = |key: &str| clean_text(row.get(key));

    Some(InspirationProfile {
        profile_id: text("profile_id")?,
        full_name: text("full_name")?,
        known_as: clean_text(row.first(&["known_as", "known_as___stage_name", "stage_name"])),
        birth_year: clean_int(row.get("birth_year")),
        location_city: text("location_city"),
        location_state: text("location_state"),
        location_country: text("location_country").unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        primary_field: text("primary_field"),
        secondary_fields: text("secondary_fields"),
        specific_achievements: text("specific_achievements"),
        active_status: text("active_status"),
        active_since: text("active_since"),
        website: text("website"),
        instagram: text("instagram"),
        tiktok: text("tiktok"),
        youtube: text("youtube"),
        facebook: text("facebook"),
        short_bio: text("short_bio"),
        notable_quotes: text("notable_quotes"),
        key_accomplishments: text("key_accomplishments"),
        speaking_available: clean_bool(row.get("speaking_available")),
        awards_honors: clean_text(row.first(&["awards_honors", "awards_and_honors"])),
        include_in_directory: clean_bool(
            row.first(&["include_in_directory", "include_in_public_directory"]),
        ),
        directory_categories: text("directory_categories"),
        featured_profile: clean_bool(row.get("featured_profile")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(cells: &[(&str, &str)]) -> NormalizedRow {
        cells
            .iter()
            .map(|(k, v)| (*k, Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn test_financial_defaults_and_coercion() {
        let record = map_financial(&row(&[
            ("Program ID", "FIN-100"),
            ("Program Name", " Katie Beckett Waiver "),
            ("Award Amount Max", "$2,500"),
            ("Annual Cap", "varies"),
            ("Key Features & Benefits", "Covers respite care"),
            ("Real-World Context", "Long waitlists"),
        ]))
        .unwrap();

        assert_eq!(record.program_id, "FIN-100");
        assert_eq!(record.program_name, "Katie Beckett Waiver");
        assert_eq!(record.award_amount_max, Some(2500.0));
        assert_eq!(record.annual_cap, None);
        assert_eq!(record.age_range_min, 0);
        assert_eq!(record.age_range_max, 999);
        assert_eq!(record.key_features.as_deref(), Some("Covers respite care"));
        assert_eq!(record.real_world_context.as_deref(), Some("Long waitlists"));
        assert_eq!(record.special_notes, None);
    }

    #[test]
    fn test_financial_explicit_ages_kept() {
        let record = map_financial(&row(&[
            ("program_id", "FIN-101"),
            ("program_name", "ABLE Account"),
            ("age_range_min", "0"),
            ("age_range_max", "26.5"),
        ]))
        .unwrap();
        assert_eq!(record.age_range_min, 0);
        assert_eq!(record.age_range_max, 26);
    }

    #[test]
    fn test_missing_name_or_id_is_dropped() {
        assert!(map_financial(&row(&[("program_id", "FIN-102")])).is_none());
        assert!(map_financial(&row(&[("program_name", "Orphan Grant")])).is_none());
        assert!(map_therapy(&row(&[("resource_id", "HLT-1"), ("resource_name", "none")])).is_none());
        assert!(map_inspiration(&row(&[("full_name", "Jamie Brewer")])).is_none());
    }

    #[test]
    fn test_therapy_defaults() {
        let record = map_therapy(&row(&[
            ("Resource ID", "HLT-004"),
            ("Resource Name", "Speech Clinic"),
            ("Age Min", "3"),
            ("Data Quality Score", "87.0"),
        ]))
        .unwrap();

        assert_eq!(record.primary_category, "Healthcare & Therapy");
        assert_eq!(record.age_min, 3);
        assert_eq!(record.age_max, 999);
        assert_eq!(record.data_quality_score, Some(87));
        assert_eq!(record.tags, None);
    }

    #[test]
    fn test_inspiration_aliases_and_flags() {
        let record = map_inspiration(&row(&[
            ("Profile ID", "INS-001"),
            ("Full Name", "Chris Nikic"),
            ("Known As / Stage Name", "Chris"),
            ("Birth Year", "1999"),
            ("Speaking Available", "Yes"),
            ("Awards & Honors", "ESPY 2021"),
            ("Include in Public Directory", "y"),
            ("Featured Profile", "maybe"),
        ]))
        .unwrap();

        assert_eq!(record.known_as.as_deref(), Some("Chris"));
        assert_eq!(record.birth_year, Some(1999));
        assert_eq!(record.location_country, "USA");
        assert!(record.speaking_available);
        assert_eq!(record.awards_honors.as_deref(), Some("ESPY 2021"));
        assert!(record.include_in_directory);
        assert!(!record.featured_profile);
    }

    #[test]
    fn test_json_native_values() {
        let row: NormalizedRow = [
            ("program_id", json!("FIN-200")),
            ("program_name", json!("Respite Grant")),
            ("award_amount_min", json!(500)),
            ("age_range_max", json!(21)),
            ("phone", json!(8005551234_i64)),
        ]
        .into_iter()
        .collect();

        let record = map_row(RecordKind::Financial, &row).unwrap();
        assert_eq!(record.kind(), RecordKind::Financial);
        assert_eq!(record.id(), "FIN-200");

        let body = serde_json::to_value(&record).unwrap();
        assert_eq!(body["award_amount_min"], json!(500.0));
        assert_eq!(body["age_range_max"], json!(21));
        assert_eq!(body["phone"], json!("8005551234"));
        assert_eq!(body["annual_cap"], Value::Null);
    }
}
