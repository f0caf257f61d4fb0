use anyhow::Result;
use httpmock::prelude::*;
use resource_etl::adapters::{build_source, http::build_client};
use resource_etl::domain::model::RecordKind;
use resource_etl::utils::validation::Validate;
use resource_etl::{ImportConfig, ImportEngine, ImportSource, RestSink};
use tempfile::TempDir;

const RESOURCES_CSV: &str = "\
Program ID,Program Name,Annual Cap,Age Range Max,Resource ID,Resource Name,Age Max
FIN-001,Katie Beckett Waiver,\"$1,200\",,,,
,,,,HLT-004,Speech Clinic,18
FIN-002,,,,,,
,,,,EDU-009,Reading Club,
";

const INSPIRATION_JSON: &str = r#"[
  {
    "profile_id": "INS-001",
    "full_name": "Chris Nikic",
    "known_as___stage_name": "Chris",
    "birth_year": 1999,
    "awards_&_honors": "ESPY 2021",
    "include_in_public_directory": "Yes",
    "featured_profile": true
  },
  {"profile_id": "INS-002", "full_name": null}
]"#;

fn write_config(temp_dir: &TempDir, base_url: &str, json_path: &str) -> Result<String> {
    let content = format!(
        r#"
[backend]
base_url = "{base_url}"
api_key = "service-key"
batch_size = 10
request_timeout_seconds = 5

[[sources]]
name = "resources"
type = "csv"
location = "{base_url}/pub?output=csv"
kind = "resources"

[[sources]]
name = "broken-sheet"
type = "csv"
location = "{base_url}/missing?output=csv"
kind = "resources"

[[sources]]
name = "inspiration"
type = "json"
location = "{json_path}"
kind = "inspiration"
"#
    );

    let config_path = temp_dir.path().join("import-config.toml");
    std::fs::write(&config_path, content)?;
    Ok(config_path.to_string_lossy().replace('\\', "/"))
}

#[tokio::test]
async fn test_end_to_end_import_from_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let json_path = temp_dir.path().join("inspiration.json");
    std::fs::write(&json_path, INSPIRATION_JSON)?;
    let json_path = json_path.to_string_lossy().replace('\\', "/");

    let server = MockServer::start_async().await;

    let csv_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/pub").query_param("output", "csv");
            then.status(200)
                .header("Content-Type", "text/csv")
                .body(RESOURCES_CSV);
        })
        .await;

    let missing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        })
        .await;

    let financial_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/financial_resources")
                .header("apikey", "service-key")
                .body_contains("\"program_id\":\"FIN-001\"")
                .body_contains("\"annual_cap\":1200.0")
                .body_contains("\"age_range_min\":0")
                .body_contains("\"age_range_max\":999");
            then.status(201);
        })
        .await;

    let therapy_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/therapy_services")
                .body_contains("\"resource_id\":\"HLT-004\"")
                .body_contains("\"age_max\":18")
                .body_contains("\"primary_category\":\"Healthcare & Therapy\"");
            then.status(201);
        })
        .await;

    let inspiration_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/inspiration_profiles")
                .body_contains("\"known_as\":\"Chris\"")
                .body_contains("\"awards_honors\":\"ESPY 2021\"")
                .body_contains("\"include_in_directory\":true")
                .body_contains("\"location_country\":\"USA\"");
            then.status(201);
        })
        .await;

    let config_path = write_config(&temp_dir, &server.base_url(), &json_path)?;
    let config = ImportConfig::from_file(&config_path)?;
    config.validate()?;

    let client = build_client(&config.backend)?;
    let sources: Vec<ImportSource> = config
        .enabled_sources()
        .map(|s| ImportSource {
            name: s.name.clone(),
            kind: s.kind,
            source: build_source(s, &client),
        })
        .collect();

    let sink = RestSink::new(client, &config.backend.base_url, &config.backend.api_key);
    let engine = ImportEngine::new(sink, config.tables.clone(), config.batch_size());
    let summary = engine.run(&sources).await;

    csv_mock.assert_async().await;
    missing_mock.assert_async().await;
    financial_mock.assert_async().await;
    therapy_mock.assert_async().await;
    inspiration_mock.assert_async().await;

    assert_eq!(summary.sources.len(), 3);

    let resources = &summary.sources[0];
    assert_eq!(resources.rows, 4);
    assert_eq!(resources.dropped, 2);
    assert!(resources.fetch_error.is_none());

    let broken = &summary.sources[1];
    assert!(broken.fetch_error.is_some());
    assert_eq!(broken.rows, 0);

    assert_eq!(summary.sources[2].dropped, 1);

    assert_eq!(summary.inserted(RecordKind::Financial), 1);
    assert_eq!(summary.inserted(RecordKind::Therapy), 1);
    assert_eq!(summary.inserted(RecordKind::Inspiration), 1);
    assert_eq!(summary.total_inserted(), 3);
    assert!(summary.has_failures());

    Ok(())
}

#[tokio::test]
async fn test_dry_run_only_downloads() -> Result<()> {
    let server = MockServer::start_async().await;

    let csv_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/pub");
            then.status(200).body(RESOURCES_CSV);
        })
        .await;

    let insert_mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(201);
        })
        .await;

    let client = reqwest::Client::new();
    let sources = vec![ImportSource {
        name: "resources".to_string(),
        kind: resource_etl::domain::model::SourceKind::Resources,
        source: Box::new(resource_etl::adapters::CsvSource::from_url(
            server.url("/pub"),
            client.clone(),
        )),
    }];

    let sink = RestSink::new(client, server.base_url(), "k");
    let engine = ImportEngine::new(sink, Default::default(), 50).with_dry_run(true);
    let summary = engine.run(&sources).await;

    csv_mock.assert_async().await;
    insert_mock.assert_hits_async(0).await;

    assert_eq!(summary.total_inserted(), 0);
    assert_eq!(summary.sources[0].tables.len(), 2);
    assert!(!summary.has_failures());

    Ok(())
}
