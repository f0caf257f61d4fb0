use clap::Parser;
use resource_etl::adapters::{build_source, http::build_client, RestSink};
use resource_etl::domain::model::RecordKind;
use resource_etl::utils::{logger, validation::Validate};
use resource_etl::{CliArgs, ImportConfig, ImportEngine, ImportSource, ImportSummary};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 載入 TOML 配置
    let mut config = match ImportConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            if e.is_config_error() {
                eprintln!("💡 {}", e.recovery_suggestion());
            } else {
                eprintln!("💡 Make sure the file exists and is readable");
            }
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_cli_logger(args.verbose, config.log_format());
    tracing::info!("🚀 Starting resource-etl");
    tracing::info!("📁 Configuration: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(batch_size) = args.batch_size {
        config.backend.batch_size = Some(batch_size);
        tracing::info!("🔧 Batch size overridden to: {}", batch_size);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let client = match build_client(&config.backend) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("❌ Could not build HTTP client: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let enabled: Vec<&str> = config.enabled_sources().map(|s| s.name.as_str()).collect();
    for name in args.unmatched_only(&enabled) {
        tracing::warn!("⚠️ --only {}: no enabled source has that name", name);
    }

    let sources: Vec<ImportSource> = config
        .enabled_sources()
        .filter(|s| args.selects(&s.name))
        .map(|s| ImportSource {
            name: s.name.clone(),
            kind: s.kind,
            source: build_source(s, &client),
        })
        .collect();

    if sources.is_empty() {
        eprintln!("❌ No enabled sources match the current selection");
        std::process::exit(1);
    }

    tracing::info!("Backend: {}", config.backend.base_url);
    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be inserted");
    }

    let sink = RestSink::new(client, &config.backend.base_url, &config.backend.api_key);
    let engine = ImportEngine::new(sink, config.tables.clone(), config.batch_size())
        .with_dry_run(args.dry_run);

    let summary = engine.run(&sources).await;
    print_summary(&summary, &config);

    if summary.has_failures() {
        std::process::exit(2);
    }

    Ok(())
}

fn print_summary(summary: &ImportSummary, config: &ImportConfig) {
    println!();
    println!("{}", "=".repeat(50));
    if summary.dry_run {
        println!("DRY RUN COMPLETE");
    } else {
        println!("IMPORT COMPLETE");
    }
    println!("{}", "=".repeat(50));

    for source in &summary.sources {
        match &source.fetch_error {
            Some(error) => println!("  ✗ {}: {}", source.name, error),
            None => {
                println!(
                    "  {}: {} rows, {} skipped",
                    source.name, source.rows, source.dropped
                );
                for table in &source.tables {
                    println!(
                        "    {}: {} parsed, {} inserted, {} failed batches",
                        table.table,
                        table.parsed,
                        table.report.inserted,
                        table.report.errors.len()
                    );
                    // 只顯示前 5 個錯誤
                    for error in table.report.errors.iter().take(5) {
                        println!(
                            "      batch {}: {} - {}",
                            error.batch_index + 1,
                            error.status,
                            error.message
                        );
                    }
                }
            }
        }
    }

    println!();
    for kind in [RecordKind::Financial, RecordKind::Therapy, RecordKind::Inspiration] {
        println!("  {}: {}", config.tables.for_kind(kind), summary.inserted(kind));
    }
    println!("  Total: {}", summary.total_inserted());
    println!("\nVerify at: {}", config.backend.base_url);
}
