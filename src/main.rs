// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2gdocs::{
    batch_update_body, preview, AppError, CachedNotionClient, CommandLineInput, ContentSource,
    DocsHttpClient, NotionHttpClient, NotionRepository, PageFetcher, PageId, RunMode,
    SectionLedger, Transfer, TransferConfig,
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2gdocs.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)
        .with_context(|| format!("open log file {}", log_file_path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Builds the Notion side, cached unless disabled.
async fn build_fetcher(config: &TransferConfig) -> Result<PageFetcher, AppError> {
    let http_client = NotionHttpClient::new(&config.api_key)?;
    let repository: Arc<dyn NotionRepository> = if config.no_cache {
        log::info!("Cache disabled; all requests go to the Notion API");
        Arc::new(http_client)
    } else {
        log::info!("Cache enabled (TTL: {}s)", config.cache_ttl);
        Arc::new(CachedNotionClient::with_default_cache(http_client, config.cache_ttl).await?)
    };
    Ok(PageFetcher::new(repository).with_database_rows(config.options.include_database_rows))
}

/// Explicit pages first, then the database rows in their listed order.
async fn collect_worklist(
    config: &TransferConfig,
    source: &dyn ContentSource,
) -> Result<Vec<PageId>, AppError> {
    let mut worklist = config.pages.clone();
    if let Some(database) = &config.database {
        let rows = source.database_rows(database).await?;
        log::info!("Database {} has {} row(s)", database.as_str(), rows.len());
        worklist.extend(rows.into_iter().map(|row| row.id));
    }
    Ok(worklist)
}

async fn list_rows(config: &TransferConfig, source: &dyn ContentSource) -> Result<(), AppError> {
    let database = config.database.as_ref().ok_or_else(|| {
        AppError::MissingConfiguration("--list needs --database or NOTION_DATABASE_ID".to_string())
    })?;

    let rows = source.database_rows(database).await?;
    for (position, row) in rows.iter().enumerate() {
        println!(
            "{:>3}. {}  {}",
            position + 1,
            row.id.to_dashed(),
            row.title().display_or_untitled()
        );
    }
    println!("📄 {} row(s)", rows.len());
    Ok(())
}

async fn dry_run(
    config: &TransferConfig,
    source: &dyn ContentSource,
    output: Option<&Path>,
) -> Result<(), AppError> {
    let worklist = collect_worklist(config, source).await?;

    let mut bodies = Vec::with_capacity(worklist.len());
    for page in &worklist {
        let bundle = source.fetch_page(page).await?;
        let compiled = preview(&bundle, config.options.structural_tables)?;
        log::info!(
            "Compiled '{}' into {} operation(s)",
            bundle.page.title().display_or_untitled(),
            compiled.operations.len()
        );
        bodies.push(batch_update_body(&compiled.operations));
    }

    let json = match bodies.len() {
        1 => bodies.remove(0),
        _ => Value::Array(bodies),
    };
    let rendered = serde_json::to_string_pretty(&json)?;

    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            println!("✓ Operations for {} page(s) written to {}", worklist.len(), path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

async fn transfer(config: &TransferConfig, source: &dyn ContentSource) -> Result<(), AppError> {
    let (Some(token), Some(document)) = (&config.access_token, &config.document) else {
        return Err(AppError::MissingConfiguration(
            "GOOGLE_ACCESS_TOKEN and GOOGLE_DOC_ID are required to transfer".to_string(),
        ));
    };

    let worklist = collect_worklist(config, source).await?;
    let store = DocsHttpClient::new(token)?;
    let ledger = SectionLedger::load(config.ledger_path.clone()).await;

    let mut transfer = Transfer::new(source, &store, document.clone(), ledger, config.options);
    let report = transfer.run(worklist).await;
    println!("{}", report);

    if report.failed() > 0 {
        return Err(AppError::InternalError {
            message: format!("{} page(s) failed to transfer", report.failed()),
            source: None,
        });
    }
    Ok(())
}

async fn execute(config: &TransferConfig) -> anyhow::Result<()> {
    let fetcher = build_fetcher(config)
        .await
        .context("connect to Notion")?;

    match &config.mode {
        RunMode::List => list_rows(config, &fetcher)
            .await
            .context("list database rows"),
        RunMode::DryRun { output } => dry_run(config, &fetcher, output.as_deref())
            .await
            .context("compile dry run"),
        RunMode::Transfer => transfer(config, &fetcher)
            .await
            .context("transfer pages"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).context("set up logging")?;

    let config = TransferConfig::resolve(cli).context("resolve configuration")?;

    execute(&config).await
}
