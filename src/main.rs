//! Stocklens - an AI-assisted inventory Q&A and detection logging tool.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use stocklens::cli::{Cli, Command};
use stocklens::config::Config;
use stocklens::db::{QueryResult, SchemaDescriptor, SqliteStore, StoreClient};
use stocklens::detect::{Detector, DummyDetector};
use stocklens::error::{Result, StocklensError};
use stocklens::llm::{create_generator, GeneratorProvider};
use stocklens::logging;
use stocklens::pipeline::AskPipeline;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;

    // CLI overrides take precedence over the config file.
    if let Some(db) = &cli.db {
        config.store.path = db.clone();
    }
    if let Some(provider) = &cli.llm {
        config.llm.provider = provider.clone();
    }

    let store = Arc::new(SqliteStore::open(&config.store.path).await?);

    let outcome = dispatch(&cli.command, &config, Arc::clone(&store)).await;
    store.close().await;
    outcome
}

async fn dispatch(command: &Command, config: &Config, store: Arc<SqliteStore>) -> Result<()> {
    match command {
        Command::Ask { question, show_sql } => {
            let provider: GeneratorProvider = config
                .llm
                .provider
                .parse()
                .map_err(StocklensError::config)?;
            let generator =
                create_generator(provider, &config.llm.model, config.llm.timeout_secs)?;
            let pipeline = AskPipeline::new(
                generator,
                store as Arc<dyn StoreClient>,
                SchemaDescriptor::inventory(),
            );

            let record = pipeline.ask(question).await;

            if *show_sql {
                if let Some(sql) = &record.final_query_text {
                    println!("-- {sql}");
                }
            }
            println!("{}", record.answer_text);
        }

        Command::Detect { image } => {
            let bytes = std::fs::read(image).map_err(|e| {
                StocklensError::internal(format!(
                    "Cannot read image file {}: {e}",
                    image.display()
                ))
            })?;

            let detector = DummyDetector::default();
            let detection = detector.detect(&bytes).await?;

            let image_id = format!("uploaded_{}", Utc::now().timestamp());
            store.record_detection(&image_id, &detection.counts).await?;

            println!("Recorded detection {image_id}:");
            for (label, count) in &detection.counts {
                println!("  {label}: {count}");
            }
        }

        Command::Stock => {
            let result = store.current_inventory().await?;
            print_table(&result);
        }

        Command::Log { limit } => {
            let result = store.recent_log(*limit).await?;
            print_table(&result);
        }
    }

    Ok(())
}

/// Prints a query result as a plain table on stdout.
fn print_table(result: &QueryResult) {
    if result.is_empty() {
        println!("(no rows)");
        return;
    }

    let header = result
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    println!("{header}");

    for row in &result.rows {
        let line = row
            .iter()
            .map(|v| v.to_display_string())
            .collect::<Vec<_>>()
            .join(" | ");
        println!("{line}");
    }
}
