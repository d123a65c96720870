use std::fs::create_dir_all;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use qna_web::completion::{DynCompletionClient, OpenAiClient};
use qna_web::server::run_server;
use qna_web::telemetry::init_tracing;
use qna_web::{db, settings};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Optional configuration file; env vars (APP_*) override it.
    #[clap(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let settings = settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    let pool = db::establish_connection(&settings.database.path).await?;
    tracing::info!("Running db migrations...");
    db::run_migrations(&pool).await?;

    let static_dir = &settings.application.static_dir;
    if !static_dir.exists() {
        create_dir_all(static_dir).context("Failed to create directory for static content")?;
    }
    if !static_dir.is_dir() {
        anyhow::bail!("static_dir should be a directory");
    }

    let completion: DynCompletionClient = Arc::new(OpenAiClient::new(&settings.completion)?);
    run_server(settings.application, pool, completion).await
}
