//! HVAC CRM console client.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;
mod prompt;
mod render;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use hvacdesk_application::{CollectionGateway, SessionContext, SessionService};
use hvacdesk_core::AppError;
use hvacdesk_infrastructure::{FileCredentialStore, HttpAuthGateway, HttpCollectionGateway};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::Console;
use crate::config::ConsoleConfig;

#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ConsoleConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let session_context = SessionContext::new();
    let gateway: Arc<dyn CollectionGateway> = Arc::new(HttpCollectionGateway::new(
        http_client.clone(),
        &config.api_base_url,
        session_context.clone(),
    )?);
    let auth = HttpAuthGateway::new(http_client, &config.api_base_url, session_context.clone())?;
    let store = FileCredentialStore::new(&config.credential_path);
    let session = SessionService::new(Arc::new(auth), Arc::new(store), session_context);

    let restored = session.restore().await?;
    debug!(
        restored,
        base_url = %config.api_base_url,
        "console session ready"
    );

    let console = Console::new(gateway, session, config.page_size);
    match console.run(cli.command).await {
        Ok(code) => Ok(code),
        Err(error) => {
            eprintln!("Error: {}", error.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
