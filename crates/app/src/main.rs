//! Courier - Main Entry Point
//!
//! Opens the store, sends one request and prints the result. The
//! background history write is awaited before exiting.

mod cli;
mod summary;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use courier_application::{RequestExecutor, SaveRequest, SaveRequestInput};
use courier_infrastructure::{JsonStore, ReqwestHttpClient, config_dir};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => config_dir()?,
    };
    tracing::debug!(dir = %dir.display(), "using configuration directory");
    let store = Arc::new(JsonStore::open(dir)?);

    if let Some(env) = &cli.env {
        store.set_current_environment(env)?;
    }

    let draft = cli.draft();
    if cli.save {
        let item = SaveRequest::new(Arc::clone(&store))
            .execute(SaveRequestInput::new(draft.clone()))?;
        eprintln!("Saved \"{}\" to collection {}", item.name, item.collections.join(", "));
    }

    let client = Arc::new(ReqwestHttpClient::new()?);
    let executor = RequestExecutor::new(client, Arc::clone(&store));
    let execution = executor.dispatch(&draft).await;

    let config = store.config();
    print!("{}", summary::render(&execution.response, config.show_response_time));

    if let Some(history) = execution.history
        && let Err(err) = history.wait().await
    {
        eprintln!("Warning: could not record history: {err}");
    }

    Ok(if execution.response.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
