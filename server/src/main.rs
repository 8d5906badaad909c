use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use todo_core::{SqliteTodoStore, TodoService};
use todo_server::{config::Config, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    telemetry::init();
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "failed to load environment file"),
    }

    let config = Config::parse();

    let store = SqliteTodoStore::open_url(&config.database_url).context("failed to open database")?;
    let state = AppState::new(TodoService::new(store)).context("failed to load templates")?;

    let addr = config.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    todo_server::run(listener, state).await?;
    Ok(())
}
