//! Terminal client for a single encounter.
//!
//! The binary is the composition root: it reads `.env` and the process
//! environment, installs file logging, loads content from the data
//! directory, and hands the assembled runtime to the terminal loop.
//!
//! ```bash
//! ENCOUNTER_SEED=7 cargo run -p battle-client
//! ```
mod app;
mod config;
mod input;
mod logging;
mod presenter;

use anyhow::Result;

use crate::app::App;
use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging(config.session_id.as_deref())?;

    tracing::info!(
        seed = config.seed,
        monster = %config.monster,
        data_dir = %config.data_dir.display(),
        "Starting battle client"
    );

    App::build(config).await?.run().await
}
