// LexiView entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open database
// 4. Build the HTTP client for the analysis service
// 5. Create mpsc channels and the application state, restore cached panels
// 6. Spawn app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::sync::Arc;

use lexiview::api::{NlpBackend, NlpClient};
use lexiview::app;
use lexiview::config;
use lexiview::db;
use lexiview::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("LexiView starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: backend={}, timeout={}s, theme={}",
        config.backend.base_url,
        config.backend.timeout_secs,
        config.ui.theme.as_str()
    );

    // 3. Open database
    let db = db::Database::open(&config.storage.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.storage.db_path);

    // 4. HTTP client
    let client = NlpClient::new(&config.backend.base_url, config.backend.timeout())
        .context("failed to build HTTP client")?;
    info!("Analysis service at {}", client.base_url());
    let backend: Arc<dyn NlpBackend> = Arc::new(client);

    // 5. Channels and state
    let (api_tx, api_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let mut app_state = app::AppState::new(config, db, backend, api_tx);
    let restored = app_state.restore_from_db();
    info!("Restored {} cached panel(s)", restored);

    // 6. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(api_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {:#}", e);
        }
    });

    // 7. Run the TUI event loop until the user quits
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {:#}", e);
    }

    // 8. Cleanup: wait for the app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("LexiView shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("lexiview.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lexiview=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
