// Squad builder entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file; stdout belongs to the REPL)
// 2. Load config
// 3. Build player sources and the initial AppState
// 4. Create mpsc channels
// 5. Spawn app logic task (starts the player load)
// 6. Run the REPL until the user quits
// 7. Cleanup on exit

use std::sync::Arc;

use squad_builder::app;
use squad_builder::cli;
use squad_builder::config;
use squad_builder::loader;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Squad builder starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} player sources, {}s timeout, default formation {}",
        config.data.sources.len(),
        config.data.timeout_secs,
        config.builder.default_formation
    );

    // 3. Sources and state
    let sources: Arc<[Box<dyn loader::PlayerSource>]> =
        loader::sources_from_config(&config.data).into();
    let app_state = app::AppState::new(config).context("failed to create application state")?;

    // 4. Channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 5. App logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state, sources).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. REPL (blocks until quit or stdin closes)
    if let Err(e) = cli::run(ui_rx, cmd_tx).await {
        error!("REPL error: {}", e);
    }

    // 7. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Squad builder shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the REPL).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("squad-builder.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("squad_builder=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
