//! Taskboard - shared todo list in the terminal.
//!
//! This binary starts the terminal interface over the configured store
//! backend. Logs go to `{state_dir}/taskboard.log` since the terminal is
//! owned by the interface.
//!
//! # Environment Variables
//!
//! See the [`config`](taskboard_client::config) module for available
//! configuration options.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use taskboard_client::backend::{self, TodoBackend};
use taskboard_client::config::Config;
use taskboard_client::session::{FileSlot, SessionManager};
use taskboard_client::store::TodoStore;
use taskboard_client::tui::ui::render;
use taskboard_client::tui::{install_panic_hook, AppState, EventHandler, PendingRequest, Tui, TuiEvent};

/// Capacity of the channel feeding the run loop.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Command-line arguments for the taskboard client.
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    TASKBOARD_API_URL               Todo collection URL (required unless offline)
    TASKBOARD_BACKEND               Store backend: http or memory (default: http)
    TASKBOARD_STATE_DIR             Session and log directory (default: ~/.taskboard)
    TASKBOARD_REQUEST_TIMEOUT_SECS  Per-request timeout in seconds (default: none)
    RUST_LOG                        Log filter (default: info)

EXAMPLES:
    # Use a hosted collection
    export TASKBOARD_API_URL=https://example.mockapi.io/api/v1/todos
    taskboard

    # Try it without a server
    taskboard --offline
")]
struct Cli {
    /// Keep todos in memory instead of talking to the API
    #[arg(long)]
    offline: bool,

    /// Directory for the session file and log (overrides TASKBOARD_STATE_DIR)
    #[arg(long, value_name = "PATH")]
    state_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli)?;
    init_logging(&config.log_path())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(run(config))
}

/// Builds the configuration from the environment and the command line.
fn load_config(cli: Cli) -> Result<Config> {
    let mut config = if cli.offline {
        let state_dir = match &cli.state_dir {
            Some(dir) => dir.clone(),
            None => Config::state_dir_from_env().context("Failed to determine state directory")?,
        };
        Config::offline(state_dir)
    } else {
        Config::from_env().context("Failed to load configuration")?
    };

    if let Some(dir) = cli.state_dir {
        config.state_dir = dir;
    }
    Ok(config)
}

/// Initializes logging into the state directory.
fn init_logging(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create state directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

async fn run(config: Config) -> Result<()> {
    info!(
        state_dir = %config.state_dir.display(),
        backend = ?config.backend,
        "Starting taskboard"
    );

    let backend = backend::from_config(&config.backend).context("Failed to create store backend")?;
    let session = SessionManager::new(Box::new(FileSlot::new(config.session_path())));
    let mut state = AppState::new(session, TodoStore::new(backend));

    install_panic_hook();
    let mut tui = Tui::new().context("Failed to initialize terminal")?;

    let (event_tx, mut event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let event_task = tokio::spawn(EventHandler::new(event_tx.clone(), shutdown_rx).run());

    let mut in_flight = state
        .restore()
        .map(|pending| spawn_request(pending, state.store.backend(), event_tx.clone()));

    let result = event_loop(&mut tui, &mut state, &mut event_rx, &event_tx, &mut in_flight).await;

    // Dropping an unfinished request leaves local state untouched.
    if let Some(task) = in_flight {
        task.abort();
    }
    let _ = shutdown_tx.send(());
    drop(event_rx);
    match event_task.await {
        Ok(Err(e)) => debug!(error = %e, "Event handler stopped with error"),
        Err(e) => debug!(error = %e, "Event handler task failed"),
        Ok(Ok(())) => {}
    }

    tui.restore().context("Failed to restore terminal")?;
    info!("Taskboard stopped");
    result
}

async fn event_loop(
    tui: &mut Tui,
    state: &mut AppState,
    event_rx: &mut mpsc::Receiver<TuiEvent>,
    event_tx: &mpsc::Sender<TuiEvent>,
    in_flight: &mut Option<JoinHandle<()>>,
) -> Result<()> {
    tui.draw(|frame| render(frame, state))
        .context("Failed to draw frame")?;

    while let Some(event) = event_rx.recv().await {
        match event {
            TuiEvent::Tick => state.tick(),
            TuiEvent::Resize(cols, rows) => debug!(cols, rows, "Terminal resized"),
            TuiEvent::Key(key) => {
                if let Some(pending) = state.handle_key(key).and_then(|a| state.dispatch(a)) {
                    *in_flight = Some(spawn_request(
                        pending,
                        state.store.backend(),
                        event_tx.clone(),
                    ));
                }
            }
            TuiEvent::Completed(completion) => state.complete(completion),
        }

        if state.should_quit {
            info!("Quit requested");
            break;
        }

        tui.draw(|frame| render(frame, state))
            .context("Failed to draw frame")?;
    }

    Ok(())
}

/// Sends a request on its own task and reports the answer to the run loop.
fn spawn_request(
    pending: PendingRequest,
    backend: Arc<dyn TodoBackend>,
    event_tx: mpsc::Sender<TuiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let completion = pending.execute(backend).await;
        if event_tx.send(TuiEvent::Completed(completion)).await.is_err() {
            debug!("Run loop gone before request completed");
        }
    })
}
