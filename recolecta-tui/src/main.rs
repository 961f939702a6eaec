//! Terminal UI for recolecta that lets users pick sites and inspect the resulting collection route.

mod app;
mod input;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Arc, sync::Mutex, time::Duration as StdDuration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use recolecta_core::{Calibration, plugin::SourceRegistry, service::PlannerService};
use recolecta_provider_remote as remote;
use recolecta_provider_seed as seed;
use reqwest::Client;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::input::Action;

const DEFAULT_LOG_FILTER: &str = "recolecta_core=info,recolecta_tui=info,recolecta_provider_remote=info";

/// Plan waste collection routes over a site catalog.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON file overriding emission factors, regimes, rates, or the discount rule.
    #[arg(long)]
    calibration: Option<PathBuf>,
    /// URL serving marketplace listings as JSON; adds a remote catalog source.
    #[arg(long)]
    catalog_url: Option<String>,
    /// Write logs to this file (filtered by `RUST_LOG`).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let calibration = match &cli.calibration {
        Some(path) => Calibration::from_path(path)
            .with_context(|| format!("loading calibration from {}", path.display()))?,
        None => Calibration::default(),
    };

    // HTTP + service setup
    let client = Client::builder().user_agent("recolecta/0.1").build()?;

    let mut plugins = vec![seed::plugin()];
    if let Some(url) = cli.catalog_url {
        plugins.push(remote::plugin(client, url));
    }
    let registry = Arc::new(SourceRegistry::new(plugins));
    let service = Arc::new(PlannerService::new(registry, calibration));

    // App state
    let app = App::new(service);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// Log to a file only, the terminal belongs to the UI.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::LoadCatalog => {
                    let Some(source) = app.selected_source.clone() else {
                        app.error_message = Some("Select a catalog source first".into());
                        continue;
                    };

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app
                        .service
                        .load_catalog(&source, app.catalog_version())
                        .await;

                    app.is_loading = false;
                    match res {
                        Ok(catalog) => {
                            info!(source = %source, version = catalog.version(), "catalog ready");
                            app.set_catalog(catalog);
                        }
                        Err(err) => {
                            warn!(source = %source, error = %err, "catalog load failed");
                            app.error_message = Some(format!("Failed to load catalog: {err}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
