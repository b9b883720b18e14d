mod audio;
mod config;
mod controller;
mod engine;
mod logging;
mod model;
mod view;

#[cfg(test)]
mod test_support;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use audio::AudioBackend;
use config::AppConfig;
use controller::AppController;
use engine::{RandomSpectrum, SimulatedAnalysis};
use model::AppModel;

/// Terminal audio visualizer with a simulated analysis engine
#[derive(Parser, Debug)]
#[command(name = "audioviz", version, about)]
struct Args {
    /// Audio file to load on startup
    file: Option<PathBuf>,

    /// Path to a TOML config file (defaults to ./audioviz.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = AppConfig::load_file(args.config.as_deref())?;
    let config = Arc::new(AppConfig::resolve(file_config)?);

    if let Err(e) = logging::init_logging(&config.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== AudioViz Starting ===");
    tracing::debug!(?config, "Configuration resolved");

    let model = Arc::new(Mutex::new(AppModel::new(config.playback.initial_volume)));
    let audio_backend = Arc::new(Mutex::new(AudioBackend::new()));

    let controller = AppController::new(
        model.clone(),
        audio_backend,
        Arc::new(SimulatedAnalysis::new(&config.analysis)),
        Arc::new(RandomSpectrum),
        config.clone(),
    );

    if let Some(path) = &args.file {
        // A rejected file is reported in the UI like any other upload
        if let Err(e) = controller.load_file(&path.to_string_lossy()).await {
            tracing::warn!(path = %path.display(), error = %e, "Startup file rejected");
        }
    }

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller.clone(), config.ui.notification_ttl).await;

    controller.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("AudioViz shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    notification_ttl: Duration,
) -> io::Result<()> {
    loop {
        // Get current state
        let (snapshot, should_quit) = {
            let mut model_guard = model.lock().await;
            model_guard.auto_clear_old_notifications(notification_ttl);
            (model_guard.snapshot(), model_guard.should_quit())
        };

        if should_quit {
            break;
        }

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &snapshot);
        })?;

        // Short poll so timer-driven state shows up promptly
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    // Failures are surfaced as notifications by the controller
                    let _ = controller.handle_key_event(key).await;
                }
                Event::Paste(text) => {
                    let _ = controller.handle_paste(&text).await;
                }
                _ => {}
            }
        }
    }

    Ok(())
}
