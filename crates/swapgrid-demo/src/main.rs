#![forbid(unsafe_code)]

//! SwapGrid demo binary entry point.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use swapgrid_core::terminal_session::{SessionOptions, TerminalSession};
use swapgrid_demo::app::{App, AppConfig};
use swapgrid_demo::canvas::Canvas;
use swapgrid_demo::cli;
use swapgrid_runtime::{FileStorage, StateRegistry, ThemeStore};
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);

fn main() {
    let opts = cli::Opts::parse();

    if let Some(path) = &opts.log_file
        && let Err(e) = init_logging(path)
    {
        eprintln!("Failed to open log file {}: {e}", path.display());
        std::process::exit(1);
    }

    let config = match AppConfig::from_opts(&opts) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let prefs = open_prefs(&opts);
    let theme = ThemeStore::global();
    theme.bind_registry(Arc::clone(&prefs));
    if let Some(mode) = opts.theme {
        theme.set(mode);
    }

    if let Err(e) = run(config, prefs, theme) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}

/// Tracing goes to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,swapgrid=debug,swapgrid_runtime=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn open_prefs(opts: &cli::Opts) -> Arc<StateRegistry> {
    if !opts.persist {
        return StateRegistry::in_memory().shared();
    }
    let storage = match &opts.state_file {
        Some(path) => FileStorage::new(path),
        None => FileStorage::default_for_app("demo"),
    };
    tracing::info!(path = %storage.path().display(), "preferences file");
    let registry = StateRegistry::new(Box::new(storage));
    if let Err(e) = registry.load() {
        tracing::warn!(error = %e, "could not read preferences, using defaults");
    }
    registry.shared()
}

fn run(config: AppConfig, prefs: Arc<StateRegistry>, theme: &ThemeStore) -> io::Result<()> {
    let session = TerminalSession::new(SessionOptions {
        alternate_screen: true,
        mouse_capture: true,
    })?;
    let (width, height) = session.size()?;

    let mut app = App::new(config, prefs, theme, SystemTime::now());
    app.resize(width, height);

    let mut stdout = io::stdout();
    let mut previous: Option<Canvas> = None;
    let mut last = Instant::now();

    loop {
        while session.poll_event(Duration::ZERO)? {
            if let Some(event) = session.read_event()? {
                app.handle_event(event);
            }
        }

        let now = Instant::now();
        app.frame(now.saturating_duration_since(last), SystemTime::now());
        last = now;
        if app.should_quit() {
            break;
        }

        if app.take_theme_changed() {
            // Every cell changes color.
            previous = None;
        }
        let canvas = app.render(SystemTime::now());
        canvas.flush(&mut stdout, previous.as_ref())?;
        previous = Some(canvas);

        // Sleep out the frame, waking early for input.
        let spent = now.elapsed();
        if spent < FRAME {
            session.poll_event(FRAME - spent)?;
        }
    }

    app.persist_order();
    Ok(())
}
