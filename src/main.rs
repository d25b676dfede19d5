use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use shieldwatch::config::{Overrides, Settings};
use shieldwatch::logging::{self, LogTarget};
use shieldwatch::{app, events, ui};
use shieldwatch::{App, HttpApi, Phase, RefreshController};

#[derive(Parser, Debug)]
#[command(name = "shieldwatch")]
#[command(about = "Terminal dashboard for an API gateway security backend")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (e.g. http://localhost:8001)
    #[arg(short, long)]
    url: Option<String>,

    /// Refresh interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Fetch once, export the dashboard to a JSON file, and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write logs to this file while the dashboard is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = Overrides {
        base_url: args.url,
        refresh_interval_secs: args.refresh,
        log_file: args.log_file,
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;

    // The TUI owns stdout, so interactive runs only log to a file.
    let target = match (&args.export, &settings.log_file) {
        (Some(_), _) => LogTarget::Stderr,
        (None, Some(path)) => LogTarget::File(path),
        (None, None) => LogTarget::Disabled,
    };
    logging::init(&settings.log_level, target)?;

    let api = HttpApi::builder()
        .base_url(settings.base_url.as_str())
        .timeout(settings.request_timeout())
        .build()?;
    let controller = RefreshController::new(api, settings.refresh_settings());
    let rt = Runtime::new()?;

    if let Some(export_path) = args.export {
        return export_once(&rt, &controller, &export_path);
    }

    run_tui(&rt, controller, settings.refresh_interval())
}

/// Run one cycle and write the result as JSON.
fn export_once(rt: &Runtime, controller: &RefreshController, path: &Path) -> Result<()> {
    info!(source = controller.source_description(), "fetching dashboard for export");
    rt.block_on(controller.run_cycle());

    let state = controller.snapshot();
    if state.phase == Phase::Errored {
        bail!(
            "refresh failed: {}",
            state.error_message.as_deref().unwrap_or("unknown error")
        );
    }

    app::export_view(&state, controller.source_description(), path)?;
    println!("Exported dashboard to: {}", path.display());
    Ok(())
}

/// Run the TUI on this thread while the refresh loop runs on the runtime.
fn run_tui(rt: &Runtime, controller: RefreshController, refresh_interval: Duration) -> Result<()> {
    let handle = {
        let _guard = rt.enter();
        controller.start(refresh_interval)
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(
        controller.subscribe(),
        controller.source_description(),
        ui::Theme::auto_detect(),
    )
    .with_trigger(handle.trigger());

    let result = run_app(&mut terminal, &mut app);

    handle.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        warn!(error = %e, "dashboard exited with an error");
    }
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.sync();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    events::handle_mouse_event(app, mouse, ui::CONTENT_START_ROW);
                }
                // Terminal will redraw on next iteration
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}
