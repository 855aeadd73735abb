mod app;
mod config;
mod event;
mod hardware;
mod telemetry;
mod ui;
mod viz;

use std::fs::File;
use std::io;
use std::sync::Mutex;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use app::App;
use config::{Config, ParseError};
use event::{Event, EventHandler};

fn main() -> io::Result<()> {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ParseError::HelpRequested) => {
            print!("{}", config::USAGE);
            return Ok(());
        }
        Err(ParseError::Invalid(msg)) => {
            eprintln!("error: {msg}\n");
            eprint!("{}", config::USAGE);
            std::process::exit(2);
        }
    };
    init_logging();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Create app, event handler and the telemetry feed
    let mut app = App::new(config.feed_label(), config.viz_options(), config.tick_ms);
    let event_handler = EventHandler::new(config.tick_ms);
    if config.demo {
        telemetry::spawn_demo_feed(event_handler.sender());
    } else {
        telemetry::spawn_client(config.addr.clone(), event_handler.sender());
    }

    // Main loop: draw, then react to exactly one event
    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        match event_handler.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
            Event::Panel(panel_event) => app.on_panel(panel_event),
            Event::Resize => {}
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

/// File-backed tracing, enabled by PANELSCOPE_LOG=<path>. Stdout and
/// stderr belong to the TUI, so without the variable nothing is
/// emitted at all. RUST_LOG filters as usual.
fn init_logging() {
    let Ok(path) = std::env::var("PANELSCOPE_LOG") else {
        return;
    };
    let Ok(file) = File::create(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
