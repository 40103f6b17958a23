use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    logging::init_logging(&settings);
    if let Some(problem) = config_problem {
        log::warn!("config: {problem}");
    }
    log::info!("encore {} starting", env!("CARGO_PKG_VERSION"));

    let mut app = startup::build_app(&settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    let fade_out = if app.player.is_playing() {
        Duration::from_millis(settings.audio.quit_fade_out_ms)
    } else {
        Duration::ZERO
    };
    app.player.media_mut().quit_softly(fade_out);
    log::info!("encore exiting");

    run_result
}
