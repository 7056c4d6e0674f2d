pub mod app;
pub mod ui;

use std::{error::Error, io, time::Duration};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{debug, warn};
use crate::board::Board;
use crate::storage::KeyValueStore;
use app::{App, InputMode};
use ui::ui;

/// Upper bound on how long the loop waits for input before ticking timers.
const MAX_POLL: Duration = Duration::from_secs(1);

pub fn run_tui<S: KeyValueStore>(board: Board<S>) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(board);

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Whatever happened, write everything out before leaving.
    if let Err(e) = app.board.flush() {
        warn!(error = %e, "final flush failed");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend, S: KeyValueStore>(terminal: &mut Terminal<B>, app: &mut App<S>) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let wait = u64::try_from(app.board.next_tick_in()).unwrap_or(0);
        let timeout = Duration::from_millis(wait).min(MAX_POLL);
        if !event::poll(timeout)? {
            let report = app.on_tick();
            if report.swept > 0 || report.flushed {
                debug!(swept = report.swept, flushed = report.flushed, "timer tick");
            }
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Char('a') => app.start_add(),
                    KeyCode::Char('r') => app.repost_selected(),
                    KeyCode::Char('h') | KeyCode::Enter => app.start_help(),
                    KeyCode::Char('t') => app.start_thank(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('s') => app.start_add_skill(),
                    KeyCode::Char('/') => app.start_search(),
                    KeyCode::Char('f') => app.cycle_neighborhood(),
                    KeyCode::Char('x') => app.sweep(),
                    KeyCode::Char('v') | KeyCode::Tab => app.toggle_view(),
                    KeyCode::Esc => app.clear_filters(),
                    _ => {}
                },
                _ => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => app.cancel_input(),
                    KeyCode::Char(c) => app.push_char(c),
                    KeyCode::Backspace => app.pop_char(),
                    _ => {}
                }
            }
        }
    }
}
