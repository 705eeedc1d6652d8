//! Terminal user interface for arbor.
//!
//! ## Entry points
//!
//! - [`run_dashboard`] drives a [`dashboard::Dashboard`] on the real terminal
//!   until the user quits.

pub mod dashboard;
pub mod note;
pub mod selector;
pub mod text;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dashboard::Dashboard;
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::{io, time::Duration};

/// Take over the terminal, run `dashboard` to completion, then restore it.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or restored, or if
/// drawing or event polling fails.
pub fn run_dashboard(dashboard: &mut Dashboard) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, dashboard);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, dashboard: &mut Dashboard) -> Result<()> {
    while !dashboard.should_quit() {
        terminal.draw(|frame| {
            let area = frame.area();
            dashboard.render(frame, area);
        })?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    dashboard.handle_key(key);
                }
            }
        }
    }
    Ok(())
}
