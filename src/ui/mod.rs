mod app;
mod handlers;
mod rendering;
mod types;

pub use app::App;
pub use types::{HistoryViewMode, InputStatus, LogBuffer, Screen};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stdout;

use crate::{catalog::PuzzleCatalog, storage::KeyValueStore};

/// Entry point for running the UI.
///
/// Plays the puzzle for `date`, or the latest one when `None`.
pub fn run_ui<S: KeyValueStore>(
    store: S,
    catalog: Box<dyn PuzzleCatalog + Send + Sync>,
    date: Option<String>,
    logs: LogBuffer,
) -> Result<()> {
    let mut app = App::new(store, catalog, logs);

    let mut stdout = stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal, date.as_deref());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
