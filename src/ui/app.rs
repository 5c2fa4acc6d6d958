use std::{collections::BTreeSet, fmt::Display, io::Stdout};

use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::{
    calendar::{CalendarCursor, HistoryPage},
    catalog::PuzzleCatalog,
    game::GameEngine,
    history::HistoryStore,
    storage::KeyValueStore,
};

use super::{
    handlers::{CalendarHandler, GameHandler, InputHandler},
    types::{HistoryViewMode, InputStatus, LogBuffer, Screen},
};

/// Main application state container.
pub struct App<S> {
    pub(in crate::ui) engine: GameEngine<S>,
    pub(in crate::ui) catalog: Box<dyn PuzzleCatalog + Send + Sync>,
    pub(in crate::ui) available_dates: BTreeSet<String>,
    pub(in crate::ui) screen: Screen,
    pub(in crate::ui) input: String,
    pub(in crate::ui) review_index: usize,
    pub(in crate::ui) logs: LogBuffer,
    pub(in crate::ui) history_data: Option<HistoryPage>,
    pub(in crate::ui) history_view_mode: HistoryViewMode,
    pub(in crate::ui) history_page: usize,
    pub(in crate::ui) selected_entry: Option<usize>,
    pub(in crate::ui) cursor: CalendarCursor,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: S, catalog: Box<dyn PuzzleCatalog + Send + Sync>, logs: LogBuffer) -> Self {
        Self {
            engine: GameEngine::new(HistoryStore::open(store)),
            catalog,
            available_dates: BTreeSet::new(),
            screen: Screen::Play,
            input: String::new(),
            review_index: 0,
            logs,
            history_data: None,
            history_view_mode: HistoryViewMode::Stats,
            history_page: 0,
            selected_entry: None,
            cursor: CalendarCursor::new(Local::now().date_naive()),
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>, date: Option<&str>) -> Result<()> {
        info!("UI started");
        self.log("UI started");

        CalendarHandler::new(self).refresh_dates();
        GameHandler::new(self).load_puzzle(date);

        loop {
            terminal.draw(|f| self.draw(f))?;

            let event = event::read()?;
            if let Event::Key(key) = event {
                if InputHandler::new(self).handle_key(key) {
                    return Ok(());
                }
            }
        }
    }

    pub(in crate::ui) fn log(&self, msg: impl Into<String> + Display) {
        tracing::info!("{}", &msg);
        self.logs.push(msg.into());
    }

    pub(in crate::ui) fn input_status(&self) -> InputStatus {
        let Some(session) = self.engine.current_session() else {
            return InputStatus::Invalid("no puzzle loaded");
        };

        if session.is_terminal() {
            return InputStatus::Invalid("puzzle finished");
        }

        if self.input.trim().is_empty() {
            return InputStatus::Incomplete;
        }

        InputStatus::Valid
    }
}
