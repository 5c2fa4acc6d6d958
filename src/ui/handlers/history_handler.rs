//! History screen state management.

use crate::{
    calendar::{HistoryPage, PAGE_SIZE},
    storage::KeyValueStore,
};

use super::super::{
    app::App,
    types::{HistoryViewMode, Screen},
};

/// Helper struct for managing history screen state and operations.
pub struct HistoryHandler<'a, S> {
    app: &'a mut App<S>,
}

impl<'a, S: KeyValueStore> HistoryHandler<'a, S> {
    pub fn new(app: &'a mut App<S>) -> Self {
        Self { app }
    }

    pub fn enter_history_mode(&mut self) {
        self.app.screen = Screen::History;
        self.app.history_view_mode = HistoryViewMode::Stats;
        self.app.history_page = 0;
        self.app.selected_entry = None;

        if self.app.history_data.is_none() {
            self.load_history();
        }
    }

    pub fn exit_history_mode(&mut self) {
        self.app.screen = Screen::Play;
    }

    pub fn load_history(&mut self) {
        let pages = HistoryPage::from_records(self.app.engine.history().records());
        self.app
            .log(format!("Loaded {} finished game(s) from history", pages.entries().len()));
        self.app.history_data = Some(pages);
    }

    /// Stats -> List -> Detail (when an entry is selected) -> Stats.
    pub fn cycle_view_mode(&mut self) {
        self.app.history_view_mode = match self.app.history_view_mode {
            HistoryViewMode::Stats => HistoryViewMode::List,
            HistoryViewMode::List if self.app.selected_entry.is_some() => HistoryViewMode::Detail,
            HistoryViewMode::List | HistoryViewMode::Detail => HistoryViewMode::Stats,
        };
    }

    pub fn next_page(&mut self) {
        if let Some(ref data) = self.app.history_data {
            if self.app.history_page + 1 < data.total_pages() {
                self.app.history_page += 1;
            }
        }
    }

    pub fn prev_page(&mut self) {
        if self.app.history_page > 0 {
            self.app.history_page -= 1;
        }
    }

    /// Select the entry at `page_index` on the current page.
    pub fn select_entry_on_page(&mut self, page_index: usize) {
        let global_index = self.app.history_page * PAGE_SIZE + page_index;
        if let Some(ref data) = self.app.history_data {
            if global_index < data.entries().len() {
                self.app.selected_entry = Some(global_index);
                self.app.history_view_mode = HistoryViewMode::Detail;
            }
        }
    }

    pub fn return_to_list(&mut self) {
        self.app.selected_entry = None;
        self.app.history_view_mode = HistoryViewMode::List;
    }

    pub fn return_to_stats(&mut self) {
        self.app.selected_entry = None;
        self.app.history_view_mode = HistoryViewMode::Stats;
    }
}
