//! History screen rendering coordinator.

mod detail_view;
mod list_view;
mod stats_view;

use ratatui::{Frame, layout::Rect};

use crate::{
    storage::KeyValueStore,
    ui::{App, types::HistoryViewMode},
};

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw_history_mode(&self, f: &mut Frame, area: Rect) {
        match self.history_view_mode {
            HistoryViewMode::Stats => self.draw_stats_view(f, area),
            HistoryViewMode::List => self.draw_list_view(f, area),
            HistoryViewMode::Detail => self.draw_detail_view(f, area),
        }
    }
}
