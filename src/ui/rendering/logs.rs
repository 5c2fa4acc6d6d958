//! Log panel rendering.

use ratatui::{
    Frame,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::{storage::KeyValueStore, ui::app::App};

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw_logs(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let logs = self.logs.lines();

        // Borders take two rows.
        let height = (area.height as usize).saturating_sub(2);
        let start = logs.len().saturating_sub(height);

        let lines: Vec<Line> = logs[start..]
            .iter()
            .map(|l| {
                if l.starts_with("Failed") {
                    Line::styled(l.clone(), Style::default().fg(Color::Red))
                } else {
                    Line::from(l.clone())
                }
            })
            .collect();

        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Logs")),
            area,
        );
    }
}
