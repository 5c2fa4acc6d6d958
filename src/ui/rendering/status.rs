use ratatui::{
    Frame,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    session::SessionStatus,
    storage::KeyValueStore,
    ui::app::App,
};

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw_game_status(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let name = self
            .engine
            .puzzle()
            .map(|p| p.display_name())
            .unwrap_or_else(|| "?".to_string());

        let (status_text, color) = match (self.engine.puzzle(), self.engine.current_session()) {
            (Some(puzzle), Some(session)) => match session.status {
                SessionStatus::Won => (
                    format!("🎉 You got it in {} guess(es)! It was {}", session.guess_count(), name),
                    Color::Green,
                ),
                SessionStatus::Lost => (format!("💀 Out of guesses! It was {}", name), Color::Red),
                SessionStatus::InProgress => (
                    format!(
                        "Puzzle {} | Guesses remaining: {} | Ctrl+R: History | Ctrl+L: Calendar",
                        puzzle.date,
                        session.remaining_guesses()
                    ),
                    Color::White,
                ),
            },
            _ => (
                "No puzzle loaded | Ctrl+L: Calendar | Ctrl+P: Random | Ctrl+Q: Quit".to_string(),
                Color::Yellow,
            ),
        };

        f.render_widget(
            Paragraph::new(status_text)
                .style(Style::default().fg(color))
                .block(Block::default().borders(Borders::ALL).title("Guess The Movie")),
            area,
        );
    }
}
