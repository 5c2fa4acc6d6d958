//! Input field rendering with validation status.

use ratatui::{
    Frame,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    storage::KeyValueStore,
    ui::{app::App, types::InputStatus},
};

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw_input(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let (border_color, subtitle) = match self.input_status() {
            InputStatus::Incomplete => (Color::Gray, ""),
            InputStatus::Valid => (Color::Green, ""),
            InputStatus::Invalid(msg) => (Color::Red, msg),
        };

        let finished = self
            .engine
            .current_session()
            .is_none_or(|s| s.is_terminal());

        // Guesses must match the movie id exactly.
        let (label, help_text) = if finished {
            ("Movie", "Ctrl+P = random puzzle | Ctrl+L = calendar | Ctrl+Q = quit")
        } else {
            (
                "Movie id, e.g. the-matrix",
                "Enter = guess | Ctrl+K = skip | Ctrl+P = random | Ctrl+Q = quit",
            )
        };

        f.render_widget(
            Paragraph::new(format!("{}▌", self.input)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(format!("{} {} | {}", label, subtitle, help_text)),
            ),
            area,
        );
    }
}
