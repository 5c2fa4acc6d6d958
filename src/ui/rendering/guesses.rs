//! Guess slots, coloured by whether they hit.

use ratatui::{
    Frame,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    session::{GuessEntry, MAX_GUESSES},
    storage::KeyValueStore,
    ui::app::App,
};

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw_guesses(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let guesses = self
            .engine
            .current_session()
            .map(|s| s.guesses.as_slice())
            .unwrap_or_default();
        let answer = self.engine.puzzle().map(|p| p.id.as_str());

        let lines: Vec<Line> = (0..MAX_GUESSES)
            .map(|slot| {
                let (text, style) = match guesses.get(slot) {
                    Some(GuessEntry::Skip) => ("skipped".to_string(), Style::default().fg(Color::DarkGray)),
                    Some(GuessEntry::Candidate(id)) if Some(id.as_str()) == answer => (
                        id.clone(),
                        Style::default().bg(Color::Green).fg(Color::Black),
                    ),
                    Some(GuessEntry::Candidate(id)) => {
                        (id.clone(), Style::default().bg(Color::Red).fg(Color::White))
                    }
                    None => ("·".to_string(), Style::default().fg(Color::DarkGray)),
                };
                Line::from(vec![
                    Span::raw(format!(" {}. ", slot + 1)),
                    Span::styled(format!(" {} ", text), style),
                ])
            })
            .collect();

        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Guesses")),
            area,
        );
    }
}
