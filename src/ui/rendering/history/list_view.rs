//! Finished-game list rendering for the history screen.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};

use crate::{
    calendar::{PAGE_SIZE, format_date},
    session::Outcome,
    storage::KeyValueStore,
    ui::App,
};

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw_list_view(&self, f: &mut Frame, area: Rect) {
        let entries = self
            .history_data
            .as_ref()
            .map(|data| data.page(self.history_page))
            .unwrap_or_default();

        let Some(history_data) = self.history_data.as_ref().filter(|_| !entries.is_empty()) else {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No games found",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
            ];

            f.render_widget(
                Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Game History")),
                area,
            );
            return;
        };

        let start_index = self.history_page * PAGE_SIZE;
        let rows: Vec<Row> = entries
            .iter()
            .enumerate()
            .map(|(page_idx, entry)| {
                let (outcome, style) = match entry.outcome {
                    Outcome::Won => ("Won", Style::default().fg(Color::Green)),
                    Outcome::Lost => ("Lost", Style::default().fg(Color::Red)),
                };

                Row::new(vec![
                    format!("{}.", (page_idx + 1) % 10),
                    format_date(&entry.puzzle_date),
                    entry.display_name.clone(),
                    entry.guesses.len().to_string(),
                    outcome.to_string(),
                ])
                .style(style)
            })
            .collect();

        let title = format!(
            "Game History - Page {}/{} (Showing {}-{} of {}) | PgUp/PgDn: Navigate | 0-9: View Detail | Tab: Views | Esc: Stats",
            self.history_page + 1,
            history_data.total_pages(),
            start_index + 1,
            start_index + entries.len(),
            history_data.entries().len()
        );

        let table = Table::new(
            rows,
            [
                Constraint::Length(3),  // Number
                Constraint::Length(20), // Date
                Constraint::Min(20),    // Movie
                Constraint::Length(8),  // Guesses
                Constraint::Length(6),  // Outcome
            ],
        )
        .header(
            Row::new(vec!["#", "Date", "Movie", "Guesses", "Result"])
                .style(Style::default().add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(table, area);
    }
}
