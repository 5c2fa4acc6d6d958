//! Single game detail rendering for the history screen.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    calendar::{GuessDescription, HistoryEntry, format_date},
    session::Outcome,
    storage::KeyValueStore,
    ui::App,
};

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw_detail_view(&self, f: &mut Frame, area: Rect) {
        let entry = self
            .history_data
            .as_ref()
            .zip(self.selected_entry)
            .and_then(|(data, index)| data.entries().get(index));

        let Some(entry) = entry else {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No game selected",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
            ];

            f.render_widget(
                Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Game Detail")),
                area,
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Header
                Constraint::Min(7),    // Guesses
            ])
            .split(area);

        draw_entry_header(f, chunks[0], entry);
        draw_entry_guesses(f, chunks[1], entry);
    }
}

fn draw_entry_header(f: &mut Frame, area: Rect, entry: &HistoryEntry) {
    let (outcome_text, outcome_color) = match entry.outcome {
        Outcome::Won => (format!("Won in {} guess(es)", entry.guesses.len()), Color::Green),
        Outcome::Lost => ("Lost (ran out of guesses)".to_string(), Color::Red),
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Date: "),
            Span::styled(
                format_date(&entry.puzzle_date),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("  Movie: "),
            Span::styled(
                entry.display_name.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("  Result: "),
            Span::styled(
                outcome_text,
                Style::default().fg(outcome_color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!("  {}", entry.summary())),
    ];

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Game Detail | Esc: Back to List")),
        area,
    );
}

fn draw_entry_guesses(f: &mut Frame, area: Rect, entry: &HistoryEntry) {
    let lines: Vec<Line> = entry
        .guesses
        .iter()
        .enumerate()
        .map(|(i, guess)| {
            let (text, style) = match guess {
                GuessDescription::Skipped => ("skipped".to_string(), Style::default().fg(Color::DarkGray)),
                GuessDescription::Correct(id) => (
                    format!("{} ✓", id),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                GuessDescription::Incorrect(id) => (format!("{} ✗", id), Style::default().fg(Color::Red)),
            };
            Line::from(vec![Span::raw(format!("  {}. ", i + 1)), Span::styled(text, style)])
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Guesses")),
        area,
    );
}
