//! Statistics dashboard rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};

use crate::{
    calendar::HistoryEntry,
    session::Outcome,
    stats::{StatisticsSnapshot, StreakKind},
    storage::KeyValueStore,
    ui::App,
};

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn streak_span(stats: &StatisticsSnapshot) -> Span<'static> {
    let streak = stats.current_streak;
    match streak.kind {
        StreakKind::Win => Span::styled(format!("{} win(s)", streak.count), bold(Color::Green)),
        StreakKind::Loss => Span::styled(format!("{} loss(es)", streak.count), bold(Color::Red)),
        StreakKind::None => Span::styled("0", bold(Color::Gray)),
    }
}

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw_stats_view(&self, f: &mut Frame, area: Rect) {
        let stats = self.engine.statistics_snapshot();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8),  // Overall stats
                Constraint::Length(9),  // Guess distribution
                Constraint::Min(5),     // Recent games
            ])
            .split(area);

        draw_overall_stats(f, chunks[0], &stats);
        draw_guess_distribution(f, chunks[1], &stats);

        let recent = self
            .history_data
            .as_ref()
            .map(|data| data.page(0))
            .unwrap_or_default();
        draw_recent_games(f, chunks[2], recent);
    }

    /// Compact statistics panel for the play screen.
    pub(in crate::ui) fn draw_stats_summary(&self, f: &mut Frame, area: Rect) {
        let stats = self.engine.statistics_snapshot();

        let lines = vec![
            Line::from(vec![
                Span::raw(" Played: "),
                Span::styled(stats.games_finished.to_string(), bold(Color::Cyan)),
                Span::raw("  Win %: "),
                Span::styled(stats.win_rate.to_string(), bold(Color::Green)),
            ]),
            Line::from(vec![Span::raw(" Current streak: "), streak_span(&stats)]),
            Line::from(vec![
                Span::raw(" Longest win streak: "),
                Span::styled(stats.longest_win_streak.to_string(), bold(Color::Yellow)),
            ]),
            Line::from(vec![
                Span::raw(" Avg guesses per win: "),
                Span::styled(
                    or_na(stats.average_guesses_on_win.map(|a| format!("{:.2}", a))),
                    bold(Color::Cyan),
                ),
            ]),
            Line::from(vec![
                Span::raw(" Fastest win: "),
                Span::styled(or_na(stats.fewest_guesses_in_a_win), bold(Color::Green)),
            ]),
            Line::from(vec![
                Span::raw(" Most guessed: "),
                Span::styled(or_na(stats.most_guessed_candidate.clone()), bold(Color::Magenta)),
            ]),
            Line::from(vec![
                Span::raw(" Unique movies guessed: "),
                Span::styled(stats.unique_candidates_guessed.to_string(), bold(Color::Cyan)),
            ]),
        ];

        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Statistics")),
            area,
        );
    }
}

fn draw_overall_stats(f: &mut Frame, area: Rect, stats: &StatisticsSnapshot) {
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Games Played: "),
            Span::styled(format!("{}", stats.games_finished), bold(Color::Cyan)),
            Span::raw("  |  Wins: "),
            Span::styled(format!("{}", stats.games_won), bold(Color::Green)),
            Span::raw("  |  Losses: "),
            Span::styled(format!("{}", stats.games_lost), bold(Color::Red)),
            Span::raw("  |  Unique Movies Guessed: "),
            Span::styled(format!("{}", stats.unique_candidates_guessed), bold(Color::Cyan)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  Win Rate: "),
            Span::styled(format!("{}%", stats.win_rate), bold(Color::Green)),
            Span::raw("  |  Avg Guesses (wins): "),
            Span::styled(
                or_na(stats.average_guesses_on_win.map(|a| format!("{:.2}", a))),
                bold(Color::Cyan),
            ),
            Span::raw("  |  Current Streak: "),
            streak_span(stats),
            Span::raw("  |  Best Streak: "),
            Span::styled(format!("{}", stats.longest_win_streak), bold(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::raw("  Fastest Win: "),
            Span::styled(or_na(stats.fewest_guesses_in_a_win), bold(Color::Green)),
            Span::raw("  |  Slowest Win: "),
            Span::styled(or_na(stats.slowest_win), bold(Color::Yellow)),
            Span::raw("  |  Most Guessed: "),
            Span::styled(or_na(stats.most_guessed_candidate.clone()), bold(Color::Magenta)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Statistics | Tab: List View | Esc/Ctrl+R: Back | Ctrl+Q: Quit"),
    );

    f.render_widget(paragraph, area);
}

fn draw_guess_distribution(f: &mut Frame, area: Rect, stats: &StatisticsSnapshot) {
    let max_count = stats.guess_distribution.iter().copied().max().unwrap_or(0);

    let mut lines = vec![Line::from("")];

    for (i, count) in stats.guess_distribution.iter().enumerate() {
        let bar_width = if max_count > 0 {
            ((*count as f64 / max_count as f64) * 40.0) as usize
        } else {
            0
        };

        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", i + 1)),
            Span::styled("█".repeat(bar_width), Style::default().fg(Color::Green)),
            Span::raw(format!(" {}", count)),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Guess Distribution (wins)"),
    );

    f.render_widget(paragraph, area);
}

fn draw_recent_games(f: &mut Frame, area: Rect, recent: &[HistoryEntry]) {
    let rows: Vec<Row> = recent
        .iter()
        .map(|entry| {
            let (outcome, style) = match entry.outcome {
                Outcome::Won => (
                    format!("Won in {}", entry.guesses.len()),
                    Style::default().fg(Color::Green),
                ),
                Outcome::Lost => ("Lost".to_string(), Style::default().fg(Color::Red)),
            };

            Row::new(vec![entry.puzzle_date.clone(), entry.display_name.clone(), outcome]).style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["Date", "Movie", "Result"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Recent Games (Latest 10)"),
    );

    f.render_widget(table, area);
}
