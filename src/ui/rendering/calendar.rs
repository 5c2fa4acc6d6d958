//! Month grid for picking archive puzzles.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::{
    calendar::{CalendarMonth, DayStatus, day_status, format_date, iso_date},
    storage::KeyValueStore,
    ui::app::App,
};

fn status_style(status: DayStatus) -> Style {
    match status {
        DayStatus::Won => Style::default().fg(Color::Black).bg(Color::Green),
        DayStatus::Lost => Style::default().fg(Color::White).bg(Color::Red),
        DayStatus::Incomplete => Style::default().fg(Color::Black).bg(Color::Yellow),
        DayStatus::Available => Style::default().fg(Color::White),
        DayStatus::NoPuzzle => Style::default().fg(Color::DarkGray),
    }
}

fn status_label(status: DayStatus) -> &'static str {
    match status {
        DayStatus::Won => "won",
        DayStatus::Lost => "lost",
        DayStatus::Incomplete => "in progress",
        DayStatus::Available => "not played yet",
        DayStatus::NoPuzzle => "no puzzle",
    }
}

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw_calendar(&self, f: &mut Frame, area: Rect) {
        let (year, month) = self.cursor.year_month();
        let records = self.engine.history().records();

        let Some(calendar) = CalendarMonth::build(year, month, &self.available_dates, records) else {
            f.render_widget(
                Paragraph::new("Invalid month").block(Block::default().borders(Borders::ALL).title("Calendar")),
                area,
            );
            return;
        };

        let selected = self.cursor.selected();
        let rows: Vec<Row> = calendar
            .weeks()
            .into_iter()
            .map(|week| {
                let cells: Vec<Cell> = week
                    .into_iter()
                    .map(|day| match day {
                        Some(day) => {
                            let mut style = status_style(day.status);
                            if day.date == selected {
                                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                            }
                            Cell::from(format!("{:>3}", day.day)).style(style)
                        }
                        None => Cell::from(""),
                    })
                    .collect();
                Row::new(cells)
            })
            .collect();

        let title = format!(
            "{} | ←/→ day ↑/↓ week PgUp/PgDn month | Enter: play | Esc: back",
            calendar.title()
        );

        let table = Table::new(rows, [Constraint::Length(4); 7])
            .header(
                Row::new(vec!["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"])
                    .style(Style::default().add_modifier(Modifier::BOLD))
                    .bottom_margin(1),
            )
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(table, area);
    }

    pub(in crate::ui) fn draw_selected_day(&self, f: &mut Frame, area: Rect) {
        let date = iso_date(self.cursor.selected());
        let status = day_status(&date, &self.available_dates, self.engine.history().records());

        let lines = vec![
            Line::from(vec![
                Span::raw(format!(" {}: ", format_date(&date))),
                Span::styled(status_label(status), status_style(status)),
            ]),
            Line::from(vec![
                Span::styled(" won ", status_style(DayStatus::Won)),
                Span::raw(" "),
                Span::styled(" lost ", status_style(DayStatus::Lost)),
                Span::raw(" "),
                Span::styled(" in progress ", status_style(DayStatus::Incomplete)),
                Span::raw(" "),
                Span::styled(" no puzzle ", status_style(DayStatus::NoPuzzle)),
            ]),
        ];

        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Selected")),
            area,
        );
    }
}
