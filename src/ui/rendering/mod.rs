mod calendar;
mod guesses;
mod history;
mod input_field;
mod logs;
mod reviews;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    session::MAX_GUESSES,
    storage::KeyValueStore,
    ui::{app::App, types::Screen},
};

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw(&self, f: &mut Frame) {
        match self.screen {
            Screen::History => {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Min(10),   // History content
                        Constraint::Length(6), // Small log panel
                    ])
                    .split(f.area());

                self.draw_history_mode(f, layout[0]);
                self.draw_logs(f, layout[1]);
            }
            Screen::Calendar => {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(12), // Month grid
                        Constraint::Length(4),  // Selected day
                        Constraint::Min(4),
                    ])
                    .split(f.area());

                self.draw_calendar(f, layout[0]);
                self.draw_selected_day(f, layout[1]);
                self.draw_logs(f, layout[2]);
            }
            Screen::Play => self.draw_play(f),
        }
    }

    fn draw_play(&self, f: &mut Frame) {
        let main_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(f.area());

        let left_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(MAX_GUESSES as u16 + 2),
                Constraint::Length(3),
            ])
            .split(main_layout[0]);

        self.draw_game_status(f, left_layout[0]);
        self.draw_review(f, left_layout[1]);
        self.draw_guesses(f, left_layout[2]);
        self.draw_input(f, left_layout[3]);

        let right_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(6)])
            .split(main_layout[1]);

        self.draw_stats_summary(f, right_layout[0]);
        self.draw_logs(f, right_layout[1]);
    }
}
