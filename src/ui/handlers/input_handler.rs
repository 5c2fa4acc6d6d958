//! Keyboard dispatch for every screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::storage::KeyValueStore;

use super::super::{
    app::App,
    types::{HistoryViewMode, InputStatus, Screen},
};
use super::{CalendarHandler, GameHandler, HistoryHandler};

/// Helper struct for managing keyboard input and user interactions.
pub struct InputHandler<'a, S> {
    app: &'a mut App<S>,
}

impl<'a, S: KeyValueStore> InputHandler<'a, S> {
    pub fn new(app: &'a mut App<S>) -> Self {
        Self { app }
    }

    /// Returns `true` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q' | 'Q'), KeyModifiers::CONTROL) => {
                self.app.log("Exit requested");
                return true;
            }

            (KeyCode::Char('r' | 'R'), KeyModifiers::CONTROL) => {
                if self.app.screen == Screen::History {
                    self.app.log("Returning to play");
                    HistoryHandler::new(self.app).exit_history_mode();
                } else {
                    self.app.log("Switching to history");
                    HistoryHandler::new(self.app).enter_history_mode();
                }
                return false;
            }

            (KeyCode::Char('l' | 'L'), KeyModifiers::CONTROL) => {
                if self.app.screen == Screen::Calendar {
                    CalendarHandler::new(self.app).exit_calendar_mode();
                } else {
                    self.app.log("Switching to calendar");
                    CalendarHandler::new(self.app).enter_calendar_mode();
                }
                return false;
            }

            (KeyCode::Char('p' | 'P'), KeyModifiers::CONTROL) => {
                GameHandler::new(self.app).play_random();
                return false;
            }

            _ => {}
        }

        match self.app.screen {
            Screen::Play => self.handle_play_key(key),
            Screen::History => self.handle_history_key(key),
            Screen::Calendar => self.handle_calendar_key(key),
        }
        false
    }

    fn handle_play_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('k' | 'K'), KeyModifiers::CONTROL) => {
                GameHandler::new(self.app).skip();
            }
            (KeyCode::Enter, _) => self.submit_input(),
            (KeyCode::Left, _) => GameHandler::new(self.app).prev_review(),
            (KeyCode::Right, _) => GameHandler::new(self.app).next_review(),
            (KeyCode::Esc, _) => self.app.input.clear(),
            (KeyCode::Backspace, _) => {
                self.app.input.pop();
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.app.input.push(c),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => HistoryHandler::new(self.app).cycle_view_mode(),

            KeyCode::PageDown => {
                if self.app.history_view_mode == HistoryViewMode::List {
                    HistoryHandler::new(self.app).next_page();
                }
            }

            KeyCode::PageUp => {
                if self.app.history_view_mode == HistoryViewMode::List {
                    HistoryHandler::new(self.app).prev_page();
                }
            }

            KeyCode::Esc => match self.app.history_view_mode {
                HistoryViewMode::Detail => HistoryHandler::new(self.app).return_to_list(),
                HistoryViewMode::List => HistoryHandler::new(self.app).return_to_stats(),
                HistoryViewMode::Stats => HistoryHandler::new(self.app).exit_history_mode(),
            },

            KeyCode::Char(c @ '0'..='9') => {
                if self.app.history_view_mode == HistoryViewMode::List {
                    // 1-9 -> items 0-8, 0 -> item 9
                    let index = match c.to_digit(10) {
                        Some(0) | None => 9,
                        Some(d) => d as usize - 1,
                    };
                    HistoryHandler::new(self.app).select_entry_on_page(index);
                }
            }

            _ => {}
        }
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => CalendarHandler::new(self.app).move_days(-1),
            KeyCode::Right => CalendarHandler::new(self.app).move_days(1),
            KeyCode::Up => CalendarHandler::new(self.app).move_days(-7),
            KeyCode::Down => CalendarHandler::new(self.app).move_days(7),
            KeyCode::PageUp => CalendarHandler::new(self.app).move_months(-1),
            KeyCode::PageDown => CalendarHandler::new(self.app).move_months(1),
            KeyCode::Enter => CalendarHandler::new(self.app).play_selected(),
            KeyCode::Esc => CalendarHandler::new(self.app).exit_calendar_mode(),
            _ => {}
        }
    }

    fn submit_input(&mut self) {
        match self.app.input_status() {
            InputStatus::Valid => GameHandler::new(self.app).submit_guess(),
            InputStatus::Incomplete => {}
            InputStatus::Invalid(reason) => {
                self.app
                    .log(format!("Input rejected ({}): {:?}", reason, self.app.input));
            }
        }
    }
}
