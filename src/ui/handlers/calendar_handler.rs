//! Calendar screen state management.

use crate::{calendar::iso_date, storage::KeyValueStore};

use super::{
    super::{app::App, types::Screen},
    GameHandler,
};

pub struct CalendarHandler<'a, S> {
    app: &'a mut App<S>,
}

impl<'a, S: KeyValueStore> CalendarHandler<'a, S> {
    pub fn new(app: &'a mut App<S>) -> Self {
        Self { app }
    }

    pub fn enter_calendar_mode(&mut self) {
        self.app.screen = Screen::Calendar;
        if self.app.available_dates.is_empty() {
            self.refresh_dates();
        }
    }

    pub fn exit_calendar_mode(&mut self) {
        self.app.screen = Screen::Play;
    }

    /// Re-read the set of dates that have a puzzle.
    pub fn refresh_dates(&mut self) {
        match self.app.catalog.available_dates() {
            Ok(dates) => {
                self.app.log(format!("{} puzzle date(s) available", dates.len()));
                self.app.available_dates = dates;
            }
            Err(e) => self.app.log(format!("Failed to load puzzle dates: {}", e)),
        }
    }

    pub fn move_days(&mut self, delta: i64) {
        self.app.cursor.move_days(delta);
    }

    pub fn move_months(&mut self, delta: i32) {
        self.app.cursor.move_months(delta);
    }

    pub fn play_selected(&mut self) {
        let date = iso_date(self.app.cursor.selected());
        if !self.app.available_dates.contains(&date) {
            self.app.log(format!("No puzzle on {}", date));
            return;
        }
        GameHandler::new(self.app).load_puzzle(Some(&date));
    }
}
