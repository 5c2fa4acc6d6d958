//! Play screen state management.

use chrono::NaiveDate;

use crate::{
    calendar::{CalendarCursor, random_unplayed_date},
    catalog::fetch_reviews,
    error::GameError,
    session::{SessionRecord, SessionStatus},
    storage::KeyValueStore,
};

use super::super::{app::App, types::Screen};

/// Helper struct for loading puzzles and applying guesses.
pub struct GameHandler<'a, S> {
    app: &'a mut App<S>,
}

impl<'a, S: KeyValueStore> GameHandler<'a, S> {
    pub fn new(app: &'a mut App<S>) -> Self {
        Self { app }
    }

    /// Fetch the puzzle for `date` (latest when `None`) with its reviews and
    /// resume whatever the player already did on it.
    pub fn load_puzzle(&mut self, date: Option<&str>) {
        let label = date.unwrap_or("today");
        let puzzle = match self.app.catalog.puzzle(date) {
            Ok(puzzle) => puzzle,
            Err(e) => {
                self.app.log(format!("Failed to load puzzle for {}: {}", label, e));
                return;
            }
        };

        let reviews = fetch_reviews(self.app.catalog.as_ref(), &puzzle);
        let review_count = reviews.len();
        let puzzle_date = puzzle.date.clone();

        let (status, guesses) = {
            let session = self.app.engine.begin(puzzle, reviews);
            (session.status, session.guess_count())
        };

        self.app.screen = Screen::Play;
        self.app.input.clear();
        self.app.review_index = self.app.engine.visible_reviews().len().saturating_sub(1);

        if let Ok(date) = NaiveDate::parse_from_str(&puzzle_date, "%Y-%m-%d") {
            self.app.cursor = CalendarCursor::new(date);
        }

        self.app.log(format!(
            "Loaded puzzle for {} ({} reviews)",
            puzzle_date, review_count
        ));

        match status {
            SessionStatus::InProgress if guesses > 0 => {
                self.app.log(format!("Resumed with {} guess(es) made", guesses));
            }
            SessionStatus::Won | SessionStatus::Lost => {
                self.app.log(format!("Already played: you {}", status));
            }
            SessionStatus::InProgress => {}
        }
    }

    pub fn submit_guess(&mut self) {
        let candidate = self.app.input.trim().to_string();
        if candidate.is_empty() {
            return;
        }

        let result = self.app.engine.submit_guess(&candidate);
        self.app.log(format!("Guess submitted: {}", candidate));
        self.handle_result(result);
    }

    pub fn skip(&mut self) {
        let result = self.app.engine.skip();
        self.app.log("Guess skipped");
        self.handle_result(result);
    }

    fn handle_result(&mut self, result: Result<SessionRecord, GameError>) {
        match result {
            Ok(record) => self.after_move(&record),
            Err(GameError::InvalidState { status, .. }) => {
                self.app.log(format!("This puzzle is already {}", status));
            }
            Err(GameError::NoPuzzle) => {
                self.app.log("No puzzle loaded");
            }
            Err(e) => {
                // The move still counts in memory.
                self.app.log(format!("Failed to save progress: {}", e));
                if let Some(record) = self.app.engine.current_session().cloned() {
                    self.after_move(&record);
                }
            }
        }
    }

    fn after_move(&mut self, record: &SessionRecord) {
        self.app.input.clear();
        self.app.history_data = None;
        self.app.review_index = self.app.engine.visible_reviews().len().saturating_sub(1);

        let name = self
            .app
            .engine
            .puzzle()
            .map(|p| p.display_name())
            .unwrap_or_else(|| record.puzzle_id.clone());

        match record.status {
            SessionStatus::Won => {
                self.app.log(format!(
                    "You got it in {} guess(es)! The movie was {}",
                    record.guess_count(),
                    name
                ));
            }
            SessionStatus::Lost => {
                self.app.log(format!("Out of guesses. The movie was {}", name));
            }
            SessionStatus::InProgress => {
                self.app.log(format!("{} guess(es) left", record.remaining_guesses()));
                return;
            }
        }

        if let Some(text) = self.app.engine.share_text() {
            self.app.log(text);
        }
    }

    pub fn next_review(&mut self) {
        let visible = self.app.engine.visible_reviews().len();
        if self.app.review_index + 1 < visible {
            self.app.review_index += 1;
        }
    }

    pub fn prev_review(&mut self) {
        if self.app.review_index > 0 {
            self.app.review_index -= 1;
        }
    }

    /// Load a random archive puzzle the player hasn't finished.
    pub fn play_random(&mut self) {
        match random_unplayed_date(&self.app.available_dates, self.app.engine.history().records()) {
            Some(date) => {
                self.app.log(format!("Picked random puzzle from {}", date));
                self.load_puzzle(Some(&date));
            }
            None => self.app.log("Every available puzzle has been played"),
        }
    }
}
