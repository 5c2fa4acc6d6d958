//! The game engine: one loaded puzzle, its session, and the history it is
//! recorded into.

use chrono::Utc;
use tracing::{info, warn};

use crate::{
    catalog::{Puzzle, Review},
    error::GameError,
    history::HistoryStore,
    session::{self, GuessEntry, SessionRecord, SessionStatus},
    stats::StatisticsSnapshot,
    storage::KeyValueStore,
};

pub struct GameEngine<S> {
    history: HistoryStore<S>,
    puzzle: Option<Puzzle>,
    session: Option<SessionRecord>,
    reviews: Vec<Review>,
}

impl<S: KeyValueStore> GameEngine<S> {
    pub fn new(history: HistoryStore<S>) -> Self {
        Self {
            history,
            puzzle: None,
            session: None,
            reviews: Vec::new(),
        }
    }

    /// Load a puzzle, resuming or replaying whatever history has for it.
    ///
    /// History is re-read first so progress made elsewhere is picked up.
    pub fn begin(&mut self, puzzle: Puzzle, reviews: Vec<Review>) -> &SessionRecord {
        self.history.load();

        let session = match self.history.find(&puzzle.id) {
            Some(record) if record.is_terminal() => record.clone(),
            _ => session::start_or_resume(self.history.records(), &puzzle.id, &puzzle.date),
        };

        info!(
            puzzle_id = %puzzle.id,
            date = %puzzle.date,
            status = %session.status,
            guesses = session.guess_count(),
            reviews = reviews.len(),
            "Puzzle loaded"
        );

        self.puzzle = Some(puzzle);
        self.reviews = reviews;
        self.session.insert(session)
    }

    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_ref()
    }

    pub fn current_session(&self) -> Option<&SessionRecord> {
        self.session.as_ref()
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn statistics_snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot::from_records(self.history.records())
    }

    pub fn has_been_played(&self, puzzle_id: &str) -> bool {
        self.history.has_been_played(puzzle_id)
    }

    /// Guess a candidate id. Surrounding whitespace is ignored.
    pub fn submit_guess(&mut self, candidate: &str) -> Result<SessionRecord, GameError> {
        self.apply(GuessEntry::candidate(candidate.trim()))
    }

    pub fn skip(&mut self) -> Result<SessionRecord, GameError> {
        self.apply(GuessEntry::Skip)
    }

    /// Advance the session and persist it.
    ///
    /// If saving fails the guess still stands in memory; the error is returned
    /// so the caller can report it.
    fn apply(&mut self, entry: GuessEntry) -> Result<SessionRecord, GameError> {
        let current = self.session.clone().ok_or(GameError::NoPuzzle)?;

        let mut next = session::submit_guess(current, entry.clone(), Utc::now())?;
        info!(puzzle_id = %next.puzzle_id, guess = %String::from(entry), status = %next.status, "Guess recorded");

        if next.is_terminal() {
            if let Some(puzzle) = &self.puzzle {
                next.title = puzzle.title.clone();
                next.year = puzzle.year.clone();
                next.poster_link = puzzle.poster_link.clone();
            }
            info!(
                puzzle_id = %next.puzzle_id,
                status = %next.status,
                guesses = next.guess_count(),
                "Session finished"
            );
        }

        self.history.upsert(next.clone());
        self.session = Some(next.clone());

        if let Err(err) = self.history.save() {
            warn!(%err, "Failed to save game history");
            return Err(err);
        }

        Ok(next)
    }

    /// Reviews the player may look at right now: one more than the guesses
    /// made while playing, all of them once the session is over.
    pub fn visible_reviews(&self) -> &[Review] {
        let Some(session) = &self.session else {
            return &[];
        };
        let count = if session.is_terminal() {
            self.reviews.len()
        } else {
            (session.guess_count() + 1).min(self.reviews.len())
        };
        &self.reviews[..count]
    }

    /// Text for sharing a finished result.
    pub fn share_text(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        match session.status {
            SessionStatus::Won => Some(format!(
                "I played \"Guess The Movie\" and got it in {} guesses! Can you do better?",
                session.guess_count()
            )),
            SessionStatus::Lost => {
                Some("I played \"Guess The Movie\" but wasn't able to get it. Can you?".to_string())
            }
            SessionStatus::InProgress => None,
        }
    }
}
