//! Guessing session state machine.
//!
//! A session is an explicit [`SessionRecord`] value; the transition functions
//! take it by value and hand back the updated record. Nothing here touches
//! storage or the clock on its own.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GameError;

/// Number of guesses (skips included) a player gets per puzzle.
pub const MAX_GUESSES: usize = 5;

/// Stored form of a skipped guess.
pub const SKIPPED_GUESS: &str = "__SKIPPED__";

/// A single guess within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GuessEntry {
    Skip,
    Candidate(String),
}

impl GuessEntry {
    pub fn candidate(id: impl Into<String>) -> Self {
        GuessEntry::Candidate(id.into())
    }

    /// Returns the candidate id, or `None` for a skip.
    pub fn candidate_id(&self) -> Option<&str> {
        match self {
            GuessEntry::Skip => None,
            GuessEntry::Candidate(id) => Some(id),
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, GuessEntry::Skip)
    }
}

impl From<String> for GuessEntry {
    fn from(value: String) -> Self {
        if value == SKIPPED_GUESS {
            GuessEntry::Skip
        } else {
            GuessEntry::Candidate(value)
        }
    }
}

impl From<GuessEntry> for String {
    fn from(entry: GuessEntry) -> Self {
        match entry {
            GuessEntry::Skip => SKIPPED_GUESS.to_string(),
            GuessEntry::Candidate(id) => id,
        }
    }
}

/// Lifecycle state of a session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "incomplete")]
    InProgress,
    #[serde(rename = "won")]
    Won,
    #[serde(rename = "lost")]
    Lost,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionStatus::InProgress)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::InProgress => "in progress",
            SessionStatus::Won => "won",
            SessionStatus::Lost => "lost",
        };
        write!(f, "{}", s)
    }
}

/// Final result of a played puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// One row of the history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "id")]
    pub puzzle_id: String,
    #[serde(rename = "date")]
    pub puzzle_date: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub guesses: Vec<GuessEntry>,
    #[serde(rename = "timeStarted", default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "timeCompleted", default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(rename = "posterLink", default)]
    pub poster_link: Option<String>,
}

impl SessionRecord {
    /// A fresh, untouched session for the given puzzle.
    pub fn new(puzzle_id: impl Into<String>, puzzle_date: impl Into<String>) -> Self {
        Self {
            puzzle_id: puzzle_id.into(),
            puzzle_date: puzzle_date.into(),
            status: SessionStatus::InProgress,
            guesses: Vec::new(),
            started_at: None,
            completed_at: None,
            title: None,
            year: None,
            poster_link: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    pub fn remaining_guesses(&self) -> usize {
        if self.is_terminal() {
            0
        } else {
            MAX_GUESSES.saturating_sub(self.guesses.len())
        }
    }

    /// Returns true if the puzzle id was guessed as a candidate.
    pub fn guessed_correctly(&self) -> bool {
        self.guesses
            .iter()
            .any(|g| g.candidate_id() == Some(self.puzzle_id.as_str()))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            SessionStatus::Won => Some(Outcome::Won),
            SessionStatus::Lost => Some(Outcome::Lost),
            SessionStatus::InProgress => None,
        }
    }
}

/// Resume the in-progress session for `puzzle_id`, or start a new one.
///
/// The new session is not stored anywhere until the first guess lands.
pub fn start_or_resume(
    history: &[SessionRecord],
    puzzle_id: &str,
    puzzle_date: &str,
) -> SessionRecord {
    history
        .iter()
        .find(|r| r.puzzle_id == puzzle_id && r.status == SessionStatus::InProgress)
        .cloned()
        .unwrap_or_else(|| SessionRecord::new(puzzle_id, puzzle_date))
}

/// Apply one guess or skip to a session.
pub fn submit_guess(
    mut session: SessionRecord,
    entry: GuessEntry,
    at: DateTime<Utc>,
) -> Result<SessionRecord, GameError> {
    if session.is_terminal() {
        return Err(GameError::InvalidState {
            puzzle_id: session.puzzle_id,
            status: session.status,
        });
    }

    let correct = entry.candidate_id() == Some(session.puzzle_id.as_str());

    session.guesses.push(entry);
    if session.started_at.is_none() {
        session.started_at = Some(at);
    }

    if correct {
        session.status = SessionStatus::Won;
        session.completed_at = Some(at);
    } else if session.guesses.len() >= MAX_GUESSES {
        session.status = SessionStatus::Lost;
        session.completed_at = Some(at);
    }

    Ok(session)
}

/// True once the puzzle has a won or lost record.
pub fn has_been_played(history: &[SessionRecord], puzzle_id: &str) -> bool {
    outcome_of(history, puzzle_id).is_some()
}

pub fn outcome_of(history: &[SessionRecord], puzzle_id: &str) -> Option<Outcome> {
    history
        .iter()
        .filter(|r| r.puzzle_id == puzzle_id)
        .find_map(SessionRecord::outcome)
}

/// Accepts a string or a number; legacy rows stored the year either way.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
