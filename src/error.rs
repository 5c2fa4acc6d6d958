use crate::session::SessionStatus;

/// Errors surfaced by the game engine and its collaborators.
///
/// None of these stop play: callers log them and carry on with whatever
/// state they still have.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A guess was submitted for a session that already finished.
    #[error("session for {puzzle_id} is already {status}")]
    InvalidState {
        puzzle_id: String,
        status: SessionStatus,
    },

    /// A guess arrived before any puzzle was loaded.
    #[error("no puzzle loaded")]
    NoPuzzle,

    /// The persisted history could not be parsed.
    #[error("stored history is unreadable: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// A request to the puzzle server failed.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The key/value backend failed to read or write.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<reqwest::Error> for GameError {
    fn from(err: reqwest::Error) -> Self {
        GameError::NetworkUnavailable(err.to_string())
    }
}
