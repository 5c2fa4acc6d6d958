//! Persisted history of guessing sessions.

pub mod migration;

use tracing::{info, warn};

use crate::{
    error::GameError,
    session::{self, Outcome, SessionRecord},
    stats::StatisticsSnapshot,
    storage::KeyValueStore,
};

pub use migration::{MigrationReport, migrate};

pub const HISTORY_KEY: &str = "gameHistory";
pub const STATS_KEY: &str = "gameStats";
pub const VERSION_KEY: &str = "storageVersion";
pub const STORAGE_VERSION: &str = "v1";

/// In-memory copy of the session history backed by a key/value store.
///
/// Writes are whole-blob: [`HistoryStore::save`] serializes every record, so
/// the last writer wins if another process touched the store in between.
pub struct HistoryStore<S> {
    store: S,
    records: Vec<SessionRecord>,
    version: String,
}

/// Parse a stored history blob one row at a time.
///
/// Fails only when the blob is not a JSON array. Rows that don't parse are
/// logged and left out so the rest survive.
pub(crate) fn parse_history(blob: &str) -> Result<Vec<SessionRecord>, GameError> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(blob)?;

    Ok(rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(%err, "Dropping malformed history row");
                None
            }
        })
        .collect())
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Wrap a store and load (migrating if needed) its history.
    pub fn open(store: S) -> Self {
        let mut history = Self {
            store,
            records: Vec::new(),
            version: String::new(),
        };
        history.load();
        history
    }

    /// Reload from the backing store. Never fails: an unreadable history
    /// comes back empty.
    pub fn load(&mut self) -> (&[SessionRecord], &str) {
        match migrate(&mut self.store) {
            Ok(Some(report)) => info!(?report, "Migrated stored game history"),
            Ok(None) => {}
            Err(err) => warn!(%err, "History migration failed"),
        }

        self.version = match self.store.get(VERSION_KEY) {
            Ok(v) => v.unwrap_or_default(),
            Err(err) => {
                warn!(%err, "Failed to read storage version");
                String::new()
            }
        };

        self.records = match self.read_records() {
            Ok(records) => records,
            Err(err) => {
                warn!(%err, "Discarding unreadable game history");
                Vec::new()
            }
        };

        (&self.records, &self.version)
    }

    fn read_records(&self) -> Result<Vec<SessionRecord>, GameError> {
        match self.store.get(HISTORY_KEY)? {
            Some(blob) => parse_history(&blob),
            None => Ok(Vec::new()),
        }
    }

    /// Insert or replace the record for `record.puzzle_id`.
    ///
    /// An existing in-progress record is replaced, a finished one is left
    /// untouched. Returns whether anything changed.
    pub fn upsert(&mut self, record: SessionRecord) -> bool {
        match self
            .records
            .iter_mut()
            .find(|r| r.puzzle_id == record.puzzle_id)
        {
            Some(existing) if existing.is_terminal() => {
                warn!(
                    puzzle_id = %record.puzzle_id,
                    "Ignoring write over finished session"
                );
                false
            }
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                self.records.push(record);
                true
            }
        }
    }

    /// Write the full history, the cached stats summary and the version tag.
    pub fn save(&mut self) -> Result<(), GameError> {
        let history = serde_json::to_string(&self.records)?;
        let summary = serde_json::to_string(&StatisticsSnapshot::from_records(&self.records).summary())?;

        self.store.set(HISTORY_KEY, &history)?;
        self.store.set(STATS_KEY, &summary)?;
        self.store.set(VERSION_KEY, STORAGE_VERSION)?;
        self.version = STORAGE_VERSION.to_string();
        Ok(())
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn find(&self, puzzle_id: &str) -> Option<&SessionRecord> {
        self.records.iter().find(|r| r.puzzle_id == puzzle_id)
    }

    pub fn has_been_played(&self, puzzle_id: &str) -> bool {
        session::has_been_played(&self.records, puzzle_id)
    }

    pub fn outcome_of(&self, puzzle_id: &str) -> Option<Outcome> {
        session::outcome_of(&self.records, puzzle_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
