//! Forward migration of stored history to the current record shape.
//!
//! Before `v1` the game kept finished games inside the `gameStats` blob with a
//! `won` flag that was set independently of the guesses. Migration rewrites
//! them as [`SessionRecord`]s whose status agrees with their guesses.

use serde::Deserialize;
use tracing::warn;

use super::{HISTORY_KEY, STATS_KEY, STORAGE_VERSION, VERSION_KEY, parse_history};
use crate::{
    error::GameError,
    session::{GuessEntry, MAX_GUESSES, SessionRecord, SessionStatus, lenient_string},
    stats::StatisticsSnapshot,
    storage::KeyValueStore,
};

/// What a migration run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: Option<String>,
    pub legacy_games: usize,
    pub kept_records: usize,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyStats {
    /// Kept raw so one bad game doesn't take the others with it.
    #[serde(default)]
    games: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyGame {
    #[serde(rename = "correctMovieID")]
    correct_movie_id: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    won: bool,
    #[serde(default)]
    guesses: Option<Vec<GuessEntry>>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    year: Option<String>,
    #[serde(default)]
    poster_link: Option<String>,
}

impl LegacyGame {
    fn into_record(self) -> SessionRecord {
        let mut record = SessionRecord::new(self.correct_movie_id, self.date);
        record.status = SessionStatus::Lost;
        record.guesses = self.guesses.unwrap_or_default();
        record.title = self.title;
        record.year = self.year;
        record.poster_link = self.poster_link;
        reconcile(record, self.won)
    }
}

/// Make a record's status agree with its guesses.
///
/// Guesses after the first correct one, or beyond the budget, are dropped. A
/// record flagged as won whose guesses never name the answer gets the answer
/// appended if there is room; otherwise it is a loss.
pub fn reconcile(mut record: SessionRecord, flagged_won: bool) -> SessionRecord {
    if let Some(pos) = record
        .guesses
        .iter()
        .position(|g| g.candidate_id() == Some(record.puzzle_id.as_str()))
    {
        record.guesses.truncate(pos + 1);
    }
    record.guesses.truncate(MAX_GUESSES);

    if flagged_won && !record.guessed_correctly() && record.guesses.len() < MAX_GUESSES {
        record
            .guesses
            .push(GuessEntry::Candidate(record.puzzle_id.clone()));
    }

    record.status = if record.guessed_correctly() {
        SessionStatus::Won
    } else if record.guesses.len() >= MAX_GUESSES || record.is_terminal() {
        SessionStatus::Lost
    } else {
        SessionStatus::InProgress
    };

    if !record.is_terminal() {
        record.completed_at = None;
    }

    record
}

/// Bring the store up to [`STORAGE_VERSION`]. Returns `None` when it already was.
pub fn migrate<S: KeyValueStore>(store: &mut S) -> Result<Option<MigrationReport>, GameError> {
    let from_version = store.get(VERSION_KEY)?;
    if from_version.as_deref() == Some(STORAGE_VERSION) {
        return Ok(None);
    }

    let legacy = read_legacy(store)?;

    let mut legacy_games = 0;
    let mut records: Vec<SessionRecord> = Vec::new();
    for row in legacy.games {
        let game: LegacyGame = match serde_json::from_value(row) {
            Ok(game) => game,
            Err(err) => {
                warn!(%err, "Dropping malformed legacy game");
                continue;
            }
        };
        legacy_games += 1;

        let record = game.into_record();
        if !records.iter().any(|r| r.puzzle_id == record.puzzle_id) {
            records.push(record);
        }
    }

    let mut kept_records = 0;
    for record in read_current(store)? {
        if records.iter().any(|r| r.puzzle_id == record.puzzle_id) {
            continue;
        }
        let flagged_won = record.status == SessionStatus::Won;
        records.push(reconcile(record, flagged_won));
        kept_records += 1;
    }

    let summary = StatisticsSnapshot::from_records(&records).summary();
    store.set(HISTORY_KEY, &serde_json::to_string(&records)?)?;
    store.set(STATS_KEY, &serde_json::to_string(&summary)?)?;
    store.set(VERSION_KEY, STORAGE_VERSION)?;

    Ok(Some(MigrationReport {
        from_version,
        legacy_games,
        kept_records,
    }))
}

fn read_legacy<S: KeyValueStore>(store: &S) -> Result<LegacyStats, GameError> {
    let Some(blob) = store.get(STATS_KEY)? else {
        return Ok(LegacyStats::default());
    };
    match serde_json::from_str(&blob) {
        Ok(stats) => Ok(stats),
        Err(err) => {
            warn!(%err, "Ignoring unreadable legacy game stats");
            Ok(LegacyStats::default())
        }
    }
}

/// Records already in the current shape. Rows that don't parse are skipped.
fn read_current<S: KeyValueStore>(store: &S) -> Result<Vec<SessionRecord>, GameError> {
    let Some(blob) = store.get(HISTORY_KEY)? else {
        return Ok(Vec::new());
    };
    match parse_history(&blob) {
        Ok(records) => Ok(records),
        Err(err) => {
            warn!(%err, "Ignoring unreadable game history during migration");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn legacy_store(games: &str) -> MemoryStore {
        MemoryStore::with_entries([(
            STATS_KEY,
            format!(r#"{{"games":{games},"totalPlayed":0,"totalWon":0}}"#),
        )])
    }

    fn migrated_records(store: &MemoryStore) -> Vec<SessionRecord> {
        serde_json::from_str(&store.get(HISTORY_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_legacy_win_with_answer_in_guesses() {
        let mut store = legacy_store(
            r#"[{"correctMovieID":"alpha","date":"2024-01-01","won":true,"guessCount":2,"guesses":["__SKIPPED__","alpha"],"title":"Alpha","year":"1999","posterLink":"p.jpg"}]"#,
        );
        let report = migrate(&mut store).unwrap().unwrap();
        assert_eq!(report.legacy_games, 1);
        assert_eq!(report.from_version, None);

        let records = migrated_records(&store);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, SessionStatus::Won);
        assert_eq!(records[0].guesses, vec![GuessEntry::Skip, GuessEntry::candidate("alpha")]);
        assert_eq!(records[0].title.as_deref(), Some("Alpha"));
        assert_eq!(records[0].poster_link.as_deref(), Some("p.jpg"));
        assert_eq!(store.get(VERSION_KEY).unwrap().as_deref(), Some(STORAGE_VERSION));
    }

    #[test]
    fn test_malformed_legacy_game_keeps_the_rest() {
        let mut store = legacy_store(
            r#"[
                {"correctMovieID":"alpha","date":"2024-01-01","won":true,"guesses":["alpha"]},
                {"correctMovieID":"beta","date":"2024-01-02","won":null,"guesses":["x"]},
                {"date":"2024-01-03","won":false}
            ]"#,
        );
        let report = migrate(&mut store).unwrap().unwrap();
        assert_eq!(report.legacy_games, 1);

        let records = migrated_records(&store);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].puzzle_id, "alpha");
        assert_eq!(records[0].status, SessionStatus::Won);

        let stats: serde_json::Value =
            serde_json::from_str(&store.get(STATS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stats["gamesWon"], 1);
    }

    #[test]
    fn test_legacy_win_flag_without_answer_appends_it() {
        let mut store = legacy_store(
            r#"[{"correctMovieID":"alpha","date":"2024-01-01","won":true,"guesses":["beta"]}]"#,
        );
        migrate(&mut store).unwrap();

        let records = migrated_records(&store);
        assert_eq!(records[0].status, SessionStatus::Won);
        assert_eq!(
            records[0].guesses,
            vec![GuessEntry::candidate("beta"), GuessEntry::candidate("alpha")]
        );
    }

    #[test]
    fn test_legacy_win_flag_with_full_guesses_becomes_loss() {
        let mut store = legacy_store(
            r#"[{"correctMovieID":"alpha","date":"2024-01-01","won":true,"guesses":["b","c","d","e","f"]}]"#,
        );
        migrate(&mut store).unwrap();

        let records = migrated_records(&store);
        assert_eq!(records[0].status, SessionStatus::Lost);
        assert_eq!(records[0].guess_count(), MAX_GUESSES);
    }

    #[test]
    fn test_legacy_loss_flag_with_answer_becomes_win() {
        let mut store = legacy_store(
            r#"[{"correctMovieID":"alpha","date":"2024-01-01","won":false,"guesses":["alpha","beta"]}]"#,
        );
        migrate(&mut store).unwrap();

        let records = migrated_records(&store);
        assert_eq!(records[0].status, SessionStatus::Won);
        assert_eq!(records[0].guesses, vec![GuessEntry::candidate("alpha")]);
    }

    #[test]
    fn test_legacy_missing_guesses() {
        let mut store = legacy_store(
            r#"[{"correctMovieID":"alpha","date":"2024-01-01","won":false,"guesses":null}]"#,
        );
        migrate(&mut store).unwrap();

        let records = migrated_records(&store);
        assert_eq!(records[0].status, SessionStatus::Lost);
        assert!(records[0].guesses.is_empty());
    }

    #[test]
    fn test_existing_records_are_kept_and_reconciled() {
        let mut store = MemoryStore::with_entries([(
            HISTORY_KEY,
            r#"[
                {"id":"gamma","date":"2024-01-03","status":"incomplete","guesses":["x"]},
                {"id":"delta","date":"2024-01-04","status":"won","guesses":["y"]},
                {"not":"a record"}
            ]"#,
        )]);
        let report = migrate(&mut store).unwrap().unwrap();
        assert_eq!(report.kept_records, 2);

        let records = migrated_records(&store);
        assert_eq!(records[0].status, SessionStatus::InProgress);
        assert_eq!(records[1].status, SessionStatus::Won);
        assert_eq!(
            records[1].guesses,
            vec![GuessEntry::candidate("y"), GuessEntry::candidate("delta")]
        );
    }

    #[test]
    fn test_already_current_is_noop() {
        let mut store = MemoryStore::with_entries([
            (VERSION_KEY, STORAGE_VERSION),
            (HISTORY_KEY, "garbage"),
        ]);
        assert_eq!(migrate(&mut store).unwrap(), None);
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("garbage"));
    }

    #[test]
    fn test_migration_is_idempotent() {
        let mut once = legacy_store(
            r#"[
                {"correctMovieID":"alpha","date":"2024-01-01","won":true,"guesses":["beta"]},
                {"correctMovieID":"beta","date":"2024-01-02","won":false,"guesses":["a","b","c","d","e","f"]}
            ]"#,
        );
        migrate(&mut once).unwrap();

        let mut twice = once.clone();
        assert_eq!(migrate(&mut twice).unwrap(), None);

        for key in [HISTORY_KEY, STATS_KEY, VERSION_KEY] {
            assert_eq!(once.get(key).unwrap(), twice.get(key).unwrap());
        }
    }

    #[test]
    fn test_reconcile_is_stable() {
        let mut record = SessionRecord::new("alpha", "2024-01-01");
        record.status = SessionStatus::Won;
        record.guesses = vec![GuessEntry::candidate("beta")];

        let once = reconcile(record, true);
        let flagged = once.status == SessionStatus::Won;
        let twice = reconcile(once.clone(), flagged);
        assert_eq!(once, twice);
    }
}
