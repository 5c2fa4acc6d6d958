//! Statistics derived from the session history.
//!
//! Every value here is recomputed from the records on demand. In-progress
//! sessions never count.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::session::{MAX_GUESSES, SessionRecord, SessionStatus};

/// Direction of the current streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakKind {
    Win,
    Loss,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Streak {
    pub count: usize,
    pub kind: StreakKind,
}

impl Streak {
    pub const NONE: Streak = Streak {
        count: 0,
        kind: StreakKind::None,
    };
}

fn finished(records: &[SessionRecord]) -> impl Iterator<Item = &SessionRecord> {
    records.iter().filter(|r| r.is_terminal())
}

fn wins(records: &[SessionRecord]) -> impl Iterator<Item = &SessionRecord> {
    records.iter().filter(|r| r.status == SessionStatus::Won)
}

/// Finished records sorted by puzzle date, oldest first. Ties keep history order.
fn by_date(records: &[SessionRecord]) -> Vec<&SessionRecord> {
    let mut sorted: Vec<&SessionRecord> = finished(records).collect();
    sorted.sort_by(|a, b| a.puzzle_date.cmp(&b.puzzle_date));
    sorted
}

/// Percentage of finished sessions that were won, rounded.
pub fn win_rate(records: &[SessionRecord]) -> u32 {
    let total = finished(records).count();
    if total == 0 {
        return 0;
    }
    let won = wins(records).count();
    (100.0 * won as f64 / total as f64).round() as u32
}

pub fn average_guesses_on_win(records: &[SessionRecord]) -> Option<f64> {
    let (count, total) = wins(records).fold((0usize, 0usize), |(c, t), r| (c + 1, t + r.guess_count()));
    if count == 0 {
        None
    } else {
        Some(total as f64 / count as f64)
    }
}

/// Run of identical outcomes ending at the most recent puzzle date.
pub fn current_streak(records: &[SessionRecord]) -> Streak {
    let sorted = by_date(records);
    let mut newest_first = sorted.iter().rev();

    let Some(latest) = newest_first.next() else {
        return Streak::NONE;
    };

    let count = 1 + newest_first
        .take_while(|r| r.status == latest.status)
        .count();
    let kind = if latest.status == SessionStatus::Won {
        StreakKind::Win
    } else {
        StreakKind::Loss
    };

    Streak { count, kind }
}

pub fn longest_win_streak(records: &[SessionRecord]) -> usize {
    let mut best = 0;
    let mut current = 0;
    for record in by_date(records) {
        if record.status == SessionStatus::Won {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// The candidate guessed most often, if any was guessed more than once.
pub fn most_guessed_candidate(records: &[SessionRecord]) -> Option<String> {
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    let mut most: Option<&str> = None;
    let mut max_count = 0;

    for id in finished(records).flat_map(|r| r.guesses.iter().filter_map(|g| g.candidate_id())) {
        let count = frequency.entry(id).or_insert(0);
        *count += 1;
        if *count > max_count {
            max_count = *count;
            most = Some(id);
        }
    }

    if max_count <= 1 {
        None
    } else {
        most.map(str::to_string)
    }
}

pub fn unique_candidates_guessed(records: &[SessionRecord]) -> usize {
    finished(records)
        .flat_map(|r| r.guesses.iter().filter_map(|g| g.candidate_id()))
        .collect::<HashSet<_>>()
        .len()
}

pub fn fewest_guesses_in_a_win(records: &[SessionRecord]) -> Option<usize> {
    wins(records).map(SessionRecord::guess_count).min()
}

pub fn most_guesses_in_a_win(records: &[SessionRecord]) -> Option<usize> {
    wins(records).map(SessionRecord::guess_count).max()
}

/// Everything the stats screen shows, computed in one pass over history.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsSnapshot {
    pub games_finished: usize,
    pub games_won: usize,
    pub games_lost: usize,
    pub win_rate: u32,
    pub average_guesses_on_win: Option<f64>,
    pub average_guesses: Option<f64>,
    pub current_streak: Streak,
    pub longest_win_streak: usize,
    pub most_guessed_candidate: Option<String>,
    pub unique_candidates_guessed: usize,
    pub fewest_guesses_in_a_win: Option<usize>,
    pub slowest_win: Option<usize>,
    /// Wins by number of guesses used (index 0 = first guess).
    pub guess_distribution: [usize; MAX_GUESSES],
}

impl StatisticsSnapshot {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let games_finished = finished(records).count();
        let games_won = wins(records).count();

        let average_guesses = if games_finished == 0 {
            None
        } else {
            let total: usize = finished(records).map(SessionRecord::guess_count).sum();
            Some(total as f64 / games_finished as f64)
        };

        let mut guess_distribution = [0; MAX_GUESSES];
        for record in wins(records) {
            let n = record.guess_count();
            if (1..=MAX_GUESSES).contains(&n) {
                guess_distribution[n - 1] += 1;
            }
        }

        Self {
            games_finished,
            games_won,
            games_lost: games_finished - games_won,
            win_rate: win_rate(records),
            average_guesses_on_win: average_guesses_on_win(records),
            average_guesses,
            current_streak: current_streak(records),
            longest_win_streak: longest_win_streak(records),
            most_guessed_candidate: most_guessed_candidate(records),
            unique_candidates_guessed: unique_candidates_guessed(records),
            fewest_guesses_in_a_win: fewest_guesses_in_a_win(records),
            slowest_win: most_guesses_in_a_win(records),
            guess_distribution,
        }
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            games_finished: self.games_finished,
            games_won: self.games_won,
            games_lost: self.games_lost,
            fastest_win: self.fewest_guesses_in_a_win,
            slowest_win: self.slowest_win,
            average_guesses: self.average_guesses,
            win_percentage: self.win_rate,
        }
    }
}

/// Cached summary written next to the history under `gameStats`.
///
/// It is a projection of [`StatisticsSnapshot`] and is never read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub games_finished: usize,
    pub games_won: usize,
    pub games_lost: usize,
    pub fastest_win: Option<usize>,
    pub slowest_win: Option<usize>,
    pub average_guesses: Option<f64>,
    pub win_percentage: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GuessEntry;

    fn record(date: &str, id: &str, status: SessionStatus, guesses: &[&str]) -> SessionRecord {
        let mut r = SessionRecord::new(id, date);
        r.status = status;
        r.guesses = guesses
            .iter()
            .map(|g| GuessEntry::from(g.to_string()))
            .collect();
        r
    }

    fn won(date: &str, id: &str) -> SessionRecord {
        record(date, id, SessionStatus::Won, &[id])
    }

    fn lost(date: &str, id: &str) -> SessionRecord {
        record(date, id, SessionStatus::Lost, &["x", "y", "z", "w", "v"])
    }

    #[test]
    fn test_empty_history() {
        let records: Vec<SessionRecord> = Vec::new();

        assert_eq!(win_rate(&records), 0);
        assert_eq!(average_guesses_on_win(&records), None);
        assert_eq!(current_streak(&records), Streak::NONE);
        assert_eq!(longest_win_streak(&records), 0);
        assert_eq!(most_guessed_candidate(&records), None);
        assert_eq!(unique_candidates_guessed(&records), 0);
        assert_eq!(fewest_guesses_in_a_win(&records), None);
    }

    #[test]
    fn test_streaks_follow_puzzle_date() {
        let records = vec![
            won("2024-01-01", "a"),
            lost("2024-01-02", "b"),
            won("2024-01-03", "c"),
        ];

        assert_eq!(longest_win_streak(&records), 1);
        assert_eq!(
            current_streak(&records),
            Streak {
                count: 1,
                kind: StreakKind::Win
            }
        );
    }

    #[test]
    fn test_current_streak_ignores_insertion_order() {
        // Archive puzzle from 01-01 finished last.
        let records = vec![
            lost("2024-01-03", "c"),
            lost("2024-01-02", "b"),
            won("2024-01-01", "a"),
        ];

        assert_eq!(
            current_streak(&records),
            Streak {
                count: 2,
                kind: StreakKind::Loss
            }
        );
    }

    #[test]
    fn test_in_progress_records_excluded() {
        let records = vec![
            won("2024-01-01", "a"),
            record("2024-01-02", "b", SessionStatus::InProgress, &["b2", "b2"]),
        ];

        assert_eq!(win_rate(&records), 100);
        assert_eq!(current_streak(&records).kind, StreakKind::Win);
        assert_eq!(most_guessed_candidate(&records), None);
        assert_eq!(unique_candidates_guessed(&records), 1);
    }

    #[test]
    fn test_win_rate_rounds() {
        let records = vec![
            won("2024-01-01", "a"),
            lost("2024-01-02", "b"),
            lost("2024-01-03", "c"),
        ];
        assert_eq!(win_rate(&records), 33);

        let records = vec![won("2024-01-01", "a"), won("2024-01-02", "b"), lost("2024-01-03", "c")];
        assert_eq!(win_rate(&records), 67);
    }

    #[test]
    fn test_guess_counts_on_wins() {
        let records = vec![
            record("2024-01-01", "a", SessionStatus::Won, &["__SKIPPED__", "a"]),
            record("2024-01-02", "b", SessionStatus::Won, &["x", "y", "b"]),
            record("2024-01-03", "c", SessionStatus::Won, &["c"]),
            lost("2024-01-04", "d"),
        ];

        assert_eq!(average_guesses_on_win(&records), Some(2.0));
        assert_eq!(fewest_guesses_in_a_win(&records), Some(1));
        assert_eq!(most_guesses_in_a_win(&records), Some(3));
    }

    #[test]
    fn test_most_guessed_candidate_skips_sentinel() {
        let records = vec![
            record("2024-01-01", "a", SessionStatus::Lost, &["__SKIPPED__", "__SKIPPED__", "__SKIPPED__", "m", "__SKIPPED__"]),
            record("2024-01-02", "b", SessionStatus::Won, &["n", "m", "b"]),
        ];

        assert_eq!(most_guessed_candidate(&records).as_deref(), Some("m"));
        assert_eq!(unique_candidates_guessed(&records), 3);
    }

    #[test]
    fn test_single_occurrence_is_not_most_guessed() {
        let records = vec![record("2024-01-01", "a", SessionStatus::Won, &["m", "n", "a"])];
        assert_eq!(most_guessed_candidate(&records), None);
    }

    #[test]
    fn test_snapshot_distribution_and_summary() {
        let records = vec![
            record("2024-01-01", "a", SessionStatus::Won, &["a"]),
            record("2024-01-02", "b", SessionStatus::Won, &["x", "b"]),
            record("2024-01-03", "c", SessionStatus::Won, &["y", "c"]),
            lost("2024-01-04", "d"),
        ];
        let snapshot = StatisticsSnapshot::from_records(&records);

        assert_eq!(snapshot.games_finished, 4);
        assert_eq!(snapshot.games_won, 3);
        assert_eq!(snapshot.games_lost, 1);
        assert_eq!(snapshot.guess_distribution, [1, 2, 0, 0, 0]);
        assert_eq!(snapshot.average_guesses, Some(10.0 / 4.0));

        let summary = snapshot.summary();
        assert_eq!(summary.win_percentage, 75);
        assert_eq!(summary.fastest_win, Some(1));
        assert_eq!(summary.slowest_win, Some(2));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["gamesFinished"], 4);
        assert_eq!(json["winPercentage"], 75);
    }

    #[test]
    fn test_win_rate_matches_recount_on_random_histories() {
        for _ in 0..200 {
            let len = rand::random_range(0..40);
            let records: Vec<SessionRecord> = (0..len)
                .map(|i| {
                    let date = format!("2024-02-{:02}", 1 + i % 28);
                    let status = match rand::random_range(0..3) {
                        0 => SessionStatus::Won,
                        1 => SessionStatus::Lost,
                        _ => SessionStatus::InProgress,
                    };
                    record(&date, &format!("p{i}"), status, &["g"])
                })
                .collect();

            let won = records.iter().filter(|r| r.status == SessionStatus::Won).count();
            let total = records.iter().filter(|r| r.is_terminal()).count();
            let expected = if total == 0 {
                0
            } else {
                (100.0 * won as f64 / total as f64).round() as u32
            };

            assert_eq!(win_rate(&records), expected);
            assert_eq!(StatisticsSnapshot::from_records(&records).win_rate, expected);
        }
    }
}
