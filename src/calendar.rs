//! Read model for the calendar and history screens.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate};

use crate::session::{GuessEntry, Outcome, SessionRecord, SessionStatus};

/// Number of history entries per page.
pub const PAGE_SIZE: usize = 10;

/// How a calendar day should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    NoPuzzle,
    Available,
    Won,
    Lost,
    Incomplete,
}

/// Status of `date` given the puzzle dates and the player's history.
pub fn day_status(date: &str, available: &BTreeSet<String>, history: &[SessionRecord]) -> DayStatus {
    if !available.contains(date) {
        return DayStatus::NoPuzzle;
    }

    let mut status = DayStatus::Available;
    for record in history.iter().filter(|r| r.puzzle_date == date) {
        match record.status {
            SessionStatus::Won => return DayStatus::Won,
            SessionStatus::Lost => status = DayStatus::Lost,
            SessionStatus::InProgress => {
                if status == DayStatus::Available {
                    status = DayStatus::Incomplete;
                }
            }
        }
    }
    status
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
}

pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 { (year - 1, 12) } else { (year, month - 1) }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 { (year + 1, 1) } else { (year, month + 1) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub status: DayStatus,
}

/// One month laid out for a Sunday-first grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st (Sunday = 0).
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl CalendarMonth {
    pub fn build(
        year: i32,
        month: u32,
        available: &BTreeSet<String>,
        history: &[SessionRecord],
    ) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let len = days_in_month(year, month)?;

        let days = (1..=len)
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .map(|date| CalendarDay {
                date,
                day: date.day(),
                status: day_status(&iso_date(date), available, history),
            })
            .collect();

        Some(Self {
            year,
            month,
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        })
    }

    pub fn previous(&self) -> (i32, u32) {
        previous_month(self.year, self.month)
    }

    pub fn next(&self) -> (i32, u32) {
        next_month(self.year, self.month)
    }

    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    /// Rows of seven cells; `None` pads before the 1st and after the last day.
    pub fn weeks(&self) -> Vec<Vec<Option<&CalendarDay>>> {
        let mut cells: Vec<Option<&CalendarDay>> = vec![None; self.leading_blanks as usize];
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells.chunks(7).map(|week| week.to_vec()).collect()
    }
}

/// The selected day on the calendar screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    selected: NaiveDate,
}

impl CalendarCursor {
    pub fn new(selected: NaiveDate) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn year_month(&self) -> (i32, u32) {
        (self.selected.year(), self.selected.month())
    }

    pub fn move_days(&mut self, delta: i64) {
        let moved = if delta >= 0 {
            self.selected.checked_add_days(Days::new(delta as u64))
        } else {
            self.selected.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.selected = date;
        }
    }

    /// Move by whole months, clamping the day to the target month's length.
    pub fn move_months(&mut self, delta: i32) {
        let index = self.selected.year() * 12 + self.selected.month0() as i32 + delta;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        let Some(len) = days_in_month(year, month) else {
            return;
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, self.selected.day().min(len)) {
            self.selected = date;
        }
    }
}

/// Pick a puzzle date the player hasn't finished yet.
pub fn random_unplayed_date(available: &BTreeSet<String>, history: &[SessionRecord]) -> Option<String> {
    let candidates: Vec<&String> = available
        .iter()
        .filter(|date| {
            !history
                .iter()
                .any(|r| &r.puzzle_date == *date && r.is_terminal())
        })
        .collect();

    if candidates.is_empty() {
        return None;
    }
    let index = rand::random_range(0..candidates.len());
    Some(candidates[index].clone())
}

/// How one guess went, for the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessDescription {
    Skipped,
    Correct(String),
    Incorrect(String),
}

impl GuessDescription {
    fn describe(&self) -> String {
        match self {
            GuessDescription::Skipped => "skipped".to_string(),
            GuessDescription::Correct(id) => format!("correctly guessed {}", id),
            GuessDescription::Incorrect(id) => format!("incorrectly guessed {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub puzzle_id: String,
    pub puzzle_date: String,
    pub outcome: Outcome,
    pub display_name: String,
    pub guesses: Vec<GuessDescription>,
}

impl HistoryEntry {
    fn from_record(record: &SessionRecord) -> Option<Self> {
        let outcome = record.outcome()?;
        let display_name = match (&record.title, &record.year) {
            (Some(title), Some(year)) => format!("{} ({})", title, year),
            (Some(title), None) => title.clone(),
            _ => record.puzzle_id.clone(),
        };
        let guesses = record
            .guesses
            .iter()
            .map(|g| match g {
                GuessEntry::Skip => GuessDescription::Skipped,
                GuessEntry::Candidate(id) if *id == record.puzzle_id => {
                    GuessDescription::Correct(id.clone())
                }
                GuessEntry::Candidate(id) => GuessDescription::Incorrect(id.clone()),
            })
            .collect();

        Some(Self {
            puzzle_id: record.puzzle_id.clone(),
            puzzle_date: record.puzzle_date.clone(),
            outcome,
            display_name,
            guesses,
        })
    }

    pub fn headline(&self) -> String {
        format!("{}: {}", format_date(&self.puzzle_date), self.display_name)
    }

    /// "You won with 2 guesses: skipped and correctly guessed alpha."
    pub fn summary(&self) -> String {
        let result = match self.outcome {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
        };

        if self.guesses.iter().all(|g| *g == GuessDescription::Skipped) {
            return format!("You {} and did not guess any movies.", result);
        }

        let parts: Vec<String> = self.guesses.iter().map(GuessDescription::describe).collect();
        let listed = match parts.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
            _ => parts.join(""),
        };
        let noun = if self.guesses.len() == 1 { "guess" } else { "guesses" };

        format!("You {} with {} {}: {}.", result, self.guesses.len(), noun, listed)
    }
}

/// Finished sessions, newest puzzle date first.
pub fn history_entries(history: &[SessionRecord]) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = history.iter().filter_map(HistoryEntry::from_record).collect();
    entries.sort_by(|a, b| b.puzzle_date.cmp(&a.puzzle_date));
    entries
}

/// Finished sessions split into pages of [`PAGE_SIZE`].
#[derive(Debug, Clone, Default)]
pub struct HistoryPage {
    entries: Vec<HistoryEntry>,
}

impl HistoryPage {
    pub fn from_records(history: &[SessionRecord]) -> Self {
        Self {
            entries: history_entries(history),
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn total_pages(&self) -> usize {
        if self.entries.is_empty() {
            1
        } else {
            self.entries.len().div_ceil(PAGE_SIZE)
        }
    }

    /// Entries on page `n` (0-indexed); empty past the end.
    pub fn page(&self, n: usize) -> &[HistoryEntry] {
        let start = n * PAGE_SIZE;
        if start >= self.entries.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(self.entries.len());
        &self.entries[start..end]
    }
}

/// "2024-01-01" -> "January 1st, 2024". Unparseable dates come back as given.
pub fn format_date(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        Ok(date) => format!(
            "{} {}{}, {}",
            date.format("%B"),
            date.day(),
            ordinal_suffix(date.day()),
            date.year()
        ),
        Err(_) => iso.to_string(),
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    if (4..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, id: &str, status: SessionStatus, guesses: &[GuessEntry]) -> SessionRecord {
        let mut r = SessionRecord::new(id, date);
        r.status = status;
        r.guesses = guesses.to_vec();
        r
    }

    fn dates(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|d| d.to_string()).collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_status() {
        let available = dates(&["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"]);
        let history = vec![
            record("2024-01-01", "a", SessionStatus::Won, &[GuessEntry::candidate("a")]),
            record("2024-01-02", "b", SessionStatus::Lost, &[]),
            record("2024-01-03", "c", SessionStatus::InProgress, &[GuessEntry::Skip]),
            record("2024-01-09", "z", SessionStatus::Won, &[]),
        ];

        assert_eq!(day_status("2024-01-01", &available, &history), DayStatus::Won);
        assert_eq!(day_status("2024-01-02", &available, &history), DayStatus::Lost);
        assert_eq!(day_status("2024-01-03", &available, &history), DayStatus::Incomplete);
        assert_eq!(day_status("2024-01-04", &available, &history), DayStatus::Available);
        assert_eq!(day_status("2024-01-09", &available, &history), DayStatus::NoPuzzle);
    }

    #[test]
    fn test_won_beats_other_records_on_same_date() {
        let available = dates(&["2024-01-01"]);
        let history = vec![
            record("2024-01-01", "a", SessionStatus::InProgress, &[]),
            record("2024-01-01", "b", SessionStatus::Lost, &[]),
            record("2024-01-01", "c", SessionStatus::Won, &[]),
        ];
        assert_eq!(day_status("2024-01-01", &available, &history), DayStatus::Won);
    }

    #[test]
    fn test_month_layout() {
        // January 2024 starts on a Monday.
        let month = CalendarMonth::build(2024, 1, &dates(&["2024-01-15"]), &[]).unwrap();
        assert_eq!(month.leading_blanks, 1);
        assert_eq!(month.days.len(), 31);
        assert_eq!(month.days[14].status, DayStatus::Available);
        assert_eq!(month.days[0].status, DayStatus::NoPuzzle);
        assert_eq!(month.title(), "January 2024");
        assert_eq!(month.previous(), (2023, 12));
        assert_eq!(month.next(), (2024, 2));

        let weeks = month.weeks();
        assert_eq!(weeks.len(), 5);
        assert!(weeks.iter().all(|w| w.len() == 7));
        assert!(weeks[0][0].is_none());
        assert_eq!(weeks[0][1].unwrap().day, 1);

        assert!(CalendarMonth::build(2024, 13, &BTreeSet::new(), &[]).is_none());
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        assert_eq!(previous_month(2024, 1), (2023, 12));
        assert_eq!(next_month(2024, 12), (2025, 1));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
    }

    #[test]
    fn test_cursor_moves() {
        let mut cursor = CalendarCursor::new(ymd(2024, 1, 31));
        cursor.move_months(1);
        assert_eq!(cursor.selected(), ymd(2024, 2, 29));

        cursor.move_months(-2);
        assert_eq!(cursor.selected(), ymd(2023, 12, 29));

        cursor.move_days(7);
        assert_eq!(cursor.selected(), ymd(2024, 1, 5));
        assert_eq!(cursor.year_month(), (2024, 1));

        cursor.move_days(-5);
        assert_eq!(cursor.selected(), ymd(2023, 12, 31));
    }

    #[test]
    fn test_history_entries_sorted_newest_first() {
        let history = vec![
            record("2024-01-02", "b", SessionStatus::Lost, &vec![GuessEntry::Skip; 5]),
            record("2024-01-03", "c", SessionStatus::InProgress, &[]),
            record(
                "2024-01-05",
                "e",
                SessionStatus::Won,
                &[GuessEntry::Skip, GuessEntry::candidate("x"), GuessEntry::candidate("e")],
            ),
            record("2024-01-01", "a", SessionStatus::Won, &[GuessEntry::candidate("a")]),
        ];

        let entries = history_entries(&history);
        let ids: Vec<&str> = entries.iter().map(|e| e.puzzle_id.as_str()).collect();
        assert_eq!(ids, vec!["e", "b", "a"]);

        assert_eq!(
            entries[0].guesses,
            vec![
                GuessDescription::Skipped,
                GuessDescription::Incorrect("x".into()),
                GuessDescription::Correct("e".into()),
            ]
        );
        assert_eq!(
            entries[0].summary(),
            "You won with 3 guesses: skipped, incorrectly guessed x and correctly guessed e."
        );
        assert_eq!(entries[1].summary(), "You lost and did not guess any movies.");
        assert_eq!(entries[2].summary(), "You won with 1 guess: correctly guessed a.");
        assert_eq!(entries[2].headline(), "January 1st, 2024: a");
    }

    #[test]
    fn test_pagination() {
        let history: Vec<SessionRecord> = (1..=23)
            .map(|d| record(&format!("2024-01-{:02}", d), &format!("p{d}"), SessionStatus::Lost, &[]))
            .collect();
        let pages = HistoryPage::from_records(&history);

        assert_eq!(pages.total_pages(), 3);
        assert_eq!(pages.page(0).len(), 10);
        assert_eq!(pages.page(2).len(), 3);
        assert!(pages.page(3).is_empty());
        assert_eq!(pages.page(0)[0].puzzle_date, "2024-01-23");

        assert_eq!(HistoryPage::from_records(&[]).total_pages(), 1);
    }

    #[test]
    fn test_format_date_ordinals() {
        assert_eq!(format_date("2024-03-02"), "March 2nd, 2024");
        assert_eq!(format_date("2024-03-03"), "March 3rd, 2024");
        assert_eq!(format_date("2024-03-11"), "March 11th, 2024");
        assert_eq!(format_date("2024-03-13"), "March 13th, 2024");
        assert_eq!(format_date("2024-03-21"), "March 21st, 2024");
        assert_eq!(format_date("2024-03-22"), "March 22nd, 2024");
        assert_eq!(format_date("someday"), "someday");
    }

    #[test]
    fn test_random_unplayed_date() {
        let available = dates(&["2024-01-01", "2024-01-02", "2024-01-03"]);
        let history = vec![
            record("2024-01-01", "a", SessionStatus::Won, &[]),
            record("2024-01-03", "c", SessionStatus::Lost, &[]),
        ];

        for _ in 0..20 {
            assert_eq!(
                random_unplayed_date(&available, &history).as_deref(),
                Some("2024-01-02")
            );
        }

        let all_played = vec![
            record("2024-01-01", "a", SessionStatus::Won, &[]),
            record("2024-01-02", "b", SessionStatus::Won, &[]),
            record("2024-01-03", "c", SessionStatus::Lost, &[]),
        ];
        assert_eq!(random_unplayed_date(&available, &all_played), None);
    }
}
