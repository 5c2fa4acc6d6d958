//! Puzzle catalog: today's (or an archived) puzzle, its reviews, and the set
//! of dates that have a puzzle.

use std::collections::BTreeSet;
use std::thread;

use reqwest::{StatusCode, Url, blocking::Client};
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::{error::GameError, session::MAX_GUESSES};

/// The puzzle for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Puzzle {
    #[serde(alias = "movie", alias = "movieID")]
    pub id: String,
    pub date: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::session::lenient_string")]
    pub year: Option<String>,
    #[serde(rename = "posterLink", default)]
    pub poster_link: Option<String>,
}

impl Puzzle {
    pub fn new(id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            title: None,
            year: None,
            poster_link: None,
        }
    }

    /// Title and year for display, falling back to the id.
    pub fn display_name(&self) -> String {
        match (&self.title, &self.year) {
            (Some(title), Some(year)) => format!("{} ({})", title, year),
            (Some(title), None) => title.clone(),
            _ => self.id.clone(),
        }
    }
}

/// One user review shown as a clue.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub username: String,
    pub profile_photo_link: String,
    pub date: String,
    #[serde(deserialize_with = "rating")]
    pub rating: Option<f64>,
    pub liked: bool,
    pub text: String,
    pub collapsed: bool,
    #[serde(deserialize_with = "count")]
    pub num_likes: u64,
    #[serde(rename = "num_comments", deserialize_with = "count")]
    pub num_comments: u64,
    pub link: String,
}

impl Review {
    /// Rating as five star glyphs, half stars included.
    pub fn stars(&self) -> Option<String> {
        let rating = self.rating?;
        Some(
            (0..5)
                .map(|i| {
                    let i = i as f64;
                    if i + 1.0 <= rating {
                        '★'
                    } else if i < rating {
                        '⯪'
                    } else {
                        '☆'
                    }
                })
                .collect(),
        )
    }
}

fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.replace(',', "").trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Source of puzzles and their supporting reviews.
pub trait PuzzleCatalog {
    /// The puzzle for `date`, or the latest one when `None`.
    fn puzzle(&self, date: Option<&str>) -> Result<Puzzle, GameError>;

    /// The `index`-th review of a puzzle; `Ok(None)` when it doesn't exist.
    fn review(&self, puzzle: &Puzzle, index: usize) -> Result<Option<Review>, GameError>;

    /// Every date that has a puzzle.
    fn available_dates(&self) -> Result<BTreeSet<String>, GameError>;
}

/// Fetch up to [`MAX_GUESSES`] reviews in parallel, one scoped thread per
/// index. The calls are blocking; tokio is only used under `db`.
///
/// Missing or failed reviews are left out; the rest keep their index order.
pub fn fetch_reviews<C>(catalog: &C, puzzle: &Puzzle) -> Vec<Review>
where
    C: PuzzleCatalog + Sync + ?Sized,
{
    let results: Vec<Result<Option<Review>, GameError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..MAX_GUESSES)
            .map(|index| scope.spawn(move || catalog.review(puzzle, index)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(GameError::NetworkUnavailable("review fetch panicked".into())))
            })
            .collect()
    });

    results
        .into_iter()
        .enumerate()
        .filter_map(|(index, result)| match result {
            Ok(review) => review,
            Err(err) => {
                warn!(index, %err, "Review unavailable");
                None
            }
        })
        .collect()
}

#[derive(Deserialize)]
struct DatesManifest {
    #[serde(default)]
    dates: Vec<serde_json::Value>,
}

/// Normalize the `dates.json` manifest: trim entries, drop empties and non-strings.
pub fn parse_dates_manifest(body: &str) -> Result<BTreeSet<String>, GameError> {
    let manifest: DatesManifest = serde_json::from_str(body)?;
    Ok(manifest
        .dates
        .into_iter()
        .filter_map(|d| d.as_str().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .collect())
}

/// Catalog backed by the game server's HTTP API.
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GameError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn url_with_params(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, GameError> {
        let url = if params.is_empty() {
            Url::parse(&self.url(path))
        } else {
            Url::parse_with_params(&self.url(path), params)
        };
        url.map_err(|err| GameError::NetworkUnavailable(format!("bad url for {path}: {err}")))
    }
}

impl PuzzleCatalog for HttpCatalog {
    fn puzzle(&self, date: Option<&str>) -> Result<Puzzle, GameError> {
        let url = match date {
            Some(date) => self.url_with_params("/api/get-movie", &[("date", date)])?,
            None => self.url_with_params("/api/get-movie", &[])?,
        };

        let text = self.client.get(url).send()?.error_for_status()?.text()?;
        let puzzle: Puzzle = serde_json::from_str(&text)?;
        info!(puzzle_id = %puzzle.id, date = %puzzle.date, "Fetched puzzle");
        Ok(puzzle)
    }

    fn review(&self, puzzle: &Puzzle, index: usize) -> Result<Option<Review>, GameError> {
        let index = index.to_string();
        let url = self.url_with_params(
            "/api/json",
            &[
                ("date", puzzle.date.as_str()),
                ("name", puzzle.id.as_str()),
                ("index", index.as_str()),
            ],
        )?;
        let response = self.client.get(url).send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let text = response.error_for_status()?.text()?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn available_dates(&self) -> Result<BTreeSet<String>, GameError> {
        let text = self
            .client
            .get(self.url("/dates.json"))
            .send()?
            .error_for_status()?
            .text()?;
        parse_dates_manifest(&text)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory catalog for tests.
    #[derive(Default)]
    pub struct FakeCatalog {
        pub puzzles: Vec<Puzzle>,
        pub reviews: HashMap<(String, usize), Review>,
        pub failing_indexes: Vec<usize>,
    }

    impl FakeCatalog {
        pub fn with_puzzle(puzzle: Puzzle, review_count: usize) -> Self {
            let reviews = (0..review_count)
                .map(|i| {
                    (
                        (puzzle.id.clone(), i),
                        Review {
                            username: format!("user{i}"),
                            text: format!("review {i}"),
                            ..Default::default()
                        },
                    )
                })
                .collect();
            Self {
                puzzles: vec![puzzle],
                reviews,
                failing_indexes: Vec::new(),
            }
        }
    }

    impl PuzzleCatalog for FakeCatalog {
        fn puzzle(&self, date: Option<&str>) -> Result<Puzzle, GameError> {
            let found = match date {
                Some(date) => self.puzzles.iter().find(|p| p.date == date),
                None => self.puzzles.iter().max_by(|a, b| a.date.cmp(&b.date)),
            };
            found
                .cloned()
                .ok_or_else(|| GameError::NetworkUnavailable("no puzzle".into()))
        }

        fn review(&self, puzzle: &Puzzle, index: usize) -> Result<Option<Review>, GameError> {
            if self.failing_indexes.contains(&index) {
                return Err(GameError::NetworkUnavailable("timeout".into()));
            }
            Ok(self.reviews.get(&(puzzle.id.clone(), index)).cloned())
        }

        fn available_dates(&self) -> Result<BTreeSet<String>, GameError> {
            Ok(self.puzzles.iter().map(|p| p.date.clone()).collect())
        }
    }

    #[test]
    fn test_puzzle_accepts_server_and_client_field_names() {
        let from_server: Puzzle = serde_json::from_str(r#"{"movie":"alpha","date":"2024-01-01"}"#).unwrap();
        let from_client: Puzzle =
            serde_json::from_str(r#"{"movieID":"alpha","date":"2024-01-01","title":"Alpha","year":1999}"#).unwrap();

        assert_eq!(from_server.id, "alpha");
        assert_eq!(from_server.display_name(), "alpha");
        assert_eq!(from_client.display_name(), "Alpha (1999)");
    }

    #[test]
    fn test_review_parses_loose_fields() {
        let review: Review = serde_json::from_str(
            r#"{"username":"ann","rating":"3.5","liked":true,"text":"great","numLikes":"1,204","num_comments":7}"#,
        )
        .unwrap();

        assert_eq!(review.rating, Some(3.5));
        assert_eq!(review.num_likes, 1204);
        assert_eq!(review.num_comments, 7);
        assert_eq!(review.stars().as_deref(), Some("★★★⯪☆"));

        let unrated: Review = serde_json::from_str(r#"{"rating":""}"#).unwrap();
        assert_eq!(unrated.stars(), None);
    }

    #[test]
    fn test_fetch_reviews_skips_missing_and_failed() {
        let puzzle = Puzzle::new("alpha", "2024-01-01");
        let mut catalog = FakeCatalog::with_puzzle(puzzle.clone(), 4);
        catalog.failing_indexes.push(1);

        let reviews = fetch_reviews(&catalog, &puzzle);
        let names: Vec<&str> = reviews.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["user0", "user2", "user3"]);
    }

    #[test]
    fn test_parse_dates_manifest() {
        let dates = parse_dates_manifest(r#"{"dates":[" 2024-01-02 ","2024-01-01","",null,3]}"#).unwrap();
        assert_eq!(
            dates.into_iter().collect::<Vec<_>>(),
            vec!["2024-01-01".to_string(), "2024-01-02".to_string()]
        );

        assert!(parse_dates_manifest(r#"{}"#).unwrap().is_empty());
        assert!(parse_dates_manifest("nope").is_err());
    }

    #[test]
    fn test_http_catalog_trims_base_url() {
        let catalog = HttpCatalog::new("http://localhost:3000/").unwrap();
        assert_eq!(catalog.url("/dates.json"), "http://localhost:3000/dates.json");

        let url = catalog
            .url_with_params("/api/json", &[("date", "2024-01-01"), ("name", "the thing"), ("index", "2")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/json?date=2024-01-01&name=the+thing&index=2"
        );
    }
}
