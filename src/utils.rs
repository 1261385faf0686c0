use std::{cmp::Ordering, collections::BTreeSet, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate, Utc};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{
    Error, Res,
    types::{ALBUM_TYPE_ALBUM, ALBUM_TYPE_SINGLE, DateBucket, ReleaseCache, ReleaseItem},
};

/// Letters searched for every date, in search order.
pub const PREFIXES: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Placeholder genre for releases that list none.
pub const UNKNOWN_GENRE: &str = "Unknown";

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parses a `YYYY-MM-DD` release date.
///
/// A missing or malformed date is a [`Error::Validation`].
pub fn parse_release_date(date: Option<&str>) -> Res<NaiveDate> {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return Err(Error::Validation("Please enter a date.".to_string()));
    };

    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
        Error::Validation(format!("Invalid date {date}, expected YYYY-MM-DD: {e}"))
    })
}

/// Parses a date for a search, falling back to `today` and refusing dates after it.
pub fn get_search_date(date: Option<String>, today: NaiveDate) -> Res<NaiveDate> {
    let date = match date {
        Some(d) => parse_release_date(Some(&d))?,
        None => today,
    };

    if date > today {
        return Err(Error::Validation(format!(
            "{date} lies in the future, pick {today} or earlier."
        )));
    }
    Ok(date)
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn year_of(date: NaiveDate) -> i32 {
    date.year()
}

/// Keeps the items released exactly on `date`.
///
/// Items with year or month precision (`2025`, `2025-03`) never match a full date.
pub fn filter_by_date(items: Vec<ReleaseItem>, date: &str) -> Vec<ReleaseItem> {
    items
        .into_iter()
        .filter(|item| item.release_date == date)
        .collect()
}

/// Splits items into albums and singles, preserving their order.
///
/// Items of any other type (e.g. compilations) are dropped.
pub fn classify(items: Vec<ReleaseItem>) -> DateBucket {
    let mut bucket = DateBucket::default();
    for item in items {
        match item.album_type.as_str() {
            ALBUM_TYPE_ALBUM => bucket.albums.push(item),
            ALBUM_TYPE_SINGLE => bucket.singles.push(item),
            _ => {}
        }
    }
    bucket
}

/// Prefixes not yet in `searched`, in alphabetical order.
pub fn residual_prefixes(searched: &BTreeSet<char>) -> Vec<char> {
    PREFIXES
        .iter()
        .copied()
        .filter(|p| !searched.contains(p))
        .collect()
}

pub fn is_fully_searched(searched: &BTreeSet<char>) -> bool {
    PREFIXES.iter().all(|p| searched.contains(p))
}

/// Orderings offered for displaying cached releases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    GenreAsc,
    GenreDesc,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name-asc" => Ok(SortKey::NameAsc),
            "name-desc" => Ok(SortKey::NameDesc),
            "genre-asc" => Ok(SortKey::GenreAsc),
            "genre-desc" => Ok(SortKey::GenreDesc),
            other => Err(Error::Validation(format!(
                "Unknown sort order '{other}'. Use name-asc, name-desc, genre-asc or genre-desc."
            ))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::GenreAsc => "genre-asc",
            SortKey::GenreDesc => "genre-desc",
        };
        write!(f, "{s}")
    }
}

pub fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    s.parse::<SortKey>().map_err(|e| e.to_string())
}

/// First listed genre, or [`UNKNOWN_GENRE`].
pub fn primary_genre(item: &ReleaseItem) -> &str {
    item.genres
        .as_ref()
        .and_then(|g| g.first())
        .map(String::as_str)
        .unwrap_or(UNKNOWN_GENRE)
}

fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn accented_letters(s: &str) -> String {
    s.nfd().flat_map(char::to_lowercase).collect()
}

/// Compares two strings the way a user-facing collation orders them.
///
/// Letters compare without regard to accents and case first, so `"apple"`
/// sorts before `"Banana"` and `"Éclair"` next to `"eclair"`. Ties are broken
/// by accents, then lowercase before uppercase, then code points.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| accented_letters(a).cmp(&accented_letters(b)))
        .then_with(|| {
            let a_case = a.chars().map(char::is_uppercase);
            let b_case = b.chars().map(char::is_uppercase);
            a_case.cmp(b_case)
        })
        .then_with(|| a.cmp(b))
}

pub fn compare_items(a: &ReleaseItem, b: &ReleaseItem, key: SortKey) -> Ordering {
    match key {
        SortKey::NameAsc => locale_cmp(&a.name, &b.name),
        SortKey::NameDesc => locale_cmp(&b.name, &a.name),
        SortKey::GenreAsc => locale_cmp(primary_genre(a), primary_genre(b)),
        SortKey::GenreDesc => locale_cmp(primary_genre(b), primary_genre(a)),
    }
}

/// Returns a re-ordered copy of a bucket.
pub fn sorted_bucket(bucket: &DateBucket, key: SortKey) -> DateBucket {
    let mut albums = bucket.albums.clone();
    let mut singles = bucket.singles.clone();
    albums.sort_by(|a, b| compare_items(a, b, key));
    singles.sort_by(|a, b| compare_items(a, b, key));
    DateBucket { albums, singles }
}

/// Returns a re-ordered copy of every bucket in `cache`. `cache` is left as is.
pub fn sorted_view(cache: &ReleaseCache, key: SortKey) -> ReleaseCache {
    cache
        .iter()
        .map(|(date, bucket)| (date.clone(), sorted_bucket(bucket, key)))
        .collect()
}
