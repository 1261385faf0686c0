use std::{cmp::Ordering, collections::BTreeSet};

use chrono::NaiveDate;
use spordcli::Error;
use spordcli::types::{AlbumArtist, DateBucket, ExternalUrls, Image, ReleaseCache, ReleaseItem};
use spordcli::utils::*;

// Helper function to create a test release
fn create_test_release(id: &str, name: &str, release_date: &str, album_type: &str) -> ReleaseItem {
    ReleaseItem {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![AlbumArtist {
            id: format!("{}_artist_id", id),
            name: format!("{} Artist", name),
        }],
        images: vec![Image {
            url: format!("https://i.scdn.co/image/{}", id),
            height: Some(640),
            width: Some(640),
        }],
        release_date: release_date.to_string(),
        release_date_precision: match release_date.len() {
            4 => "year",
            7 => "month",
            _ => "day",
        }
        .to_string(),
        album_type: album_type.to_string(),
        external_urls: ExternalUrls {
            spotify: Some(format!("https://open.spotify.com/album/{}", id)),
        },
        genres: None,
    }
}

fn with_genres(mut item: ReleaseItem, genres: &[&str]) -> ReleaseItem {
    item.genres = Some(genres.iter().map(|g| g.to_string()).collect());
    item
}

fn names(items: &[ReleaseItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

#[test]
fn test_filter_by_date_is_exact() {
    let items = vec![
        create_test_release("1", "Day", "2025-03-15", "album"),
        create_test_release("2", "Month", "2025-03", "album"),
        create_test_release("3", "Year", "2025", "single"),
        create_test_release("4", "Other Day", "2025-03-16", "single"),
    ];

    let filtered = filter_by_date(items, "2025-03-15");

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "1");
}

#[test]
fn test_classify_single_release() {
    let item = create_test_release("s1", "Only Single", "2025-01-10", "single");

    let bucket = classify(filter_by_date(vec![item.clone()], "2025-01-10"));

    assert_eq!(
        bucket,
        DateBucket {
            albums: vec![],
            singles: vec![item],
        }
    );
}

#[test]
fn test_classify_is_stable_and_drops_unknown_types() {
    let items = vec![
        create_test_release("1", "First Album", "2025-01-10", "album"),
        create_test_release("2", "First Single", "2025-01-10", "single"),
        create_test_release("3", "Compilation", "2025-01-10", "compilation"),
        create_test_release("4", "Second Album", "2025-01-10", "album"),
        create_test_release("5", "Second Single", "2025-01-10", "single"),
    ];
    let total = items.len();

    let bucket = classify(items);

    assert_eq!(names(&bucket.albums), vec!["First Album", "Second Album"]);
    assert_eq!(names(&bucket.singles), vec!["First Single", "Second Single"]);
    assert!(bucket.len() < total);
}

#[test]
fn test_classify_keeps_everything_when_all_types_known() {
    let items = vec![
        create_test_release("1", "A", "2025-01-10", "single"),
        create_test_release("2", "B", "2025-01-10", "album"),
    ];

    let bucket = classify(items);

    assert_eq!(bucket.len(), 2);
}

#[test]
fn test_residual_prefixes() {
    let searched: BTreeSet<char> = ('A'..='M').collect();

    let residual = residual_prefixes(&searched);

    assert_eq!(residual, ('N'..='Z').collect::<Vec<_>>());
    assert!(!is_fully_searched(&searched));
    assert!(is_fully_searched(&PREFIXES.iter().copied().collect()));
    assert_eq!(residual_prefixes(&BTreeSet::new()).len(), 26);
}

#[test]
fn test_parse_release_date() {
    assert_eq!(
        parse_release_date(Some("2025-01-10")).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    );
    assert!(matches!(parse_release_date(None), Err(Error::Validation(_))));
    assert!(matches!(parse_release_date(Some("  ")), Err(Error::Validation(_))));
    assert!(matches!(
        parse_release_date(Some("2025-13-01")),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        parse_release_date(Some("10.01.2025")),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_get_search_date() {
    let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

    assert_eq!(get_search_date(None, today).unwrap(), today);
    assert_eq!(
        get_search_date(Some("2024-12-31".to_string()), today).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    );
    assert!(matches!(
        get_search_date(Some("2025-01-11".to_string()), today),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_date_key_and_year() {
    let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
    assert_eq!(date_key(date), "2025-03-05");
    assert_eq!(year_of(date), 2025);
}

#[test]
fn test_sort_key_parsing() {
    assert_eq!("name-asc".parse::<SortKey>().unwrap(), SortKey::NameAsc);
    assert_eq!("Genre-Desc".parse::<SortKey>().unwrap(), SortKey::GenreDesc);
    assert!("size-asc".parse::<SortKey>().is_err());
    assert_eq!(SortKey::default(), SortKey::NameAsc);
    assert_eq!(SortKey::NameDesc.to_string(), "name-desc");
}

#[test]
fn test_locale_cmp() {
    assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
    assert_eq!(locale_cmp("Éclair", "eclairs"), Ordering::Less);
    assert_eq!(locale_cmp("Éclair", "zebra"), Ordering::Less);
    assert_eq!(locale_cmp("apple", "Apple"), Ordering::Less);
    assert_eq!(locale_cmp("Rock", "Jazz"), Ordering::Greater);
    assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
}

#[test]
fn test_sorted_view_by_name() {
    let mut cache = ReleaseCache::new();
    cache.insert(
        "2025-01-10".to_string(),
        DateBucket {
            albums: vec![
                create_test_release("1", "zebra", "2025-01-10", "album"),
                create_test_release("2", "Éclair", "2025-01-10", "album"),
                create_test_release("3", "apple", "2025-01-10", "album"),
                create_test_release("4", "Banana", "2025-01-10", "album"),
            ],
            singles: vec![],
        },
    );

    let asc = sorted_view(&cache, SortKey::NameAsc);
    let desc = sorted_view(&cache, SortKey::NameDesc);

    assert_eq!(
        names(&asc["2025-01-10"].albums),
        vec!["apple", "Banana", "Éclair", "zebra"]
    );
    assert_eq!(
        names(&desc["2025-01-10"].albums),
        vec!["zebra", "Éclair", "Banana", "apple"]
    );
    // the source cache keeps its order
    assert_eq!(
        names(&cache["2025-01-10"].albums),
        vec!["zebra", "Éclair", "apple", "Banana"]
    );
}

#[test]
fn test_sorted_view_by_genre() {
    let jazz = with_genres(
        create_test_release("j", "Jazz Album", "2025-01-10", "album"),
        &["Jazz"],
    );
    let rock = with_genres(
        create_test_release("r", "Rock Album", "2025-01-10", "album"),
        &["Rock"],
    );
    let mut cache = ReleaseCache::new();
    cache.insert(
        "2025-01-10".to_string(),
        DateBucket {
            albums: vec![jazz, rock],
            singles: vec![],
        },
    );

    let desc = sorted_view(&cache, SortKey::GenreDesc);
    let asc = sorted_view(&cache, SortKey::GenreAsc);

    assert_eq!(
        names(&desc["2025-01-10"].albums),
        vec!["Rock Album", "Jazz Album"]
    );
    assert_eq!(
        names(&asc["2025-01-10"].albums),
        vec!["Jazz Album", "Rock Album"]
    );
}

#[test]
fn test_primary_genre_placeholder() {
    let none = create_test_release("1", "No Genres", "2025-01-10", "album");
    let empty = with_genres(create_test_release("2", "Empty", "2025-01-10", "album"), &[]);
    let pop = with_genres(
        create_test_release("3", "Pop", "2025-01-10", "album"),
        &["Pop", "Dance"],
    );

    assert_eq!(primary_genre(&none), UNKNOWN_GENRE);
    assert_eq!(primary_genre(&empty), UNKNOWN_GENRE);
    assert_eq!(primary_genre(&pop), "Pop");

    // "Pop" < "Unknown"
    let mut cache = ReleaseCache::new();
    cache.insert(
        "2025-01-10".to_string(),
        DateBucket {
            albums: vec![],
            singles: vec![none, pop],
        },
    );
    let asc = sorted_view(&cache, SortKey::GenreAsc);
    assert_eq!(names(&asc["2025-01-10"].singles), vec!["Pop", "No Genres"]);
}

#[test]
fn test_bucket_merge_and_find() {
    let mut bucket = classify(vec![create_test_release("1", "A", "2025-01-10", "album")]);
    bucket.merge(classify(vec![
        create_test_release("2", "B", "2025-01-10", "album"),
        create_test_release("3", "C", "2025-01-10", "single"),
    ]));

    assert_eq!(names(&bucket.albums), vec!["A", "B"]);
    assert_eq!(bucket.find("3").map(|i| i.name.as_str()), Some("C"));
    assert!(bucket.find("4").is_none());
}

#[test]
fn test_release_item_deserializes_search_payload() {
    let json = serde_json::json!({
        "album_type": "single",
        "id": "4aawyAB9vmqN3uQ7FjRGTy",
        "name": "Global Warming",
        "release_date": "2012-11-16",
        "release_date_precision": "day",
        "artists": [{ "id": "0TnOYISbd1XYRBk9myaseg", "name": "Pitbull", "type": "artist" }],
        "images": [{ "url": "https://i.scdn.co/image/ab67616d0000b273", "height": 640, "width": 640 }],
        "external_urls": { "spotify": "https://open.spotify.com/album/4aawyAB9vmqN3uQ7FjRGTy" },
        "total_tracks": 1
    });

    let item: ReleaseItem = serde_json::from_value(json).unwrap();

    assert_eq!(item.first_artist(), Some("Pitbull"));
    assert_eq!(item.cover_url(), Some("https://i.scdn.co/image/ab67616d0000b273"));
    assert_eq!(item.album_type, "single");
    assert!(item.genres.is_none());
}
