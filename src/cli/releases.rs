use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Mutex;

use crate::{
    aggregator::{BucketSource, DateAggregator, Notice},
    error, info,
    management::{ReleaseStore, StoreMode},
    spotify::SpotifyClient,
    success,
    utils::{self, SortKey},
    warning,
};

use super::{AnyStore, close_store, like_store, open_store, print_bucket};

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Shows the releases of one date, searching the catalog when the cache
/// cannot answer.
///
/// # Arguments
///
/// * `release_date` - Date to show (`YYYY-MM-DD`), today when omitted
/// * `sort` - Order of albums and singles in the output
/// * `store` - Release store to use, the configured one when omitted
///
/// # Example Usage
///
/// ```bash
/// # Today's releases
/// spordcli releases
///
/// # A past date, newest names last
/// spordcli releases --date 2025-01-10 --sort name-desc
/// ```
pub async fn releases(release_date: Option<String>, sort: SortKey, store: Option<StoreMode>) {
    let date = match utils::get_search_date(release_date, utils::today()) {
        Ok(date) => utils::date_key(date),
        Err(e) => error!("{}", e),
    };

    let catalog = match SpotifyClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    match open_store(store).await {
        AnyStore::Remote(s) => search(catalog, s, &date, sort).await,
        AnyStore::Local(s) => search(catalog, s, &date, sort).await,
    }
}

async fn search<S: ReleaseStore>(catalog: SpotifyClient, store: S, date: &str, sort: SortKey) {
    let store = Arc::new(Mutex::new(store));
    let aggregator =
        DateAggregator::new(Arc::new(catalog), Arc::clone(&store)).with_progress(spinner());

    let report = match aggregator.aggregate(Some(date)).await {
        Ok(report) => report,
        Err(e) => error!("{}", e),
    };

    for notice in &report.notices {
        match notice {
            Notice::NoReleases { .. } => info!("{}", notice),
            _ => warning!("{}", notice),
        }
    }

    match report.source {
        BucketSource::Cache => info!("Releases for {} loaded from cache.", report.date),
        BucketSource::Catalog => success!(
            "Searched {} prefixes, found {} releases for {}.",
            report.searched.len(),
            report.bucket.len(),
            report.date
        ),
    }

    let likes = like_store();
    print_bucket(
        &report.date,
        &utils::sorted_bucket(&report.bucket, sort),
        likes.as_ref(),
    );

    close_store(&mut *store.lock().await).await;
}

/// Shows every cached date, oldest first.
pub async fn list_releases(sort: SortKey, store: Option<StoreMode>) {
    let cache = match open_store(store).await {
        AnyStore::Remote(mut s) => load_all(&mut s).await,
        AnyStore::Local(mut s) => load_all(&mut s).await,
    };

    if cache.is_empty() {
        info!("No releases cached yet. Run spordcli releases --date YYYY-MM-DD.");
        return;
    }

    let likes = like_store();
    for (date, bucket) in utils::sorted_view(&cache, sort) {
        print_bucket(&date, &bucket, likes.as_ref());
    }
}

async fn load_all<S: ReleaseStore>(store: &mut S) -> crate::types::ReleaseCache {
    let cache = match store.all().await {
        Ok(cache) => cache,
        Err(e) => error!("Cannot read release cache: {}", e),
    };
    close_store(store).await;
    cache
}
