use std::path::PathBuf;

use crate::{
    error, export as html,
    management::{ReleaseStore, StoreMode},
    success,
    types::DateBucket,
    utils,
};

use super::{AnyStore, close_store, open_store};

async fn cached_bucket<S: ReleaseStore>(store: &mut S, date: &str) -> Option<DateBucket> {
    let bucket = match store.bucket(date).await {
        Ok(bucket) => bucket,
        Err(e) => error!("Cannot read release cache: {}", e),
    };
    close_store(store).await;
    bucket
}

/// Saves the cached releases of one date as a standalone HTML page.
///
/// # Arguments
///
/// * `release_date` - Date to export, today when omitted
/// * `output` - Target directory, the current directory when omitted
/// * `store` - Release store to read from, the configured one when omitted
///
/// # Example Usage
///
/// ```bash
/// spordcli export --date 2025-01-10 --output ~/Downloads
/// ```
pub async fn export(
    release_date: Option<String>,
    output: Option<PathBuf>,
    store: Option<StoreMode>,
) {
    let date = match utils::get_search_date(release_date, utils::today()) {
        Ok(date) => utils::date_key(date),
        Err(e) => error!("{}", e),
    };

    let bucket = match open_store(store).await {
        AnyStore::Remote(mut s) => cached_bucket(&mut s, &date).await,
        AnyStore::Local(mut s) => cached_bucket(&mut s, &date).await,
    };
    let Some(bucket) = bucket else {
        error!(
            "No releases cached for {}. Run spordcli releases --date {} first.",
            date, date
        );
    };

    let dir = output.unwrap_or_else(|| PathBuf::from("."));
    match html::write_html(&dir, &date, &bucket).await {
        Ok(path) => success!("Saved {}.", path.display()),
        Err(e) => error!("{}", e),
    }
}
