use crate::{
    config, error, info,
    management::{LikeState, LikeStore, ReleaseStore, StoreMode},
    success,
    types::{ReleaseCache, ReleaseItem},
};

use super::{AnyStore, close_store, open_store, print_items, require_session};

async fn find_release<S: ReleaseStore>(
    store: &mut S,
    id: &str,
    date: Option<&str>,
) -> Option<ReleaseItem> {
    let cache: ReleaseCache = match store.all().await {
        Ok(cache) => cache,
        Err(e) => error!("Cannot read release cache: {}", e),
    };
    close_store(store).await;

    cache
        .iter()
        .filter(|(d, _)| date.is_none_or(|wanted| wanted == d.as_str()))
        .find_map(|(_, bucket)| bucket.find(id).cloned())
}

/// Likes a cached release, or removes the like when it is already liked.
///
/// # Example Usage
///
/// ```bash
/// spordcli like 4aawyAB9vmqN3uQ7FjRGTy --date 2025-01-10
/// ```
pub async fn like(id: String, release_date: Option<String>, store: Option<StoreMode>) {
    let session = require_session();
    let likes = LikeStore::new(&config::data_dir(), &session);

    let item = match open_store(store).await {
        AnyStore::Remote(mut s) => find_release(&mut s, &id, release_date.as_deref()).await,
        AnyStore::Local(mut s) => find_release(&mut s, &id, release_date.as_deref()).await,
    };
    let Some(item) = item else {
        error!("Release {} is not in the cache. Search its date first.", id);
    };

    match likes.toggle(&item).await {
        Ok(LikeState::Liked) => success!("Liked {}.", item.name),
        Ok(LikeState::Unliked) => success!("Removed like from {}.", item.name),
        Err(e) => error!("Failed to update likes: {}", e),
    }
}

/// Lists the liked releases of the signed-in user.
pub async fn likes() {
    let session = require_session();
    let likes = LikeStore::new(&config::data_dir(), &session);

    let items = match likes.all().await {
        Ok(items) => items,
        Err(e) => error!("Cannot read likes: {}", e),
    };

    if items.is_empty() {
        info!("No liked releases yet.");
        return;
    }

    print_items("Liked releases", &items, Some(&likes));
}
