//! # CLI Module
//!
//! Command implementations behind the `spordcli` binary. Each command loads
//! what it needs from configuration, runs the library operation and prints the
//! outcome with the status macros and `tabled` tables.
//!
//! - [`releases`] - search (or answer from cache) the releases of one date
//! - [`list_releases`] - show every cached date
//! - [`like`] / [`likes`] - toggle and list favorites
//! - [`export`] - write the HTML snapshot of one date
//!
//! Fatal problems end the process through [`crate::error!`]. Everything else is
//! reported as a warning and the command carries on.

mod export;
mod likes;
mod releases;

use std::path::PathBuf;

use tabled::Table;

use crate::{
    config, error,
    management::{
        LikeStore, LocalReleaseStore, ReleaseStore, Session, StoreMode, UserReleaseStore,
    },
    types::{DateBucket, ReleaseItem, ReleaseTableRow},
    warning,
};

pub use export::export;
pub use likes::{like, likes};
pub use releases::{list_releases, releases};

/// Either kind of release store, chosen at runtime.
pub(crate) enum AnyStore {
    Remote(UserReleaseStore),
    Local(LocalReleaseStore),
}

fn resolve_mode(store: Option<StoreMode>) -> StoreMode {
    match store {
        Some(mode) => mode,
        None => match config::store_mode() {
            Ok(mode) => mode,
            Err(e) => error!("{}", e),
        },
    }
}

fn require_session() -> Session {
    match Session::require() {
        Ok(session) => session,
        Err(e) => error!("{}", e),
    }
}

fn optional_session() -> Option<Session> {
    match Session::from_env() {
        Ok(session) => session,
        Err(e) => {
            warning!("Ignoring configured user: {}", e);
            None
        }
    }
}

/// Opens the store for `mode`. The remote store needs a signed-in user.
///
/// A store that fails to open is returned unopened. Its reads and writes then
/// fail, and searches fall back to memory.
pub(crate) async fn open_store(mode: Option<StoreMode>) -> AnyStore {
    let data_dir: PathBuf = config::data_dir();
    let mut store = match resolve_mode(mode) {
        StoreMode::Remote => AnyStore::Remote(UserReleaseStore::new(&data_dir, &require_session())),
        StoreMode::Local => AnyStore::Local(LocalReleaseStore::new(&data_dir)),
    };

    let opened = match &mut store {
        AnyStore::Remote(s) => s.open().await,
        AnyStore::Local(s) => s.open().await,
    };
    if let Err(e) = opened {
        warning!("Cannot open release cache, results stay in memory: {}", e);
    }
    store
}

pub(crate) async fn close_store<S: ReleaseStore>(store: &mut S) {
    if let Err(e) = store.close().await {
        warning!("Cannot close release cache: {}", e);
    }
}

pub(crate) fn like_store() -> Option<LikeStore> {
    optional_session().map(|session| LikeStore::new(&config::data_dir(), &session))
}

fn to_row(item: &ReleaseItem, likes: Option<&LikeStore>) -> ReleaseTableRow {
    ReleaseTableRow {
        date: item.release_date.clone(),
        name: item.name.clone(),
        artists: item
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        liked: match likes {
            Some(l) if l.is_liked(&item.id) => "♥".to_string(),
            _ => String::new(),
        },
        id: item.id.clone(),
    }
}

pub(crate) fn print_items(title: &str, items: &[ReleaseItem], likes: Option<&LikeStore>) {
    if items.is_empty() {
        println!("{title}: none\n");
        return;
    }

    let rows: Vec<ReleaseTableRow> = items.iter().map(|i| to_row(i, likes)).collect();
    println!("{title}\n{table}\n", table = Table::new(rows));
}

pub(crate) fn print_bucket(date: &str, bucket: &DateBucket, likes: Option<&LikeStore>) {
    println!(
        "Date: {date}\tAlbums: {}\tSingles: {}\n",
        bucket.albums.len(),
        bucket.singles.len()
    );
    print_items("Albums", &bucket.albums, likes);
    print_items("Singles", &bucket.singles, likes);
}
