mod likes;
mod local;
mod session;
mod user;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    path::Path,
    str::FromStr,
};

use async_trait::async_trait;

use crate::{
    Error, Res,
    types::{DateBucket, ReleaseCache},
};

pub use likes::{LikeState, LikeStore};
pub use local::{LocalCache, LocalReleaseStore};
pub use session::Session;
pub use user::UserReleaseStore;

/// Where and how release buckets are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Per-user tree of complete buckets. A cached date is never searched again.
    Remote,
    /// Single file on this device. Tracks which prefixes were searched per date
    /// so an interrupted search resumes where it stopped.
    Local,
}

impl FromStr for StoreMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(StoreMode::Remote),
            "local" => Ok(StoreMode::Local),
            other => Err(Error::Config(format!(
                "unknown store '{other}', expected remote or local"
            ))),
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreMode::Remote => write!(f, "remote"),
            StoreMode::Local => write!(f, "local"),
        }
    }
}

pub fn parse_store_mode(s: &str) -> Result<StoreMode, String> {
    s.parse::<StoreMode>().map_err(|e| e.to_string())
}

/// Persistent cache of date buckets.
///
/// Stores must be opened before use and closed when done.
#[async_trait]
pub trait ReleaseStore: Send + Sync {
    fn mode(&self) -> StoreMode;

    async fn open(&mut self) -> Res<()>;

    async fn close(&mut self) -> Res<()>;

    /// The cached bucket for `date`, if any.
    async fn bucket(&self, date: &str) -> Res<Option<DateBucket>>;

    /// Replaces the bucket for `date`. A saved bucket is final.
    async fn save_bucket(&mut self, date: &str, bucket: &DateBucket) -> Res<()>;

    /// Every cached bucket.
    async fn all(&self) -> Res<ReleaseCache>;

    /// Per-prefix progress, for stores that resume interrupted searches.
    fn ledger(&self) -> Option<&dyn PrefixLedger> {
        None
    }

    fn ledger_mut(&mut self) -> Option<&mut dyn PrefixLedger> {
        None
    }
}

/// Releases of a date recorded prefix by prefix.
#[async_trait]
pub trait PrefixLedger: Send + Sync {
    /// Releases found per searched prefix of `date`, in prefix order.
    async fn prefix_buckets(&self, date: &str) -> Res<BTreeMap<char, DateBucket>>;

    /// Stores the releases found for `prefix` and marks it as searched.
    /// Recording a prefix again replaces its releases.
    async fn record_prefix(&mut self, date: &str, prefix: char, found: DateBucket) -> Res<()>;

    /// Prefixes already searched for `date`.
    async fn searched_prefixes(&self, date: &str) -> Res<BTreeSet<char>> {
        Ok(self.prefix_buckets(date).await?.into_keys().collect())
    }
}

fn check_path_segment(kind: &str, value: &str) -> Res<()> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid {kind} '{value}'")))
    }
}

async fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Res<()> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(Error::persistence)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(Error::persistence)?;
    async_fs::write(path, json).await.map_err(Error::persistence)
}
