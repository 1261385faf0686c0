use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PrefixLedger, ReleaseStore, StoreMode, write_json};
use crate::{
    Error, Res,
    types::{DateBucket, ReleaseCache},
    utils::PREFIXES,
};

/// Contents of the local cache file.
///
/// Releases are kept per date and searched prefix. A prefix present for a date
/// has been searched, even when it found nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalCache {
    #[serde(default)]
    pub releases: BTreeMap<String, BTreeMap<char, DateBucket>>,
}

impl LocalCache {
    /// The bucket of `date`, prefixes joined in alphabetical order.
    pub fn bucket(&self, date: &str) -> Option<DateBucket> {
        self.releases
            .get(date)
            .map(|parts| parts.values().cloned().collect())
    }
}

/// Release cache kept in a single file on this device.
///
/// The file at `<data_dir>/cache/releases.json` holds, per date, the releases
/// found for every prefix searched so far. Every change is written through
/// immediately so progress survives an interrupted search.
pub struct LocalReleaseStore {
    path: PathBuf,
    cache: Option<LocalCache>,
}

impl LocalReleaseStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("cache").join("releases.json"),
            cache: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cache(&self) -> Res<&LocalCache> {
        self.cache
            .as_ref()
            .ok_or_else(|| Error::Persistence("release store is not open".to_string()))
    }

    fn cache_mut(&mut self) -> Res<&mut LocalCache> {
        self.cache
            .as_mut()
            .ok_or_else(|| Error::Persistence("release store is not open".to_string()))
    }

    async fn persist(&self) -> Res<()> {
        write_json(&self.path, self.cache()?).await
    }
}

#[async_trait]
impl ReleaseStore for LocalReleaseStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Local
    }

    async fn open(&mut self) -> Res<()> {
        let cache = if self.path.is_file() {
            let content = async_fs::read_to_string(&self.path)
                .await
                .map_err(Error::persistence)?;
            serde_json::from_str(&content).map_err(|e| {
                Error::Persistence(format!("cannot read {}: {}", self.path.display(), e))
            })?
        } else {
            LocalCache::default()
        };

        debug!(
            path = %self.path.display(),
            dates = cache.releases.len(),
            "opened local release store"
        );
        self.cache = Some(cache);
        Ok(())
    }

    async fn close(&mut self) -> Res<()> {
        if self.cache.is_some() {
            self.persist().await?;
        }
        self.cache = None;
        Ok(())
    }

    async fn bucket(&self, date: &str) -> Res<Option<DateBucket>> {
        Ok(self.cache()?.bucket(date))
    }

    /// Files the whole bucket under the first prefix and marks every other
    /// prefix as searched.
    async fn save_bucket(&mut self, date: &str, bucket: &DateBucket) -> Res<()> {
        let mut parts: BTreeMap<char, DateBucket> = PREFIXES
            .iter()
            .map(|&prefix| (prefix, DateBucket::default()))
            .collect();
        parts.insert(PREFIXES[0], bucket.clone());

        self.cache_mut()?.releases.insert(date.to_string(), parts);
        self.persist().await
    }

    async fn all(&self) -> Res<ReleaseCache> {
        let cache = self.cache()?;
        Ok(cache
            .releases
            .keys()
            .filter_map(|date| Some((date.clone(), cache.bucket(date)?)))
            .collect())
    }

    fn ledger(&self) -> Option<&dyn PrefixLedger> {
        Some(self)
    }

    fn ledger_mut(&mut self) -> Option<&mut dyn PrefixLedger> {
        Some(self)
    }
}

#[async_trait]
impl PrefixLedger for LocalReleaseStore {
    async fn prefix_buckets(&self, date: &str) -> Res<BTreeMap<char, DateBucket>> {
        Ok(self
            .cache()?
            .releases
            .get(date)
            .cloned()
            .unwrap_or_default())
    }

    async fn record_prefix(&mut self, date: &str, prefix: char, found: DateBucket) -> Res<()> {
        self.cache_mut()?
            .releases
            .entry(date.to_string())
            .or_default()
            .insert(prefix, found);
        self.persist().await
    }
}
