use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{ReleaseStore, Session, StoreMode, write_json};
use crate::{
    Error, Res,
    types::{DateBucket, ReleaseCache},
};

/// Per-user release cache holding complete buckets.
///
/// Layout: `<data_dir>/users/<user_id>/releases/<date>.json`. A bucket is
/// written once the whole alphabet was searched for its date, so a present
/// file is treated as the final answer for that date.
pub struct UserReleaseStore {
    dir: PathBuf,
    open: bool,
}

impl UserReleaseStore {
    pub fn new(data_dir: &Path, session: &Session) -> Self {
        Self {
            dir: session.user_dir(data_dir).join("releases"),
            open: false,
        }
    }

    fn ensure_open(&self) -> Res<()> {
        if self.open {
            Ok(())
        } else {
            Err(Error::Persistence("release store is not open".to_string()))
        }
    }

    fn get_path(&self, date: &str) -> PathBuf {
        self.dir.join(format!("{date}.json"))
    }
}

#[async_trait]
impl ReleaseStore for UserReleaseStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Remote
    }

    async fn open(&mut self) -> Res<()> {
        async_fs::create_dir_all(&self.dir)
            .await
            .map_err(Error::persistence)?;
        self.open = true;
        debug!(dir = %self.dir.display(), "opened user release store");
        Ok(())
    }

    async fn close(&mut self) -> Res<()> {
        self.open = false;
        Ok(())
    }

    async fn bucket(&self, date: &str) -> Res<Option<DateBucket>> {
        self.ensure_open()?;
        let path = self.get_path(date);
        if !path.is_file() {
            return Ok(None);
        }

        let content = async_fs::read_to_string(&path)
            .await
            .map_err(Error::persistence)?;
        let bucket = serde_json::from_str(&content).map_err(Error::persistence)?;
        Ok(Some(bucket))
    }

    async fn save_bucket(&mut self, date: &str, bucket: &DateBucket) -> Res<()> {
        self.ensure_open()?;
        write_json(&self.get_path(date), bucket).await
    }

    async fn all(&self) -> Res<ReleaseCache> {
        self.ensure_open()?;
        let mut cache = ReleaseCache::new();
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(Error::persistence)?;

        while let Some(entry) = entries.next_entry().await.map_err(Error::persistence)? {
            let path = entry.path();
            let Some(date) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .filter(|_| path.extension().is_some_and(|ext| ext == "json"))
                .map(str::to_string)
            else {
                continue;
            };

            if let Some(bucket) = self.bucket(&date).await? {
                cache.insert(date, bucket);
            }
        }

        Ok(cache)
    }
}
