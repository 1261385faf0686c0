use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Session, check_path_segment, write_json};
use crate::{Error, Res, types::ReleaseItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Liked,
    Unliked,
}

/// Releases the user marked as favorites.
///
/// Layout: `<data_dir>/users/<user_id>/likes/<release_id>.json`, one file per
/// liked release.
pub struct LikeStore {
    dir: PathBuf,
}

impl LikeStore {
    pub fn new(data_dir: &Path, session: &Session) -> Self {
        Self {
            dir: session.user_dir(data_dir).join("likes"),
        }
    }

    fn get_path(&self, id: &str) -> Res<PathBuf> {
        check_path_segment("release id", id)?;
        Ok(self.dir.join(format!("{id}.json")))
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.get_path(id).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Likes `item`, or removes the like if it is already liked.
    pub async fn toggle(&self, item: &ReleaseItem) -> Res<LikeState> {
        let path = self.get_path(&item.id)?;
        if path.is_file() {
            async_fs::remove_file(&path)
                .await
                .map_err(Error::persistence)?;
            debug!(id = %item.id, "removed like");
            Ok(LikeState::Unliked)
        } else {
            write_json(&path, item).await?;
            debug!(id = %item.id, "added like");
            Ok(LikeState::Liked)
        }
    }

    /// All liked releases, ordered by name.
    pub async fn all(&self) -> Res<Vec<ReleaseItem>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(Error::persistence)?;
        while let Some(entry) = entries.next_entry().await.map_err(Error::persistence)? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let content = async_fs::read_to_string(&path)
                .await
                .map_err(Error::persistence)?;
            items.push(serde_json::from_str::<ReleaseItem>(&content).map_err(Error::persistence)?);
        }

        items.sort_by(|a, b| crate::utils::locale_cmp(&a.name, &b.name));
        Ok(items)
    }
}
