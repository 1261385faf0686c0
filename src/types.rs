use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub const ALBUM_TYPE_ALBUM: &str = "album";
pub const ALBUM_TYPE_SINGLE: &str = "single";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// A release as returned by the catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<AlbumArtist>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub release_date_precision: String,
    #[serde(default)]
    pub album_type: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

impl ReleaseItem {
    pub fn first_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumArtist {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub albums: Option<AlbumPage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlbumPage {
    #[serde(default)]
    pub items: Vec<ReleaseItem>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Releases of one day, split by type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateBucket {
    #[serde(default)]
    pub albums: Vec<ReleaseItem>,
    #[serde(default)]
    pub singles: Vec<ReleaseItem>,
}

impl DateBucket {
    pub fn len(&self) -> usize {
        self.albums.len() + self.singles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty() && self.singles.is_empty()
    }

    /// Appends another bucket, keeping the existing items first.
    pub fn merge(&mut self, other: DateBucket) {
        self.albums.extend(other.albums);
        self.singles.extend(other.singles);
    }

    pub fn find(&self, id: &str) -> Option<&ReleaseItem> {
        self.albums
            .iter()
            .chain(self.singles.iter())
            .find(|item| item.id == id)
    }
}

impl FromIterator<DateBucket> for DateBucket {
    fn from_iter<I: IntoIterator<Item = DateBucket>>(iter: I) -> Self {
        let mut bucket = DateBucket::default();
        for part in iter {
            bucket.merge(part);
        }
        bucket
    }
}

/// Date (`YYYY-MM-DD`) to bucket, ordered by date.
pub type ReleaseCache = BTreeMap<String, DateBucket>;

#[derive(Tabled)]
pub struct ReleaseTableRow {
    pub date: String,
    pub name: String,
    pub artists: String,
    pub liked: String,
    pub id: String,
}
