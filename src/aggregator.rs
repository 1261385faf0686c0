//! Collects the releases of one day.
//!
//! The catalog cannot search by date, so a run searches every prefix `A`–`Z`
//! for the date's year, keeps the items released exactly on that date and
//! splits them into albums and singles:
//!
//! ```text
//! validate → cache check ─ hit ──────────────────────────────→ done
//!                        └ miss → token → prefix A..Z → filter → classify → persist → done
//! ```
//!
//! A cached bucket is final unless the store keeps a
//! [`PrefixLedger`](crate::management::PrefixLedger). Such a
//! store records each prefix as soon as it was searched, and a later run only
//! searches the prefixes still missing. The bucket always lists the prefixes in
//! alphabetical order, however many runs it took to collect them.
//!
//! At most one run per date is in flight. A second run for the same date waits
//! for the first and then answers from the cache.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt,
    sync::{Arc, Mutex as StdMutex, MutexGuard},
};

use indicatif::ProgressBar;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    Error, Res,
    management::ReleaseStore,
    spotify::Catalog,
    types::DateBucket,
    utils,
};

/// Where the returned bucket came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketSource {
    Cache,
    Catalog,
}

/// Non-fatal outcomes of a run, meant to be shown to the user.
#[derive(Debug)]
pub enum Notice {
    /// A prefix stopped early. Its partial results are part of the bucket.
    FetchFailed { prefix: char, error: Error },
    /// No release matched the date. The empty result was still cached.
    NoReleases { date: String },
    /// The cache could not be read or written. The bucket only exists in memory.
    PersistFailed { error: Error },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FetchFailed { prefix, error } => {
                write!(f, "Search for prefix {prefix} stopped early: {error}")
            }
            Notice::NoReleases { date } => write!(f, "No releases found for {date}."),
            Notice::PersistFailed { error } => {
                write!(f, "Results could not be cached: {error}")
            }
        }
    }
}

/// Result of one run.
#[derive(Debug)]
pub struct AggregateReport {
    pub date: String,
    pub bucket: DateBucket,
    pub source: BucketSource,
    /// Prefixes searched against the catalog during this run.
    pub searched: Vec<char>,
    pub notices: Vec<Notice>,
}

/// Runs release searches for dates against a catalog and a release store.
pub struct DateAggregator<C, S> {
    catalog: Arc<C>,
    store: Arc<Mutex<S>>,
    in_flight: Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>,
    progress: ProgressBar,
}

impl<C, S> Clone for DateAggregator<C, S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            store: Arc::clone(&self.store),
            in_flight: Arc::clone(&self.in_flight),
            progress: self.progress.clone(),
        }
    }
}

impl<C: Catalog, S: ReleaseStore> DateAggregator<C, S> {
    /// `store` must already be open.
    pub fn new(catalog: Arc<C>, store: Arc<Mutex<S>>) -> Self {
        Self {
            catalog,
            store,
            in_flight: Arc::new(StdMutex::new(HashMap::new())),
            progress: ProgressBar::hidden(),
        }
    }

    /// Reports each prefix on `progress` while searching.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    fn in_flight(&self) -> MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>> {
        match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn date_lock(&self, date: &str) -> Arc<Mutex<()>> {
        Arc::clone(self.in_flight().entry(date.to_string()).or_default())
    }

    /// Forgets the lock of `date` once no run holds or awaits it.
    fn release_date_lock(&self, date: &str, lock: Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight();
        drop(lock);
        if in_flight
            .get(date)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            in_flight.remove(date);
        }
    }

    /// Number of dates with a run in flight or waiting.
    pub fn dates_in_flight(&self) -> usize {
        self.in_flight().len()
    }

    /// Collects the releases of `date` (`YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a missing or malformed date, before any
    ///   network call.
    /// - [`Error::Auth`] when no token could be obtained. The cache is not
    ///   touched.
    ///
    /// Failed prefixes, an empty result and unreadable or unwritable caches are
    /// reported as [`Notice`]s instead. When the cache cannot be read the run
    /// searches the whole alphabet and keeps its result in memory only.
    pub async fn aggregate(&self, date: Option<&str>) -> Res<AggregateReport> {
        let report = self.aggregate_date(date).await;
        self.progress.finish_and_clear();
        report
    }

    async fn aggregate_date(&self, date: Option<&str>) -> Res<AggregateReport> {
        let date = utils::parse_release_date(date)?;
        let key = utils::date_key(date);

        let lock = self.date_lock(&key);
        let report = {
            let _running = lock.lock().await;
            self.run(&key, utils::year_of(date)).await
        };
        self.release_date_lock(&key, lock);
        report
    }

    async fn run(&self, key: &str, year: i32) -> Res<AggregateReport> {
        let mut notices = Vec::new();
        let mut in_memory = false;

        let (pending, mut parts) = match self.cache_check(key).await {
            Ok(CacheState::Complete(bucket)) => {
                debug!(date = %key, "answered from cache");
                return Ok(AggregateReport {
                    date: key.to_string(),
                    bucket,
                    source: BucketSource::Cache,
                    searched: Vec::new(),
                    notices,
                });
            }
            Ok(CacheState::Pending { prefixes, found }) => (prefixes, found),
            Err(error) => {
                warn!(date = %key, %error, "cache unreadable, searching without it");
                notices.push(Notice::PersistFailed { error });
                in_memory = true;
                (utils::PREFIXES.to_vec(), BTreeMap::new())
            }
        };

        let token = self.catalog.access_token().await?;
        let mode = self.store.lock().await.mode();
        info!(date = %key, prefixes = pending.len(), %mode, "searching catalog");

        for (index, prefix) in pending.iter().copied().enumerate() {
            self.progress.set_message(format!(
                "Searching releases of {key} starting with {prefix} ({done}/{total})",
                done = index + 1,
                total = pending.len()
            ));

            let result = self.catalog.search_prefix(prefix, year, &token).await;
            let found = utils::classify(utils::filter_by_date(result.items, key));
            debug!(%prefix, matched = found.len(), "prefix searched");

            match result.error {
                Some(error) => {
                    warn!(%prefix, %error, "prefix search incomplete");
                    notices.push(Notice::FetchFailed { prefix, error });
                }
                None if !in_memory => {
                    if let Err(error) = self.record_prefix(key, prefix, &found).await {
                        warn!(%prefix, %error, "cache write failed, keeping results in memory");
                        notices.push(Notice::PersistFailed { error });
                        in_memory = true;
                    }
                }
                None => {}
            }
            parts.insert(prefix, found);
        }

        let bucket: DateBucket = parts.into_values().collect();
        if bucket.is_empty() {
            notices.push(Notice::NoReleases {
                date: key.to_string(),
            });
        }

        if !in_memory {
            let mut store = self.store.lock().await;
            if store.ledger().is_none() {
                if let Err(error) = store.save_bucket(key, &bucket).await {
                    notices.push(Notice::PersistFailed { error });
                }
            }
        }

        Ok(AggregateReport {
            date: key.to_string(),
            bucket,
            source: BucketSource::Catalog,
            searched: pending,
            notices,
        })
    }

    /// Records one prefix with stores that track prefixes. Other stores are
    /// written once the run is over.
    async fn record_prefix(&self, date: &str, prefix: char, found: &DateBucket) -> Res<()> {
        let mut store = self.store.lock().await;
        match store.ledger_mut() {
            Some(ledger) => ledger.record_prefix(date, prefix, found.clone()).await,
            None => Ok(()),
        }
    }

    async fn cache_check(&self, date: &str) -> Res<CacheState> {
        let store = self.store.lock().await;
        if let Some(ledger) = store.ledger() {
            let found = ledger.prefix_buckets(date).await?;
            let searched: BTreeSet<char> = found.keys().copied().collect();
            return Ok(if utils::is_fully_searched(&searched) {
                CacheState::Complete(found.into_values().collect())
            } else {
                CacheState::Pending {
                    prefixes: utils::residual_prefixes(&searched),
                    found,
                }
            });
        }

        Ok(match store.bucket(date).await? {
            Some(bucket) => CacheState::Complete(bucket),
            None => CacheState::Pending {
                prefixes: utils::PREFIXES.to_vec(),
                found: BTreeMap::new(),
            },
        })
    }
}

/// What the cache knows about a date before searching.
enum CacheState {
    /// The cache answers the date.
    Complete(DateBucket),
    /// `prefixes` still have to be searched. `found` holds the releases of the
    /// prefixes searched earlier.
    Pending {
        prefixes: Vec<char>,
        found: BTreeMap<char, DateBucket>,
    },
}
