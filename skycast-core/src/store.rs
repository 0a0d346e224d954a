//! Key-indexed query store over a [`WeatherSource`].
//!
//! Each request identity (the city list, or one city by name) owns one entry
//! moving through `Idle -> Fetching -> {Fresh, Failed}`, with `Fresh`
//! decaying to `Stale` once the freshness window elapses. While an entry is
//! `Fetching`, further `ensure` calls attach to the in-flight fetch instead
//! of issuing another upstream call, and an `invalidate` queues exactly one
//! rerun for after the current fetch settles (there is no cancellation).
//!
//! Entries are never evicted; stale data stays servable until replaced.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::model::{WeatherListItem, WeatherRecord};
use crate::source::WeatherSource;

/// How long a completed fetch stays fresh before it is eligible for refetch.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Identity of a cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The bulk city-list query.
    CityList,
    /// A single city, by name.
    City(String),
}

impl QueryKey {
    pub fn city(name: impl Into<String>) -> Self {
        Self::City(name.into())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::CityList => f.write_str("city-list"),
            QueryKey::City(name) => write!(f, "city:{name}"),
        }
    }
}

/// Externally visible entry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Fetching,
    Fresh,
    Stale,
    Failed,
}

/// Cached payload; the key decides which variant a settle writes.
#[derive(Debug, Clone)]
pub enum QueryData {
    Record(Box<WeatherRecord>),
    List(Vec<WeatherListItem>),
}

/// Non-blocking view of one entry, as returned by [`WeatherStore::get`].
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub status: QueryStatus,
    pub data: Option<QueryData>,
    pub error: Option<ApiError>,
}

impl Snapshot {
    fn idle() -> Self {
        Self { status: QueryStatus::Idle, data: None, error: None }
    }
}

#[derive(Debug, Default)]
struct Entry {
    fetching: bool,
    /// Set by `invalidate` while a fetch is outstanding; consumed on settle.
    rerun_queued: bool,
    /// Set by `invalidate` on a settled entry; forces the next `ensure` to fetch.
    invalidated: bool,
    data: Option<QueryData>,
    /// Error from the most recent fetch, cleared by the next success.
    error: Option<ApiError>,
    /// Completion time of the last successful fetch.
    fetched_at: Option<Instant>,
}

impl Entry {
    fn status(&self, ttl: Duration) -> QueryStatus {
        if self.fetching {
            QueryStatus::Fetching
        } else if self.error.is_some() {
            QueryStatus::Failed
        } else if let Some(at) = self.fetched_at {
            if !self.invalidated && at.elapsed() < ttl {
                QueryStatus::Fresh
            } else {
                QueryStatus::Stale
            }
        } else {
            QueryStatus::Idle
        }
    }

    fn snapshot(&self, ttl: Duration) -> Snapshot {
        Snapshot {
            status: self.status(ttl),
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

/// The query/cache layer the rendering side talks to.
#[derive(Debug)]
pub struct WeatherStore {
    source: Arc<dyn WeatherSource>,
    ttl: Duration,
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
    settled: Arc<Notify>,
}

impl WeatherStore {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self {
            source,
            ttl: FRESHNESS_WINDOW,
            entries: Arc::new(Mutex::new(HashMap::new())),
            settled: Arc::new(Notify::new()),
        }
    }

    /// Non-blocking read of the current state for a key.
    pub fn get(&self, key: &QueryKey) -> Snapshot {
        let map = lock(&self.entries);
        map.get(key).map_or_else(Snapshot::idle, |e| e.snapshot(self.ttl))
    }

    /// Schedule a background fetch if the entry is Idle, Stale or Failed.
    /// No-op while Fetching (the caller attaches to the in-flight fetch) or
    /// Fresh. Never returns an error; failures land on the entry.
    pub fn ensure(&self, key: &QueryKey) {
        {
            let mut map = lock(&self.entries);
            let entry = map.entry(key.clone()).or_default();
            match entry.status(self.ttl) {
                QueryStatus::Fetching | QueryStatus::Fresh => {
                    debug!(%key, "ensure is a no-op");
                    return;
                }
                QueryStatus::Idle | QueryStatus::Stale | QueryStatus::Failed => {
                    entry.fetching = true;
                    entry.invalidated = false;
                }
            }
        }

        debug!(%key, "scheduling fetch");
        self.spawn_fetch(key.clone());
    }

    /// Mark a key so the next `ensure` refetches. Issued mid-flight, it does
    /// not cancel; it queues one rerun for after the current fetch settles.
    pub fn invalidate(&self, key: &QueryKey) {
        let mut map = lock(&self.entries);
        let entry = map.entry(key.clone()).or_default();
        if entry.fetching {
            entry.rerun_queued = true;
        } else {
            entry.invalidated = true;
        }
    }

    /// `invalidate` followed by `ensure`.
    pub fn retry(&self, key: &QueryKey) {
        self.invalidate(key);
        self.ensure(key);
    }

    /// Wait until no fetch is outstanding for the key. Returns immediately
    /// for settled (or never-ensured) entries.
    pub async fn wait_settled(&self, key: &QueryKey) {
        loop {
            let notified = self.settled.notified();
            tokio::pin!(notified);
            // Register before re-checking so a settle between the check and
            // the await cannot be missed.
            notified.as_mut().enable();

            if self.get(key).status != QueryStatus::Fetching {
                return;
            }
            notified.as_mut().await;
        }
    }

    fn spawn_fetch(&self, key: QueryKey) {
        let source = Arc::clone(&self.source);
        let entries = Arc::clone(&self.entries);
        let settled = Arc::clone(&self.settled);

        tokio::spawn(async move {
            loop {
                let result = match &key {
                    QueryKey::CityList => source.city_list().await.map(QueryData::List),
                    QueryKey::City(name) => source
                        .city_weather(name)
                        .await
                        .map(|r| QueryData::Record(Box::new(r))),
                };

                let rerun = {
                    let mut map = lock(&entries);
                    let entry = map.entry(key.clone()).or_default();

                    match result {
                        Ok(data) => {
                            entry.data = Some(data);
                            entry.error = None;
                            entry.fetched_at = Some(Instant::now());
                        }
                        Err(err) => {
                            warn!(%key, %err, "fetch failed");
                            entry.error = Some(err);
                        }
                    }

                    let rerun = std::mem::take(&mut entry.rerun_queued);
                    // A queued rerun keeps the entry in Fetching across the
                    // settle, so attached waiters observe the final result.
                    entry.fetching = rerun;
                    entry.invalidated = false;
                    rerun
                };

                settled.notify_waiters();
                if !rerun {
                    break;
                }
                debug!(%key, "running queued refetch");
            }
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
