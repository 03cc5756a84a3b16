//! [StudyTracker] is the session object everything else talks to. It owns local state, decides
//! how logged hours change it and pushes the result to durable storage.

pub mod aggregation;
pub mod entry_set;
pub mod pending;
pub mod reconcile;

use aggregation::Snapshot;
use chrono::NaiveDate;
use entry_set::EntrySet;
use pending::{PendingWrites, SyncState};
use reconcile::{Reconciliation, reconcile};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    storage::{entry_store::EntryStore, start_date_cache::StartDateCache},
    utils::clock::Clock,
};

pub struct StudyTracker<S: EntryStore, C: StartDateCache> {
    entries: EntrySet,
    start_date: Option<NaiveDate>,
    store: S,
    cache: C,
    clock: Box<dyn Clock>,
    pending: PendingWrites,
}

impl<S: EntryStore, C: StartDateCache> StudyTracker<S, C> {
    pub fn from_state(
        entries: EntrySet,
        start_date: Option<NaiveDate>,
        store: S,
        cache: C,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            entries,
            start_date,
            store,
            cache,
            clock,
            pending: PendingWrites::new(),
        }
    }

    /// Loads entries and the start date. Never fails: unavailable storage degrades to an empty
    /// session.
    #[instrument(skip_all)]
    pub async fn load(store: S, cache: C, clock: Box<dyn Clock>) -> Self {
        let entries = load_entries(&store).await;
        let start_date = load_start_date(&store, &cache, clock.today()).await;
        info!(
            "Loaded {} entries, tracking since {start_date}",
            entries.len()
        );
        Self::from_state(entries, Some(start_date), store, cache, clock)
    }

    /// Adds `additional_hours` to `date`. Negative values subtract time, the day total never goes
    /// below zero and a day that reaches zero is deleted. Local state changes immediately, the
    /// durable write goes through the pending queue.
    #[instrument(skip(self))]
    pub async fn log_hours(&mut self, date: NaiveDate, additional_hours: f64) -> Reconciliation {
        let previous_start = self.start_date;
        let result = reconcile(&self.entries, previous_start, date, additional_hours);

        let Some(write) = result.write else {
            debug!("Nothing to change for {date}");
            return result;
        };

        self.entries.set(date, result.new_hours);

        if result.start_date_moved(previous_start) {
            self.start_date = result.start_date;
            if let Some(start) = result.start_date {
                info!("Start date moved to {start}");
                if let Err(e) = self.cache.set(start) {
                    warn!("Failed to cache start date {start}: {e:?}");
                }
            }
        }

        self.pending.push(write);
        self.flush().await;
        result
    }

    pub fn hours_for_date(&self, date: NaiveDate) -> f64 {
        self.entries.get(date).unwrap_or(0.)
    }

    /// Retries every write the durable store hasn't confirmed yet.
    pub async fn flush(&mut self) -> usize {
        self.pending.flush(&self.store).await
    }

    pub fn sync_state(&self) -> SyncState {
        self.pending.state()
    }

    pub fn pending_writes(&self) -> &PendingWrites {
        &self.pending
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(&self.entries, self.start_date, self.clock.today())
    }

    pub fn entries(&self) -> &EntrySet {
        &self.entries
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Reads every entry from the store. A failing store is reported and treated as empty.
pub async fn load_entries(store: &impl EntryStore) -> EntrySet {
    match store.load_entries().await {
        Ok(entries) => entries.into_iter().collect(),
        Err(e) => {
            error!("Error loading entries: {e:?}");
            EntrySet::new()
        }
    }
}

/// Resolves the start date in order: earliest stored entry, cached value, today. Whatever is
/// picked from the first or last source gets written into the cache.
pub async fn load_start_date(
    store: &impl EntryStore,
    cache: &impl StartDateCache,
    today: NaiveDate,
) -> NaiveDate {
    let earliest = store
        .earliest_entry()
        .await
        .inspect_err(|e| warn!("Failed to query earliest entry: {e:?}"))
        .ok()
        .flatten();

    if let Some(entry) = earliest {
        cache_start_date(cache, entry.date);
        return entry.date;
    }

    let cached = cache
        .get()
        .inspect_err(|e| warn!("Failed to read cached start date: {e:?}"))
        .ok()
        .flatten();

    if let Some(date) = cached {
        return date;
    }

    cache_start_date(cache, today);
    today
}

fn cache_start_date(cache: &impl StartDateCache, date: NaiveDate) {
    if let Err(e) = cache.set(date) {
        warn!("Failed to cache start date {date}: {e:?}");
    }
}
