// Event source service
// Supplies the events shown on the day pages and caches them per day

pub mod http;

use anyhow::Result;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::models::event::{DateRange, Event};

pub use http::HttpEventSource;

/// Anything that can list events for a range of days. Sources are shared
/// with fetch worker threads.
pub trait EventSource: Send + Sync {
    fn fetch_events(&self, range: DateRange) -> Result<Vec<Event>>;
}

/// Fixed event list, used when no event service is configured.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventSource {
    events: Vec<Event>,
}

impl InMemoryEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl EventSource for InMemoryEventSource {
    fn fetch_events(&self, range: DateRange) -> Result<Vec<Event>> {
        Ok(self
            .events
            .iter()
            .filter(|event| range.days().any(|day| event.overlaps_day(day)))
            .cloned()
            .collect())
    }
}

/// What a day page can show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    /// A fetch covering the day has not finished yet
    Loading,
    Loaded,
    /// The last fetch covering the day failed; shown as an empty day
    Failed,
}

/// A background fetch that finished since the last [`EventCache::poll`].
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded(DateRange),
    Failed { range: DateRange, error: anyhow::Error },
}

type FetchResult = (DateRange, Result<Vec<Event>>);

/// Per-day event cache in front of an [`EventSource`].
///
/// Fetches run on worker threads so a slow event service never stalls the
/// frame; results are picked up by [`EventCache::poll`] once per frame.
#[derive(Debug)]
pub struct EventCache {
    days: HashMap<NaiveDate, Vec<Event>>,
    failed: Vec<DateRange>,
    in_flight: HashSet<DateRange>,
    result_tx: Sender<FetchResult>,
    result_rx: Receiver<FetchResult>,
}

impl Default for EventCache {
    fn default() -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        Self {
            days: HashMap::new(),
            failed: Vec::new(),
            in_flight: HashSet::new(),
            result_tx,
            result_rx,
        }
    }
}

impl EventCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, day: NaiveDate) -> bool {
        self.days.contains_key(&day)
    }

    fn is_failed(&self, day: NaiveDate) -> bool {
        self.failed.iter().any(|range| range.contains(day))
    }

    pub fn day_state(&self, day: NaiveDate) -> DayState {
        if self.is_loaded(day) {
            DayState::Loaded
        } else if self.is_failed(day) {
            DayState::Failed
        } else {
            DayState::Loading
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Starts a background fetch of `range` unless every day in it is
    /// already cached or failed, or the same range is still in flight.
    /// Returns whether a fetch was started.
    pub fn ensure_range(&mut self, source: &Arc<dyn EventSource>, range: DateRange) -> bool {
        if self.in_flight.contains(&range)
            || range
                .days()
                .all(|day| self.is_loaded(day) || self.is_failed(day))
        {
            return false;
        }

        log::info!("Fetching events for {}..={}", range.start, range.end);
        self.in_flight.insert(range);
        let source = Arc::clone(source);
        let tx = self.result_tx.clone();
        thread::spawn(move || {
            let result = source.fetch_events(range);
            let _ = tx.send((range, result));
        });
        true
    }

    /// Stores every finished fetch. Call once per frame.
    pub fn poll(&mut self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        while let Ok((range, result)) = self.result_rx.try_recv() {
            self.in_flight.remove(&range);
            match result {
                Ok(events) => {
                    self.store(range, &events);
                    self.failed.retain(|failed| *failed != range);
                    outcomes.push(FetchOutcome::Loaded(range));
                }
                Err(error) => {
                    log::warn!(
                        "Failed to load events for {}..={}: {:#}",
                        range.start,
                        range.end,
                        error
                    );
                    self.failed.push(range);
                    outcomes.push(FetchOutcome::Failed { range, error });
                }
            }
        }
        outcomes
    }

    /// Forgets failed ranges so the next [`EventCache::ensure_range`] tries again.
    pub fn clear_failures(&mut self) {
        self.failed.clear();
    }

    fn store(&mut self, range: DateRange, events: &[Event]) {
        for day in range.days() {
            let mut day_events: Vec<Event> = events
                .iter()
                .filter(|event| event.overlaps_day(day))
                .cloned()
                .collect();
            day_events.sort_by_key(|event| (!event.all_day, event.start));
            self.days.insert(day, day_events);
        }
    }

    /// Cached events for `day`, all-day events first, then by start time.
    pub fn events_for(&self, day: NaiveDate) -> &[Event] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }
}
