//! Per-request search state.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::calendar;
use crate::feed::model::ServiceId;
use crate::feed::model::StopId;
use crate::feed::store::FeedStore;
use crate::search::aggregator::EdgeKey;

/// `best_arrival`, `best_arrival_edge`, and the per-request calendar
/// memo. Calendar resolution is memoized per `(service, date)` pair
/// since a search can probe the same service many times over. Allocated
/// per request, discarded on return; never shared across requests.
pub struct SearchState {
    best_arrival: HashMap<StopId, u32>,
    best_arrival_edge: HashMap<EdgeKey, u32>,
    calendar_memo: HashMap<(ServiceId, NaiveDate), bool>,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            best_arrival: HashMap::new(),
            best_arrival_edge: HashMap::new(),
            calendar_memo: HashMap::new(),
        }
    }

    pub fn best_arrival(&self, stop: StopId) -> Option<u32> {
        self.best_arrival.get(&stop).copied()
    }

    /// Returns `true` if `arrival` improves (or newly sets) the stop's
    /// best-known arrival, applying the improvement as a side effect.
    pub fn improve_stop(&mut self, stop: StopId, arrival: u32) -> bool {
        let improves = match self.best_arrival.get(&stop) {
            Some(&existing) => arrival < existing,
            None => true,
        };
        if improves {
            self.best_arrival.insert(stop, arrival);
        }
        improves
    }

    /// Edge-level improvement, used for output only.
    pub fn improve_edge(&mut self, key: EdgeKey, arrival: u32) -> bool {
        let improves = match self.best_arrival_edge.get(&key) {
            Some(&existing) => arrival < existing,
            None => true,
        };
        if improves {
            self.best_arrival_edge.insert(key, arrival);
        }
        improves
    }

    pub fn service_active(
        &mut self,
        feed: &FeedStore,
        service: ServiceId,
        date: NaiveDate,
    ) -> bool {
        *self
            .calendar_memo
            .entry((service, date))
            .or_insert_with(|| calendar::service_active(feed, service, date))
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}
