pub mod calendar;
pub mod config;
pub mod error;
pub mod feed;
pub mod search;
pub mod server;
pub mod spatial;
pub mod transfers;
pub mod walk;

pub use config::SearchParams;
pub use error::{LoadError, RequestError};
pub use feed::model::{
    CalendarEntry, CalendarException, ExceptionKind, Route, RouteId, ServiceId, Stop, StopId,
    StopTime, Trip, TripId,
};
pub use feed::store::FeedStore;
pub use search::aggregator::{EdgeKey, IsochroneResult};
pub use search::{run_isochrone, SearchOutcome};
pub use spatial::SpatialIndex;
pub use transfers::TransferTable;

use std::sync::Arc;

use config::WalkConfig;

/// The set of immutable, load-once collaborators the search needs. Built
/// once at startup and shared (via `Arc`) across every request: the
/// feed store, spatial index, and transfer table never change after
/// construction, so requests can read them concurrently without
/// locking.
pub struct Engine {
    pub feed: FeedStore,
    pub spatial: SpatialIndex,
    pub transfers: TransferTable,
    pub walk_config: WalkConfig,
}

impl Engine {
    pub fn new(feed: FeedStore) -> Self {
        Self::with_walk_config(feed, WalkConfig::default())
    }

    pub fn with_walk_config(feed: FeedStore, walk_config: WalkConfig) -> Self {
        let spatial = SpatialIndex::build(feed.stops());
        let transfers = TransferTable::build_with_config(&feed, walk_config);
        Self {
            feed,
            spatial,
            transfers,
            walk_config,
        }
    }

    pub fn shared(feed: FeedStore) -> Arc<Self> {
        Arc::new(Self::new(feed))
    }

    pub fn query(&self, params: &SearchParams) -> SearchOutcome {
        search::run_isochrone(
            &self.feed,
            &self.spatial,
            Some(&self.transfers),
            self.walk_config,
            params,
        )
    }
}
