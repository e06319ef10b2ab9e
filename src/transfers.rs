//! Precomputed near-neighbor walks between stops.

use std::collections::HashMap;

use crate::config::WalkConfig;
use crate::feed::model::{StopId, TransferEdge};
use crate::feed::store::FeedStore;
use crate::spatial::SpatialIndex;
use crate::walk::{distance_m, WalkModel};

pub struct TransferTable {
    transfers: HashMap<StopId, Vec<TransferEdge>>,
}

impl TransferTable {
    /// Builds the table from the feed's stops via a spatial index, with
    /// a ±0.01° bounding-box pre-filter per stop.
    pub fn build(feed: &FeedStore) -> Self {
        Self::build_with_config(feed, WalkConfig::default())
    }

    pub fn build_with_config(feed: &FeedStore, config: WalkConfig) -> Self {
        let index = SpatialIndex::build(feed.stops());
        let walk = WalkModel::new(config);
        let mut transfers: HashMap<StopId, Vec<TransferEdge>> = HashMap::new();

        for from in feed.stops() {
            let candidates =
                index.stops_in_bbox(from.lon - 0.01, from.lat - 0.01, from.lon + 0.01, from.lat + 0.01);

            let mut edges = Vec::new();
            for to_id in candidates {
                if to_id == from.id {
                    continue;
                }
                let Some(to) = feed.stop(to_id) else {
                    continue;
                };
                let d = distance_m(from.lat, from.lon, to.lat, to.lon);
                if d <= config.max_walk_distance_m {
                    edges.push(TransferEdge {
                        from_stop: from.id,
                        to_stop: to_id,
                        walk_distance_m: d,
                        walk_time_secs: walk.walk_time_secs(d),
                    });
                }
            }
            transfers.insert(from.id, edges);
        }

        Self { transfers }
    }

    /// Empty slice both for a stop with zero transfers and for an
    /// unknown stop id.
    pub fn transfers_from(&self, stop: StopId) -> &[TransferEdge] {
        self.transfers.get(&stop).map(Vec::as_slice).unwrap_or(&[])
    }
}
