//! Result aggregator.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::feed::model::{StopId, TripId};

/// The output identifier for a reached graph element.
///
/// Known limitation: a stop served twice by the same trip (a loop
/// route) collapses onto one `Trip` key, since the key does not
/// distinguish the boarding instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKey {
    /// A stop reached by final walk from the origin: `s:<stop_id>`.
    Stop(StopId),
    /// A stop reached while riding a trip: `t:<trip_id>:<stop_id>`.
    Trip(TripId, StopId),
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKey::Stop(s) => write!(f, "s:{}", s.0),
            EdgeKey::Trip(t, s) => write!(f, "t:{}:{}", t.0, s.0),
        }
    }
}

/// A single visualization sample: `(lat, lon, seconds_from_start)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ReachedPoint {
    pub lat: f64,
    pub lon: f64,
    pub seconds_from_start: i64,
}

/// Collects the edge-key -> seconds-from-start mapping during search.
/// No deduplication beyond improvement: each edge-key appears at most
/// once; the point stream is append-only in discovery order.
#[derive(Default)]
pub struct Aggregator {
    edge_times: HashMap<EdgeKey, i64>,
    points: Vec<ReachedPoint>,
    collect_samples: bool,
}

impl Aggregator {
    pub fn new(collect_samples: bool) -> Self {
        Self {
            edge_times: HashMap::new(),
            points: Vec::new(),
            collect_samples,
        }
    }

    /// Records `key -> seconds` if it is new or an improvement over any
    /// prior observation; otherwise a no-op. Returns whether it was
    /// recorded.
    pub fn record(&mut self, key: EdgeKey, seconds: i64, lat: f64, lon: f64) -> bool {
        let improved = match self.edge_times.get(&key) {
            Some(&existing) => seconds < existing,
            None => true,
        };
        if improved {
            self.edge_times.insert(key, seconds);
            if self.collect_samples {
                self.points.push(ReachedPoint {
                    lat,
                    lon,
                    seconds_from_start: seconds,
                });
            }
        }
        improved
    }

    pub fn into_result(self) -> IsochroneResult {
        IsochroneResult {
            edge_times: self
                .edge_times
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            points: self.points,
        }
    }
}

/// The final, string-keyed output.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IsochroneResult {
    pub edge_times: HashMap<String, i64>,
    pub points: Vec<ReachedPoint>,
}
