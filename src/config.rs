use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Walk-model and search tunables, pulled out of the search loop so the
/// constants live in one place instead of scattered through the
/// algorithm.
#[derive(Clone, Copy, Debug)]
pub struct WalkConfig {
    pub straight_walking_speed_mps: f64,
    pub walking_speed_mps: f64,
    pub max_walk_distance_m: f64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            straight_walking_speed_mps: 1.25,
            walking_speed_mps: 1.42,
            max_walk_distance_m: 800.0,
        }
    }
}

/// One isochrone request.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub origin_lat: f64,
    pub origin_lon: f64,
    #[serde(default = "default_t_start")]
    pub t_start: u32,
    #[serde(default = "default_budget")]
    pub budget: u32,
    #[serde(default = "default_transfer_penalty")]
    pub transfer_penalty: u32,
    pub date: NaiveDate,
    /// Hard cap on how many boarding records may ever sit in the
    /// frontier at once, to defend against pathological feeds.
    #[serde(default = "default_max_frontier")]
    pub max_frontier: usize,
    /// When set, visualization-mode sampling is recorded alongside the
    /// edge_times map.
    #[serde(default)]
    pub collect_samples: bool,
}

fn default_t_start() -> u32 {
    28_800
}

fn default_budget() -> u32 {
    3_600
}

fn default_transfer_penalty() -> u32 {
    60
}

fn default_max_frontier() -> usize {
    200_000
}

impl SearchParams {
    pub fn new(origin_lat: f64, origin_lon: f64, date: NaiveDate) -> Self {
        Self {
            origin_lat,
            origin_lon,
            t_start: default_t_start(),
            budget: default_budget(),
            transfer_penalty: default_transfer_penalty(),
            date,
            max_frontier: default_max_frontier(),
            collect_samples: false,
        }
    }
}

pub const MIN_TRANSFER_SECONDS: u32 = 35;
