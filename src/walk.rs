//! Distance and walking-time conversions.
//!
//! Walking distance uses the local equirectangular approximation
//! (including which latitude serves as the reference) rather than the
//! great-circle chord distance `spatial.rs` uses for its KD-tree
//! queries, since at walking scale the flat-earth approximation is
//! simpler and the error is negligible.

use crate::config::WalkConfig;
use crate::feed::model::StopId;
use crate::feed::store::FeedStore;
use crate::spatial::SpatialIndex;

const LON_M_PER_DEG: f64 = 111_320.0;
const LAT_M_PER_DEG: f64 = 110_540.0;

/// Equirectangular distance in meters between (lat_a, lon_a) and
/// (lat_b, lon_b), using `lat_a` as the reference latitude for the
/// longitude scale factor.
pub fn distance_m(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let dx = LON_M_PER_DEG * lat_a.to_radians().cos() * (lon_b - lon_a);
    let dy = LAT_M_PER_DEG * (lat_b - lat_a);
    (dx * dx + dy * dy).sqrt()
}

pub struct WalkModel {
    config: WalkConfig,
}

impl WalkModel {
    pub fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    /// Walking time in whole seconds (rounded down, matching
    /// `seconds = distance / speed` with integer truncation, e.g. the
    /// 800m/1.25 m/s = 640s boundary case).
    pub fn walk_time_secs(&self, distance_m: f64) -> u32 {
        (distance_m / self.config.straight_walking_speed_mps) as u32
    }

    /// Stops within `max_m` of (lat, lon), filtered by true
    /// equirectangular distance and sorted ascending by distance. The
    /// spatial index is queried with a fixed ±0.05° box as a
    /// pre-filter, independent of `max_m`; candidates further than
    /// `max_m` are discarded below.
    pub fn nearest_stops(
        &self,
        index: &SpatialIndex,
        feed: &FeedStore,
        lat: f64,
        lon: f64,
        max_m: f64,
    ) -> Vec<(StopId, f64)> {
        let candidates = index.stops_in_bbox(lon - 0.05, lat - 0.05, lon + 0.05, lat + 0.05);

        let mut nearby: Vec<(StopId, f64)> = candidates
            .into_iter()
            .filter_map(|id| {
                let stop = feed.stop(id)?;
                let d = distance_m(lat, lon, stop.lat, stop.lon);
                (d <= max_m).then_some((id, d))
            })
            .collect();

        nearby.sort_by(|a, b| a.1.total_cmp(&b.1));
        nearby
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_walk_distance_boundary_is_640_seconds() {
        let walk = WalkModel::new(WalkConfig::default());
        assert_eq!(walk.walk_time_secs(800.0), 640);
    }

    #[test]
    fn distance_is_zero_at_same_point() {
        assert_eq!(distance_m(51.5, -0.1, 51.5, -0.1), 0.0);
    }

    #[test]
    fn distance_uses_origin_latitude_as_reference() {
        // A one-degree longitude step should shrink with cos(lat) of
        // the *first* point, not the second.
        let at_equator = distance_m(0.0, 0.0, 0.0, 1.0);
        let at_high_lat = distance_m(60.0, 0.0, 60.0, 1.0);
        assert!(at_high_lat < at_equator);
    }
}
