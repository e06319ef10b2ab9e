//! 2-D lookup of stops by geographic bounding box.
//!
//! Stops are projected onto the unit sphere and indexed with `kiddo`'s
//! `SquaredEuclidean` metric, which gives an exact great-circle
//! `within` radius query. `kiddo` has no native rectangle query, so
//! `stops_in_bbox` runs a radius query anchored at the bbox center
//! (radius = half the bbox diagonal) and then filters to the exact
//! rectangle: over-fetch from the tree, then filter precisely.

use std::collections::HashMap;

use kiddo::{KdTree, SquaredEuclidean};

use crate::feed::model::{Stop, StopId};

const R_EARTH_M: f64 = 6_371_008.8;

fn to_unit(lat_deg: f64, lon_deg: f64) -> [f64; 3] {
    let (lat, lon) = (lat_deg.to_radians(), lon_deg.to_radians());
    let (clat, clon, slat, slon) = (lat.cos(), lon.cos(), lat.sin(), lon.sin());
    [clat * clon, clat * slon, slat]
}

#[inline]
fn chord2_to_meters(chord2: f64) -> f64 {
    let c = chord2.max(0.0).sqrt();
    let theta = 2.0 * (c / 2.0).clamp(-1.0, 1.0).asin();
    R_EARTH_M * theta
}

#[inline]
fn meters_to_chord2(d_m: f64) -> f64 {
    let half = d_m / (2.0 * R_EARTH_M);
    4.0 * half.sin().powi(2)
}

pub struct SpatialIndex {
    tree: KdTree<f64, 3>,
    coords: HashMap<StopId, (f64, f64)>,
}

impl SpatialIndex {
    /// Builds the index from every stop. Read-only after this.
    pub fn build<'a>(stops: impl Iterator<Item = &'a Stop>) -> Self {
        let mut tree = KdTree::new();
        let mut coords = HashMap::new();
        for stop in stops {
            tree.add(&to_unit(stop.lat, stop.lon), stop.id.0 as u64);
            coords.insert(stop.id, (stop.lat, stop.lon));
        }
        Self { tree, coords }
    }

    /// Stops within `radius_m` of (lat, lon), nearest first is not
    /// guaranteed — callers that need sorted-by-distance should sort
    /// the result themselves (see `WalkModel::nearest_stops`).
    pub fn stops_within_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
    ) -> impl Iterator<Item = (StopId, f64)> + '_ {
        self.tree
            .within::<SquaredEuclidean>(&to_unit(lat, lon), meters_to_chord2(radius_m))
            .into_iter()
            .map(|n| (StopId(n.item as u32), chord2_to_meters(n.distance)))
    }

    /// Stops inside the rectangle `[min_lon, max_lon] x [min_lat,
    /// max_lat]`. The caller supplies the degree-unit padding.
    pub fn stops_in_bbox(
        &self,
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    ) -> Vec<StopId> {
        let center_lat = (min_lat + max_lat) / 2.0;
        let center_lon = (min_lon + max_lon) / 2.0;

        // Half-diagonal in meters, generous enough to over-fetch from
        // the tree before the exact rectangle filter below.
        let dx = 111_320.0 * center_lat.to_radians().cos() * (max_lon - min_lon) / 2.0;
        let dy = 110_540.0 * (max_lat - min_lat) / 2.0;
        let half_diagonal = (dx * dx + dy * dy).sqrt();

        self.tree
            .within::<SquaredEuclidean>(
                &to_unit(center_lat, center_lon),
                meters_to_chord2(half_diagonal.max(1.0)),
            )
            .into_iter()
            .filter_map(|n| {
                let id = StopId(n.item as u32);
                let &(lat, lon) = self.coords.get(&id)?;
                (lon >= min_lon && lon <= max_lon && lat >= min_lat && lat <= max_lat).then_some(id)
            })
            .collect()
    }
}
