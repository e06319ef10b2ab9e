//! Time-expanded isochrone search.
//!
//! Label-setting, multi-source search over boarding events. Selection
//! is a priority queue keyed on `(departure_secs, transfer_count)`
//! (`frontier::Frontier`); dominance is enforced via
//! `SearchState::improve_stop`/`improve_edge`.

pub mod aggregator;
pub mod frontier;
pub mod state;

use tracing::{debug, warn};

use crate::config::{SearchParams, WalkConfig, MIN_TRANSFER_SECONDS};
use crate::feed::model::StopId;
use crate::feed::store::FeedStore;
use crate::spatial::SpatialIndex;
use crate::transfers::TransferTable;
use crate::walk::WalkModel;

use aggregator::{Aggregator, EdgeKey, IsochroneResult};
use frontier::{BoardingRecord, Frontier};
use state::SearchState;

/// Outcome of a single isochrone request: the aggregated result plus
/// whether the frontier cap was hit.
#[derive(Debug)]
pub struct SearchOutcome {
    pub result: IsochroneResult,
    pub truncated: bool,
}

/// Runs one isochrone search. `transfers` is `None` to exercise the
/// nearby-stop fallback for when the table was never built;
/// `Engine::shared` always builds one, so production callers pass
/// `Some`.
pub fn run_isochrone(
    feed: &FeedStore,
    spatial: &SpatialIndex,
    transfers: Option<&TransferTable>,
    walk_config: WalkConfig,
    params: &SearchParams,
) -> SearchOutcome {
    let walk = WalkModel::new(walk_config);
    let mut state = SearchState::new();
    let mut aggregator = Aggregator::new(params.collect_samples);
    let mut frontier = Frontier::new();
    let mut truncated = false;

    let t_start = params.t_start;
    let deadline = t_start.saturating_add(params.budget);

    // Seeding: every stop within walking distance of the origin.
    let nearby = walk.nearest_stops(
        spatial,
        feed,
        params.origin_lat,
        params.origin_lon,
        walk_config.max_walk_distance_m,
    );

    for (stop_id, distance_m) in nearby {
        let walk_secs = walk.walk_time_secs(distance_m);
        let arrive = t_start.saturating_add(walk_secs);
        if arrive > deadline {
            continue;
        }

        state.improve_stop(stop_id, arrive);
        let Some(stop) = feed.stop(stop_id) else {
            continue;
        };
        aggregator.record(
            EdgeKey::Stop(stop_id),
            (arrive - t_start) as i64,
            stop.lat,
            stop.lon,
        );

        enqueue_departures(
            feed,
            &mut state,
            &mut frontier,
            &mut truncated,
            stop_id,
            arrive,
            0,
            None,
            params,
        );
    }

    // Main loop.
    while let Some(record) = frontier.pop() {
        if record.departure_secs > deadline {
            // Frontier is ordered ascending by departure_secs (ties
            // broken by fewer transfers), so every remaining record
            // is also out of budget.
            break;
        }

        let trip_stops = feed.stops_of_trip_after(record.trip, record.boarding_sequence);

        for st in trip_stops {
            if st.arrival_secs > deadline {
                // stops_of_trip_after is in stop_sequence order, which
                // is monotone in arrival_secs.
                break;
            }

            let edge_key = EdgeKey::Trip(record.trip, st.stop_id);
            if let Some(stop) = feed.stop(st.stop_id) {
                if state.improve_edge(edge_key, st.arrival_secs) {
                    aggregator.record(
                        edge_key,
                        (st.arrival_secs - t_start) as i64,
                        stop.lat,
                        stop.lon,
                    );
                }
            }

            if !state.improve_stop(st.stop_id, st.arrival_secs) {
                continue;
            }

            fan_out_transfers(
                feed,
                spatial,
                transfers,
                &walk,
                walk_config,
                &mut state,
                &mut frontier,
                &mut truncated,
                st.stop_id,
                st.arrival_secs,
                record.route,
                record.trip,
                record.transfer_count,
                params,
            );
        }
    }

    if truncated {
        warn!(
            max_frontier = params.max_frontier,
            "isochrone search hit the frontier cap; returning partial result"
        );
    }

    SearchOutcome {
        result: aggregator.into_result(),
        truncated,
    }
}

#[allow(clippy::too_many_arguments)]
fn enqueue_departures(
    feed: &FeedStore,
    state: &mut SearchState,
    frontier: &mut Frontier,
    truncated: &mut bool,
    stop: StopId,
    from_secs: u32,
    transfer_count: u32,
    previous_trip: Option<crate::feed::model::TripId>,
    params: &SearchParams,
) {
    for st in feed.stop_times_at(stop, from_secs) {
        let Some(service) = feed.service_of(st.trip_id) else {
            continue;
        };
        if !state.service_active(feed, service, params.date) {
            continue;
        }
        let Some(route) = feed.route_of(st.trip_id) else {
            continue;
        };

        if frontier.len() >= params.max_frontier {
            *truncated = true;
            continue;
        }

        frontier.push(BoardingRecord {
            stop,
            trip: st.trip_id,
            route: route.id,
            departure_secs: st.departure_secs,
            boarding_sequence: st.stop_sequence,
            transfer_count,
            previous_trip,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn fan_out_transfers(
    feed: &FeedStore,
    spatial: &SpatialIndex,
    transfers: Option<&TransferTable>,
    walk: &WalkModel,
    walk_config: WalkConfig,
    state: &mut SearchState,
    frontier: &mut Frontier,
    truncated: &mut bool,
    from_stop: StopId,
    arrival_secs: u32,
    current_route: crate::feed::model::RouteId,
    current_trip: crate::feed::model::TripId,
    transfer_count: u32,
    params: &SearchParams,
) {
    let deadline = params.t_start.saturating_add(params.budget);

    // Identity transfer first: staying at the arrival stop needs no
    // MIN_TRANSFER_SECONDS.
    let candidates: Vec<(StopId, u32)> = match transfers {
        Some(table) => std::iter::once((from_stop, 0))
            .chain(
                table
                    .transfers_from(from_stop)
                    .iter()
                    .map(|t| (t.to_stop, t.walk_time_secs)),
            )
            .collect(),
        None => {
            // Fallback: the table was never built, so recompute nearby
            // stops from this stop's own coordinates.
            debug!(?from_stop, "transfer table unavailable, using nearby-stop fallback");
            let mut edges = vec![(from_stop, 0)];
            if let Some(stop) = feed.stop(from_stop) {
                edges.extend(
                    walk.nearest_stops(
                        spatial,
                        feed,
                        stop.lat,
                        stop.lon,
                        walk_config.max_walk_distance_m,
                    )
                    .into_iter()
                    .map(|(id, dist)| (id, walk.walk_time_secs(dist))),
                );
            }
            edges
        }
    };

    for (to_stop, walk_t) in candidates {
        let dwell = if to_stop == from_stop { 0 } else { MIN_TRANSFER_SECONDS };
        let ready_time = arrival_secs.saturating_add(walk_t).saturating_add(dwell);
        if ready_time > deadline {
            continue;
        }

        for st in feed.stop_times_at(to_stop, ready_time) {
            let Some(service) = feed.service_of(st.trip_id) else {
                continue;
            };
            if !state.service_active(feed, service, params.date) {
                continue;
            }
            let Some(route) = feed.route_of(st.trip_id) else {
                continue;
            };

            let penalty = if route.id != current_route {
                params.transfer_penalty
            } else {
                0
            };
            let eff_departure = st.departure_secs.saturating_add(penalty);
            if eff_departure > deadline {
                continue;
            }

            if frontier.len() >= params.max_frontier {
                *truncated = true;
                continue;
            }

            frontier.push(BoardingRecord {
                stop: to_stop,
                trip: st.trip_id,
                route: route.id,
                departure_secs: eff_departure,
                boarding_sequence: st.stop_sequence,
                transfer_count: transfer_count + 1,
                previous_trip: Some(current_trip),
            });
        }
    }
}
