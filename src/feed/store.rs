use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LoadError;
use crate::feed::model::{
    CalendarEntry, CalendarException, ExceptionKind, Route, RouteId, ServiceId, Stop, StopId,
    StopTime, Trip, TripId,
};

/// In-memory, read-only schedule tables plus the derived indices the
/// search needs. Built once by `from_tables`, then shared read-only
/// across every request.
#[derive(Serialize, Deserialize)]
pub struct FeedStore {
    stops: HashMap<StopId, Stop>,
    routes: HashMap<RouteId, Route>,
    trips: HashMap<TripId, Trip>,
    stop_times_by_stop: HashMap<StopId, Vec<StopTime>>,
    stop_times_by_trip: HashMap<TripId, Vec<StopTime>>,
    calendar: HashMap<ServiceId, CalendarEntry>,
    exceptions: HashMap<(ServiceId, chrono::NaiveDate), ExceptionKind>,
}

impl FeedStore {
    /// The one ingestion entry point: takes already-parsed rows (the
    /// feed loader's job, out of scope here) and builds the derived
    /// indices, rejecting a malformed feed as a programmer error rather
    /// than something the search can shrug off.
    pub fn from_tables(
        stops: Vec<Stop>,
        routes: Vec<Route>,
        trips: Vec<Trip>,
        stop_times: Vec<StopTime>,
        calendar: Vec<CalendarEntry>,
        exceptions: Vec<CalendarException>,
    ) -> Result<Self, LoadError> {
        let stops_by_id: HashMap<StopId, Stop> = stops.into_iter().map(|s| (s.id, s)).collect();
        let trips_by_id: HashMap<TripId, Trip> = trips.into_iter().map(|t| (t.id, t)).collect();
        let routes_by_id: HashMap<RouteId, Route> =
            routes.into_iter().map(|r| (r.id, r)).collect();

        for st in &stop_times {
            if !stops_by_id.contains_key(&st.stop_id) {
                warn!(stop = ?st.stop_id, trip = ?st.trip_id, "stop_time references unknown stop");
                return Err(LoadError::UnknownStop { stop: st.stop_id });
            }
            if !trips_by_id.contains_key(&st.trip_id) {
                warn!(trip = ?st.trip_id, "stop_time references unknown trip");
                return Err(LoadError::UnknownTrip { trip: st.trip_id });
            }
            if st.arrival_secs > st.departure_secs {
                return Err(LoadError::ArrivalAfterDeparture {
                    trip: st.trip_id,
                    stop: st.stop_id,
                });
            }
        }

        let mut stop_times_by_trip: HashMap<TripId, Vec<StopTime>> = HashMap::new();
        for st in &stop_times {
            stop_times_by_trip.entry(st.trip_id).or_default().push(*st);
        }
        for (trip, times) in stop_times_by_trip.iter_mut() {
            times.sort_unstable_by_key(|st| st.stop_sequence);
            for pair in times.windows(2) {
                if pair[0].stop_sequence >= pair[1].stop_sequence {
                    return Err(LoadError::NonMonotoneStopSequence {
                        trip: *trip,
                        at: pair[1].stop_sequence,
                    });
                }
            }
        }

        let mut stop_times_by_stop: HashMap<StopId, Vec<StopTime>> = HashMap::new();
        for st in &stop_times {
            stop_times_by_stop.entry(st.stop_id).or_default().push(*st);
        }
        for times in stop_times_by_stop.values_mut() {
            times.sort_unstable_by_key(|st| st.departure_secs);
        }

        let mut calendar_by_service = HashMap::new();
        for entry in calendar {
            if entry.start_date > entry.end_date {
                return Err(LoadError::InvalidCalendarRange {
                    start: entry.start_date,
                    end: entry.end_date,
                });
            }
            calendar_by_service.insert(entry.service_id, entry);
        }

        let exceptions = exceptions
            .into_iter()
            .map(|e| ((e.service_id, e.date), e.kind))
            .collect();

        Ok(Self {
            stops: stops_by_id,
            routes: routes_by_id,
            trips: trips_by_id,
            stop_times_by_stop,
            stop_times_by_trip,
            calendar: calendar_by_service,
            exceptions,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(postcard::from_bytes(&bytes)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let bytes = postcard::to_stdvec(self)?;
        std::fs::write(path, &bytes)?;
        Ok(())
    }

    /// All StopTimes at `stop` with `departure_secs >= from_secs`, in
    /// ascending departure order.
    pub fn stop_times_at(&self, stop: StopId, from_secs: u32) -> &[StopTime] {
        let Some(times) = self.stop_times_by_stop.get(&stop) else {
            return &[];
        };
        let idx = times.partition_point(|st| st.departure_secs < from_secs);
        &times[idx..]
    }

    /// All StopTimes of `trip` with `stop_sequence > from_sequence`, in
    /// stop_sequence order.
    pub fn stops_of_trip_after(&self, trip: TripId, from_sequence: u32) -> &[StopTime] {
        let Some(times) = self.stop_times_by_trip.get(&trip) else {
            return &[];
        };
        let idx = times.partition_point(|st| st.stop_sequence <= from_sequence);
        &times[idx..]
    }

    pub fn route_of(&self, trip: TripId) -> Option<&Route> {
        self.routes.get(&self.trip(trip)?.route_id)
    }

    pub fn service_of(&self, trip: TripId) -> Option<ServiceId> {
        self.trip(trip).map(|t| t.service_id)
    }

    pub fn trip(&self, trip: TripId) -> Option<&Trip> {
        self.trips.get(&trip)
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(&id)
    }

    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    pub fn calendar_entry(&self, service: ServiceId) -> Option<&CalendarEntry> {
        self.calendar.get(&service)
    }

    pub fn exception(&self, service: ServiceId, date: chrono::NaiveDate) -> Option<ExceptionKind> {
        self.exceptions.get(&(service, date)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> FeedStore {
        let stops = vec![
            Stop { id: StopId(1), name: "X".into(), lat: 0.0, lon: 0.0 },
            Stop { id: StopId(2), name: "Y".into(), lat: 0.0, lon: 0.01 },
        ];
        let routes = vec![Route {
            id: RouteId(1),
            short_name: "R1".into(),
            long_name: "Route 1".into(),
            color: None,
        }];
        let trips = vec![Trip {
            id: TripId(1),
            route_id: RouteId(1),
            service_id: ServiceId(1),
            headsign: "Y-bound".into(),
        }];
        let stop_times = vec![
            StopTime { trip_id: TripId(1), stop_id: StopId(1), stop_sequence: 0, arrival_secs: 100, departure_secs: 100 },
            StopTime { trip_id: TripId(1), stop_id: StopId(2), stop_sequence: 1, arrival_secs: 400, departure_secs: 400 },
        ];
        FeedStore::from_tables(stops, routes, trips, stop_times, vec![], vec![]).unwrap()
    }

    #[test]
    fn trip_route_and_service_lookups_agree() {
        let feed = sample_store();

        let trip = feed.trip(TripId(1)).expect("trip 1 exists");
        assert_eq!(trip.headsign, "Y-bound");
        assert_eq!(feed.route_of(TripId(1)).unwrap().id, RouteId(1));
        assert_eq!(feed.service_of(TripId(1)), Some(ServiceId(1)));

        assert!(feed.trip(TripId(99)).is_none());
        assert!(feed.route_of(TripId(99)).is_none());
        assert!(feed.service_of(TripId(99)).is_none());
    }

    #[test]
    fn stop_times_at_is_ordered_by_departure_from_the_cutoff() {
        let feed = sample_store();
        let times = feed.stop_times_at(StopId(1), 0);
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].departure_secs, 100);

        assert!(feed.stop_times_at(StopId(1), 101).is_empty());
    }

    #[test]
    fn stops_of_trip_after_returns_remaining_stops_in_sequence_order() {
        let feed = sample_store();
        let after = feed.stops_of_trip_after(TripId(1), 0);
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].stop_id, StopId(2));

        assert!(feed.stops_of_trip_after(TripId(1), 1).is_empty());
    }

    #[test]
    fn unknown_trip_or_stop_yields_empty_slices() {
        let feed = sample_store();
        assert!(feed.stop_times_at(StopId(99), 0).is_empty());
        assert!(feed.stops_of_trip_after(TripId(99), 0).is_empty());
    }
}
