use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct StopId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct RouteId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct TripId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct ServiceId(pub u32);

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Route {
    pub id: RouteId,
    pub short_name: String,
    pub long_name: String,
    /// Present in GTFS feeds (`route_color`); absent in e.g. rail CIF
    /// timetables, hence optional.
    pub color: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
    pub service_id: ServiceId,
    pub headsign: String,
}

/// One scheduled stop visit of a trip. `arrival_secs`/`departure_secs`
/// are seconds since midnight of the service day and MAY exceed 86_400
/// for trips that run past midnight.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub stop_sequence: u32,
    pub arrival_secs: u32,
    pub departure_secs: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CalendarEntry {
    pub service_id: ServiceId,
    /// Monday first, matching `chrono::Weekday::num_days_from_monday`.
    pub weekdays: [bool; 7],
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum ExceptionKind {
    Added,
    Removed,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CalendarException {
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub kind: ExceptionKind,
}

/// A precomputed near-neighbor walk between two distinct stops.
/// `from_stop != to_stop`, `walk_distance_m <= MAX_WALK`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct TransferEdge {
    pub from_stop: StopId,
    pub to_stop: StopId,
    pub walk_distance_m: f64,
    pub walk_time_secs: u32,
}

/// Parses a GTFS-style `"HH:MM:SS"` time into seconds since midnight.
/// `HH` may exceed 23 for trips that run past midnight; this is the
/// one piece of the feed-loader's wire format this crate owns, since
/// the store's `*_secs` fields are the contract the (out of scope)
/// loader hands values through.
pub fn parse_hhmmss(s: &str) -> Option<u32> {
    let mut parts = s.splitn(3, ':');
    let h: u32 = parts.next()?.parse().ok()?;
    let m: u32 = parts.next()?.parse().ok()?;
    let sec: u32 = parts.next()?.parse().ok()?;
    if m >= 60 || sec >= 60 {
        return None;
    }
    Some(h * 3_600 + m * 60 + sec)
}

/// Inverse of [`parse_hhmmss`].
pub fn format_hhmmss(secs: u32) -> String {
    let h = secs / 3_600;
    let m = (secs % 3_600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
