use chrono::NaiveDate;
use thiserror::Error;

use crate::feed::model::{StopId, TripId};

/// Programmer-error class: a malformed feed is fatal at load time
/// rather than something the search can shrug off.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("stop_sequence is not strictly increasing for trip {trip:?} at sequence {at}")]
    NonMonotoneStopSequence { trip: TripId, at: u32 },

    #[error("stop time for trip {trip:?} stop {stop:?} has arrival_secs > departure_secs")]
    ArrivalAfterDeparture { trip: TripId, stop: StopId },

    #[error("stop_times references unknown stop {stop:?}")]
    UnknownStop { stop: StopId },

    #[error("stop_times references unknown trip {trip:?}")]
    UnknownTrip { trip: TripId },

    #[error("calendar entry start_date {start} is after end_date {end}")]
    InvalidCalendarRange { start: NaiveDate, end: NaiveDate },
}

/// Invalid-request class: surfaced to the caller, not logged as an
/// anomaly.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("origin ({lat}, {lon}) is outside the supported area")]
    OutOfArea { lat: f64, lon: f64 },

    #[error("budget must be >= 0, got {0}")]
    InvalidBudget(i64),

    #[error("t_start must be >= 0, got {0}")]
    InvalidTStart(i64),

    #[error("transfer_penalty must be >= 0, got {0}")]
    InvalidTransferPenalty(i64),
}
