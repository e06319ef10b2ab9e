//! Service calendar resolution: a weekday-mask calendar entry with a
//! validity range, overridable per-date by an ADD or REMOVE exception.

use chrono::{Datelike, NaiveDate};

use crate::feed::model::{ExceptionKind, ServiceId};
use crate::feed::store::FeedStore;

/// Resolves whether `service` runs on `date`: out-of-range dates are
/// inactive regardless of exceptions, an explicit exception (ADD or
/// REMOVE) on the date overrides the weekday mask, and otherwise the
/// weekday mask decides.
pub fn service_active(feed: &FeedStore, service: ServiceId, date: NaiveDate) -> bool {
    let Some(entry) = feed.calendar_entry(service) else {
        return false;
    };

    if date < entry.start_date || date > entry.end_date {
        return false;
    }

    let weekday = date.weekday().num_days_from_monday() as usize;
    let candidate = entry.weekdays[weekday];

    match feed.exception(service, date) {
        Some(ExceptionKind::Added) => true,
        Some(ExceptionKind::Removed) => false,
        None => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::model::{CalendarEntry, CalendarException};
    use chrono::NaiveDate;

    fn store_with(entry: Option<CalendarEntry>, exceptions: Vec<CalendarException>) -> FeedStore {
        FeedStore::from_tables(
            vec![],
            vec![],
            vec![],
            vec![],
            entry.into_iter().collect(),
            exceptions,
        )
        .unwrap()
    }

    #[test]
    fn no_entry_is_inactive() {
        let feed = store_with(None, vec![]);
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert!(!service_active(&feed, ServiceId(1), date));
    }

    #[test]
    fn weekday_mask_governs_default() {
        let entry = CalendarEntry {
            service_id: ServiceId(1),
            weekdays: [true, false, false, false, false, false, false],
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        };
        let feed = store_with(Some(entry), vec![]);

        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        assert!(service_active(&feed, ServiceId(1), monday));
        assert!(!service_active(&feed, ServiceId(1), tuesday));
    }

    #[test]
    fn remove_exception_overrides_weekday() {
        let entry = CalendarEntry {
            service_id: ServiceId(1),
            weekdays: [true, true, true, true, true, true, true],
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        };
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let feed = store_with(
            Some(entry),
            vec![CalendarException {
                service_id: ServiceId(1),
                date,
                kind: ExceptionKind::Removed,
            }],
        );
        assert!(!service_active(&feed, ServiceId(1), date));
    }

    #[test]
    fn add_exception_overrides_weekday() {
        let entry = CalendarEntry {
            service_id: ServiceId(1),
            weekdays: [false, false, false, false, false, false, false],
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        };
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let feed = store_with(
            Some(entry),
            vec![CalendarException {
                service_id: ServiceId(1),
                date,
                kind: ExceptionKind::Added,
            }],
        );
        assert!(service_active(&feed, ServiceId(1), date));
    }

    #[test]
    fn outside_date_range_is_inactive_even_with_add() {
        let entry = CalendarEntry {
            service_id: ServiceId(1),
            weekdays: [true, true, true, true, true, true, true],
            start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        };
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let feed = store_with(Some(entry), vec![]);
        assert!(!service_active(&feed, ServiceId(1), date));
    }
}
