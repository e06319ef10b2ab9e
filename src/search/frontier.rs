//! Exploration frontier: a priority queue of boarding events, keyed on
//! effective departure with transfer count as the tiebreak, replacing
//! a naive linear scan over all pending boardings.
//!
//! Modeled directly on the canonical `std::collections::BinaryHeap`
//! "Dijkstra" idiom: derive `Eq`/`PartialEq` on the whole record, but
//! hand-write `Ord`/`PartialOrd` on just the ordering keys, reversed so
//! the max-heap pops the smallest (departure_secs, transfer_count).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::feed::model::{RouteId, StopId, TripId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardingRecord {
    pub stop: StopId,
    pub trip: TripId,
    pub route: RouteId,
    pub departure_secs: u32,
    pub boarding_sequence: u32,
    pub transfer_count: u32,
    pub previous_trip: Option<TripId>,
}

impl Ord for BoardingRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .departure_secs
            .cmp(&self.departure_secs)
            .then_with(|| other.transfer_count.cmp(&self.transfer_count))
    }
}

impl PartialOrd for BoardingRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
pub struct Frontier {
    heap: BinaryHeap<BoardingRecord>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: BoardingRecord) {
        self.heap.push(record);
    }

    pub fn pop(&mut self) -> Option<BoardingRecord> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(departure_secs: u32, transfer_count: u32) -> BoardingRecord {
        BoardingRecord {
            stop: StopId(1),
            trip: TripId(1),
            route: RouteId(1),
            departure_secs,
            boarding_sequence: 0,
            transfer_count,
            previous_trip: None,
        }
    }

    #[test]
    fn pops_earliest_departure_first() {
        let mut frontier = Frontier::new();
        assert!(frontier.is_empty());

        frontier.push(record(900, 0));
        frontier.push(record(300, 0));
        frontier.push(record(600, 0));
        assert_eq!(frontier.len(), 3);

        assert_eq!(frontier.pop().unwrap().departure_secs, 300);
        assert_eq!(frontier.pop().unwrap().departure_secs, 600);
        assert_eq!(frontier.pop().unwrap().departure_secs, 900);
        assert!(frontier.is_empty());
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn ties_on_departure_prefer_fewer_transfers() {
        let mut frontier = Frontier::new();
        frontier.push(record(300, 2));
        frontier.push(record(300, 0));
        frontier.push(record(300, 1));

        assert_eq!(frontier.pop().unwrap().transfer_count, 0);
        assert_eq!(frontier.pop().unwrap().transfer_count, 1);
        assert_eq!(frontier.pop().unwrap().transfer_count, 2);
    }
}
