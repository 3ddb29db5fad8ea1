//! Combined scan.
//!
//! Runs a forward sweep to establish the earliest possible arrival, then an
//! arrive-by sweep bounded at that arrival. The result both arrives as
//! early as possible and departs as late as possible, already grouped into
//! legs.

use std::collections::HashMap;

use crate::domain::{Crs, Journey, Time, TimetabledConnection};

use super::arrive_by::ArriveByScanner;
use super::forward::{ConnectionScanner, InterchangeTimes, TransferMap};

/// Two-phase planner that optimises arrival first, then departure.
pub struct CombinedScanner<'a> {
    forward: ConnectionScanner<'a>,
    backward: ArriveByScanner<'a>,
}

impl<'a> CombinedScanner<'a> {
    /// `timetable` must be sorted ascending by departure time.
    pub fn new(
        timetable: &'a [TimetabledConnection],
        transfers: &'a TransferMap,
        interchange: &'a InterchangeTimes,
    ) -> Self {
        Self {
            forward: ConnectionScanner::new(timetable, transfers, interchange),
            backward: ArriveByScanner::new(timetable, transfers, interchange),
        }
    }

    /// Earliest-arriving, latest-departing journey from `origin` to
    /// `destination` leaving at or after `departure`.
    pub fn plan(&self, origin: Crs, destination: Crs, departure: Time) -> Option<Journey> {
        let arrival = self.forward.earliest_arrival(origin, destination, departure)?;
        self.backward.scan(origin, destination, arrival)
    }

    /// One optimal journey per station reachable from `origin`.
    ///
    /// Runs a single forward tree sweep, then one arrive-by scan per
    /// reachable station. The per-station scans dominate the cost; this is
    /// intended for offline work, not the query path.
    pub fn plan_tree(&self, origin: Crs, departure: Time) -> HashMap<Crs, Journey> {
        let tree = self.forward.scan_tree(origin, departure);

        let mut journeys = HashMap::new();
        for station in tree.stations() {
            if station == origin {
                continue;
            }
            let Some(arrival) = tree.arrival_at(station) else {
                continue;
            };
            if let Some(journey) = self.backward.scan(origin, station, arrival) {
                journeys.insert(station, journey);
            }
        }
        journeys
    }
}
