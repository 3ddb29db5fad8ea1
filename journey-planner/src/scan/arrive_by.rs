//! Arrive-by scan.
//!
//! The mirror image of the forward sweep: given a latest acceptable
//! arrival, find the journey that departs the origin as late as possible.
//! The timetable is walked in descending departure order and the state
//! tracks the latest feasible departure per station, working backward from
//! the destination.

use std::collections::HashMap;

use crate::domain::{
    Connection, Crs, Journey, Leg, Time, TimetabledConnection, TransferConnection,
};

use super::forward::{InterchangeTimes, TransferMap};

/// Latest-departure scanner for arrive-by queries.
///
/// Construction inverts the transfer map to index incoming transfers by
/// destination, so build once and reuse across queries.
pub struct ArriveByScanner<'a> {
    timetable: &'a [TimetabledConnection],
    incoming_transfers: HashMap<Crs, Vec<TransferConnection>>,
    interchange: &'a InterchangeTimes,
}

#[derive(Debug, Default)]
struct BackwardState {
    departures: HashMap<Crs, Time>,
    successor: HashMap<Crs, Connection>,
}

impl<'a> ArriveByScanner<'a> {
    /// `timetable` must be sorted ascending by departure time; the scan
    /// iterates it in reverse.
    pub fn new(
        timetable: &'a [TimetabledConnection],
        transfers: &TransferMap,
        interchange: &'a InterchangeTimes,
    ) -> Self {
        let mut incoming_transfers: HashMap<Crs, Vec<TransferConnection>> = HashMap::new();
        for transfer in transfers.values().flatten() {
            incoming_transfers
                .entry(transfer.destination())
                .or_default()
                .push(transfer.clone());
        }
        Self {
            timetable,
            incoming_transfers,
            interchange,
        }
    }

    /// Find the latest-departing journey from `origin` that reaches
    /// `destination` no later than `arrival`.
    pub fn scan(&self, origin: Crs, destination: Crs, arrival: Time) -> Option<Journey> {
        let state = self.sweep(origin, destination, arrival);
        self.assemble(&state, origin, destination)
    }

    /// Latest feasible departure from `origin`, without assembling legs.
    pub fn latest_departure(&self, origin: Crs, destination: Crs, arrival: Time) -> Option<Time> {
        let state = self.sweep(origin, destination, arrival);
        state.departures.get(&origin).copied()
    }

    fn sweep(&self, origin: Crs, destination: Crs, arrival: Time) -> BackwardState {
        let mut state = BackwardState::default();
        state.departures.insert(destination, arrival);
        self.relax_incoming_transfers(&mut state, destination);

        for conn in self.timetable.iter().rev() {
            // Connections departing before the origin's current best cannot
            // improve it, and everything after them departs earlier still.
            if let Some(&best) = state.departures.get(&origin)
                && conn.departure_time() < best
            {
                break;
            }

            if self.is_usable(&state, conn) && self.improves(&state, conn) {
                state.departures.insert(conn.origin(), conn.departure_time());
                state
                    .successor
                    .insert(conn.origin(), Connection::Timetabled(conn.clone()));
                self.relax_incoming_transfers(&mut state, conn.origin());
            }
        }

        state
    }

    /// A connection is usable iff its destination already has an onward
    /// departure it can make, counting interchange time when the onward
    /// connection is a different service.
    fn is_usable(&self, state: &BackwardState, conn: &TimetabledConnection) -> bool {
        let Some(&onward) = state.departures.get(&conn.destination()) else {
            return false;
        };
        onward >= conn.arrival_time() + self.interchange_after(state, conn)
    }

    fn improves(&self, state: &BackwardState, conn: &TimetabledConnection) -> bool {
        state
            .departures
            .get(&conn.origin())
            .is_none_or(|&best| conn.departure_time() > best)
    }

    fn interchange_after(&self, state: &BackwardState, conn: &TimetabledConnection) -> i32 {
        match state.successor.get(&conn.destination()) {
            None => 0,
            Some(Connection::Timetabled(next)) if next.service() == conn.service() => 0,
            Some(_) => self.interchange.get(&conn.destination()).copied().unwrap_or(0),
        }
    }

    /// Pull each station's latest departure backward through transfers that
    /// end at it. A transfer into `station` means its own origin can leave
    /// as late as the station's departure minus the walk, provided the
    /// transfer's window covers that boarding time.
    fn relax_incoming_transfers(&self, state: &mut BackwardState, station: Crs) {
        let Some(&departure) = state.departures.get(&station) else {
            return;
        };
        let Some(incoming) = self.incoming_transfers.get(&station) else {
            return;
        };

        for transfer in incoming.clone() {
            let boarding = departure - transfer.duration();
            if !transfer.is_available_at(boarding) {
                continue;
            }

            let better = state
                .departures
                .get(&transfer.origin())
                .is_none_or(|&best| boarding > best);
            if !better {
                continue;
            }

            let from = transfer.origin();
            state.departures.insert(from, boarding);
            state
                .successor
                .insert(from, Connection::Transfer(transfer));
            self.relax_incoming_transfers(state, from);
        }
    }

    /// Walk successors forward from the origin and group consecutive
    /// same-service connections into legs.
    fn assemble(&self, state: &BackwardState, origin: Crs, destination: Crs) -> Option<Journey> {
        if origin == destination {
            return None;
        }

        let mut connections = Vec::new();
        let mut station = origin;
        while station != destination {
            let conn = state.successor.get(&station)?;
            station = conn.destination();
            connections.push(conn.clone());
            if connections.len() > state.successor.len() {
                return None;
            }
        }

        let mut legs = Vec::new();
        let mut current: Vec<TimetabledConnection> = Vec::new();
        for conn in connections {
            match conn {
                Connection::Timetabled(tc) => {
                    let continues = current
                        .last()
                        .is_some_and(|prev: &TimetabledConnection| prev.service() == tc.service());
                    if !current.is_empty() && !continues {
                        legs.push(Leg::timetabled(std::mem::take(&mut current)).ok()?);
                    }
                    current.push(tc);
                }
                Connection::Transfer(transfer) => {
                    if !current.is_empty() {
                        legs.push(Leg::timetabled(std::mem::take(&mut current)).ok()?);
                    }
                    legs.push(Leg::fixed(transfer));
                }
            }
        }
        if !current.is_empty() {
            legs.push(Leg::timetabled(current).ok()?);
        }

        Journey::new(legs).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mode, Operator, ServiceId};

    fn crs(s: &str) -> Crs {
        Crs::parse(s).unwrap()
    }

    fn tt(origin: &str, destination: &str, dep: i32, arr: i32, svc: &str) -> TimetabledConnection {
        TimetabledConnection::new(
            crs(origin),
            crs(destination),
            Time::from_seconds(dep),
            Time::from_seconds(arr),
            ServiceId::new(svc.to_string()).unwrap(),
            Operator::parse("LN").unwrap(),
            Mode::Train,
        )
        .unwrap()
    }

    fn walk(origin: &str, destination: &str, duration: i32) -> TransferConnection {
        TransferConnection::new(crs(origin), crs(destination), duration, Mode::Walk).unwrap()
    }

    fn transfer_map(list: Vec<TransferConnection>) -> TransferMap {
        let mut map: TransferMap = HashMap::new();
        for t in list {
            map.entry(t.origin()).or_default().push(t);
        }
        map
    }

    #[test]
    fn latest_departure_selected() {
        let timetable = vec![
            tt("AAA", "BBB", 1000, 1100, "CS1000"),
            tt("AAA", "BBB", 1200, 1300, "CS2000"),
            tt("AAA", "BBB", 1400, 1500, "CS3000"),
        ];
        let transfers = HashMap::new();
        let interchange = HashMap::new();

        let scanner = ArriveByScanner::new(&timetable, &transfers, &interchange);
        let journey = scanner
            .scan(crs("AAA"), crs("BBB"), Time::from_seconds(1300))
            .unwrap();

        assert_eq!(journey.departure_time(), Some(Time::from_seconds(1200)));
        assert_eq!(journey.arrival_time(), Some(Time::from_seconds(1300)));
    }

    #[test]
    fn multi_leg_journey_grouped_by_service() {
        let timetable = vec![
            tt("AAA", "BBB", 1000, 1100, "CS1000"),
            tt("BBB", "CCC", 1100, 1200, "CS1000"),
            tt("CCC", "DDD", 1300, 1400, "CS2000"),
        ];
        let transfers = HashMap::new();
        let interchange = HashMap::new();

        let scanner = ArriveByScanner::new(&timetable, &transfers, &interchange);
        let journey = scanner
            .scan(crs("AAA"), crs("DDD"), Time::from_seconds(1400))
            .unwrap();

        assert_eq!(journey.leg_count(), 2);
        assert_eq!(journey.departure_time(), Some(Time::from_seconds(1000)));
    }

    #[test]
    fn unreachable_returns_none() {
        let timetable = vec![tt("AAA", "BBB", 1000, 1100, "CS1000")];
        let transfers = HashMap::new();
        let interchange = HashMap::new();

        let scanner = ArriveByScanner::new(&timetable, &transfers, &interchange);
        assert!(scanner
            .scan(crs("AAA"), crs("ZZZ"), Time::from_seconds(2000))
            .is_none());
    }

    #[test]
    fn arrival_bound_respected() {
        let timetable = vec![
            tt("AAA", "BBB", 1000, 1100, "CS1000"),
            tt("AAA", "BBB", 1200, 1301, "CS2000"),
        ];
        let transfers = HashMap::new();
        let interchange = HashMap::new();

        let scanner = ArriveByScanner::new(&timetable, &transfers, &interchange);
        let journey = scanner
            .scan(crs("AAA"), crs("BBB"), Time::from_seconds(1300))
            .unwrap();

        assert_eq!(journey.arrival_time(), Some(Time::from_seconds(1100)));
    }

    #[test]
    fn interchange_time_blocks_tight_change() {
        let timetable = vec![
            tt("AAA", "BBB", 1000, 1015, "CS1000"),
            tt("BBB", "CCC", 1020, 1045, "CS2000"),
        ];
        let transfers = HashMap::new();
        let mut interchange = HashMap::new();
        interchange.insert(crs("BBB"), 6);

        let scanner = ArriveByScanner::new(&timetable, &transfers, &interchange);
        assert!(scanner
            .scan(crs("AAA"), crs("CCC"), Time::from_seconds(1045))
            .is_none());
    }

    #[test]
    fn trailing_transfer_into_destination() {
        let timetable = vec![tt("AAA", "BBB", 1000, 1100, "CS1000")];
        let transfers = transfer_map(vec![walk("BBB", "CCC", 120)]);
        let interchange = HashMap::new();

        let scanner = ArriveByScanner::new(&timetable, &transfers, &interchange);
        let journey = scanner
            .scan(crs("AAA"), crs("CCC"), Time::from_seconds(1300))
            .unwrap();

        assert_eq!(journey.leg_count(), 2);
        assert!(journey.legs().last().unwrap().is_fixed());
        assert_eq!(journey.arrival_time(), Some(Time::from_seconds(1220)));
    }

    #[test]
    fn transfer_window_checked_at_boarding_time() {
        let timetable = vec![tt("AAA", "BBB", 1000, 1100, "CS1000")];
        // Walk only usable from 2000; with the journey arriving at 1100 the
        // boarding time falls outside the window.
        let gated = walk("BBB", "CCC", 120)
            .with_window(Time::from_seconds(2000), Time::from_seconds(3000))
            .unwrap();
        let transfers = transfer_map(vec![gated]);
        let interchange = HashMap::new();

        let scanner = ArriveByScanner::new(&timetable, &transfers, &interchange);
        assert!(scanner
            .scan(crs("AAA"), crs("CCC"), Time::from_seconds(2500))
            .is_none());
    }

    #[test]
    fn latest_departure_without_assembly() {
        let timetable = vec![
            tt("AAA", "BBB", 1000, 1100, "CS1000"),
            tt("AAA", "BBB", 1200, 1300, "CS2000"),
        ];
        let transfers = HashMap::new();
        let interchange = HashMap::new();

        let scanner = ArriveByScanner::new(&timetable, &transfers, &interchange);
        assert_eq!(
            scanner.latest_departure(crs("AAA"), crs("BBB"), Time::from_seconds(1300)),
            Some(Time::from_seconds(1200))
        );
        assert_eq!(
            scanner.latest_departure(crs("AAA"), crs("ZZZ"), Time::from_seconds(1300)),
            None
        );
    }

    #[test]
    fn same_origin_and_destination_is_none() {
        let timetable = vec![tt("AAA", "BBB", 1000, 1100, "CS1000")];
        let transfers = HashMap::new();
        let interchange = HashMap::new();

        let scanner = ArriveByScanner::new(&timetable, &transfers, &interchange);
        assert!(scanner
            .scan(crs("AAA"), crs("AAA"), Time::from_seconds(2000))
            .is_none());
    }

    #[test]
    fn leading_transfer_from_origin() {
        let timetable = vec![tt("BBB", "CCC", 1000, 1100, "CS1000")];
        let transfers = transfer_map(vec![walk("AAA", "BBB", 60)]);
        let interchange = HashMap::new();

        let scanner = ArriveByScanner::new(&timetable, &transfers, &interchange);
        let journey = scanner
            .scan(crs("AAA"), crs("CCC"), Time::from_seconds(1200))
            .unwrap();

        assert_eq!(journey.leg_count(), 2);
        assert!(journey.legs()[0].is_fixed());
        assert_eq!(journey.departure_time(), Some(Time::from_seconds(940)));
    }
}
