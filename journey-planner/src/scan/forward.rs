//! Forward connection scan.
//!
//! A single time-ordered sweep over the timetable that computes the
//! earliest-arrival route from an origin, or the full shortest-path tree
//! when no target is given. The timetable must be sorted ascending by
//! departure time; the scan does not sort, and the early-termination bound
//! silently breaks if the ordering is violated.

use std::collections::HashMap;

use crate::domain::{Connection, Crs, Time, TimetabledConnection, TransferConnection};

/// Minimum interchange seconds per station; stations absent require none.
pub type InterchangeTimes = HashMap<Crs, i32>;

/// Transfer connections grouped by origin station.
pub type TransferMap = HashMap<Crs, Vec<TransferConnection>>;

/// Connection acceptance criteria for the forward sweep.
///
/// The sweep mechanics are identical for both; only the comparator that
/// decides whether a reachable connection improves its destination differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criteria {
    /// Accept a connection iff it strictly improves the arrival time.
    #[default]
    EarliestArrival,
    /// Accept on strictly fewer interchanges, tie-broken by earlier arrival.
    MinimumChanges,
}

/// Mutable state threaded through one sweep.
#[derive(Debug, Default)]
struct ScanState {
    arrivals: HashMap<Crs, Time>,
    predecessor: HashMap<Crs, Connection>,
    changes: HashMap<Crs, u32>,
}

/// The result of a tree-mode sweep: best arrivals and predecessors for
/// every reachable station.
#[derive(Debug)]
pub struct ShortestPathTree {
    origin: Crs,
    arrivals: HashMap<Crs, Time>,
    predecessor: HashMap<Crs, Connection>,
}

impl ShortestPathTree {
    pub fn origin(&self) -> Crs {
        self.origin
    }

    /// Earliest arrival at `station`, if reachable.
    pub fn arrival_at(&self, station: Crs) -> Option<Time> {
        self.arrivals.get(&station).copied()
    }

    /// All reachable stations, including the origin.
    pub fn stations(&self) -> impl Iterator<Item = Crs> + '_ {
        self.arrivals.keys().copied()
    }

    /// Reconstruct the route to `destination` by walking predecessors back
    /// to the origin. Empty if the destination is unreachable.
    pub fn route_to(&self, destination: Crs) -> Vec<Connection> {
        reconstruct(&self.predecessor, self.origin, destination)
    }
}

/// Earliest-arrival connection scanner.
///
/// Holds borrowed, read-only inputs; each call runs an independent sweep
/// with its own state, so one scanner may serve concurrent callers.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use journey_planner::domain::{Crs, Mode, Operator, ServiceId, Time, TimetabledConnection};
/// use journey_planner::scan::ConnectionScanner;
///
/// let timetable = vec![TimetabledConnection::new(
///     Crs::parse("AAA").unwrap(),
///     Crs::parse("BBB").unwrap(),
///     Time::from_seconds(1000),
///     Time::from_seconds(1015),
///     ServiceId::new("CS1234".into()).unwrap(),
///     Operator::parse("LN").unwrap(),
///     Mode::Train,
/// )
/// .unwrap()];
/// let transfers = HashMap::new();
/// let interchange = HashMap::new();
///
/// let scanner = ConnectionScanner::new(&timetable, &transfers, &interchange);
/// let route = scanner.scan(
///     Crs::parse("AAA").unwrap(),
///     Crs::parse("BBB").unwrap(),
///     Time::from_seconds(900),
/// );
/// assert_eq!(route.len(), 1);
/// ```
pub struct ConnectionScanner<'a> {
    timetable: &'a [TimetabledConnection],
    transfers: &'a TransferMap,
    interchange: &'a InterchangeTimes,
    criteria: Criteria,
}

impl<'a> ConnectionScanner<'a> {
    /// Create a scanner with the earliest-arrival criteria.
    ///
    /// `timetable` must be sorted ascending by departure time.
    pub fn new(
        timetable: &'a [TimetabledConnection],
        transfers: &'a TransferMap,
        interchange: &'a InterchangeTimes,
    ) -> Self {
        Self::with_criteria(timetable, transfers, interchange, Criteria::EarliestArrival)
    }

    /// Create a scanner with explicit acceptance criteria.
    pub fn with_criteria(
        timetable: &'a [TimetabledConnection],
        transfers: &'a TransferMap,
        interchange: &'a InterchangeTimes,
        criteria: Criteria,
    ) -> Self {
        Self {
            timetable,
            transfers,
            interchange,
            criteria,
        }
    }

    /// Find the best route from `origin` to `destination`, departing at or
    /// after `departure`.
    ///
    /// Returns the connections in travel order, or an empty vector when no
    /// route exists. An empty result is the expected "no route" outcome,
    /// not an error.
    pub fn scan(&self, origin: Crs, destination: Crs, departure: Time) -> Vec<Connection> {
        let state = self.sweep(origin, Some(destination), departure);
        reconstruct(&state.predecessor, origin, destination)
    }

    /// Earliest arrival time at `destination`, using the same bounded sweep
    /// as [`scan`](Self::scan).
    pub fn earliest_arrival(&self, origin: Crs, destination: Crs, departure: Time) -> Option<Time> {
        let state = self.sweep(origin, Some(destination), departure);
        state.arrivals.get(&destination).copied()
    }

    /// Build the full shortest-path tree from `origin`.
    ///
    /// Tree mode records predecessors for every station and never applies
    /// the early-termination bound.
    pub fn scan_tree(&self, origin: Crs, departure: Time) -> ShortestPathTree {
        let state = self.sweep(origin, None, departure);
        ShortestPathTree {
            origin,
            arrivals: state.arrivals,
            predecessor: state.predecessor,
        }
    }

    /// One pass over the time-ordered timetable.
    fn sweep(&self, origin: Crs, target: Option<Crs>, departure: Time) -> ScanState {
        let mut state = ScanState::default();
        state.arrivals.insert(origin, departure);
        state.changes.insert(origin, 0);
        self.relax_transfers(&mut state, origin);

        for conn in self.timetable {
            // Once the target has been reached, no later-departing
            // connection can improve anything (timetable is time-ordered).
            if let Some(target) = target
                && let Some(&best) = state.arrivals.get(&target)
                && conn.departure_time() > best
            {
                break;
            }

            if self.is_reachable(&state, conn) && self.improves(&state, conn) {
                let changes = self.changes_via(&state, conn);
                state.arrivals.insert(conn.destination(), conn.arrival_time());
                state
                    .predecessor
                    .insert(conn.destination(), Connection::Timetabled(conn.clone()));
                state.changes.insert(conn.destination(), changes);
                self.relax_transfers(&mut state, conn.destination());
            }
        }

        state
    }

    /// A connection is reachable iff its origin has been reached early
    /// enough, counting the station's interchange time when the connection
    /// we arrived on requires a change.
    fn is_reachable(&self, state: &ScanState, conn: &TimetabledConnection) -> bool {
        let Some(&arrival) = state.arrivals.get(&conn.origin()) else {
            return false;
        };
        conn.departure_time() >= arrival + self.interchange_before(state, conn)
    }

    fn improves(&self, state: &ScanState, conn: &TimetabledConnection) -> bool {
        let Some(&best) = state.arrivals.get(&conn.destination()) else {
            return true;
        };
        match self.criteria {
            Criteria::EarliestArrival => conn.arrival_time() < best,
            Criteria::MinimumChanges => {
                let new_changes = self.changes_via(state, conn);
                // Unvisited stations were handled above; compare counts first
                match state.changes.get(&conn.destination()) {
                    None => true,
                    Some(&current) => {
                        new_changes < current
                            || (new_changes == current && conn.arrival_time() < best)
                    }
                }
            }
        }
    }

    /// Interchange seconds required before boarding `conn` at its origin.
    /// Zero when the origin is the query origin (no predecessor) or when
    /// `conn` continues the predecessor's service.
    fn interchange_before(&self, state: &ScanState, conn: &TimetabledConnection) -> i32 {
        match state.predecessor.get(&conn.origin()) {
            None => 0,
            Some(Connection::Timetabled(pred)) if pred.service() == conn.service() => 0,
            Some(_) => self.interchange_at(conn.origin()),
        }
    }

    fn interchange_at(&self, station: Crs) -> i32 {
        self.interchange.get(&station).copied().unwrap_or(0)
    }

    /// Interchange count at the destination when travelling via `conn`.
    fn changes_via(&self, state: &ScanState, conn: &TimetabledConnection) -> u32 {
        let at_origin = state.changes.get(&conn.origin()).copied().unwrap_or(0);
        let boarding_change = match state.predecessor.get(&conn.origin()) {
            None => 0,
            Some(Connection::Timetabled(pred)) if pred.service() == conn.service() => 0,
            Some(_) => 1,
        };
        at_origin + boarding_change
    }

    /// Re-check transfer connections leaving `station` after its arrival
    /// improved, chaining through any further transfers they improve.
    /// Strict improvement bounds the recursion.
    fn relax_transfers(&self, state: &mut ScanState, station: Crs) {
        let Some(&arrival) = state.arrivals.get(&station) else {
            return;
        };
        let Some(outgoing) = self.transfers.get(&station) else {
            return;
        };

        for transfer in outgoing {
            if !transfer.is_available_at(arrival) {
                continue;
            }

            let via = arrival + transfer.duration();
            let better = state
                .arrivals
                .get(&transfer.destination())
                .is_none_or(|&best| via < best);
            if !better {
                continue;
            }

            let changes = state.changes.get(&station).copied().unwrap_or(0) + 1;
            state.arrivals.insert(transfer.destination(), via);
            state
                .predecessor
                .insert(transfer.destination(), Connection::Transfer(transfer.clone()));
            state.changes.insert(transfer.destination(), changes);
            self.relax_transfers(state, transfer.destination());
        }
    }
}

/// Walk predecessors backward from `destination` to `origin`, then reverse.
/// Returns empty when the walk does not terminate exactly at the origin.
fn reconstruct(
    predecessor: &HashMap<Crs, Connection>,
    origin: Crs,
    destination: Crs,
) -> Vec<Connection> {
    let mut route = Vec::new();
    let mut station = destination;

    while station != origin {
        let Some(conn) = predecessor.get(&station) else {
            return Vec::new();
        };
        route.push(conn.clone());
        station = conn.origin();

        // Predecessor chains are acyclic by construction; the cap guards
        // against malformed maps.
        if route.len() > predecessor.len() {
            return Vec::new();
        }
    }

    route.reverse();
    route
}
