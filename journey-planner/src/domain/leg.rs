//! Journey leg types.
//!
//! A leg is a maximal run of connections ridden without changing: either a
//! run of timetabled connections on one service, or a single transfer.

use super::{Crs, DomainError, ServiceId, Time, TimetabledConnection, TransferConnection};

/// A maximal run of timetabled connections on one service.
///
/// Validated at construction so the time accessors never fail.
///
/// # Invariants
///
/// - At least one connection
/// - All connections belong to the same service
/// - Consecutive connections join up (destination = next origin)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetabledLeg {
    connections: Vec<TimetabledConnection>,
}

impl TimetabledLeg {
    /// Construct a leg from its connections, in travel order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the list is empty, mixes services, or the
    /// connections do not join up.
    pub fn new(connections: Vec<TimetabledConnection>) -> Result<Self, DomainError> {
        let Some(first) = connections.first() else {
            return Err(DomainError::EmptyLeg);
        };

        let service = first.service().clone();
        for conn in &connections[1..] {
            if conn.service() != &service {
                return Err(DomainError::MixedServices);
            }
        }

        for window in connections.windows(2) {
            if window[0].destination() != window[1].origin() {
                return Err(DomainError::StationsNotConnected(
                    window[0].destination(),
                    window[1].origin(),
                ));
            }
        }

        Ok(Self { connections })
    }

    /// The connections making up this leg, in travel order.
    pub fn connections(&self) -> &[TimetabledConnection] {
        &self.connections
    }

    pub fn origin(&self) -> Crs {
        // Non-empty: validated at construction
        self.connections[0].origin()
    }

    pub fn destination(&self) -> Crs {
        self.connections[self.connections.len() - 1].destination()
    }

    pub fn departure_time(&self) -> Time {
        self.connections[0].departure_time()
    }

    pub fn arrival_time(&self) -> Time {
        self.connections[self.connections.len() - 1].arrival_time()
    }

    /// Duration in seconds: last arrival minus first departure.
    pub fn duration(&self) -> i32 {
        self.arrival_time().seconds_since(self.departure_time())
    }

    pub fn service(&self) -> &ServiceId {
        self.connections[0].service()
    }
}

/// A leg of a journey: either a run of same-service timetabled connections
/// or a single transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leg {
    Timetabled(TimetabledLeg),
    Fixed(TransferConnection),
}

impl Leg {
    /// Construct a timetabled leg from its connections.
    pub fn timetabled(connections: Vec<TimetabledConnection>) -> Result<Self, DomainError> {
        Ok(Leg::Timetabled(TimetabledLeg::new(connections)?))
    }

    /// Construct a fixed-duration leg from a transfer connection.
    pub fn fixed(transfer: TransferConnection) -> Self {
        Leg::Fixed(transfer)
    }

    pub fn origin(&self) -> Crs {
        match self {
            Leg::Timetabled(leg) => leg.origin(),
            Leg::Fixed(transfer) => transfer.origin(),
        }
    }

    pub fn destination(&self) -> Crs {
        match self {
            Leg::Timetabled(leg) => leg.destination(),
            Leg::Fixed(transfer) => transfer.destination(),
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> i32 {
        match self {
            Leg::Timetabled(leg) => leg.duration(),
            Leg::Fixed(transfer) => transfer.duration(),
        }
    }

    /// Departure time, if this leg has one (fixed legs have only a duration).
    pub fn departure_time(&self) -> Option<Time> {
        match self {
            Leg::Timetabled(leg) => Some(leg.departure_time()),
            Leg::Fixed(_) => None,
        }
    }

    /// Arrival time, if this leg has one.
    pub fn arrival_time(&self) -> Option<Time> {
        match self {
            Leg::Timetabled(leg) => Some(leg.arrival_time()),
            Leg::Fixed(_) => None,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Leg::Fixed(_))
    }

    pub fn as_timetabled(&self) -> Option<&TimetabledLeg> {
        match self {
            Leg::Timetabled(leg) => Some(leg),
            Leg::Fixed(_) => None,
        }
    }

    pub fn as_fixed(&self) -> Option<&TransferConnection> {
        match self {
            Leg::Timetabled(_) => None,
            Leg::Fixed(transfer) => Some(transfer),
        }
    }
}
