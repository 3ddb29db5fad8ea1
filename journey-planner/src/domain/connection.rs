//! Connection types.
//!
//! A connection is a single atomic hop between two stations: either a
//! timetabled hop with fixed departure and arrival times on a service, or a
//! transfer (walking/interchange link) with a fixed duration, usable only
//! within an availability window.

use super::{Crs, DomainError, Mode, Operator, ServiceId, Time};

/// A timetabled hop between two stations on a specific service.
///
/// # Invariants
///
/// - `arrival_time >= departure_time`
///
/// # Examples
///
/// ```
/// use journey_planner::domain::{Crs, Mode, Operator, ServiceId, Time, TimetabledConnection};
///
/// let conn = TimetabledConnection::new(
///     Crs::parse("ORP").unwrap(),
///     Crs::parse("WAE").unwrap(),
///     Time::from_seconds(1000),
///     Time::from_seconds(1015),
///     ServiceId::new("CS1234".into()).unwrap(),
///     Operator::parse("LN").unwrap(),
///     Mode::Train,
/// )
/// .unwrap();
///
/// assert_eq!(conn.duration(), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetabledConnection {
    origin: Crs,
    destination: Crs,
    departure_time: Time,
    arrival_time: Time,
    service: ServiceId,
    operator: Operator,
    mode: Mode,
}

impl TimetabledConnection {
    /// Construct a timetabled connection, validating its times.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `arrival_time` precedes `departure_time`.
    pub fn new(
        origin: Crs,
        destination: Crs,
        departure_time: Time,
        arrival_time: Time,
        service: ServiceId,
        operator: Operator,
        mode: Mode,
    ) -> Result<Self, DomainError> {
        if arrival_time < departure_time {
            return Err(DomainError::ArrivalBeforeDeparture {
                departure: departure_time,
                arrival: arrival_time,
            });
        }

        Ok(Self {
            origin,
            destination,
            departure_time,
            arrival_time,
            service,
            operator,
            mode,
        })
    }

    pub fn origin(&self) -> Crs {
        self.origin
    }

    pub fn destination(&self) -> Crs {
        self.destination
    }

    pub fn departure_time(&self) -> Time {
        self.departure_time
    }

    pub fn arrival_time(&self) -> Time {
        self.arrival_time
    }

    pub fn service(&self) -> &ServiceId {
        &self.service
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Duration in seconds, derived from the times.
    pub fn duration(&self) -> i32 {
        self.arrival_time.seconds_since(self.departure_time)
    }
}

/// A non-timetabled link with a fixed duration (walking, interchange).
///
/// Usable only when the time at which it would be boarded lies inside
/// `[available_from, available_until]`. The default window is unbounded.
///
/// # Examples
///
/// ```
/// use journey_planner::domain::{Crs, Mode, Time, TransferConnection};
///
/// let walk = TransferConnection::new(
///     Crs::parse("KGX").unwrap(),
///     Crs::parse("STP").unwrap(),
///     300,
///     Mode::Walk,
/// )
/// .unwrap();
///
/// assert!(walk.is_available_at(Time::from_seconds(0)));
///
/// let gated = walk
///     .with_window(Time::from_seconds(18_000), Time::from_seconds(86_400))
///     .unwrap();
/// assert!(!gated.is_available_at(Time::from_seconds(3600)));
/// assert!(gated.is_available_at(Time::from_seconds(20_000)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConnection {
    origin: Crs,
    destination: Crs,
    duration: i32,
    mode: Mode,
    available_from: Time,
    available_until: Time,
}

impl TransferConnection {
    /// Construct a transfer connection with an unbounded availability window.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `duration` is negative.
    pub fn new(origin: Crs, destination: Crs, duration: i32, mode: Mode) -> Result<Self, DomainError> {
        if duration < 0 {
            return Err(DomainError::NegativeDuration(duration));
        }

        Ok(Self {
            origin,
            destination,
            duration,
            mode,
            available_from: Time::from_seconds(i32::MIN),
            available_until: Time::from_seconds(i32::MAX),
        })
    }

    /// Restrict the availability window.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `until` precedes `from`.
    pub fn with_window(mut self, from: Time, until: Time) -> Result<Self, DomainError> {
        if until < from {
            return Err(DomainError::ArrivalBeforeDeparture {
                departure: from,
                arrival: until,
            });
        }
        self.available_from = from;
        self.available_until = until;
        Ok(self)
    }

    pub fn origin(&self) -> Crs {
        self.origin
    }

    pub fn destination(&self) -> Crs {
        self.destination
    }

    /// Duration in seconds.
    pub fn duration(&self) -> i32 {
        self.duration
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn available_from(&self) -> Time {
        self.available_from
    }

    pub fn available_until(&self) -> Time {
        self.available_until
    }

    /// True if the transfer can be boarded at `time`.
    pub fn is_available_at(&self, time: Time) -> bool {
        self.available_from <= time && time <= self.available_until
    }
}

/// A single atomic hop between two stations.
///
/// The two variants share `origin`/`destination`/`duration` accessors;
/// exhaustive matching means an unknown connection kind cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Timetabled(TimetabledConnection),
    Transfer(TransferConnection),
}

impl Connection {
    pub fn origin(&self) -> Crs {
        match self {
            Connection::Timetabled(c) => c.origin(),
            Connection::Transfer(c) => c.origin(),
        }
    }

    pub fn destination(&self) -> Crs {
        match self {
            Connection::Timetabled(c) => c.destination(),
            Connection::Transfer(c) => c.destination(),
        }
    }

    /// Duration in seconds (derived for timetabled connections).
    pub fn duration(&self) -> i32 {
        match self {
            Connection::Timetabled(c) => c.duration(),
            Connection::Transfer(c) => c.duration(),
        }
    }

    /// Whether changing from this connection onto `next` requires the
    /// station's interchange time.
    ///
    /// A transfer always requires interchange. A timetabled connection
    /// requires interchange with anything except a continuation of its own
    /// service.
    pub fn requires_interchange_with(&self, next: &Connection) -> bool {
        match (self, next) {
            (Connection::Timetabled(a), Connection::Timetabled(b)) => a.service() != b.service(),
            _ => true,
        }
    }

    pub fn as_timetabled(&self) -> Option<&TimetabledConnection> {
        match self {
            Connection::Timetabled(c) => Some(c),
            Connection::Transfer(_) => None,
        }
    }

    pub fn as_transfer(&self) -> Option<&TransferConnection> {
        match self {
            Connection::Timetabled(_) => None,
            Connection::Transfer(c) => Some(c),
        }
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self, Connection::Transfer(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn timetabled_duration_derived() {
        let c = tt("ORP", "WAE", 1000, 1015, "CS1234");
        assert_eq!(c.duration(), 15);
        assert_eq!(Connection::Timetabled(c).duration(), 15);
    }

    #[test]
    fn timetabled_rejects_inverted_times() {
        let result = TimetabledConnection::new(
            crs("ORP"),
            crs("WAE"),
            Time::from_seconds(1015),
            Time::from_seconds(1000),
            ServiceId::new("CS1234".into()).unwrap(),
            Operator::parse("LN").unwrap(),
            Mode::Train,
        );
        assert!(matches!(
            result,
            Err(DomainError::ArrivalBeforeDeparture { .. })
        ));
    }

    #[test]
    fn timetabled_zero_duration_allowed() {
        let c = tt("ORP", "WAE", 1000, 1000, "CS1234");
        assert_eq!(c.duration(), 0);
    }

    #[test]
    fn transfer_rejects_negative_duration() {
        let result = TransferConnection::new(crs("KGX"), crs("STP"), -1, Mode::Walk);
        assert!(matches!(result, Err(DomainError::NegativeDuration(-1))));
    }

    #[test]
    fn transfer_default_window_unbounded() {
        let t = TransferConnection::new(crs("KGX"), crs("STP"), 300, Mode::Walk).unwrap();
        assert!(t.is_available_at(Time::from_seconds(0)));
        assert!(t.is_available_at(Time::from_seconds(200_000)));
    }

    #[test]
    fn transfer_window_bounds_inclusive() {
        let t = TransferConnection::new(crs("KGX"), crs("STP"), 300, Mode::Walk)
            .unwrap()
            .with_window(Time::from_seconds(1000), Time::from_seconds(2000))
            .unwrap();

        assert!(!t.is_available_at(Time::from_seconds(999)));
        assert!(t.is_available_at(Time::from_seconds(1000)));
        assert!(t.is_available_at(Time::from_seconds(2000)));
        assert!(!t.is_available_at(Time::from_seconds(2001)));
    }

    #[test]
    fn transfer_rejects_inverted_window() {
        let result = TransferConnection::new(crs("KGX"), crs("STP"), 300, Mode::Walk)
            .unwrap()
            .with_window(Time::from_seconds(2000), Time::from_seconds(1000));
        assert!(result.is_err());
    }

    #[test]
    fn same_service_continuation_needs_no_interchange() {
        let a = Connection::Timetabled(tt("ORP", "WAE", 1000, 1015, "CS1234"));
        let b = Connection::Timetabled(tt("WAE", "CHX", 1015, 1025, "CS1234"));
        assert!(!a.requires_interchange_with(&b));
    }

    #[test]
    fn different_services_require_interchange() {
        let a = Connection::Timetabled(tt("ORP", "WAE", 1000, 1015, "CS1234"));
        let b = Connection::Timetabled(tt("WAE", "CHX", 1020, 1030, "CS9999"));
        assert!(a.requires_interchange_with(&b));
    }

    #[test]
    fn transfers_always_require_interchange() {
        let walk = Connection::Transfer(
            TransferConnection::new(crs("KGX"), crs("STP"), 300, Mode::Walk).unwrap(),
        );
        let train = Connection::Timetabled(tt("STP", "LUT", 2000, 3000, "CS1234"));

        assert!(walk.requires_interchange_with(&train));
        assert!(train.requires_interchange_with(&walk));
        assert!(walk.requires_interchange_with(&walk.clone()));
    }

    #[test]
    fn variant_accessors() {
        let walk = Connection::Transfer(
            TransferConnection::new(crs("KGX"), crs("STP"), 300, Mode::Walk).unwrap(),
        );
        assert!(walk.is_transfer());
        assert!(walk.as_transfer().is_some());
        assert!(walk.as_timetabled().is_none());
        assert_eq!(walk.origin(), crs("KGX"));
        assert_eq!(walk.destination(), crs("STP"));
    }
}
