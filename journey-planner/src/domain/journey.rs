//! Journey type.
//!
//! A journey is an ordered, non-empty sequence of legs from an overall
//! origin to an overall destination.

use super::{Crs, DomainError, Leg, Time};

/// A complete journey from origin to destination.
///
/// A journey may begin or end with fixed (transfer) legs whose "time" is
/// relative, not absolute: a walk before the first train starts at whatever
/// time makes the train, so the journey's departure time is the first
/// timetabled departure minus the leading walk durations, and symmetrically
/// for the arrival.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (destination of one = origin of next)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    legs: Vec<Leg>,
}

impl Journey {
    /// Construct a journey from its legs, in travel order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the list is empty or the legs do not join up.
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyJourney);
        }

        for window in legs.windows(2) {
            let prev_dest = window[0].destination();
            let next_origin = window[1].origin();
            if prev_dest != next_origin {
                return Err(DomainError::StationsNotConnected(prev_dest, next_origin));
            }
        }

        Ok(Journey { legs })
    }

    /// The legs in travel order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    pub fn origin(&self) -> Crs {
        self.legs[0].origin()
    }

    pub fn destination(&self) -> Crs {
        self.legs[self.legs.len() - 1].destination()
    }

    /// Departure time: the first timetabled leg's departure, brought forward
    /// by the durations of any leading fixed legs.
    ///
    /// Returns `None` for a journey consisting only of fixed legs, whose
    /// times are purely relative.
    ///
    /// # Examples
    ///
    /// ```
    /// use journey_planner::domain::{
    ///     Crs, Leg, Journey, Mode, Operator, ServiceId, Time, TimetabledConnection,
    ///     TransferConnection,
    /// };
    ///
    /// let walk = TransferConnection::new(
    ///     Crs::parse("AAA").unwrap(),
    ///     Crs::parse("BBB").unwrap(),
    ///     300,
    ///     Mode::Walk,
    /// )
    /// .unwrap();
    /// let train = TimetabledConnection::new(
    ///     Crs::parse("BBB").unwrap(),
    ///     Crs::parse("CCC").unwrap(),
    ///     Time::from_seconds(1000),
    ///     Time::from_seconds(2000),
    ///     ServiceId::new("CS1".into()).unwrap(),
    ///     Operator::parse("LN").unwrap(),
    ///     Mode::Train,
    /// )
    /// .unwrap();
    ///
    /// let journey = Journey::new(vec![
    ///     Leg::fixed(walk),
    ///     Leg::timetabled(vec![train]).unwrap(),
    /// ])
    /// .unwrap();
    ///
    /// // Leave 300s before the train departs to make the walk.
    /// assert_eq!(journey.departure_time(), Some(Time::from_seconds(700)));
    /// assert_eq!(journey.arrival_time(), Some(Time::from_seconds(2000)));
    /// ```
    pub fn departure_time(&self) -> Option<Time> {
        let mut offset = 0;
        for leg in &self.legs {
            match leg {
                Leg::Fixed(transfer) => offset += transfer.duration(),
                Leg::Timetabled(leg) => return Some(leg.departure_time() - offset),
            }
        }
        None
    }

    /// Arrival time: the last timetabled leg's arrival, pushed back by the
    /// durations of any trailing fixed legs.
    ///
    /// Returns `None` for a journey consisting only of fixed legs.
    pub fn arrival_time(&self) -> Option<Time> {
        let mut offset = 0;
        for leg in self.legs.iter().rev() {
            match leg {
                Leg::Fixed(transfer) => offset += transfer.duration(),
                Leg::Timetabled(leg) => return Some(leg.arrival_time() + offset),
            }
        }
        None
    }

    /// Total duration in seconds, when the journey has absolute times.
    pub fn duration(&self) -> Option<i32> {
        Some(self.arrival_time()?.seconds_since(self.departure_time()?))
    }
}
