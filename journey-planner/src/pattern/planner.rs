//! Journey reconstruction from stored patterns.
//!
//! A stored pattern fixes which station pairs a journey boards and
//! alights at; this module re-times it against a concrete day's legs.
//! Each candidate first leg seeds one attempt, and later segments greedily
//! take the first feasible leg, bridging with a fixed transfer when
//! consecutive pairs do not share a station.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Crs, DomainError, Journey, Leg, Time, TimetabledLeg};
use crate::provider::{LegSource, SourceError};
use crate::scan::{InterchangeTimes, TransferMap};

use super::TransferPattern;

/// Why one reconstruction attempt produced no journey.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanningError {
    #[error("no transfer connection from {from} to {to}")]
    NoTransfer { from: Crs, to: Crs },
    #[error("transfer from {from} to {to} not available at {at}")]
    TransferUnavailable { from: Crs, to: Crs, at: Time },
    #[error("no reachable leg from {from} to {to} after {after}")]
    NoReachableConnection { from: Crs, to: Crs, after: Time },
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// One station pair of a pattern with its candidate legs for the day,
/// sorted by arrival time then departure time.
#[derive(Debug, Clone)]
pub struct PatternSegment {
    origin: Crs,
    destination: Crs,
    legs: Vec<TimetabledLeg>,
}

impl PatternSegment {
    pub fn origin(&self) -> Crs {
        self.origin
    }

    pub fn destination(&self) -> Crs {
        self.destination
    }

    pub fn legs(&self) -> &[TimetabledLeg] {
        &self.legs
    }
}

/// Load one segment per pattern pair from `legs` for `date`.
pub fn segments_for_pattern<L: LegSource>(
    legs: &L,
    pattern: &TransferPattern,
    date: NaiveDate,
) -> Result<Vec<PatternSegment>, SourceError> {
    pattern
        .pairs()
        .iter()
        .map(|&(origin, destination)| {
            Ok(PatternSegment {
                origin,
                destination,
                legs: legs.timetable_legs(date, origin, destination)?,
            })
        })
        .collect()
}

/// Re-times stored patterns against one day's legs.
pub struct PatternPlanner<'a, L> {
    legs: &'a L,
    transfers: &'a TransferMap,
    interchange: &'a InterchangeTimes,
}

impl<'a, L: LegSource> PatternPlanner<'a, L> {
    pub fn new(
        legs: &'a L,
        transfers: &'a TransferMap,
        interchange: &'a InterchangeTimes,
    ) -> Self {
        Self {
            legs,
            transfers,
            interchange,
        }
    }

    /// Every journey the pattern yields on `date` from `origin` to
    /// `destination` departing at or after `departure`: one attempt per
    /// candidate first leg, keeping the attempts that thread through all
    /// segments. When the query endpoints sit off the pattern's timetabled
    /// skeleton, fixed transfers bridge the gaps.
    pub fn plan(
        &self,
        origin: Crs,
        destination: Crs,
        pattern: &TransferPattern,
        date: NaiveDate,
        departure: Time,
    ) -> Result<Vec<Journey>, SourceError> {
        let segments = segments_for_pattern(self.legs, pattern, date)?;
        let Some((first, rest)) = segments.split_first() else {
            return Ok(Vec::new());
        };

        let mut journeys = Vec::new();
        for leg in &first.legs {
            if let Ok(journey) = self.thread(origin, destination, leg.clone(), rest, departure) {
                journeys.push(journey);
            }
        }
        Ok(journeys)
    }

    /// Complete one attempt starting from `first`, taking the first
    /// feasible leg of each later segment.
    fn thread(
        &self,
        origin: Crs,
        destination: Crs,
        first: TimetabledLeg,
        rest: &[PatternSegment],
        departure: Time,
    ) -> Result<Journey, PlanningError> {
        let mut legs = Vec::new();
        let mut at = departure;

        if first.origin() != origin {
            let transfer = self.bridge(origin, first.origin(), at)?;
            at = at + transfer.duration();
            legs.push(Leg::fixed(transfer));
        }
        if first.departure_time() < at {
            return Err(PlanningError::NoReachableConnection {
                from: first.origin(),
                to: first.destination(),
                after: at,
            });
        }

        let mut station = first.destination();
        at = first.arrival_time();
        let mut previous = first.clone();
        legs.push(Leg::Timetabled(first));

        for segment in rest {
            if segment.origin() != station {
                let transfer = self.bridge(station, segment.origin(), at)?;
                at = at + transfer.duration();
                station = transfer.destination();
                legs.push(Leg::fixed(transfer));
            }

            // Same-service continuations keep their seat; anything else
            // pays the junction's interchange time.
            let earliest = |leg: &TimetabledLeg| {
                if leg.service() == previous.service() {
                    at
                } else {
                    at + self.interchange.get(&station).copied().unwrap_or(0)
                }
            };
            let chosen = segment
                .legs()
                .iter()
                .find(|leg| leg.departure_time() >= earliest(leg))
                .ok_or(PlanningError::NoReachableConnection {
                    from: segment.origin(),
                    to: segment.destination(),
                    after: at,
                })?
                .clone();

            station = chosen.destination();
            at = chosen.arrival_time();
            previous = chosen.clone();
            legs.push(Leg::Timetabled(chosen));
        }

        if station != destination {
            let transfer = self.bridge(station, destination, at)?;
            legs.push(Leg::fixed(transfer));
        }

        Ok(Journey::new(legs)?)
    }

    /// A fixed transfer `from` to `to` whose window covers boarding at
    /// `at`.
    fn bridge(
        &self,
        from: Crs,
        to: Crs,
        at: Time,
    ) -> Result<crate::domain::TransferConnection, PlanningError> {
        let transfer = self
            .transfers
            .get(&from)
            .into_iter()
            .flatten()
            .find(|t| t.destination() == to)
            .ok_or(PlanningError::NoTransfer { from, to })?;
        if !transfer.is_available_at(at) {
            return Err(PlanningError::TransferUnavailable { from, to, at });
        }
        Ok(transfer.clone())
    }
}
