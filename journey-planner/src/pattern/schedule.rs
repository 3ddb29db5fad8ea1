//! Multi-schedule planning.
//!
//! Answers a query by re-timing the station pair's stored patterns
//! against each schedule date in turn, pooling the candidates, and Pareto
//! filtering the pool. Overlapping schedules that duplicate a journey are
//! harmless; the filter collapses them.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Crs, Journey, Time};
use crate::provider::{LegSource, PatternStore, SourceError, StationSource};
use crate::scan::{InterchangeTimes, TransferMap};

use super::filter::pareto_filter;
use super::planner::PatternPlanner;

/// Query-time planner over precomputed patterns and one or more schedules.
pub struct MultiSchedulePlanner<'a, P, L> {
    store: &'a P,
    legs: &'a L,
    transfers: &'a TransferMap,
    interchange: &'a InterchangeTimes,
}

impl<'a, P, L> MultiSchedulePlanner<'a, P, L>
where
    P: PatternStore,
    L: LegSource,
{
    pub fn new(
        store: &'a P,
        legs: &'a L,
        transfers: &'a TransferMap,
        interchange: &'a InterchangeTimes,
    ) -> Self {
        Self {
            store,
            legs,
            transfers,
            interchange,
        }
    }

    /// Pareto-filtered journeys from `origin` to `destination` departing
    /// at or after `departure`, drawn from every schedule in `dates`.
    ///
    /// An empty result means the pair has no stored patterns or none of
    /// them can be timed on the given dates.
    pub fn plan(
        &self,
        origin: Crs,
        destination: Crs,
        dates: &[NaiveDate],
        departure: Time,
    ) -> Result<Vec<Journey>, SourceError> {
        let patterns = self.store.patterns(origin, destination)?;
        debug!(
            %origin,
            %destination,
            patterns = patterns.len(),
            schedules = dates.len(),
            "planning from stored patterns"
        );
        if patterns.is_empty() {
            return Ok(Vec::new());
        }

        let planner = PatternPlanner::new(self.legs, self.transfers, self.interchange);
        let mut candidates = Vec::new();
        for &date in dates {
            for pattern in &patterns {
                candidates.extend(planner.plan(origin, destination, pattern, date, departure)?);
            }
        }

        Ok(pareto_filter(candidates))
    }

    /// Plan between station codes that may be group codes (a city
    /// grouping, say): expands both ends via `stations`, plans every
    /// expanded pair, and filters the pooled results.
    pub fn plan_codes<S: StationSource>(
        &self,
        stations: &S,
        origin_code: &str,
        destination_code: &str,
        dates: &[NaiveDate],
        departure: Time,
    ) -> Result<Vec<Journey>, SourceError> {
        let origins = stations.relevant_stations(origin_code)?;
        let destinations = stations.relevant_stations(destination_code)?;

        let mut candidates = Vec::new();
        for &origin in &origins {
            for &destination in &destinations {
                if origin == destination {
                    continue;
                }
                candidates.extend(self.plan(origin, destination, dates, departure)?);
            }
        }
        Ok(pareto_filter(candidates))
    }
}
