//! Data-source seams.
//!
//! The planners never load data themselves; they ask these traits.
//! Implementations back them with whatever holds the schedule: the
//! in-memory fixtures here, a database, or a cached wrapper. Trait methods
//! return [`SourceError`] so a broken backend surfaces as an error rather
//! than an empty timetable.

mod json_store;
mod memory;

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Crs, Time, TimetabledConnection, TimetabledLeg, TransferConnection};
use crate::pattern::TransferPattern;

pub use json_store::JsonPatternStore;
pub use memory::{MemoryLegSource, MemoryPatternStore, MemoryTimetable};

/// Failure to produce data from a backing source.
///
/// `Clone` so cached results can be shared between concurrent callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("invalid data in source: {0}")]
    InvalidData(String),
}

/// Provides the timetable for a service day.
pub trait TimetableSource {
    /// Timetabled connections departing at or after `after` on `date`,
    /// sorted ascending by departure time. Implementations must uphold the
    /// ordering; the scanners rely on it.
    fn timetable_connections(
        &self,
        date: NaiveDate,
        after: Time,
    ) -> Result<Vec<TimetabledConnection>, SourceError>;

    /// Non-timetabled connections usable on `date`, grouped by origin.
    fn non_timetable_connections(
        &self,
        date: NaiveDate,
    ) -> Result<HashMap<Crs, Vec<TransferConnection>>, SourceError>;
}

/// Provides minimum interchange times per station.
pub trait InterchangeSource {
    /// Stations absent from the map need no interchange time.
    fn interchange_times(&self) -> Result<HashMap<Crs, i32>, SourceError>;
}

/// Station directory: group expansion and display names.
pub trait StationSource {
    /// Expand a station-group code (a city grouping, say) into its
    /// constituent stations. A plain station code expands to itself;
    /// unknown codes expand to nothing.
    fn relevant_stations(&self, code: &str) -> Result<Vec<Crs>, SourceError>;

    /// Display names for every known station. Precompute runs treat the
    /// key set as the station universe.
    fn locations(&self) -> Result<HashMap<Crs, String>, SourceError>;
}

/// Persisted transfer patterns, keyed by journey endpoints.
///
/// The key destination is the journey's final station, which may sit past
/// the pattern's last timetabled stop when the journey ends with a fixed
/// leg. Methods take `&self`; implementations use interior mutability so a
/// store can be shared across precompute workers.
pub trait PatternStore {
    /// Every stored pattern for journeys `origin` to `destination`.
    fn patterns(&self, origin: Crs, destination: Crs) -> Result<Vec<TransferPattern>, SourceError>;

    /// Persist all patterns discovered for one origin in a single batch,
    /// each paired with its journey destination. The batch must land
    /// atomically: either every pattern is visible afterwards or none is.
    fn persist_batch(
        &self,
        origin: Crs,
        patterns: &[(Crs, TransferPattern)],
    ) -> Result<(), SourceError>;
}

/// Provides complete timetabled legs between a station pair.
pub trait LegSource {
    /// Legs running `origin` to `destination` on `date`, sorted by arrival
    /// time then departure time.
    fn timetable_legs(
        &self,
        date: NaiveDate,
        origin: Crs,
        destination: Crs,
    ) -> Result<Vec<TimetabledLeg>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_messages() {
        assert_eq!(
            SourceError::Storage("disk full".into()).to_string(),
            "storage failure: disk full"
        );
        assert_eq!(
            SourceError::InvalidData("bad row".into()).to_string(),
            "invalid data in source: bad row"
        );
    }
}
