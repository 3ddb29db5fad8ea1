//! In-memory sources.
//!
//! Simple owned-data implementations of the provider traits. They back the
//! test suites and small deployments where the whole schedule fits in
//! memory; the precompute pipeline is generic over the traits, so these
//! are interchangeable with heavier backends.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::domain::{Crs, Time, TimetabledConnection, TimetabledLeg, TransferConnection};
use crate::pattern::TransferPattern;

use super::{
    InterchangeSource, LegSource, PatternStore, SourceError, StationSource, TimetableSource,
};

/// A full schedule held in memory, the same connections every day.
///
/// Connections are sorted by departure at construction so queries can
/// binary-search the cut-off.
#[derive(Debug, Default)]
pub struct MemoryTimetable {
    timetable: Vec<TimetabledConnection>,
    transfers: HashMap<Crs, Vec<TransferConnection>>,
    interchange: HashMap<Crs, i32>,
    groups: HashMap<String, Vec<Crs>>,
}

impl MemoryTimetable {
    pub fn new(
        mut timetable: Vec<TimetabledConnection>,
        transfers: Vec<TransferConnection>,
        interchange: HashMap<Crs, i32>,
    ) -> Self {
        timetable.sort_by_key(|c| c.departure_time());
        let mut by_origin: HashMap<Crs, Vec<TransferConnection>> = HashMap::new();
        for t in transfers {
            by_origin.entry(t.origin()).or_default().push(t);
        }
        Self {
            timetable,
            transfers: by_origin,
            interchange,
            groups: HashMap::new(),
        }
    }

    /// Register a station-group code that expands to `stations`.
    pub fn with_group(mut self, code: &str, stations: Vec<Crs>) -> Self {
        self.groups.insert(code.to_string(), stations);
        self
    }

    /// Every station appearing in the timetable or a transfer, sorted.
    fn known_stations(&self) -> Vec<Crs> {
        let mut stations: Vec<Crs> = self
            .timetable
            .iter()
            .flat_map(|c| [c.origin(), c.destination()])
            .chain(
                self.transfers
                    .values()
                    .flatten()
                    .flat_map(|t| [t.origin(), t.destination()]),
            )
            .collect();
        stations.sort();
        stations.dedup();
        stations
    }
}

impl TimetableSource for MemoryTimetable {
    fn timetable_connections(
        &self,
        _date: NaiveDate,
        after: Time,
    ) -> Result<Vec<TimetabledConnection>, SourceError> {
        let start = self.timetable.partition_point(|c| c.departure_time() < after);
        Ok(self.timetable[start..].to_vec())
    }

    fn non_timetable_connections(
        &self,
        _date: NaiveDate,
    ) -> Result<HashMap<Crs, Vec<TransferConnection>>, SourceError> {
        Ok(self.transfers.clone())
    }
}

impl InterchangeSource for MemoryTimetable {
    fn interchange_times(&self) -> Result<HashMap<Crs, i32>, SourceError> {
        Ok(self.interchange.clone())
    }
}

impl StationSource for MemoryTimetable {
    fn relevant_stations(&self, code: &str) -> Result<Vec<Crs>, SourceError> {
        if let Some(members) = self.groups.get(code) {
            return Ok(members.clone());
        }
        match Crs::parse(code) {
            Ok(station) if self.known_stations().contains(&station) => Ok(vec![station]),
            _ => Ok(Vec::new()),
        }
    }

    /// Station codes double as display names; this source carries no
    /// richer directory.
    fn locations(&self) -> Result<HashMap<Crs, String>, SourceError> {
        Ok(self
            .known_stations()
            .into_iter()
            .map(|s| (s, s.as_str().to_string()))
            .collect())
    }
}

/// Pattern store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryPatternStore {
    by_origin: Mutex<HashMap<Crs, Vec<(Crs, TransferPattern)>>>,
}

impl MemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored patterns, across every origin.
    pub fn len(&self) -> usize {
        match self.by_origin.lock() {
            Ok(guard) => guard.values().map(Vec::len).sum(),
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PatternStore for MemoryPatternStore {
    fn patterns(&self, origin: Crs, destination: Crs) -> Result<Vec<TransferPattern>, SourceError> {
        let guard = self
            .by_origin
            .lock()
            .map_err(|_| SourceError::Storage("pattern store lock poisoned".to_string()))?;
        Ok(guard
            .get(&origin)
            .into_iter()
            .flatten()
            .filter(|(dest, _)| *dest == destination)
            .map(|(_, pattern)| pattern.clone())
            .collect())
    }

    fn persist_batch(
        &self,
        origin: Crs,
        patterns: &[(Crs, TransferPattern)],
    ) -> Result<(), SourceError> {
        let mut guard = self
            .by_origin
            .lock()
            .map_err(|_| SourceError::Storage("pattern store lock poisoned".to_string()))?;
        guard.insert(origin, patterns.to_vec());
        Ok(())
    }
}

/// Leg source over a fixed set of legs, the same every day.
#[derive(Debug, Default)]
pub struct MemoryLegSource {
    legs: Vec<TimetabledLeg>,
}

impl MemoryLegSource {
    pub fn new(legs: Vec<TimetabledLeg>) -> Self {
        Self { legs }
    }
}

impl LegSource for MemoryLegSource {
    fn timetable_legs(
        &self,
        _date: NaiveDate,
        origin: Crs,
        destination: Crs,
    ) -> Result<Vec<TimetabledLeg>, SourceError> {
        let mut legs: Vec<TimetabledLeg> = self
            .legs
            .iter()
            .filter(|l| l.origin() == origin && l.destination() == destination)
            .cloned()
            .collect();
        legs.sort_by_key(|l| (l.arrival_time(), l.departure_time()));
        Ok(legs)
    }
}
