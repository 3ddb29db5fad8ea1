//! Transfer-pattern precomputation.
//!
//! For every station, runs tree-mode combined scans at a grid of sample
//! dates and times, extracts the transfer pattern of each optimal journey,
//! and persists the deduplicated set per origin. Stations are processed by
//! a bounded pool of blocking workers; a failed station is logged and
//! skipped so one bad origin cannot sink a whole run.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tokio::task;
use tracing::{info, warn};

use crate::domain::{Crs, Time};
use crate::provider::{
    InterchangeSource, PatternStore, SourceError, StationSource, TimetableSource,
};
use crate::scan::CombinedScanner;

use super::TransferPattern;

/// Journeys needing more timetabled legs than this are too fragile to be
/// worth storing as patterns.
pub const MAX_PATTERN_LEGS: usize = 7;

/// The (date, time) grid sampled per origin station.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub dates: Vec<NaiveDate>,
    pub times: Vec<Time>,
}

/// Outcome of one precompute run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PrecomputeReport {
    pub stations_processed: usize,
    pub stations_failed: usize,
    pub patterns_stored: usize,
}

/// Runs the precompute pipeline over a schedule source and pattern store.
pub struct TransferPatternGenerator<S, P> {
    source: Arc<S>,
    store: Arc<P>,
    config: SampleConfig,
    concurrency: usize,
}

impl<S, P> TransferPatternGenerator<S, P>
where
    S: TimetableSource + InterchangeSource + StationSource + Send + Sync + 'static,
    P: PatternStore + Send + Sync + 'static,
{
    pub fn new(source: Arc<S>, store: Arc<P>, config: SampleConfig, concurrency: usize) -> Self {
        Self {
            source,
            store,
            config,
            concurrency: concurrency.max(1),
        }
    }

    /// Process every station the source knows about.
    ///
    /// Scans run on the blocking thread pool, at most `concurrency` at a
    /// time. Per-station failures are logged and counted but do not abort
    /// the run.
    pub async fn run(&self) -> Result<PrecomputeReport, SourceError> {
        let mut stations: Vec<Crs> = self.source.locations()?.into_keys().collect();
        stations.sort();
        info!(stations = stations.len(), "starting transfer pattern precompute");

        let results = stream::iter(stations)
            .map(|origin| {
                let source = Arc::clone(&self.source);
                let store = Arc::clone(&self.store);
                let config = self.config.clone();
                async move {
                    let handle = task::spawn_blocking(move || {
                        precompute_station(source.as_ref(), store.as_ref(), &config, origin)
                    });
                    (origin, handle.await)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut report = PrecomputeReport::default();
        for (origin, joined) in results {
            match joined {
                Ok(Ok(stored)) => {
                    report.stations_processed += 1;
                    report.patterns_stored += stored;
                }
                Ok(Err(error)) => {
                    warn!(station = %origin, %error, "skipping station after precompute failure");
                    report.stations_failed += 1;
                }
                Err(join_error) => {
                    warn!(station = %origin, error = %join_error, "precompute worker panicked");
                    report.stations_failed += 1;
                }
            }
        }

        info!(
            processed = report.stations_processed,
            failed = report.stations_failed,
            patterns = report.patterns_stored,
            "transfer pattern precompute finished"
        );
        Ok(report)
    }
}

/// Scan every sample for one origin and persist the deduplicated patterns.
/// Returns the number of patterns stored.
fn precompute_station<S, P>(
    source: &S,
    store: &P,
    config: &SampleConfig,
    origin: Crs,
) -> Result<usize, SourceError>
where
    S: TimetableSource + InterchangeSource,
    P: PatternStore,
{
    let interchange = source.interchange_times()?;

    let mut seen: HashSet<(Crs, String)> = HashSet::new();
    let mut patterns: Vec<(Crs, TransferPattern)> = Vec::new();

    for &date in &config.dates {
        let transfers = source.non_timetable_connections(date)?;
        for &time in &config.times {
            let timetable = source.timetable_connections(date, time)?;
            let scanner = CombinedScanner::new(&timetable, &transfers, &interchange);

            for (destination, journey) in scanner.plan_tree(origin, time) {
                let Some(pattern) = TransferPattern::from_journey(&journey) else {
                    continue;
                };
                if pattern.leg_count() > MAX_PATTERN_LEGS {
                    continue;
                }
                if seen.insert((destination, pattern.path_hash())) {
                    patterns.push((destination, pattern));
                }
            }
        }
    }

    store.persist_batch(origin, &patterns)?;
    Ok(patterns.len())
}
