//! Caching layer for timetable sources.
//!
//! Timetable queries repeat heavily: every journey query for the same day
//! and rough departure time fetches the same connections. Requests are
//! bucketed by departure time so nearby queries share one entry, and the
//! fetch happens at the bucket floor so the shared entry covers every
//! caller in the bucket.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache as MokaCache;

use crate::domain::{Crs, Time, TimetabledConnection, TransferConnection};
use crate::provider::{InterchangeSource, SourceError, TimetableSource};

/// Cache key for timetable fetches: (date, time bucket).
type TimetableKey = (NaiveDate, i32);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,

    /// Time bucket size in seconds.
    pub bucket_secs: i32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
            bucket_secs: 300,
        }
    }
}

/// Timetable source with caching.
///
/// Wraps any [`TimetableSource`] + [`InterchangeSource`] and memoizes its
/// responses. Callers see identical semantics on hit and miss; only
/// latency differs. Errors are returned but never cached, so a transient
/// backend failure does not poison the bucket.
pub struct CachedTimetable<S> {
    inner: S,
    timetable: MokaCache<TimetableKey, Arc<Vec<TimetabledConnection>>>,
    transfers: MokaCache<NaiveDate, Arc<HashMap<Crs, Vec<TransferConnection>>>>,
    interchange: MokaCache<(), Arc<HashMap<Crs, i32>>>,
    bucket_secs: i32,
}

impl<S> CachedTimetable<S> {
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        Self {
            inner,
            timetable: MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build(),
            transfers: MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build(),
            interchange: MokaCache::builder().time_to_live(config.ttl).max_capacity(1).build(),
            bucket_secs: config.bucket_secs.max(1),
        }
    }

    /// Access the wrapped source for operations that bypass the cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.timetable.invalidate_all();
        self.transfers.invalidate_all();
        self.interchange.invalidate_all();
    }

    fn bucket(&self, after: Time) -> i32 {
        after.seconds().div_euclid(self.bucket_secs)
    }
}

impl<S: TimetableSource> TimetableSource for CachedTimetable<S> {
    fn timetable_connections(
        &self,
        date: NaiveDate,
        after: Time,
    ) -> Result<Vec<TimetabledConnection>, SourceError> {
        let bucket = self.bucket(after);
        let floor = Time::from_seconds(bucket * self.bucket_secs);

        let entry = self
            .timetable
            .try_get_with((date, bucket), || {
                self.inner.timetable_connections(date, floor).map(Arc::new)
            })
            .map_err(|e: Arc<SourceError>| (*e).clone())?;

        // The entry starts at the bucket floor; trim back to the caller's
        // actual cut-off.
        Ok(entry
            .iter()
            .filter(|c| c.departure_time() >= after)
            .cloned()
            .collect())
    }

    fn non_timetable_connections(
        &self,
        date: NaiveDate,
    ) -> Result<HashMap<Crs, Vec<TransferConnection>>, SourceError> {
        let entry = self
            .transfers
            .try_get_with(date, || {
                self.inner.non_timetable_connections(date).map(Arc::new)
            })
            .map_err(|e: Arc<SourceError>| (*e).clone())?;
        Ok((*entry).clone())
    }
}

impl<S: InterchangeSource> InterchangeSource for CachedTimetable<S> {
    fn interchange_times(&self) -> Result<HashMap<Crs, i32>, SourceError> {
        let entry = self
            .interchange
            .try_get_with((), || self.inner.interchange_times().map(Arc::new))
            .map_err(|e: Arc<SourceError>| (*e).clone())?;
        Ok((*entry).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mode, Operator, ServiceId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn crs(s: &str) -> Crs {
        Crs::parse(s).unwrap()
    }

    fn tt(dep: i32) -> TimetabledConnection {
        TimetabledConnection::new(
            crs("AAA"),
            crs("BBB"),
            Time::from_seconds(dep),
            Time::from_seconds(dep + 100),
            ServiceId::new("CS1000".to_string()).unwrap(),
            Operator::parse("LN").unwrap(),
            Mode::Train,
        )
        .unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    /// Counts fetches; optionally fails every call.
    #[derive(Default)]
    struct CountingSource {
        connections: Vec<TimetabledConnection>,
        fetches: AtomicUsize,
        fail: bool,
    }

    impl TimetableSource for CountingSource {
        fn timetable_connections(
            &self,
            _date: NaiveDate,
            after: Time,
        ) -> Result<Vec<TimetabledConnection>, SourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SourceError::Storage("down".to_string()));
            }
            Ok(self
                .connections
                .iter()
                .filter(|c| c.departure_time() >= after)
                .cloned()
                .collect())
        }

        fn non_timetable_connections(
            &self,
            _date: NaiveDate,
        ) -> Result<HashMap<Crs, Vec<TransferConnection>>, SourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(HashMap::new())
        }
    }

    #[test]
    fn same_bucket_fetches_once() {
        let source = CountingSource {
            connections: vec![tt(1000), tt(1100)],
            ..Default::default()
        };
        let cached = CachedTimetable::new(source, &CacheConfig::default());

        let first = cached
            .timetable_connections(date(), Time::from_seconds(1000))
            .unwrap();
        let second = cached
            .timetable_connections(date(), Time::from_seconds(1050))
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(cached.inner().fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hit_is_trimmed_to_caller_cutoff() {
        let source = CountingSource {
            connections: vec![tt(1000), tt(1100), tt(1200)],
            ..Default::default()
        };
        let cached = CachedTimetable::new(source, &CacheConfig::default());

        cached
            .timetable_connections(date(), Time::from_seconds(1000))
            .unwrap();
        let trimmed = cached
            .timetable_connections(date(), Time::from_seconds(1150))
            .unwrap();

        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed[0].departure_time(), Time::from_seconds(1200));
    }

    #[test]
    fn different_buckets_fetch_separately() {
        let source = CountingSource {
            connections: vec![tt(1000)],
            ..Default::default()
        };
        let cached = CachedTimetable::new(source, &CacheConfig::default());

        cached
            .timetable_connections(date(), Time::from_seconds(100))
            .unwrap();
        cached
            .timetable_connections(date(), Time::from_seconds(700))
            .unwrap();

        assert_eq!(cached.inner().fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn different_dates_fetch_separately() {
        let source = CountingSource {
            connections: vec![tt(1000)],
            ..Default::default()
        };
        let cached = CachedTimetable::new(source, &CacheConfig::default());

        cached
            .timetable_connections(date(), Time::from_seconds(100))
            .unwrap();
        cached
            .timetable_connections(
                NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                Time::from_seconds(100),
            )
            .unwrap();

        assert_eq!(cached.inner().fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn errors_propagate_and_are_not_cached() {
        let source = CountingSource {
            fail: true,
            ..Default::default()
        };
        let cached = CachedTimetable::new(source, &CacheConfig::default());

        for _ in 0..2 {
            let result = cached.timetable_connections(date(), Time::from_seconds(100));
            assert_eq!(result, Err(SourceError::Storage("down".to_string())));
        }
        assert_eq!(cached.inner().fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let source = CountingSource {
            connections: vec![tt(1000)],
            ..Default::default()
        };
        let cached = CachedTimetable::new(source, &CacheConfig::default());

        cached
            .timetable_connections(date(), Time::from_seconds(100))
            .unwrap();
        cached.invalidate_all();
        cached
            .timetable_connections(date(), Time::from_seconds(100))
            .unwrap();

        assert_eq!(cached.inner().fetches.load(Ordering::SeqCst), 2);
    }
}
