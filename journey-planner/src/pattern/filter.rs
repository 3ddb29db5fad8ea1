//! Pareto filtering of candidate journeys.
//!
//! Pattern reconstruction over-generates: several first legs, several
//! segment choices, several schedules. This filter prunes the pool down
//! to the journeys worth showing and returns them sorted, so callers see
//! a clean timetable-like list.

use std::collections::HashMap;

use crate::domain::{Journey, Time};

/// Prune dominated candidates.
///
/// A timed journey survives iff it has the earliest arrival among journeys
/// sharing its departure time and the latest departure among journeys
/// sharing its arrival time; ties on both are broken by fewest legs, then
/// input order. Output is sorted by departure then arrival. Journeys
/// without times (all fixed legs) pass through unfiltered, appended after
/// the timed ones.
///
/// Running the filter on its own output changes nothing.
pub fn pareto_filter(journeys: Vec<Journey>) -> Vec<Journey> {
    let mut timed: Vec<(Time, Time, Journey)> = Vec::new();
    let mut untimed: Vec<Journey> = Vec::new();
    for journey in journeys {
        match (journey.departure_time(), journey.arrival_time()) {
            (Some(dep), Some(arr)) => timed.push((dep, arr, journey)),
            _ => untimed.push(journey),
        }
    }

    let mut earliest_arrival: HashMap<Time, Time> = HashMap::new();
    let mut latest_departure: HashMap<Time, Time> = HashMap::new();
    for (dep, arr, _) in &timed {
        earliest_arrival
            .entry(*dep)
            .and_modify(|best| *best = (*best).min(*arr))
            .or_insert(*arr);
        latest_departure
            .entry(*arr)
            .and_modify(|best| *best = (*best).max(*dep))
            .or_insert(*dep);
    }

    let mut kept: HashMap<(Time, Time), Journey> = HashMap::new();
    for (dep, arr, journey) in timed {
        if earliest_arrival[&dep] != arr || latest_departure[&arr] != dep {
            continue;
        }
        kept.entry((dep, arr))
            .and_modify(|current| {
                if journey.leg_count() < current.leg_count() {
                    *current = journey.clone();
                }
            })
            .or_insert(journey);
    }

    let mut result: Vec<Journey> = kept.into_values().collect();
    result.sort_by_key(|j| (j.departure_time(), j.arrival_time()));
    result.extend(untimed);
    result
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Crs, Leg, Mode, Operator, ServiceId, TimetabledConnection};
    use proptest::prelude::*;

    fn journey(dep: i32, run: i32) -> Journey {
        let conn = TimetabledConnection::new(
            Crs::parse("AAA").unwrap(),
            Crs::parse("BBB").unwrap(),
            Time::from_seconds(dep),
            Time::from_seconds(dep + run),
            ServiceId::new("CS1".to_string()).unwrap(),
            Operator::parse("LN").unwrap(),
            Mode::Train,
        )
        .unwrap();
        Journey::new(vec![Leg::timetabled(vec![conn]).unwrap()]).unwrap()
    }

    proptest! {
        /// Output keys are unique: at most one journey per departure time
        /// and at most one per arrival time, and applying the filter again
        /// changes nothing.
        #[test]
        fn keys_unique_and_idempotent(
            raw in proptest::collection::vec((0i32..10_000, 1i32..5_000), 0..30)
        ) {
            let journeys: Vec<Journey> = raw.into_iter().map(|(d, r)| journey(d, r)).collect();
            let filtered = pareto_filter(journeys);

            let mut departures: Vec<_> =
                filtered.iter().map(|j| j.departure_time()).collect();
            let mut arrivals: Vec<_> = filtered.iter().map(|j| j.arrival_time()).collect();
            departures.sort();
            arrivals.sort();
            let unique = |v: &[Option<Time>]| v.windows(2).all(|w| w[0] != w[1]);
            prop_assert!(unique(&departures));
            prop_assert!(unique(&arrivals));

            let again = pareto_filter(filtered.clone());
            let key = |js: &[Journey]| -> Vec<(Option<Time>, Option<Time>)> {
                js.iter().map(|j| (j.departure_time(), j.arrival_time())).collect()
            };
            prop_assert_eq!(key(&filtered), key(&again));
        }
    }
}
