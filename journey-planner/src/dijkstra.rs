//! Shortest fixed-duration paths.
//!
//! Treats non-timetabled connections as a weighted digraph and runs
//! Dijkstra from a single origin. Used to answer "how long to walk or
//! shuttle between these stations, ignoring the timetable" for every
//! station at once.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::domain::{Crs, TransferConnection};

/// Minimum total duration in seconds from `origin` to every reachable
/// station. The origin maps to zero; unreachable stations are absent.
///
/// Parallel edges are fine; the cheaper one wins. Availability windows are
/// ignored, matching the untimed nature of the query.
///
/// # Examples
///
/// ```
/// use journey_planner::dijkstra::shortest_durations;
/// use journey_planner::domain::{Crs, Mode, TransferConnection};
///
/// let a = Crs::parse("AAA").unwrap();
/// let b = Crs::parse("BBB").unwrap();
/// let edges = vec![TransferConnection::new(a, b, 120, Mode::Walk).unwrap()];
///
/// let durations = shortest_durations(&edges, a);
/// assert_eq!(durations[&b], 120);
/// ```
pub fn shortest_durations(edges: &[TransferConnection], origin: Crs) -> HashMap<Crs, i32> {
    let mut adjacency: HashMap<Crs, Vec<&TransferConnection>> = HashMap::new();
    for edge in edges {
        adjacency.entry(edge.origin()).or_default().push(edge);
    }

    let mut durations: HashMap<Crs, i32> = HashMap::new();
    let mut heap: BinaryHeap<Reverse<(i32, Crs)>> = BinaryHeap::new();
    durations.insert(origin, 0);
    heap.push(Reverse((0, origin)));

    while let Some(Reverse((duration, station))) = heap.pop() {
        // Stale entry: a shorter path was already settled.
        if durations.get(&station).is_some_and(|&best| duration > best) {
            continue;
        }

        let Some(outgoing) = adjacency.get(&station) else {
            continue;
        };
        for edge in outgoing {
            let candidate = duration + edge.duration();
            let better = durations
                .get(&edge.destination())
                .is_none_or(|&best| candidate < best);
            if better {
                durations.insert(edge.destination(), candidate);
                heap.push(Reverse((candidate, edge.destination())));
            }
        }
    }

    durations
}
