//! Public-transport journey planner.
//!
//! Connection-scan planning over a departure-sorted timetable, plus the
//! transfer-pattern pipeline that precomputes journey skeletons offline
//! and re-times them cheaply at query time.

pub mod cache;
pub mod dijkstra;
pub mod domain;
pub mod pattern;
pub mod provider;
pub mod scan;
