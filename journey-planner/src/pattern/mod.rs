//! Transfer-pattern planning.
//!
//! The expensive full-network scans run offline ([`precompute`]); queries
//! then re-time the stored patterns against live legs ([`planner`]),
//! merge candidates across schedules ([`schedule`]), and prune the pool
//! ([`filter`]).

mod filter;
mod pattern;
mod planner;
mod precompute;
mod schedule;

pub use filter::pareto_filter;
pub use pattern::{InvalidPattern, TransferPattern};
pub use planner::{segments_for_pattern, PatternPlanner, PatternSegment, PlanningError};
pub use precompute::{
    PrecomputeReport, SampleConfig, TransferPatternGenerator, MAX_PATTERN_LEGS,
};
pub use schedule::MultiSchedulePlanner;
