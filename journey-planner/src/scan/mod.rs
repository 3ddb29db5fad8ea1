//! Connection-scan planners.
//!
//! Three entry points over one time-ordered timetable: [`ConnectionScanner`]
//! answers depart-after queries, [`ArriveByScanner`] answers arrive-by
//! queries, and [`CombinedScanner`] composes the two so the journey both
//! arrives as early and departs as late as possible.

mod arrive_by;
mod combined;
mod forward;

pub use arrive_by::ArriveByScanner;
pub use combined::CombinedScanner;
pub use forward::{ConnectionScanner, Criteria, InterchangeTimes, ShortestPathTree, TransferMap};
