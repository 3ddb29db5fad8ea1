//! Domain types for the journey planner.
//!
//! This module contains the core domain model types that represent
//! validated timetable data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod connection;
mod error;
mod journey;
mod leg;
mod service;
mod station;
mod time;

pub use connection::{Connection, TimetabledConnection, TransferConnection};
pub use error::DomainError;
pub use journey::Journey;
pub use leg::{Leg, TimetabledLeg};
pub use service::{InvalidOperator, InvalidServiceId, Mode, Operator, ServiceId};
pub use station::{Crs, InvalidCrs};
pub use time::{InvalidTime, Time};
