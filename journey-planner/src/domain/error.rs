//! Domain error types.
//!
//! These errors represent contract violations when constructing domain
//! values: an empty leg or journey, connections that do not join up, or a
//! connection whose times are inconsistent. They are distinct from the
//! recoverable planning failures and from collaborator/storage errors.

use super::{Crs, Time};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Connection arrival precedes its departure
    #[error("connection arrival {arrival} precedes departure {departure}")]
    ArrivalBeforeDeparture { departure: Time, arrival: Time },

    /// Transfer connection has a negative duration
    #[error("transfer duration must be non-negative, got {0}")]
    NegativeDuration(i32),

    /// Leg has no connections
    #[error("leg must have at least one connection")]
    EmptyLeg,

    /// Leg mixes connections from different services
    #[error("leg connections must all belong to one service")]
    MixedServices,

    /// Consecutive connections or legs don't join up
    #[error("stations {0} and {1} are not connected")]
    StationsNotConnected(Crs, Crs),

    /// Journey has no legs
    #[error("journey must have at least one leg")]
    EmptyJourney,
}
