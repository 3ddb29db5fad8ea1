//! Transfer patterns.
//!
//! A transfer pattern is the skeleton of a journey: the ordered station
//! pairs of its timetabled legs, with departure and arrival times stripped.
//! Fixed legs never appear; only where you board and alight matters.
//! Patterns hash to a compact string of concatenated station codes so they
//! can be persisted and compared cheaply.

use std::fmt;

use thiserror::Error;

use crate::domain::{Crs, InvalidCrs, Journey, Leg};

/// Reasons a stored pattern string fails to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidPattern {
    #[error("pattern length {0} is not a multiple of 6")]
    Length(usize),
    #[error("pattern is empty")]
    Empty,
    #[error("bad station code in pattern: {0}")]
    Station(#[from] InvalidCrs),
}

/// The ordered (board, alight) station pairs of a journey's timetabled
/// legs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferPattern {
    pairs: Vec<(Crs, Crs)>,
}

impl TransferPattern {
    /// Extract the pattern of `journey`, or `None` when the journey has no
    /// timetabled legs (an all-walking journey has no pattern worth
    /// storing).
    pub fn from_journey(journey: &Journey) -> Option<Self> {
        let pairs: Vec<(Crs, Crs)> = journey
            .legs()
            .iter()
            .filter_map(|leg| match leg {
                Leg::Timetabled(t) => Some((t.origin(), t.destination())),
                Leg::Fixed(_) => None,
            })
            .collect();
        if pairs.is_empty() {
            return None;
        }
        Some(Self { pairs })
    }

    /// Parse the compact form produced by [`path_hash`](Self::path_hash):
    /// six characters per pair, three per station code.
    pub fn parse(hash: &str) -> Result<Self, InvalidPattern> {
        if hash.is_empty() {
            return Err(InvalidPattern::Empty);
        }
        if hash.len() % 6 != 0 {
            return Err(InvalidPattern::Length(hash.len()));
        }

        let mut pairs = Vec::with_capacity(hash.len() / 6);
        for chunk in hash.as_bytes().chunks(6) {
            let origin = Crs::parse(std::str::from_utf8(&chunk[..3]).unwrap_or(""))?;
            let destination = Crs::parse(std::str::from_utf8(&chunk[3..]).unwrap_or(""))?;
            pairs.push((origin, destination));
        }
        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[(Crs, Crs)] {
        &self.pairs
    }

    /// Number of timetabled legs the pattern describes.
    pub fn leg_count(&self) -> usize {
        self.pairs.len()
    }

    /// First boarding station.
    pub fn origin(&self) -> Crs {
        self.pairs[0].0
    }

    /// Final alighting station. The journey behind the pattern may continue
    /// past this by fixed legs.
    pub fn destination(&self) -> Crs {
        self.pairs[self.pairs.len() - 1].1
    }

    /// Compact string form: station codes of every pair, concatenated.
    pub fn path_hash(&self) -> String {
        let mut hash = String::with_capacity(self.pairs.len() * 6);
        for (origin, destination) in &self.pairs {
            hash.push_str(origin.as_str());
            hash.push_str(destination.as_str());
        }
        hash
    }
}

impl fmt::Display for TransferPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (origin, destination)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{origin}-{destination}")?;
        }
        Ok(())
    }
}
