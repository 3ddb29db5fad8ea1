//! Service identifier, operator code, and transport mode types.

use std::fmt;

/// Error returned when parsing an invalid service identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid service id: {reason}")]
pub struct InvalidServiceId {
    reason: &'static str,
}

/// A timetabled service identifier.
///
/// Service ids are opaque identifiers assigned by the timetable supplier
/// (e.g. `"CS1234"`). Two connections on the same service id can be ridden
/// without changing; this is the only interchange exemption. The only
/// validation is that they must be non-empty.
///
/// # Examples
///
/// ```
/// use journey_planner::domain::ServiceId;
///
/// let svc = ServiceId::new("CS1234".to_string()).unwrap();
/// assert_eq!(svc.as_str(), "CS1234");
///
/// // Empty strings are rejected
/// assert!(ServiceId::new("".to_string()).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ServiceId(String);

impl ServiceId {
    /// Create a new service id from a string.
    ///
    /// Returns an error if the string is empty.
    pub fn new(s: String) -> Result<Self, InvalidServiceId> {
        if s.is_empty() {
            return Err(InvalidServiceId {
                reason: "service id cannot be empty",
            });
        }
        Ok(ServiceId(s))
    }

    /// Returns the service id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceId({})", self.0)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing an invalid operator code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid operator code: {reason}")]
pub struct InvalidOperator {
    reason: &'static str,
}

/// A valid 2-letter operator code (e.g. `"LN"`, `"SW"`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operator([u8; 2]);

impl Operator {
    /// Parse an operator code from a string.
    ///
    /// The input must be exactly 2 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidOperator> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidOperator {
                reason: "must be exactly 2 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidOperator {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(Operator([bytes[0], bytes[1]]))
    }

    /// Returns the operator code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store valid ASCII uppercase letters
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operator({})", self.as_str())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport mode of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Train,
    Bus,
    Tube,
    Ferry,
    Walk,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Train => "train",
            Mode::Bus => "bus",
            Mode::Tube => "tube",
            Mode::Ferry => "ferry",
            Mode::Walk => "walk",
        };
        f.write_str(s)
    }
}
