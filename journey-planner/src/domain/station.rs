//! Station code types.

use std::fmt;

/// Error returned when parsing an invalid CRS code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid CRS code: {reason}")]
pub struct InvalidCrs {
    reason: &'static str,
}

/// A valid 3-letter CRS (Computer Reservation System) station code.
///
/// CRS codes are always 3 uppercase ASCII letters. This type guarantees
/// that any `Crs` value is valid by construction. Station-group codes
/// (e.g. a city grouping covering several physical stations) use the same
/// alphabet and are expanded by the station source collaborator.
///
/// # Examples
///
/// ```
/// use journey_planner::domain::Crs;
///
/// let kgx = Crs::parse("KGX").unwrap();
/// assert_eq!(kgx.as_str(), "KGX");
///
/// // Lowercase is rejected
/// assert!(Crs::parse("kgx").is_err());
///
/// // Wrong length is rejected
/// assert!(Crs::parse("KG").is_err());
/// assert!(Crs::parse("KGXX").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Crs([u8; 3]);

impl Crs {
    /// Parse a CRS code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidCrs> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidCrs {
                reason: "must be exactly 3 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidCrs {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(Crs([bytes[0], bytes[1], bytes[2]]))
    }

    /// Returns the CRS code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store valid ASCII uppercase letters
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Crs({})", self.as_str())
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert_eq!(Crs::parse("KGX").unwrap().as_str(), "KGX");
        assert_eq!(Crs::parse("AAA").unwrap().as_str(), "AAA");
        assert_eq!(Crs::parse("ZZZ").unwrap().as_str(), "ZZZ");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(Crs::parse("").is_err());
        assert!(Crs::parse("KG").is_err());
        assert!(Crs::parse("KGXX").is_err());
    }

    #[test]
    fn parse_rejects_non_uppercase() {
        assert!(Crs::parse("kgx").is_err());
        assert!(Crs::parse("Kgx").is_err());
        assert!(Crs::parse("K1X").is_err());
        assert!(Crs::parse("K-X").is_err());
    }

    #[test]
    fn display_and_debug() {
        let crs = Crs::parse("PAD").unwrap();
        assert_eq!(crs.to_string(), "PAD");
        assert_eq!(format!("{crs:?}"), "Crs(PAD)");
    }

    #[test]
    fn equality_and_hash() {
        use std::collections::HashSet;

        let a = Crs::parse("PAD").unwrap();
        let b = Crs::parse("PAD").unwrap();
        let c = Crs::parse("EUS").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any 3 uppercase letters parse, and round-trip through as_str.
        #[test]
        fn valid_codes_roundtrip(s in "[A-Z]{3}") {
            let crs = Crs::parse(&s).unwrap();
            prop_assert_eq!(crs.as_str(), s);
        }

        /// Strings of the wrong length never parse.
        #[test]
        fn wrong_length_rejected(s in "[A-Z]{0,2}|[A-Z]{4,6}") {
            prop_assert!(Crs::parse(&s).is_err());
        }
    }
}
