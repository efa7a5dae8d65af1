//! Validated primitive types shared across the Openspace crates.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing a patient identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input was empty or contained only whitespace
    #[error("patient id cannot be empty")]
    Empty,
    /// The input contained something other than ASCII digits
    #[error("patient id must be a positive integer: {0:?}")]
    NotNumeric(String),
    /// The input parsed to zero
    #[error("patient id must be greater than zero")]
    Zero,
    /// The input has a leading zero, as in `007`
    #[error("patient id must not have leading zeros: {0:?}")]
    LeadingZero(String),
    /// The input is larger than [`PatientId::MAX`]
    #[error("patient id is out of range: {0}")]
    OutOfRange(String),
}

/// A patient identifier, guaranteed to be a positive integer.
///
/// Identifiers arrive as text (query strings, CLI arguments) and as numbers (patient API
/// payloads, stored session ledgers). Both forms normalise to the same value, so `"7"` and `7`
/// compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatientId(u64);

impl PatientId {
    /// Largest accepted identifier, the signed 64-bit maximum.
    pub const MAX: u64 = i64::MAX as u64;

    /// Creates a `PatientId` from a raw integer.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Zero` when `value` is zero and `IdError::OutOfRange` above
    /// [`PatientId::MAX`].
    pub fn new(value: u64) -> Result<Self, IdError> {
        if value == 0 {
            return Err(IdError::Zero);
        }
        if value > Self::MAX {
            return Err(IdError::OutOfRange(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parses a textual identifier.
    ///
    /// Surrounding whitespace is trimmed and a single leading `+` is accepted. Anything else
    /// that is not a plain run of ASCII digits is rejected, including signs, decimals,
    /// exponents and leading zeros.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }

        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::NotNumeric(trimmed.to_owned()));
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(IdError::LeadingZero(trimmed.to_owned()));
        }

        let value = digits
            .parse::<u64>()
            .map_err(|_| IdError::OutOfRange(trimmed.to_owned()))?;
        Self::new(value)
    }

    /// Returns the raw integer value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PatientIdVisitor;

        impl serde::de::Visitor<'_> for PatientIdVisitor {
            type Value = PatientId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a positive integer or a string holding one")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<PatientId, E> {
                PatientId::new(v).map_err(E::custom)
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<PatientId, E> {
                let v = u64::try_from(v).map_err(|_| E::custom(IdError::Zero))?;
                PatientId::new(v).map_err(E::custom)
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<PatientId, E> {
                if v.fract() != 0.0 || v < 1.0 || v > u64::MAX as f64 {
                    return Err(E::custom(IdError::NotNumeric(v.to_string())));
                }
                PatientId::new(v as u64).map_err(E::custom)
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<PatientId, E> {
                PatientId::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PatientIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_plain_digits() {
        assert_eq!(PatientId::parse("42").unwrap().get(), 42);
        assert_eq!(PatientId::parse("  7 ").unwrap().get(), 7);
        assert_eq!(PatientId::parse("+9").unwrap().get(), 9);
        assert_eq!(PatientId::parse("10").unwrap().get(), 10);
        assert_eq!(
            PatientId::parse("9223372036854775807").unwrap().get(),
            PatientId::MAX
        );
    }

    #[test]
    fn test_parse_rejects_leading_zeros() {
        for raw in ["007", "00", "+01", " 0042 "] {
            assert!(
                matches!(PatientId::parse(raw), Err(IdError::LeadingZero(_))),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn test_rejects_values_above_signed_max() {
        assert!(matches!(
            PatientId::parse("9223372036854775808"),
            Err(IdError::OutOfRange(_))
        ));
        assert!(matches!(
            PatientId::parse("18446744073709551615"),
            Err(IdError::OutOfRange(_))
        ));
        assert!(matches!(
            PatientId::new(u64::MAX),
            Err(IdError::OutOfRange(_))
        ));
        assert!(serde_json::from_str::<PatientId>("9223372036854775808").is_err());
    }

    #[test]
    fn test_parse_rejects_non_positive_and_junk() {
        assert_eq!(PatientId::parse(""), Err(IdError::Empty));
        assert_eq!(PatientId::parse("   "), Err(IdError::Empty));
        assert_eq!(PatientId::parse("0"), Err(IdError::Zero));
        assert!(matches!(PatientId::parse("-3"), Err(IdError::NotNumeric(_))));
        assert!(matches!(PatientId::parse("12abc"), Err(IdError::NotNumeric(_))));
        assert!(matches!(PatientId::parse("1.5"), Err(IdError::NotNumeric(_))));
        assert!(matches!(PatientId::parse("+"), Err(IdError::NotNumeric(_))));
        assert!(matches!(
            PatientId::parse("99999999999999999999999"),
            Err(IdError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_text_and_numeric_forms_compare_equal() {
        let from_number: PatientId = serde_json::from_str("7").unwrap();
        let from_text: PatientId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_number, from_text);
        assert_eq!(from_text, PatientId::parse("7").unwrap());
    }

    #[test]
    fn test_deserialize_rejects_invalid_values() {
        assert!(serde_json::from_str::<PatientId>("0").is_err());
        assert!(serde_json::from_str::<PatientId>("-1").is_err());
        assert!(serde_json::from_str::<PatientId>("2.5").is_err());
        assert!(serde_json::from_str::<PatientId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<PatientId>("null").is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        let id = PatientId::parse("42").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(id.to_string(), "42");
    }
}
