//! Station identifier type.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Error returned when a station identifier cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A GBFS station identifier.
///
/// Station IDs are opaque strings. Some systems publish them as JSON
/// numbers, so [`StationId::from_json`] accepts both and normalizes to the
/// string form; the join between feeds is then done on that form.
///
/// # Examples
///
/// ```
/// use bikeshare_server::domain::StationId;
///
/// let id = StationId::new("a3a2b1c0").unwrap();
/// assert_eq!(id.as_str(), "a3a2b1c0");
///
/// assert!(StationId::new("  ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    /// Create a station ID from a string.
    ///
    /// Leading and trailing whitespace is removed; an empty result is rejected.
    pub fn new(s: impl AsRef<str>) -> Result<Self, InvalidStationId> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InvalidStationId {
                reason: "station id cannot be empty",
            });
        }
        Ok(StationId(trimmed.to_string()))
    }

    /// Read a station ID from a JSON string or integer.
    pub fn from_json(value: &Value) -> Result<Self, InvalidStationId> {
        match value {
            Value::String(s) => Self::new(s),
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::new(n.to_string()),
            Value::Null => Err(InvalidStationId {
                reason: "station id is null",
            }),
            _ => Err(InvalidStationId {
                reason: "station id must be a string or integer",
            }),
        }
    }

    /// Returns the station ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_trims() {
        assert_eq!(StationId::new(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn reject_empty() {
        assert!(StationId::new("").is_err());
        assert!(StationId::new("\t").is_err());
    }

    #[test]
    fn from_json_string_and_integer_agree() {
        let a = StationId::from_json(&json!("517")).unwrap();
        let b = StationId::from_json(&json!(517)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_json_rejects_other_shapes() {
        assert!(StationId::from_json(&Value::Null).is_err());
        assert!(StationId::from_json(&json!(1.5)).is_err());
        assert!(StationId::from_json(&json!(true)).is_err());
        assert!(StationId::from_json(&json!({"id": 1})).is_err());
    }

    #[test]
    fn serializes_as_string() {
        let id = StationId::new("S1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"S1\"");
    }
}
