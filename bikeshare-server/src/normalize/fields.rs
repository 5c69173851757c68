//! Lenient field access on a single feed record.

use serde_json::{Map, Value};

use crate::domain::{StationId, VehicleTypeId};

/// Borrowed view of one JSON record.
///
/// Every getter returns `None` for a missing key, a `null` value, or a value
/// of the wrong shape. GBFS publishers disagree on whether numbers are sent
/// as numbers or strings and whether flags are booleans or 0/1, so both
/// spellings are accepted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    pub fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(Fields)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        let value: Option<f64> = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        value.filter(|f| f.is_finite())
    }

    pub fn i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn u32(&self, key: &str) -> Option<u32> {
        self.i64(key).and_then(|n| u32::try_from(n).ok())
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => match s.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// A nested array. Absent reads as empty; any other type is an error.
    pub fn nested(&self, key: &str) -> Result<&'a [Value], String> {
        match self.get(key) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(format!("{key} is not an array")),
        }
    }

    pub fn vehicle_type_id(&self) -> Option<VehicleTypeId> {
        self.get("vehicle_type_id").and_then(VehicleTypeId::coerce)
    }

    pub fn station_id(&self) -> Result<StationId, String> {
        let value = self
            .0
            .get("station_id")
            .ok_or_else(|| "missing station_id".to_string())?;
        StationId::from_json(value).map_err(|e| e.to_string())
    }
}
