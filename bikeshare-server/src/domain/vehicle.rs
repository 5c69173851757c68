//! Vehicle type identifiers and display categories.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// A numeric GBFS vehicle type identifier.
///
/// Feeds publish `vehicle_type_id` as a number in some systems and as a
/// numeric string in others. Both are coerced to the same integer before any
/// join so that `1` and `"1"` refer to the same type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleTypeId(i64);

impl VehicleTypeId {
    pub fn new(id: i64) -> Self {
        VehicleTypeId(id)
    }

    /// Coerce a JSON value to a vehicle type ID.
    ///
    /// Accepts integers, integral floats, and strings holding either.
    /// Returns `None` for anything else.
    pub fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(VehicleTypeId),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| {
                        s.parse::<f64>()
                            .ok()
                            .filter(|f| f.is_finite() && f.fract() == 0.0)
                            .map(|f| f as i64)
                    })
                    .map(VehicleTypeId)
            }
            _ => None,
        }
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for VehicleTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleTypeId({})", self.0)
    }
}

impl fmt::Display for VehicleTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for VehicleTypeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

/// Display category for a vehicle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum VehicleCategory {
    Bike,
    #[serde(rename = "E-Bike")]
    EBike,
    #[serde(rename = "E-Scooter")]
    EScooter,
    Other,
}

impl VehicleCategory {
    /// All categories, in column order.
    pub const ALL: [VehicleCategory; 4] = [
        VehicleCategory::Bike,
        VehicleCategory::EBike,
        VehicleCategory::EScooter,
        VehicleCategory::Other,
    ];

    /// Map a vehicle type code to its category.
    ///
    /// 1 is a classic bike, 2 an e-bike, 3 an e-scooter; everything else is
    /// `Other`.
    pub fn from_type_id(id: VehicleTypeId) -> Self {
        match id.get() {
            1 => VehicleCategory::Bike,
            2 => VehicleCategory::EBike,
            3 => VehicleCategory::EScooter,
            _ => VehicleCategory::Other,
        }
    }

    /// Human-readable label, also used as the column suffix in output.
    pub fn label(&self) -> &'static str {
        match self {
            VehicleCategory::Bike => "Bike",
            VehicleCategory::EBike => "E-Bike",
            VehicleCategory::EScooter => "E-Scooter",
            VehicleCategory::Other => "Other",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Integers coerce identically whether sent as numbers or strings.
        #[test]
        fn number_and_string_forms_agree(n in any::<i64>()) {
            let from_num = VehicleTypeId::coerce(&Value::from(n));
            let from_str = VehicleTypeId::coerce(&Value::from(n.to_string()));
            prop_assert_eq!(from_num, Some(VehicleTypeId::new(n)));
            prop_assert_eq!(from_str, from_num);
        }

        /// Codes outside 1..=3 are always Other.
        #[test]
        fn out_of_range_is_other(n in any::<i64>().prop_filter("not 1-3", |n| !(1..=3).contains(n))) {
            prop_assert_eq!(VehicleCategory::from_type_id(VehicleTypeId::new(n)), VehicleCategory::Other);
        }
    }
}
