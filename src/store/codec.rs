//! JSON layout of the persisted record.
//!
//! The record is the camelCase encoding of [`StateSnapshot`]. Timestamps are
//! written as integer milliseconds and read back leniently: absent, `null`,
//! non-numeric or outside the `i64` range (on either side) become 0 and
//! fractional values are truncated. Recipe prep times are read the same way
//! and then clamped into `u32`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::model::StateSnapshot;

pub fn encode(snapshot: &StateSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(snapshot)
}

pub fn decode(raw: &str) -> Result<StateSnapshot, serde_json::Error> {
    serde_json::from_str(raw)
}

/// `#[serde(with = "wire_millis")]` adapter for [`Timestamp`](crate::model::Timestamp) fields
pub mod wire_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::model::Timestamp;

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(ts.as_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        let millis = value.as_ref().map(super::integer_from_value).unwrap_or(0);
        Ok(Timestamp::from_millis(millis))
    }
}

/// `#[serde(deserialize_with = "lenient_minutes")]` for recipe prep times
pub fn lenient_minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let minutes = value.as_ref().map(integer_from_value).unwrap_or(0);
    Ok(u32::try_from(minutes.max(0)).unwrap_or(u32::MAX))
}

/// Whole part of a JSON number or numeric string; 0 when it does not fit `i64`
fn integer_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            // Integers beyond i64 report through as_u64, everything else as f64
            None if n.is_u64() => 0,
            None => n.as_f64().map(truncate_f64).unwrap_or(0),
        },
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn truncate_f64(f: f64) -> i64 {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        f as i64
    } else {
        0
    }
}
