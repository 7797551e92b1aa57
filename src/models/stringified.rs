//! Integer field conventions
//!
//! The API wants numeric fields as JSON strings on write but returns native
//! numbers on read (and occasionally strings). These helpers are plugged in
//! with `#[serde(with = "...")]` / `serialize_with` / `deserialize_with`.

use serde::de::{self, Deserializer, Visitor};
use serde::Serializer;
use std::fmt;

/// Serialize an integer as a JSON string
pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Deserialize an integer from a number or numeric string; `null` and `""` read as 0
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(LenientInt)
}

/// Serialize every element of an id list as a JSON string
pub fn serialize_ids<S: Serializer>(values: &[i64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(i64::to_string))
}

/// Zero is "unset" for write DTOs
pub fn is_zero(value: &i64) -> bool {
    *value == 0
}

struct LenientInt;

impl<'de> Visitor<'de> for LenientInt {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::custom(format!("integer {v} out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if v.fract() == 0.0 && v.abs() < 9.0e15 {
            Ok(v as i64)
        } else {
            Err(E::custom(format!("expected an integer, got {v}")))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let v = v.trim();
        if v.is_empty() {
            return Ok(0);
        }
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }

    fn visit_none<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        #[serde(with = "super", default)]
        id: i64,
        #[serde(serialize_with = "super::serialize_ids", default)]
        ids: Vec<i64>,
    }

    #[test]
    fn test_writes_strings() {
        let sample = Sample { id: 17, ids: vec![3, 1] };
        assert_eq!(
            serde_json::to_value(&sample).unwrap(),
            json!({"id": "17", "ids": ["3", "1"]})
        );
    }

    #[test]
    fn test_reads_numbers_and_strings() {
        let a: Sample = serde_json::from_value(json!({"id": 17})).unwrap();
        let b: Sample = serde_json::from_value(json!({"id": "17"})).unwrap();
        let c: Sample = serde_json::from_value(json!({"id": null})).unwrap();
        assert_eq!(a.id, 17);
        assert_eq!(b.id, 17);
        assert_eq!(c.id, 0);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_value::<Sample>(json!({"id": "abc"})).is_err());
        assert!(serde_json::from_value::<Sample>(json!({"id": 1.5})).is_err());
    }
}
