//! Serde helpers for metric values that may be non-finite.
//!
//! JSON has no infinity or NaN, so those values are written as the strings
//! `"inf"`, `"-inf"` and `"nan"`. Finite values stay plain numbers. On input
//! a `null` reads as `+inf`, the only non-finite value the metrics produce.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("nan")
    } else if value.is_sign_positive() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(f64::INFINITY),
        Some(Repr::Number(v)) => Ok(v),
        Some(Repr::Text(text)) => match text.to_ascii_lowercase().as_str() {
            "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
            "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
            "nan" => Ok(f64::NAN),
            _ => Err(de::Error::invalid_value(
                de::Unexpected::Str(&text),
                &"a number, \"inf\", \"-inf\" or \"nan\"",
            )),
        },
    }
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct Value(#[serde(with = "crate::domain::float")] f64);

/// The same encoding applied to every element of a metric vector.
pub mod vector {
    use super::{Deserialize, Deserializer, Serialize, Serializer, Value};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(values: &[f64; 4], serializer: S) -> Result<S::Ok, S::Error> {
        values.map(Value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[f64; 4], D::Error> {
        let values = <[Value; 4]>::deserialize(deserializer)?;
        Ok(values.map(|Value(v)| v))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapped {
        #[serde(with = "crate::domain::float")]
        value: f64,
    }

    fn encode(value: f64) -> String {
        serde_json::to_string(&Wrapped { value }).unwrap()
    }

    fn decode(json: &str) -> f64 {
        serde_json::from_str::<Wrapped>(json).unwrap().value
    }

    #[test]
    fn test_finite_values_stay_numbers() {
        assert_eq!(encode(1.5), r#"{"value":1.5}"#);
        assert_eq!(decode(r#"{"value":1.5}"#), 1.5);
    }

    #[test]
    fn test_non_finite_values_are_tokens() {
        assert_eq!(encode(f64::INFINITY), r#"{"value":"inf"}"#);
        assert_eq!(encode(f64::NEG_INFINITY), r#"{"value":"-inf"}"#);
        assert_eq!(encode(f64::NAN), r#"{"value":"nan"}"#);

        assert_eq!(decode(r#"{"value":"inf"}"#), f64::INFINITY);
        assert_eq!(decode(r#"{"value":"-inf"}"#), f64::NEG_INFINITY);
        assert!(decode(r#"{"value":"nan"}"#).is_nan());
    }

    #[test]
    fn test_null_reads_as_infinity() {
        assert_eq!(decode(r#"{"value":null}"#), f64::INFINITY);
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        assert!(serde_json::from_str::<Wrapped>(r#"{"value":"lots"}"#).is_err());
    }
}
