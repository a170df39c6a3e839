//! Conversion between typed leaf values and JSON.
//!
//! Follows RFC 7951: 64-bit integers may arrive as numbers or strings and an
//! `empty` leaf is written as `[null]`.

use restconf_core::LeafValue;
use serde_json::{json, Value as JsonValue};

use crate::schema::LeafType;

/// Convert a JSON member value to a leaf value of the given type.
pub(crate) fn leaf_from_json(leaf_type: LeafType, json: &JsonValue) -> Result<LeafValue, String> {
    match (leaf_type, json) {
        (LeafType::String, JsonValue::String(s)) => Ok(LeafValue::String(s.clone())),
        (LeafType::Boolean, JsonValue::Bool(b)) => Ok(LeafValue::Bool(*b)),
        (LeafType::Int, JsonValue::Number(n)) => n
            .as_i64()
            .map(LeafValue::Int)
            .ok_or_else(|| format!("{} is not a signed integer", n)),
        (LeafType::Uint, JsonValue::Number(n)) => n
            .as_u64()
            .map(LeafValue::Uint)
            .ok_or_else(|| format!("{} is not an unsigned integer", n)),
        (LeafType::Decimal, JsonValue::Number(n)) => n
            .as_f64()
            .map(LeafValue::Decimal)
            .ok_or_else(|| format!("{} is not a decimal", n)),
        (LeafType::Int | LeafType::Uint | LeafType::Decimal, JsonValue::String(s)) => {
            leaf_from_str(leaf_type, s)
        }
        (LeafType::Empty, JsonValue::Null) => Ok(LeafValue::Empty),
        (LeafType::Empty, JsonValue::Array(items))
            if items.len() == 1 && items[0].is_null() =>
        {
            Ok(LeafValue::Empty)
        }
        (leaf_type, other) => Err(format!("expected {:?}, got {}", leaf_type, other)),
    }
}

/// Convert a key value taken from a request path.
pub(crate) fn leaf_from_str(leaf_type: LeafType, raw: &str) -> Result<LeafValue, String> {
    match leaf_type {
        LeafType::String => Ok(LeafValue::String(raw.to_string())),
        LeafType::Boolean => raw
            .parse::<bool>()
            .map(LeafValue::Bool)
            .map_err(|_| format!("'{}' is not a boolean", raw)),
        LeafType::Int => raw
            .parse::<i64>()
            .map(LeafValue::Int)
            .map_err(|_| format!("'{}' is not a signed integer", raw)),
        LeafType::Uint => raw
            .parse::<u64>()
            .map(LeafValue::Uint)
            .map_err(|_| format!("'{}' is not an unsigned integer", raw)),
        LeafType::Decimal => raw
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite())
            .map(LeafValue::Decimal)
            .ok_or_else(|| format!("'{}' is not a decimal", raw)),
        LeafType::Empty if raw.is_empty() => Ok(LeafValue::Empty),
        LeafType::Empty => Err(format!("'{}' is not empty", raw)),
    }
}

pub(crate) fn leaf_to_json(value: &LeafValue) -> JsonValue {
    match value {
        LeafValue::Empty => json!([null]),
        LeafValue::Bool(b) => JsonValue::Bool(*b),
        LeafValue::Int(i) => JsonValue::from(*i),
        LeafValue::Uint(u) => JsonValue::from(*u),
        // Non-finite decimals have no JSON number form.
        LeafValue::Decimal(d) => serde_json::Number::from_f64(*d)
            .map_or_else(|| JsonValue::String(d.to_string()), JsonValue::Number),
        LeafValue::String(s) => JsonValue::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_accept_numbers_and_strings() {
        assert_eq!(
            leaf_from_json(LeafType::Uint, &json!(7)).unwrap(),
            LeafValue::Uint(7)
        );
        assert_eq!(
            leaf_from_json(LeafType::Int, &json!("-3")).unwrap(),
            LeafValue::Int(-3)
        );
        assert!(leaf_from_json(LeafType::Uint, &json!(-1)).is_err());
    }

    #[test]
    fn empty_leaf_forms() {
        assert_eq!(
            leaf_from_json(LeafType::Empty, &json!([null])).unwrap(),
            LeafValue::Empty
        );
        assert_eq!(leaf_to_json(&LeafValue::Empty), json!([null]));
        assert!(leaf_from_json(LeafType::Empty, &json!([1])).is_err());
    }

    #[test]
    fn type_mismatch_reported() {
        let err = leaf_from_json(LeafType::Boolean, &json!("yes")).unwrap_err();
        assert!(err.contains("Boolean"));
        assert!(leaf_from_str(LeafType::Uint, "abc").is_err());
    }

    #[test]
    fn path_values_are_typed() {
        assert_eq!(
            leaf_from_str(LeafType::Boolean, "true").unwrap(),
            LeafValue::Bool(true)
        );
        assert_eq!(
            leaf_from_str(LeafType::String, "eth0").unwrap(),
            LeafValue::from("eth0")
        );
    }

    #[test]
    fn to_json() {
        assert_eq!(leaf_to_json(&LeafValue::from("x")), json!("x"));
        assert_eq!(leaf_to_json(&LeafValue::Uint(1500)), json!(1500));
        assert_eq!(leaf_to_json(&LeafValue::Decimal(2.5)), json!(2.5));
        assert_eq!(leaf_to_json(&LeafValue::Decimal(f64::NAN)), json!("NaN"));
    }

    #[test]
    fn non_finite_decimals_rejected() {
        for raw in ["NaN", "nan", "inf", "-inf", "infinity"] {
            assert!(leaf_from_str(LeafType::Decimal, raw).is_err(), "{}", raw);
            assert!(leaf_from_json(LeafType::Decimal, &json!(raw)).is_err(), "{}", raw);
        }
        assert_eq!(
            leaf_from_str(LeafType::Decimal, "0.25").unwrap(),
            LeafValue::Decimal(0.25)
        );
    }
}
