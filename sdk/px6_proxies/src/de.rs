//! Field normalization rules for px6.link responses.
//!
//! The provider types its fields loosely: numbers arrive as JSON numbers or as
//! strings, booleans as `"1"`/`"0"` strings or native booleans, and proxy lists
//! as either an object keyed by id or an array. Each helper here implements one
//! rule and is attached to record fields with `deserialize_with`, always paired
//! with `#[serde(default)]` so absent keys decode to the type's default.

use px6_core::error::Px6Result;
use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a success envelope into its record. A field that fails its
/// normalization rule fails the whole decode.
pub(crate) fn decode<T: DeserializeOwned>(data: Value) -> Px6Result<T> {
    Ok(serde_json::from_value(data)?)
}

/// An integer given as a JSON integer, a float (truncated) or a numeric string.
/// `null` decodes as zero.
///
/// Values that do not fit the field type fail the decode instead of being
/// clamped. Ids, counts and timestamps are unsigned, so a negative value there
/// is rejected.
pub(crate) fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i128> + Default,
{
    let value = Value::deserialize(deserializer)?;
    let n = match &value {
        Value::Null => return Ok(T::default()),
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| n.as_f64().and_then(truncate_float)),
        Value::String(s) => s.trim().parse::<i128>().ok(),
        Value::Bool(b) => Some(i128::from(*b)),
        _ => None,
    }
    .ok_or_else(|| D::Error::custom(format!("expected an integer, found {value}")))?;

    T::try_from(n).map_err(|_| D::Error::custom(format!("integer {n} out of range")))
}

fn truncate_float(f: f64) -> Option<i128> {
    // i128 bounds as f64 are exact powers of two.
    let bound = 2f64.powi(127);
    let t = f.trunc();
    (t.is_finite() && t >= -bound && t < bound).then(|| t as i128)
}

/// A float given as a JSON number or a numeric string. `null` decodes as zero.
pub(crate) fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("expected a number, found {value}"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected a number, found {value}"))),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        _ => Err(D::Error::custom(format!("expected a number, found {value}"))),
    }
}

/// A string; numbers and booleans are rendered as text, `null` as empty.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected a string, found {other}"))),
    }
}

/// `true` only for the exact string `"1"`. Any other value, including the
/// integer `1` and `"true"`, is `false`.
pub(crate) fn flag_one<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(matches!(value, Value::String(ref s) if s == "1"))
}

/// A native JSON boolean. `null` decodes as `false`; strings and numbers are
/// refused rather than coerced.
pub(crate) fn strict_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A list that arrives either as an object (keys dropped, values kept in
/// source order) or as an array. `null` and any other shape decode as empty.
pub(crate) fn keyed_or_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items: Vec<Value> = match value {
        Value::Object(map) => map.into_iter().map(|(_, item)| item).collect(),
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "integer")]
        int: u64,
        #[serde(default, deserialize_with = "integer")]
        signed: i64,
        #[serde(default, deserialize_with = "float")]
        float: f64,
        #[serde(default, deserialize_with = "string")]
        text: String,
        #[serde(default, deserialize_with = "flag_one")]
        flag: bool,
        #[serde(default, deserialize_with = "strict_bool")]
        native: bool,
        #[serde(default, deserialize_with = "keyed_or_list")]
        items: Vec<Item>,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        #[serde(default, deserialize_with = "integer")]
        id: u64,
    }

    fn probe(value: Value) -> Result<Probe, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn absent_fields_use_defaults() {
        let p = probe(json!({})).unwrap();
        assert_eq!(p.int, 0);
        assert_eq!(p.float, 0.0);
        assert_eq!(p.text, "");
        assert!(!p.flag);
        assert!(p.items.is_empty());
    }

    #[test]
    fn null_fields_use_defaults() {
        let p = probe(json!({"int": null, "float": null, "text": null, "items": null})).unwrap();
        assert_eq!(p.int, 0);
        assert_eq!(p.float, 0.0);
        assert_eq!(p.text, "");
        assert!(p.items.is_empty());
    }

    #[test]
    fn integer_accepts_numbers_and_numeric_strings() {
        assert_eq!(probe(json!({"int": 42})).unwrap().int, 42);
        assert_eq!(probe(json!({"int": "42"})).unwrap().int, 42);
        assert_eq!(probe(json!({"int": " 7 "})).unwrap().int, 7);
        assert_eq!(probe(json!({"int": 9.9})).unwrap().int, 9);
        assert_eq!(probe(json!({"signed": "-3"})).unwrap().signed, -3);
    }

    #[test]
    fn integer_rejects_non_numeric() {
        assert!(probe(json!({"int": "abc"})).is_err());
        assert!(probe(json!({"int": "4.5"})).is_err());
        assert!(probe(json!({"int": [1]})).is_err());
    }

    #[test]
    fn integer_rejects_negative_for_unsigned_fields() {
        assert!(probe(json!({"int": -1})).is_err());
        assert!(probe(json!({"int": "-1"})).is_err());
        assert_eq!(probe(json!({"signed": -1})).unwrap().signed, -1);
    }

    #[test]
    fn integer_keeps_values_above_i64_max() {
        let p = probe(json!({"int": u64::MAX})).unwrap();
        assert_eq!(p.int, u64::MAX);
        let p = probe(json!({"int": "18446744073709551615"})).unwrap();
        assert_eq!(p.int, u64::MAX);
    }

    #[test]
    fn integer_overflow_is_an_error_not_a_clamp() {
        assert!(probe(json!({"signed": u64::MAX})).is_err());
        assert!(probe(json!({"int": "18446744073709551616"})).is_err());
        assert!(probe(json!({"int": 1e30})).is_err());
    }

    #[test]
    fn float_accepts_numbers_and_numeric_strings() {
        assert_eq!(probe(json!({"float": "48.80"})).unwrap().float, 48.8);
        assert_eq!(probe(json!({"float": 2})).unwrap().float, 2.0);
        assert_eq!(probe(json!({"float": 1.25})).unwrap().float, 1.25);
    }

    #[test]
    fn float_rejects_non_numeric() {
        assert!(probe(json!({"float": "free"})).is_err());
        assert!(probe(json!({"float": {}})).is_err());
    }

    #[test]
    fn string_renders_numbers() {
        assert_eq!(probe(json!({"text": "8000"})).unwrap().text, "8000");
        assert_eq!(probe(json!({"text": 8000})).unwrap().text, "8000");
        assert!(probe(json!({"text": ["a"]})).is_err());
    }

    #[test]
    fn flag_one_is_true_only_for_string_one() {
        assert!(probe(json!({"flag": "1"})).unwrap().flag);
        for value in [json!("0"), json!(""), json!("true"), json!(1), json!(true)] {
            assert!(!probe(json!({ "flag": value.clone() })).unwrap().flag, "{value}");
        }
    }

    #[test]
    fn strict_bool_accepts_native_booleans_and_null() {
        assert!(probe(json!({"native": true})).unwrap().native);
        assert!(!probe(json!({"native": false})).unwrap().native);
        assert!(!probe(json!({"native": null})).unwrap().native);
        assert!(!probe(json!({})).unwrap().native);
    }

    #[test]
    fn strict_bool_refuses_coercion() {
        assert!(probe(json!({"native": "1"})).is_err());
        assert!(probe(json!({"native": 1})).is_err());
    }

    #[test]
    fn keyed_and_listed_items_decode_identically() {
        let keyed = probe(json!({"items": {"a": {"id": 1}, "b": {"id": 2}}})).unwrap();
        let listed = probe(json!({"items": [{"id": 1}, {"id": 2}]})).unwrap();
        assert_eq!(keyed.items, listed.items);
        assert_eq!(keyed.items, vec![Item { id: 1 }, Item { id: 2 }]);
    }

    #[test]
    fn keyed_items_keep_source_order() {
        let p = probe(json!({"items": {"9": {"id": 9}, "1": {"id": 1}, "5": {"id": 5}}})).unwrap();
        let ids: Vec<u64> = p.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![9, 1, 5]);
    }

    #[test]
    fn unexpected_list_shape_is_empty() {
        assert!(probe(json!({"items": "none"})).unwrap().items.is_empty());
        assert!(probe(json!({"items": 0})).unwrap().items.is_empty());
    }

    #[test]
    fn bad_item_inside_list_is_fatal() {
        assert!(probe(json!({"items": [{"id": "x"}]})).is_err());
    }
}
