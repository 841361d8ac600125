//! Loosely typed JSON values as the backend sends them: numbers may arrive as strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Whether the value would count as «true» in a boolean context: not null, `false`, zero, or empty.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(string) => !string.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Read a number or the numeric prefix of a string. Anything else is zero.
#[must_use]
pub fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(string) => parse_leading_f64(string),
        _ => None,
    }
    .filter(|number| number.is_finite())
    .unwrap_or_default()
}

/// Serde adapter for [`to_f64`].
pub fn deserialize_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(to_f64(&Value::deserialize(deserializer)?))
}

/// Parse the longest numeric prefix, skipping leading whitespace: `"12.5 kWh"` → `12.5`.
fn parse_leading_f64(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let integer_start = end;
    end += count_digits(&bytes[end..]);
    let mut n_digits = end - integer_start;
    if bytes.get(end) == Some(&b'.') {
        let n_fraction_digits = count_digits(&bytes[end + 1..]);
        n_digits += n_fraction_digits;
        if n_digits != 0 {
            end += 1 + n_fraction_digits;
        }
    }
    if n_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let n_exponent_digits = count_digits(&bytes[exponent_end..]);
        if n_exponent_digits != 0 {
            end = exponent_end + n_exponent_digits;
        }
    }
    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(1.5)));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(to_f64(&json!(12.5)), 12.5);
        assert_eq!(to_f64(&json!("100")), 100.0);
        assert_eq!(to_f64(&json!("  7.25h")), 7.25);
        assert_eq!(to_f64(&json!(".5")), 0.5);
        assert_eq!(to_f64(&json!("5.")), 5.0);
        assert_eq!(to_f64(&json!("-3e2x")), -300.0);
        assert_eq!(to_f64(&json!("1e")), 1.0);
        assert_eq!(to_f64(&json!("abc")), 0.0);
        assert_eq!(to_f64(&json!(".")), 0.0);
        assert_eq!(to_f64(&json!(null)), 0.0);
        assert_eq!(to_f64(&json!(true)), 0.0);
    }

    #[test]
    fn test_deserialize_f64() -> serde_json::Result<()> {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "deserialize_f64")]
            value: f64,
        }

        assert_eq!(serde_json::from_str::<Row>(r#"{"value": "42"}"#)?.value, 42.0);
        assert_eq!(serde_json::from_str::<Row>(r#"{"value": null}"#)?.value, 0.0);
        assert_eq!(serde_json::from_str::<Row>("{}")?.value, 0.0);
        Ok(())
    }
}
