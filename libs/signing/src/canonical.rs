use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::{Map, Value};

/// Serializes a JSON value into its canonical signing form.
///
/// Two logically equal values always produce identical bytes, regardless of
/// key insertion order:
/// - object keys are sorted lexicographically at every nesting level, array
///   order is preserved;
/// - every UTF-16 code unit at or above 0x7F is written as a lowercase
///   `\uxxxx` escape of exactly four hex digits (astral characters become
///   surrogate pairs), so the output is plain ASCII.
///
/// ```
/// use serde_json::json;
///
/// let a = cmb_signing::canonical_json(&json!({"b": 1, "a": "\u{e9}"}));
/// let b = cmb_signing::canonical_json(&json!({"a": "\u{e9}", "b": 1}));
/// assert_eq!(a, b);
/// assert_eq!(a, "{\"a\":\"\\u00e9\",\"b\":1}");
/// ```
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            // Numbers keep serde_json's shortest form. A JavaScript signer
            // writes exponent-form floats as "1e+30" where this writes
            // "1e30"; integers and plain decimals are identical. Webhook
            // bodies on this protocol only carry integers and plain
            // decimals, so the divergence is accepted.
            let _ = write!(out, "{n}");
        }
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => write_object(map, out),
    }
}

fn write_object(map: &Map<String, Value>, out: &mut String) {
    let sorted: BTreeMap<&str, &Value> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
    out.push('{');
    for (i, (key, value)) in sorted.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(key, out);
        out.push(':');
        write_value(value, out);
    }
    out.push('}');
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for unit in s.encode_utf16() {
        match unit {
            0x22 => out.push_str("\\\""),
            0x5c => out.push_str("\\\\"),
            0x08 => out.push_str("\\b"),
            0x09 => out.push_str("\\t"),
            0x0a => out.push_str("\\n"),
            0x0c => out.push_str("\\f"),
            0x0d => out.push_str("\\r"),
            unit if unit < 0x20 || unit >= 0x7f => {
                let _ = write!(out, "\\u{unit:04x}");
            }
            unit => out.push(unit as u8 as char),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_is_irrelevant() {
        let a = json!({"z": {"b": 2, "a": 1}, "m": [3, 1, 2], "a": true});
        let b = json!({"a": true, "m": [3, 1, 2], "z": {"a": 1, "b": 2}});
        assert_eq!(canonical_json(&a), canonical_json(&b));
        assert_eq!(
            canonical_json(&a),
            r#"{"a":true,"m":[3,1,2],"z":{"a":1,"b":2}}"#
        );
    }

    #[test]
    fn array_order_is_preserved() {
        let value = json!(["c", "a", "b"]);
        assert_eq!(canonical_json(&value), r#"["c","a","b"]"#);
    }

    #[test]
    fn ascii_stays_unescaped() {
        let value = json!({"msg": "plain ASCII ~ text!"});
        assert_eq!(canonical_json(&value), r#"{"msg":"plain ASCII ~ text!"}"#);
    }

    #[test]
    fn non_ascii_becomes_lowercase_four_digit_escapes() {
        let value = json!({"msg": "h\u{e9}llo"});
        assert_eq!(canonical_json(&value), "{\"msg\":\"h\\u00e9llo\"}");
        // DEL is the first escaped code point, tilde the last unescaped one.
        assert_eq!(canonical_json(&json!("\u{7f}")), "\"\\u007f\"");
        assert_eq!(canonical_json(&json!("~")), "\"~\"");
    }

    #[test]
    fn astral_characters_become_surrogate_pairs() {
        let value = json!("\u{1f600}");
        assert_eq!(canonical_json(&value), "\"\\ud83d\\ude00\"");
    }

    #[test]
    fn control_characters_use_standard_escapes() {
        let value = json!("a\tb\nc\u{1}");
        assert_eq!(canonical_json(&value), "\"a\\tb\\nc\\u0001\"");
    }

    #[test]
    fn scalars_and_nulls() {
        assert_eq!(canonical_json(&json!(null)), "null");
        assert_eq!(canonical_json(&json!(false)), "false");
        assert_eq!(canonical_json(&json!(42)), "42");
        assert_eq!(canonical_json(&json!(-1.5)), "-1.5");
    }

    #[test]
    fn numbers_pin_shortest_form() {
        // Shortest-form float output: no '+' in positive exponents.
        assert_eq!(canonical_json(&json!(1e30)), "1e30");
        assert_eq!(canonical_json(&json!(1e-7)), "1e-7");
        assert_eq!(canonical_json(&json!(0.1)), "0.1");
        assert_eq!(canonical_json(&json!(1234567890u64)), "1234567890");
    }

    #[test]
    fn quotes_and_backslashes_escape() {
        let value = json!({"q": "say \"hi\"", "p": "a\\b"});
        assert_eq!(canonical_json(&value), r#"{"p":"a\\b","q":"say \"hi\""}"#);
    }
}
