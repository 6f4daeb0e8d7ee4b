//! Lenient reading of descriptor keys.
//!
//! Descriptors come from device configuration and user requests, where a
//! value such as `50000` may arrive as a JSON string or a number. Keys are
//! kept as text so request validation can reject them with a field name.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Strings are kept as-is, numbers and other values become their JSON
/// text, `null` becomes `None`.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Holder {
        #[serde(deserialize_with = "lenient_text")]
        key: Option<String>,
    }

    fn read(value: Value) -> Option<String> {
        Holder::deserialize(&value).unwrap().key
    }

    #[test]
    fn test_lenient_text_conversions() {
        assert_eq!(read(json!({ "key": "μS" })).as_deref(), Some("μS"));
        assert_eq!(read(json!({ "key": 50000 })).as_deref(), Some("50000"));
        assert_eq!(read(json!({ "key": 7.5 })).as_deref(), Some("7.5"));
        assert_eq!(read(json!({ "key": true })).as_deref(), Some("true"));
        assert_eq!(read(json!({ "key": null })), None);
        assert_eq!(read(json!({})), None);
    }
}
