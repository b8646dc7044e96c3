use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Identifiers may be written as strings or integers; both become strings
pub(super) fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

pub(super) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a string or integer id, found {value}")))
}

/// Flags follow JSON truthiness: `true`, non-zero numbers and non-empty
/// strings set the flag
pub(super) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ids_accept_strings_and_integers() {
        assert_eq!(id_from_value(&json!("N1")), Some("N1".to_string()));
        assert_eq!(id_from_value(&json!(42)), Some("42".to_string()));
        assert_eq!(id_from_value(&json!(1.5)), None);
        assert_eq!(id_from_value(&json!("")), None);
        assert_eq!(id_from_value(&json!(null)), None);
    }

    #[derive(Deserialize)]
    struct Flagged {
        #[serde(deserialize_with = "deserialize_flag")]
        flag: bool,
    }

    #[test]
    fn flags_follow_truthiness() {
        let parse = |v: Value| serde_json::from_value::<Flagged>(json!({ "flag": v })).unwrap().flag;
        assert!(parse(json!(true)));
        assert!(parse(json!(1)));
        assert!(parse(json!("yes")));
        assert!(!parse(json!(false)));
        assert!(!parse(json!(0)));
        assert!(!parse(json!("")));
        assert!(!parse(json!(null)));
    }
}
