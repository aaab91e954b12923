//! Deserializers for fields the backend sends as either text or numbers
//! (phone numbers, zip codes, user ids).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn opt_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
