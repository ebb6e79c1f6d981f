//! Response types
//!
//! Only the fields the client itself relies on are modelled. Everything else
//! the backend sends is kept verbatim in `extra`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Payload of a successful authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorization {
    /// Token for subsequent requests
    pub access_token: String,

    /// Id of the authorized user
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,

    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user profile as returned by discovery and profile lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique profile id
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Get a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Shape shared by list endpoints: `{"data": [...]}`.
///
/// A missing or `null` `data` is an empty list.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct DataList<T> {
    #[serde(default)]
    data: Option<Vec<T>>,
}

impl<T> DataList<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

/// Ids arrive as strings from some endpoints and as numbers from others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}
