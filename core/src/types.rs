//! Domain DTOs for the People resource.
//!
//! # Design
//! Field names follow the service's PascalCase wire format. Address entries
//! are kept as raw JSON because the client never looks inside them.
//! The mock-server crate defines its own copy of `Person`; integration tests
//! catch schema drift between the two.

use serde::{Deserialize, Deserializer, Serialize};

/// A remote user record as returned by the People endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    /// Must be present; an explicit `null` decodes as an empty string.
    #[serde(deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emails: Vec<String>,
    #[serde(default)]
    pub favorite_feature: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address_info: Vec<serde_json::Value>,
    #[serde(default)]
    pub home_address: Option<serde_json::Value>,
}

/// Servers send `null` for empty collections; treat it like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
