//! Serde helpers for backend payloads.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;

/// Backend identifiers that may arrive as JSON strings or integers.
///
/// Always kept as a `String` on our side so the caller never has to care
/// which one the backend picked.
pub mod id_as_string {
    use super::{Deserializer, Serializer, Visitor, de, fmt};

    /// Serializes the id as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    pub fn serialize<S>(value: &str, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value)
    }

    /// Deserializes an id from a string or integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a string nor an integer.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrIntVisitor;

        impl Visitor<'_> for StringOrIntVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer identifier")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value.trim().is_empty() {
                    return Err(de::Error::custom("identifier must not be empty"));
                }
                Ok(value.to_string())
            }
        }

        deserializer.deserialize_any(StringOrIntVisitor)
    }
}

/// FastAPI `detail` fields: either a message string or a list of
/// validation entries carrying a `msg`.
pub mod detail_message {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Detail {
        Text(String),
        Entries(Vec<Entry>),
    }

    #[derive(Deserialize)]
    struct Entry {
        msg: String,
    }

    /// Deserializes the detail into a single human-readable string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has neither supported shape.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let detail = Option::<Detail>::deserialize(deserializer)?;
        Ok(detail.map(|detail| match detail {
            Detail::Text(text) => text,
            Detail::Entries(entries) => entries
                .into_iter()
                .map(|entry| entry.msg)
                .collect::<Vec<_>>()
                .join("; "),
        }))
    }
}

/// Treats an explicit JSON `null` like a missing field.
///
/// # Errors
///
/// Returns an error if the value is present but malformed.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct WithId {
        #[serde(with = "super::id_as_string")]
        id: String,
    }

    #[derive(Deserialize)]
    struct WithDetail {
        #[serde(default, deserialize_with = "super::detail_message::deserialize")]
        detail: Option<String>,
    }

    #[derive(Deserialize)]
    struct WithName {
        #[serde(default, deserialize_with = "super::null_as_default")]
        name: String,
    }

    #[test]
    fn test_null_becomes_default() {
        let parsed: WithName = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(parsed.name, "");
        let parsed: WithName = serde_json::from_str(r#"{"name": "Thandi"}"#).unwrap();
        assert_eq!(parsed.name, "Thandi");
    }

    #[test]
    fn test_id_from_integer() {
        let parsed: WithId = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(parsed.id, "42");
    }

    #[test]
    fn test_id_from_string() {
        let parsed: WithId = serde_json::from_str(r#"{"id": "APT-7"}"#).unwrap();
        assert_eq!(parsed.id, "APT-7");
    }

    #[test]
    fn test_id_rejects_empty_string() {
        assert!(serde_json::from_str::<WithId>(r#"{"id": ""}"#).is_err());
    }

    #[test]
    fn test_detail_text() {
        let parsed: WithDetail =
            serde_json::from_str(r#"{"detail": "Identifier already registered"}"#).unwrap();
        assert_eq!(parsed.detail.as_deref(), Some("Identifier already registered"));
    }

    #[test]
    fn test_detail_validation_entries() {
        let parsed: WithDetail = serde_json::from_str(
            r#"{"detail": [{"loc": ["body", "password"], "msg": "too short"}, {"msg": "bad id"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.detail.as_deref(), Some("too short; bad id"));
    }

    #[test]
    fn test_detail_missing() {
        let parsed: WithDetail = serde_json::from_str("{}").unwrap();
        assert!(parsed.detail.is_none());
    }
}
