//! Application profile record.
//!
//! The profile is the application-level user record fetched from the
//! backing API, distinct from the identity provider's own user record.
//! This component treats it as mostly opaque: the well-known fields are
//! surfaced, everything else is kept in a flattened map.

use serde::{Deserialize, Serialize};

/// Application-level user record fetched from the backing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Profile {
    /// Application-assigned identifier, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Full name, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Any further fields the API returns, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Profile {
    /// Best-effort human-readable label for this profile.
    #[must_use]
    pub fn display_label(&self) -> Option<&str> {
        self.name.as_deref().or(self.email.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_minimal_body() {
        let profile: Profile = serde_json::from_value(json!({"name": "A"})).unwrap();
        assert_eq!(profile.name.as_deref(), Some("A"));
        assert_eq!(profile.id, None);
        assert!(profile.extra.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let profile: Profile = serde_json::from_value(json!({
            "id": "p1",
            "name": "Ada",
            "cohort": "lim-2020",
        }))
        .unwrap();
        assert_eq!(profile.extra["cohort"], json!("lim-2020"));
    }

    #[test]
    fn test_display_label_falls_back_to_email() {
        let profile: Profile =
            serde_json::from_value(json!({"email": "ada@example.com"})).unwrap();
        assert_eq!(profile.display_label(), Some("ada@example.com"));
    }
}
