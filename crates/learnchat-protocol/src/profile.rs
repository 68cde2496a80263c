//! Authenticated user profile as cached by the client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile of the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    /// Server-side user id.
    #[serde(default, deserialize_with = "id_from_any")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Platform role, e.g. "student" or "instructor".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Fields this client does not interpret but must keep when rewriting the profile.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Whether this profile identifies a signed-in user.
    pub fn is_authenticated(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Accept numeric or string ids.
fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(id) => id,
        Value::Number(id) => id.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::UserProfile;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn keeps_unknown_fields_through_round_trip() {
        let raw = json!({
            "id": 42,
            "name": "Ada",
            "email": "ada@example.com",
            "avatar": "a.png"
        });
        let profile: UserProfile = serde_json::from_value(raw).expect("profile");
        assert_eq!(profile.id, "42");
        assert_eq!(profile.role, None);
        let value = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(value["avatar"], "a.png");
    }

    #[test]
    fn empty_id_is_not_authenticated() {
        let profile = UserProfile {
            name: "Ghost".to_string(),
            ..UserProfile::default()
        };
        assert!(!profile.is_authenticated());
    }
}
