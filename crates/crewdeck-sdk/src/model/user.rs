//! User model and wire-shape normalization
//!
//! Different endpoints disagree on shapes: user ids arrive as strings or
//! numbers, and position/region/district arrive as plain strings or
//! `{id, name}` objects. Both are normalized once, at deserialization, so
//! downstream code only ever sees the canonical form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User identity, canonicalized to its string form.
///
/// Comparison is always by string so ids from endpoints with mixed
/// numeric/string representations still match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        UserId(id)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Num(n) => UserId(n.to_string()),
            Raw::Str(s) => UserId(s),
        })
    }
}

/// A reference field that may arrive as a plain string or an `{id, name}`
/// object, normalized to the object form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawNamedRef")]
pub struct NamedRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

impl NamedRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNamedRef {
    Plain(String),
    Object {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        name: String,
    },
}

impl From<RawNamedRef> for NamedRef {
    fn from(raw: RawNamedRef) -> Self {
        match raw {
            RawNamedRef::Plain(name) => NamedRef { id: None, name },
            RawNamedRef::Object { id, name } => NamedRef { id, name },
        }
    }
}

/// Reference to a user as embedded in tasks and teams: a bare id or a partial
/// user object, normalized to id + optional username.
///
/// Equality is by id only. This is the one shared identity predicate used for
/// every `created_by`/`assigned_users` comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawUserRef")]
pub struct UserRef {
    pub id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UserRef {
    pub fn by_id(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            username: None,
        }
    }
}

impl PartialEq for UserRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UserRef {}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserRef {
    Scalar(UserId),
    Object {
        id: UserId,
        #[serde(default)]
        username: Option<String>,
    },
}

impl From<RawUserRef> for UserRef {
    fn from(raw: RawUserRef) -> Self {
        match raw {
            RawUserRef::Scalar(id) => UserRef { id, username: None },
            RawUserRef::Object { id, username } => UserRef { id, username },
        }
    }
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        UserRef {
            id: user.id.clone(),
            username: Some(user.username.clone()),
        }
    }
}

/// Directory user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: Option<NamedRef>,
    #[serde(default)]
    pub region: Option<NamedRef>,
    #[serde(default)]
    pub district: Option<NamedRef>,
}

impl User {
    /// "First Last", falling back to the username when both are empty
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Partial profile update body for the current user
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_accepts_string_and_number() {
        let from_num: UserId = serde_json::from_str("17").unwrap();
        let from_str: UserId = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(from_num.as_str(), "17");
    }

    #[test]
    fn test_named_ref_accepts_both_shapes() {
        let plain: NamedRef = serde_json::from_str("\"Engineering\"").unwrap();
        assert_eq!(plain.name, "Engineering");
        assert_eq!(plain.id, None);

        let object: NamedRef =
            serde_json::from_str(r#"{"id": 3, "name": "Engineering"}"#).unwrap();
        assert_eq!(object.name, "Engineering");
        assert_eq!(object.id, Some(3));
    }

    #[test]
    fn test_user_ref_accepts_scalar_and_object() {
        let scalar: UserRef = serde_json::from_str("9").unwrap();
        assert_eq!(scalar.id, UserId::from(9));
        assert_eq!(scalar.username, None);

        let object: UserRef =
            serde_json::from_str(r#"{"id": "9", "username": "ada"}"#).unwrap();
        assert_eq!(object.username.as_deref(), Some("ada"));

        // Identity predicate: same id, different shape, still equal
        assert_eq!(scalar, object);
    }

    #[test]
    fn test_user_parses_mixed_shapes() {
        let json = r#"{
            "id": 5,
            "username": "ada",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "position": "Engineer",
            "region": {"id": 1, "name": "North"}
        }"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.id, UserId::from(5));
        assert_eq!(user.position.as_ref().unwrap().name, "Engineer");
        assert_eq!(user.region.as_ref().unwrap().id, Some(1));
        assert_eq!(user.district, None);
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "username": "ghost"}"#).unwrap();
        assert_eq!(user.display_name(), "ghost");
    }
}
