use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::PropertyKey;

/// User node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// ISO-8601, set once at creation
    pub created_at: String,
}

impl User {
    /// Node properties for a create statement
    pub fn to_properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(PropertyKey::Id.as_str().into(), Value::from(self.id.as_str()));
        props.insert(
            PropertyKey::Username.as_str().into(),
            Value::from(self.username.as_str()),
        );
        props.insert(PropertyKey::Email.as_str().into(), Value::from(self.email.as_str()));
        if let Some(full_name) = &self.full_name {
            props.insert(PropertyKey::FullName.as_str().into(), Value::from(full_name.as_str()));
        }
        props.insert(
            PropertyKey::CreatedAt.as_str().into(),
            Value::from(self.created_at.as_str()),
        );
        props
    }
}

/// Payload for creating a user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Fields of a user a caller may change
///
/// This enumeration is the update allow-list: only these names can ever
/// appear in a SET clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Username,
    Email,
    FullName,
}

impl UserField {
    pub fn property(&self) -> PropertyKey {
        match self {
            UserField::Username => PropertyKey::Username,
            UserField::Email => PropertyKey::Email,
            UserField::FullName => PropertyKey::FullName,
        }
    }
}

/// Partial user update; every field optional, but at least one required
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserInput {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl UpdateUserInput {
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// Supplied fields with their new values, in allow-list order
    pub fn assignments(&self) -> Vec<(UserField, &str)> {
        [
            (UserField::Username, self.username.as_deref()),
            (UserField::Email, self.email.as_deref()),
            (UserField::FullName, self.full_name.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}
