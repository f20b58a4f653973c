use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::PropertyKey;

/// Post node, owned by its author through an AUTHORED edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Post {
    pub fn to_properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(PropertyKey::Id.as_str().into(), Value::from(self.id.as_str()));
        props.insert(PropertyKey::Title.as_str().into(), Value::from(self.title.as_str()));
        props.insert(
            PropertyKey::Content.as_str().into(),
            Value::from(self.content.as_str()),
        );
        props.insert(
            PropertyKey::CreatedAt.as_str().into(),
            Value::from(self.created_at.as_str()),
        );
        props.insert(
            PropertyKey::UpdatedAt.as_str().into(),
            Value::from(self.updated_at.as_str()),
        );
        props
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub author_id: String,
}

/// Update allow-list for posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostField {
    Title,
    Content,
}

impl PostField {
    pub fn property(&self) -> PropertyKey {
        match self {
            PostField::Title => PropertyKey::Title,
            PostField::Content => PropertyKey::Content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePostInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl UpdatePostInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    pub fn assignments(&self) -> Vec<(PostField, &str)> {
        [
            (PostField::Title, self.title.as_deref()),
            (PostField::Content, self.content.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}
