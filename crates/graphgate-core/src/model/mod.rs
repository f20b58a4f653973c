//! Entity records and mutation payloads
//!
//! Records are decoded from node properties with explicit optional fields:
//! an absent optional property is `None`, never a shimmed empty string.

mod post;
mod user;

pub use post::{CreatePostInput, Post, PostField, UpdatePostInput};
pub use user::{CreateUserInput, UpdateUserInput, User, UserField};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::RawError;

/// Decode a record from the property map of a returned node
pub fn from_properties<T: DeserializeOwned>(
    properties: &Map<String, Value>,
) -> Result<T, RawError> {
    Ok(serde_json::from_value(Value::Object(properties.clone()))?)
}
