//! Operation handlers on `MutationCore`
//!
//! Each public operation begins an invocation, runs its `*_impl` body
//! against a scoped session, and finishes the invocation with the body's
//! raw result.

pub mod post;
pub mod query;
pub mod relationship;
pub mod user;

use graphgate_core::errors::{ClassifiedError, ErrorCode, RawError};
use graphgate_core::graph::statement::param;
use graphgate_core::graph::{
    Label, Params, PropertyKey, QueryResult, SessionScope, Statement, StoreError,
};
use graphgate_core::model::from_properties;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Operation names, as logged and as reported on classified errors
pub mod op {
    pub const CREATE_USER: &str = "create_user";
    pub const UPDATE_USER: &str = "update_user";
    pub const DELETE_USER: &str = "delete_user";
    pub const CREATE_POST: &str = "create_post";
    pub const UPDATE_POST: &str = "update_post";
    pub const DELETE_POST: &str = "delete_post";
    pub const FOLLOW_USER: &str = "follow_user";
    pub const UNFOLLOW_USER: &str = "unfollow_user";
    pub const LIKE_POST: &str = "like_post";
    pub const UNLIKE_POST: &str = "unlike_post";
    pub const GET_USER: &str = "get_user";
    pub const GET_POST: &str = "get_post";
    pub const LIST_USERS: &str = "list_users";
    pub const POSTS_BY_USER: &str = "posts_by_user";
    pub const LIST_POSTS: &str = "list_posts";
    pub const FOLLOWERS: &str = "followers";
    pub const FOLLOWING: &str = "following";
    pub const FOLLOWER_COUNT: &str = "follower_count";
    pub const FOLLOWING_COUNT: &str = "following_count";
    pub const POST_LIKERS: &str = "post_likers";
    pub const LIKE_COUNT: &str = "like_count";
    pub const POST_AUTHOR: &str = "post_author";
}

pub const NO_FIELDS_TO_UPDATE: &str = "No fields to update";

/// Reject a blank id argument with BAD_USER_INPUT
pub(crate) fn require_id(field: &str, value: &str) -> Result<(), ClassifiedError> {
    if value.trim().is_empty() {
        return Err(ClassifiedError::new(ErrorCode::BadUserInput)
            .with_field(field)
            .with_message(format!("{} is required", field)));
    }
    Ok(())
}

pub(crate) fn no_fields_to_update() -> ClassifiedError {
    ClassifiedError::new(ErrorCode::ValidationError).with_message(NO_FIELDS_TO_UPDATE)
}

pub(crate) fn params<const N: usize>(pairs: [(&str, Value); N]) -> Params {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

pub(crate) async fn find_by_id(
    scope: &mut SessionScope,
    label: Label,
    id: &str,
) -> Result<QueryResult, StoreError> {
    scope
        .run(
            &Statement::FindNode {
                label,
                key: PropertyKey::Id,
            },
            &params([(param::ID, Value::from(id))]),
        )
        .await
}

pub(crate) async fn exists(
    scope: &mut SessionScope,
    label: Label,
    id: &str,
) -> Result<bool, StoreError> {
    Ok(!find_by_id(scope, label, id).await?.is_empty())
}

/// Decode the node in the first returned row, if any
pub(crate) fn first_node<T: DeserializeOwned>(result: &QueryResult) -> Result<Option<T>, RawError> {
    result
        .first()
        .and_then(|record| record.node())
        .map(from_properties)
        .transpose()
}

/// Decode the node column of every returned row
pub(crate) fn all_nodes<T: DeserializeOwned>(result: &QueryResult) -> Result<Vec<T>, RawError> {
    result
        .records
        .iter()
        .filter_map(|record| record.node())
        .map(from_properties)
        .collect()
}
