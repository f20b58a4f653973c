//! FOLLOWS and LIKES edges

use graphgate_core::errors::{ClassifiedError, EntityKind, ErrorCode, RawError, Result};
use graphgate_core::graph::statement::param;
use graphgate_core::graph::{Label, Params, RelType, SessionScope, Statement};
use serde_json::Value;

use super::{exists, op, params, require_id};
use crate::invocation::{Invocation, OpPhase};
use crate::mutation_core::MutationCore;

/// Which way an edge operation goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeChange {
    Merge,
    Delete,
}

/// A typed edge between two existing nodes
#[derive(Debug, Clone, Copy)]
struct EdgeKind {
    from: Label,
    rel: RelType,
    to: Label,
    from_field: &'static str,
    to_field: &'static str,
}

const FOLLOWS: EdgeKind = EdgeKind {
    from: Label::User,
    rel: RelType::Follows,
    to: Label::User,
    from_field: "userId",
    to_field: "targetUserId",
};

const LIKES: EdgeKind = EdgeKind {
    from: Label::User,
    rel: RelType::Likes,
    to: Label::Post,
    from_field: "userId",
    to_field: "postId",
};

fn missing(label: Label, field: &str, id: &str) -> ClassifiedError {
    let (code, message) = match label {
        Label::User => (ErrorCode::UserNotFound, "User not found"),
        Label::Post => (ErrorCode::PostNotFound, "Post not found"),
    };
    ClassifiedError::new(code)
        .with_field(field)
        .with_entity_id(id)
        .with_message(message)
}

impl MutationCore {
    /// Make `user_id` follow `target_user_id`; idempotent
    ///
    /// ## Errors
    ///
    /// - `BAD_USER_INPUT`: blank id, or a user following themselves
    /// - `USER_NOT_FOUND`: either user is missing
    pub async fn follow_user(&self, user_id: &str, target_user_id: &str) -> Result<bool> {
        self.change_edge(
            op::FOLLOW_USER,
            EntityKind::User,
            FOLLOWS,
            EdgeChange::Merge,
            user_id,
            target_user_id,
        )
        .await
    }

    /// Remove a FOLLOWS edge; returns whether one existed
    ///
    /// ## Errors
    ///
    /// As for [`MutationCore::follow_user`].
    pub async fn unfollow_user(&self, user_id: &str, target_user_id: &str) -> Result<bool> {
        self.change_edge(
            op::UNFOLLOW_USER,
            EntityKind::User,
            FOLLOWS,
            EdgeChange::Delete,
            user_id,
            target_user_id,
        )
        .await
    }

    /// Record that `user_id` likes `post_id`; idempotent
    ///
    /// ## Errors
    ///
    /// - `BAD_USER_INPUT`: blank id
    /// - `USER_NOT_FOUND` / `POST_NOT_FOUND`: an endpoint is missing
    pub async fn like_post(&self, user_id: &str, post_id: &str) -> Result<bool> {
        self.change_edge(
            op::LIKE_POST,
            EntityKind::Post,
            LIKES,
            EdgeChange::Merge,
            user_id,
            post_id,
        )
        .await
    }

    /// Remove a LIKES edge; returns whether one existed
    ///
    /// ## Errors
    ///
    /// As for [`MutationCore::like_post`].
    pub async fn unlike_post(&self, user_id: &str, post_id: &str) -> Result<bool> {
        self.change_edge(
            op::UNLIKE_POST,
            EntityKind::Post,
            LIKES,
            EdgeChange::Delete,
            user_id,
            post_id,
        )
        .await
    }

    async fn change_edge(
        &self,
        op_name: &'static str,
        entity: EntityKind,
        kind: EdgeKind,
        change: EdgeChange,
        from_id: &str,
        to_id: &str,
    ) -> Result<bool> {
        let mut inv = Invocation::begin(op_name, entity);
        inv.target(to_id);
        let result = self
            .change_edge_impl(&mut inv, kind, change, from_id, to_id)
            .await;
        inv.finish(result)
    }

    async fn change_edge_impl(
        &self,
        inv: &mut Invocation,
        kind: EdgeKind,
        change: EdgeChange,
        from_id: &str,
        to_id: &str,
    ) -> std::result::Result<bool, RawError> {
        let mut scope = inv.acquire(self.client.as_ref()).await?;

        inv.enter(OpPhase::Validating);
        require_id(kind.from_field, from_id)?;
        require_id(kind.to_field, to_id)?;
        if kind.from == kind.to && from_id == to_id {
            return Err(ClassifiedError::new(ErrorCode::BadUserInput)
                .with_field(kind.to_field)
                .with_message("A user cannot follow themselves")
                .into());
        }
        check_endpoints(&mut scope, kind, from_id, to_id).await?;

        inv.enter(OpPhase::Writing);
        let ids = params([
            (param::FROM_ID, Value::from(from_id)),
            (param::TO_ID, Value::from(to_id)),
        ]);
        let changed = match change {
            EdgeChange::Merge => merge(&mut scope, kind, &ids).await?,
            EdgeChange::Delete => {
                let result = scope
                    .run(
                        &Statement::DeleteRelationship {
                            from: kind.from,
                            rel: kind.rel,
                            to: kind.to,
                        },
                        &ids,
                    )
                    .await?;
                result.counters.relationships_deleted > 0
            }
        };

        inv.release(scope);
        Ok(changed)
    }
}

async fn check_endpoints(
    scope: &mut SessionScope,
    kind: EdgeKind,
    from_id: &str,
    to_id: &str,
) -> std::result::Result<(), RawError> {
    if !exists(scope, kind.from, from_id).await? {
        return Err(missing(kind.from, kind.from_field, from_id).into());
    }
    if !exists(scope, kind.to, to_id).await? {
        return Err(missing(kind.to, kind.to_field, to_id).into());
    }
    Ok(())
}

async fn merge(
    scope: &mut SessionScope,
    kind: EdgeKind,
    ids: &Params,
) -> std::result::Result<bool, RawError> {
    let result = scope
        .run(
            &Statement::MergeRelationship {
                from: kind.from,
                rel: kind.rel,
                to: kind.to,
            },
            ids,
        )
        .await?;
    if result.is_empty() {
        // An endpoint vanished after the existence check
        return Err(RawError::Internal(format!(
            "MERGE of {} matched no endpoints",
            kind.rel
        )));
    }
    Ok(true)
}
