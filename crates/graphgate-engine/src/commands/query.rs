//! Read operations

use graphgate_core::errors::{EntityKind, RawError, Result};
use graphgate_core::graph::statement::param;
use graphgate_core::graph::{Hop, Label, Statement};
use graphgate_core::model::{Post, User};
use graphgate_core::pagination::Pagination;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{all_nodes, find_by_id, first_node, op, params, require_id};
use crate::invocation::{Invocation, OpPhase};
use crate::mutation_core::MutationCore;

impl MutationCore {
    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for a blank id; store failures as classified errors.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let mut inv = Invocation::begin(op::GET_USER, EntityKind::User);
        inv.target(id);
        let result = self.get_impl(&mut inv, Label::User, id).await;
        inv.finish(result)
    }

    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for a blank id; store failures as classified errors.
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        let mut inv = Invocation::begin(op::GET_POST, EntityKind::Post);
        inv.target(id);
        let result = self.get_impl(&mut inv, Label::Post, id).await;
        inv.finish(result)
    }

    async fn get_impl<T: DeserializeOwned>(
        &self,
        inv: &mut Invocation,
        label: Label,
        id: &str,
    ) -> std::result::Result<Option<T>, RawError> {
        let mut scope = inv.acquire(self.client.as_ref()).await?;

        inv.enter(OpPhase::Validating);
        require_id("id", id)?;

        inv.enter(OpPhase::Reading);
        let result = find_by_id(&mut scope, label, id).await?;

        inv.enter(OpPhase::ShapingResult);
        let found = first_node(&result)?;

        inv.release(scope);
        Ok(found)
    }

    /// Page through users ordered by `createdAt`, then `id`
    ///
    /// ## Errors
    ///
    /// `BAD_USER_INPUT` when `pageNumber < 1` or `pageSize` is outside
    /// `1..=max_page_size`.
    pub async fn list_users(&self, page: Pagination) -> Result<Vec<User>> {
        let mut inv = Invocation::begin(op::LIST_USERS, EntityKind::User);
        let result = self
            .list_impl(&mut inv, Statement::ListNodes { label: Label::User }, None, page)
            .await;
        inv.finish(result)
    }

    /// Page through posts ordered by `createdAt`, then `id`
    ///
    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for out-of-range pagination.
    pub async fn list_posts(&self, page: Pagination) -> Result<Vec<Post>> {
        let mut inv = Invocation::begin(op::LIST_POSTS, EntityKind::Post);
        let result = self
            .list_impl(&mut inv, Statement::ListNodes { label: Label::Post }, None, page)
            .await;
        inv.finish(result)
    }

    /// Page through the posts a user authored
    ///
    /// An unknown author yields an empty page.
    ///
    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for a blank id or out-of-range pagination.
    pub async fn posts_by_user(&self, user_id: &str, page: Pagination) -> Result<Vec<Post>> {
        let mut inv = Invocation::begin(op::POSTS_BY_USER, EntityKind::Post);
        inv.target(user_id);
        let result = self
            .list_impl(
                &mut inv,
                Statement::ListAuthoredPosts,
                Some(Anchor::new("userId", param::AUTHOR_ID, user_id)),
                page,
            )
            .await;
        inv.finish(result)
    }

    /// Page through the users following `user_id`
    ///
    /// An unknown user has no followers.
    ///
    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for a blank id or out-of-range pagination.
    pub async fn followers(&self, user_id: &str, page: Pagination) -> Result<Vec<User>> {
        let mut inv = Invocation::begin(op::FOLLOWERS, EntityKind::User);
        inv.target(user_id);
        let result = self
            .list_impl(
                &mut inv,
                Statement::ListNeighbours(Hop::FOLLOWERS),
                Some(Anchor::new("userId", param::ID, user_id)),
                page,
            )
            .await;
        inv.finish(result)
    }

    /// Page through the users `user_id` follows
    ///
    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for a blank id or out-of-range pagination.
    pub async fn following(&self, user_id: &str, page: Pagination) -> Result<Vec<User>> {
        let mut inv = Invocation::begin(op::FOLLOWING, EntityKind::User);
        inv.target(user_id);
        let result = self
            .list_impl(
                &mut inv,
                Statement::ListNeighbours(Hop::FOLLOWING),
                Some(Anchor::new("userId", param::ID, user_id)),
                page,
            )
            .await;
        inv.finish(result)
    }

    /// Page through the users who liked `post_id`
    ///
    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for a blank id or out-of-range pagination.
    pub async fn post_likers(&self, post_id: &str, page: Pagination) -> Result<Vec<User>> {
        let mut inv = Invocation::begin(op::POST_LIKERS, EntityKind::Post);
        inv.target(post_id);
        let result = self
            .list_impl(
                &mut inv,
                Statement::ListNeighbours(Hop::LIKERS),
                Some(Anchor::new("postId", param::ID, post_id)),
                page,
            )
            .await;
        inv.finish(result)
    }

    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for a blank id.
    pub async fn follower_count(&self, user_id: &str) -> Result<u64> {
        let mut inv = Invocation::begin(op::FOLLOWER_COUNT, EntityKind::User);
        inv.target(user_id);
        let result = self
            .count_impl(&mut inv, Hop::FOLLOWERS, Anchor::new("userId", param::ID, user_id))
            .await;
        inv.finish(result)
    }

    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for a blank id.
    pub async fn following_count(&self, user_id: &str) -> Result<u64> {
        let mut inv = Invocation::begin(op::FOLLOWING_COUNT, EntityKind::User);
        inv.target(user_id);
        let result = self
            .count_impl(&mut inv, Hop::FOLLOWING, Anchor::new("userId", param::ID, user_id))
            .await;
        inv.finish(result)
    }

    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for a blank id.
    pub async fn like_count(&self, post_id: &str) -> Result<u64> {
        let mut inv = Invocation::begin(op::LIKE_COUNT, EntityKind::Post);
        inv.target(post_id);
        let result = self
            .count_impl(&mut inv, Hop::LIKERS, Anchor::new("postId", param::ID, post_id))
            .await;
        inv.finish(result)
    }

    /// The author of `post_id`; `None` when the post does not exist
    ///
    /// ## Errors
    ///
    /// `BAD_USER_INPUT` for a blank id.
    pub async fn post_author(&self, post_id: &str) -> Result<Option<User>> {
        let mut inv = Invocation::begin(op::POST_AUTHOR, EntityKind::Post);
        inv.target(post_id);
        let result = self.post_author_impl(&mut inv, post_id).await;
        inv.finish(result)
    }

    async fn post_author_impl(
        &self,
        inv: &mut Invocation,
        post_id: &str,
    ) -> std::result::Result<Option<User>, RawError> {
        let mut scope = inv.acquire(self.client.as_ref()).await?;

        inv.enter(OpPhase::Validating);
        require_id("postId", post_id)?;

        inv.enter(OpPhase::Reading);
        let result = scope
            .run(
                &Statement::ListNeighbours(Hop::AUTHOR),
                &params([
                    (param::ID, Value::from(post_id)),
                    (param::OFFSET, Value::from(0u64)),
                    (param::LIMIT, Value::from(1u64)),
                ]),
            )
            .await?;

        inv.enter(OpPhase::ShapingResult);
        let author = first_node(&result)?;

        inv.release(scope);
        Ok(author)
    }

    async fn count_impl(
        &self,
        inv: &mut Invocation,
        hop: Hop,
        anchor: Anchor<'_>,
    ) -> std::result::Result<u64, RawError> {
        let mut scope = inv.acquire(self.client.as_ref()).await?;

        inv.enter(OpPhase::Validating);
        require_id(anchor.field, anchor.id)?;

        inv.enter(OpPhase::Reading);
        let result = scope
            .run(
                &Statement::CountNeighbours(hop),
                &params([(anchor.param, Value::from(anchor.id))]),
            )
            .await?;

        inv.enter(OpPhase::ShapingResult);
        let total = result
            .first()
            .and_then(|record| record.count())
            .ok_or_else(|| RawError::Internal("count returned no record".to_string()))?;

        inv.release(scope);
        Ok(total)
    }

    async fn list_impl<T: DeserializeOwned>(
        &self,
        inv: &mut Invocation,
        statement: Statement,
        anchor: Option<Anchor<'_>>,
        page: Pagination,
    ) -> std::result::Result<Vec<T>, RawError> {
        let mut scope = inv.acquire(self.client.as_ref()).await?;

        inv.enter(OpPhase::Validating);
        page.validate(self.pagination.max_page_size)?;
        let mut list_params = params([
            (param::OFFSET, Value::from(page.offset())),
            (param::LIMIT, Value::from(page.limit())),
        ]);
        if let Some(anchor) = anchor {
            require_id(anchor.field, anchor.id)?;
            list_params.insert(anchor.param.to_string(), Value::from(anchor.id));
        }

        inv.enter(OpPhase::Reading);
        let result = scope.run(&statement, &list_params).await?;

        inv.enter(OpPhase::ShapingResult);
        let rows = all_nodes(&result)?;

        inv.release(scope);
        Ok(rows)
    }
}

/// The node a read starts from
struct Anchor<'a> {
    /// Argument name reported on BAD_USER_INPUT
    field: &'static str,
    /// Statement parameter carrying the id
    param: &'static str,
    id: &'a str,
}

impl<'a> Anchor<'a> {
    fn new(field: &'static str, param: &'static str, id: &'a str) -> Self {
        Self { field, param, id }
    }
}
