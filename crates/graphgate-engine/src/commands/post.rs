//! Post mutations

use graphgate_core::errors::{ClassifiedError, EntityKind, ErrorCode, RawError, Result};
use graphgate_core::graph::statement::param;
use graphgate_core::graph::{Label, PropertyKey, Statement};
use graphgate_core::model::{CreatePostInput, Post, UpdatePostInput};
use serde_json::Value;

use super::{exists, first_node, no_fields_to_update, op, params, require_id};
use crate::invocation::{Invocation, OpPhase};
use crate::mutation_core::MutationCore;

pub const AUTHOR_NOT_FOUND: &str = "Author not found";

impl MutationCore {
    /// Create a post and its AUTHORED edge in one write
    ///
    /// ## Errors
    ///
    /// - `VALIDATION_ERROR`: payload rejected by the validator
    /// - `USER_NOT_FOUND`: the author does not exist ("Author not found")
    /// - `POST_CREATION_FAILED`: the write returned no record
    pub async fn create_post(&self, input: CreatePostInput) -> Result<Post> {
        let mut inv = Invocation::begin(op::CREATE_POST, EntityKind::Post);
        let result = self.create_post_impl(&mut inv, input).await;
        inv.finish(result)
    }

    async fn create_post_impl(
        &self,
        inv: &mut Invocation,
        input: CreatePostInput,
    ) -> std::result::Result<Post, RawError> {
        let mut scope = inv.acquire(self.client.as_ref()).await?;

        inv.enter(OpPhase::Validating);
        self.validators.create_post.validate(&input)?;
        if !exists(&mut scope, Label::User, &input.author_id).await? {
            return Err(ClassifiedError::new(ErrorCode::UserNotFound)
                .with_field("authorId")
                .with_entity_id(input.author_id.as_str())
                .with_message(AUTHOR_NOT_FOUND)
                .into());
        }

        inv.enter(OpPhase::Writing);
        let now = self.clock.timestamp();
        let post = Post {
            id: self.ids.generate(),
            title: input.title,
            content: input.content,
            created_at: now.clone(),
            updated_at: now,
        };
        inv.target(&post.id);
        let result = scope
            .run(
                &Statement::CreateAuthoredPost,
                &params([
                    (param::AUTHOR_ID, Value::from(input.author_id)),
                    (param::PROPS, Value::Object(post.to_properties())),
                ]),
            )
            .await?;

        inv.enter(OpPhase::ShapingResult);
        // Author removed between the check and the write
        let created = first_node(&result)?.ok_or_else(|| {
            ClassifiedError::new(ErrorCode::PostCreationFailed)
                .with_message("Failed to create post")
        })?;

        inv.release(scope);
        Ok(created)
    }

    /// Apply a partial update to a post; `updatedAt` is restamped
    ///
    /// ## Errors
    ///
    /// - `BAD_USER_INPUT`: blank id
    /// - `VALIDATION_ERROR`: empty payload or a rejected field
    /// - `NOT_FOUND`: no post has `id`
    pub async fn update_post(&self, id: &str, input: UpdatePostInput) -> Result<Post> {
        let mut inv = Invocation::begin(op::UPDATE_POST, EntityKind::Post);
        inv.target(id);
        let result = self.update_post_impl(&mut inv, id, input).await;
        inv.finish(result)
    }

    async fn update_post_impl(
        &self,
        inv: &mut Invocation,
        id: &str,
        input: UpdatePostInput,
    ) -> std::result::Result<Post, RawError> {
        let mut scope = inv.acquire(self.client.as_ref()).await?;

        inv.enter(OpPhase::Validating);
        require_id("id", id)?;
        if input.is_empty() {
            return Err(no_fields_to_update().into());
        }
        self.validators.update_post.validate(&input)?;

        inv.enter(OpPhase::Writing);
        let mut set_params = params([
            (param::ID, Value::from(id)),
            (PropertyKey::UpdatedAt.as_str(), Value::from(self.clock.timestamp())),
        ]);
        let mut keys = Vec::new();
        for (field, value) in input.assignments() {
            let key = field.property();
            set_params.insert(key.as_str().to_string(), Value::from(value));
            keys.push(key);
        }
        keys.push(PropertyKey::UpdatedAt);

        let result = scope
            .run(
                &Statement::SetProperties {
                    label: Label::Post,
                    keys,
                },
                &set_params,
            )
            .await?;

        inv.enter(OpPhase::ShapingResult);
        let updated = first_node(&result)?.ok_or_else(|| {
            ClassifiedError::new(ErrorCode::NotFound)
                .with_entity_id(id)
                .with_message("Post not found")
        })?;

        inv.release(scope);
        Ok(updated)
    }

    /// Delete a post together with its AUTHORED and LIKES edges
    ///
    /// ## Errors
    ///
    /// - `BAD_USER_INPUT`: blank id
    /// - `POST_NOT_FOUND`: no post has `id`
    pub async fn delete_post(&self, id: &str) -> Result<bool> {
        let mut inv = Invocation::begin(op::DELETE_POST, EntityKind::Post);
        inv.target(id);
        let result = self.delete_post_impl(&mut inv, id).await;
        inv.finish(result)
    }

    async fn delete_post_impl(
        &self,
        inv: &mut Invocation,
        id: &str,
    ) -> std::result::Result<bool, RawError> {
        let mut scope = inv.acquire(self.client.as_ref()).await?;

        inv.enter(OpPhase::Validating);
        require_id("id", id)?;

        inv.enter(OpPhase::Writing);
        let result = scope
            .run(
                &Statement::DetachDelete { label: Label::Post },
                &params([(param::ID, Value::from(id))]),
            )
            .await?;

        inv.enter(OpPhase::ShapingResult);
        if result.counters.nodes_deleted == 0 {
            return Err(ClassifiedError::new(EntityKind::Post.not_found_code())
                .with_entity_id(id)
                .with_message("Post not found")
                .into());
        }

        inv.release(scope);
        Ok(true)
    }
}
