//! User mutations

use graphgate_core::errors::{ClassifiedError, EntityKind, ErrorCode, RawError, Result};
use graphgate_core::graph::statement::param;
use graphgate_core::graph::{Label, PropertyKey, Statement};
use graphgate_core::model::{CreateUserInput, UpdateUserInput, User, UserField};
use graphgate_core::uniqueness::UniquenessGuard;
use serde_json::Value;

use super::{exists, first_node, no_fields_to_update, op, params, require_id};
use crate::invocation::{Invocation, OpPhase};
use crate::mutation_core::MutationCore;

impl MutationCore {
    /// Create a user
    ///
    /// Email, then username, are checked for existing owners before the
    /// single node-creation write. `id` and `createdAt` are assigned here.
    ///
    /// ## Errors
    ///
    /// - `VALIDATION_ERROR`: payload rejected by the validator
    /// - `DUPLICATE_USER`: email or username taken (`field` names which)
    /// - `DATABASE_ERROR` / `INTERNAL_SERVER_ERROR`: store failure
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User> {
        let mut inv = Invocation::begin(op::CREATE_USER, EntityKind::User);
        let result = self.create_user_impl(&mut inv, input).await;
        inv.finish(result)
    }

    async fn create_user_impl(
        &self,
        inv: &mut Invocation,
        input: CreateUserInput,
    ) -> std::result::Result<User, RawError> {
        let mut scope = inv.acquire(self.client.as_ref()).await?;

        inv.enter(OpPhase::Validating);
        self.validators.create_user.validate(&input)?;

        inv.enter(OpPhase::CheckingUniqueness);
        let supplied = [
            (PropertyKey::Email, input.email.as_str()),
            (PropertyKey::Username, input.username.as_str()),
        ];
        if let Some(conflict) = UniquenessGuard::USER
            .check_all(&mut scope, &supplied, None)
            .await?
        {
            return Err(conflict.into_error().into());
        }

        inv.enter(OpPhase::Writing);
        let user = User {
            id: self.ids.generate(),
            username: input.username,
            email: input.email,
            full_name: input.full_name,
            created_at: self.clock.timestamp(),
        };
        inv.target(&user.id);
        let result = scope
            .run(
                &Statement::CreateNode { label: Label::User },
                &params([(param::PROPS, Value::Object(user.to_properties()))]),
            )
            .await?;

        inv.enter(OpPhase::ShapingResult);
        let created = first_node(&result)?
            .ok_or_else(|| RawError::Internal("create returned no record".to_string()))?;

        inv.release(scope);
        Ok(created)
    }

    /// Apply a partial update to a user
    ///
    /// Only allow-listed fields reach the SET clause. A supplied email or
    /// username is checked against other users first, once the target is
    /// known to exist. The row returned by the write is the result.
    ///
    /// ## Errors
    ///
    /// - `BAD_USER_INPUT`: blank id
    /// - `VALIDATION_ERROR`: empty payload ("No fields to update") or a
    ///   rejected field
    /// - `DUPLICATE_USER`: new email or username owned by another user
    /// - `NOT_FOUND`: no user has `id`
    pub async fn update_user(&self, id: &str, input: UpdateUserInput) -> Result<User> {
        let mut inv = Invocation::begin(op::UPDATE_USER, EntityKind::User);
        inv.target(id);
        let result = self.update_user_impl(&mut inv, id, input).await;
        inv.finish(result)
    }

    async fn update_user_impl(
        &self,
        inv: &mut Invocation,
        id: &str,
        input: UpdateUserInput,
    ) -> std::result::Result<User, RawError> {
        let mut scope = inv.acquire(self.client.as_ref()).await?;

        inv.enter(OpPhase::Validating);
        require_id("id", id)?;
        if input.is_empty() {
            return Err(no_fields_to_update().into());
        }
        self.validators.update_user.validate(&input)?;
        let assignments = input.assignments();

        inv.enter(OpPhase::CheckingUniqueness);
        let supplied: Vec<(PropertyKey, &str)> = assignments
            .iter()
            .filter(|(field, _)| matches!(field, UserField::Email | UserField::Username))
            .map(|(field, value)| (field.property(), *value))
            .collect();
        // A missing target is NOT_FOUND even when its new values are taken
        if !supplied.is_empty() && !exists(&mut scope, Label::User, id).await? {
            return Err(user_not_found(id).into());
        }
        if let Some(conflict) = UniquenessGuard::USER
            .check_all(&mut scope, &supplied, Some(id))
            .await?
        {
            return Err(conflict.into_error().into());
        }

        inv.enter(OpPhase::Writing);
        let mut set_params = params([(param::ID, Value::from(id))]);
        let mut keys = Vec::with_capacity(assignments.len());
        for (field, value) in &assignments {
            let key = field.property();
            set_params.insert(key.as_str().to_string(), Value::from(*value));
            keys.push(key);
        }
        let result = scope
            .run(
                &Statement::SetProperties {
                    label: Label::User,
                    keys,
                },
                &set_params,
            )
            .await?;

        inv.enter(OpPhase::ShapingResult);
        let updated = first_node(&result)?.ok_or_else(|| user_not_found(id))?;

        inv.release(scope);
        Ok(updated)
    }

    /// Delete a user together with every incident relationship
    ///
    /// ## Errors
    ///
    /// - `BAD_USER_INPUT`: blank id
    /// - `USER_NOT_FOUND`: no user has `id`
    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        let mut inv = Invocation::begin(op::DELETE_USER, EntityKind::User);
        inv.target(id);
        let result = self.delete_user_impl(&mut inv, id).await;
        inv.finish(result)
    }

    async fn delete_user_impl(
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
                &Statement::DetachDelete { label: Label::User },
                &params([(param::ID, Value::from(id))]),
            )
            .await?;

        inv.enter(OpPhase::ShapingResult);
        if result.counters.nodes_deleted == 0 {
            return Err(ClassifiedError::new(EntityKind::User.not_found_code())
                .with_entity_id(id)
                .with_message("User not found")
                .into());
        }
        tracing::debug!(
            user_id = id,
            relationships_deleted = result.counters.relationships_deleted,
            "user detached and deleted"
        );

        inv.release(scope);
        Ok(true)
    }
}

fn user_not_found(id: &str) -> ClassifiedError {
    ClassifiedError::new(ErrorCode::NotFound)
        .with_entity_id(id)
        .with_message("User not found")
}
