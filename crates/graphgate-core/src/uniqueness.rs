//! Pre-write uniqueness checks
//!
//! The store offers no single conditional create across two distinct unique
//! properties, so the core looks each unique field up before writing. A
//! window remains between check and write: two concurrent creates with the
//! same value can both pass. Where the store enforces its own uniqueness
//! constraint that constraint is the authority and the collision surfaces as
//! a constraint violation (translated to DUPLICATE); the pre-check is then a
//! fast-fail path that avoids the write round trip.

use serde_json::Value;

use crate::errors::{ClassifiedError, EntityKind};
use crate::graph::statement::param;
use crate::graph::{Label, Params, PropertyKey, SessionScope, Statement, StoreError};

/// A unique-declared field whose value is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub entity: EntityKind,
    pub key: PropertyKey,
}

impl Conflict {
    pub fn into_error(self) -> ClassifiedError {
        ClassifiedError::new(self.entity.duplicate_code())
            .with_field(self.key.as_str())
            .with_message(format!(
                "{} with provided {} already exists",
                self.entity.name(),
                self.key
            ))
    }
}

/// Unique-declared fields of one entity type, in declaration order
#[derive(Debug, Clone, Copy)]
pub struct UniquenessGuard {
    entity: EntityKind,
    label: Label,
    keys: &'static [PropertyKey],
}

impl UniquenessGuard {
    /// Users: email first, then username
    pub const USER: UniquenessGuard = UniquenessGuard {
        entity: EntityKind::User,
        label: Label::User,
        keys: &[PropertyKey::Email, PropertyKey::Username],
    };

    pub fn keys(&self) -> &'static [PropertyKey] {
        self.keys
    }

    /// Point lookup for one field
    ///
    /// With `exclude_id` (the record being updated) the lookup itself skips
    /// that record, so another owner is found even when duplicates exist.
    ///
    /// # Errors
    ///
    /// Propagates store failures from the lookup.
    pub async fn check_unique(
        &self,
        scope: &mut SessionScope,
        key: PropertyKey,
        value: &str,
        exclude_id: Option<&str>,
    ) -> Result<Option<Conflict>, StoreError> {
        let mut params = Params::new();
        params.insert(key.as_str().to_string(), Value::from(value));

        let statement = match exclude_id {
            Some(own) => {
                params.insert(param::EXCLUDE_ID.to_string(), Value::from(own));
                Statement::FindOtherNode {
                    label: self.label,
                    key,
                }
            }
            None => Statement::FindNode {
                label: self.label,
                key,
            },
        };

        let taken = !scope.run(&statement, &params).await?.is_empty();

        if taken {
            tracing::debug!(field = key.as_str(), "unique value already taken");
            Ok(Some(Conflict {
                entity: self.entity,
                key,
            }))
        } else {
            Ok(None)
        }
    }

    /// Check every supplied unique field in declaration order
    ///
    /// `supplied` may name any subset of the declared keys; keys that are not
    /// declared unique are ignored. Stops at the first conflict.
    ///
    /// # Errors
    ///
    /// Propagates store failures from the lookups.
    pub async fn check_all(
        &self,
        scope: &mut SessionScope,
        supplied: &[(PropertyKey, &str)],
        exclude_id: Option<&str>,
    ) -> Result<Option<Conflict>, StoreError> {
        for key in self.keys {
            let Some((_, value)) = supplied.iter().find(|(k, _)| k == key) else {
                continue;
            };
            if let Some(conflict) = self.check_unique(scope, *key, value, exclude_id).await? {
                return Ok(Some(conflict));
            }
        }
        Ok(None)
    }
}
