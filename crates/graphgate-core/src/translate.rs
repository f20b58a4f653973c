//! Raw failure → classified error mapping
//!
//! One translator, parameterized by entity and operation, replaces the
//! per-operation error switches. Translation is idempotent: an error that is
//! already classified comes back unchanged.

use crate::errors::{ClassifiedError, EntityKind, ErrorCode, RawError};
use crate::graph::{StoreError, StoreErrorClass};
use crate::validation::ValidationReport;

/// Fallback when a validator reports failure without any rule detail
pub const VALIDATION_FALLBACK: &str = "Validation failed";
pub const UNAUTHORIZED_MESSAGE: &str = "Database connection unauthorized";
pub const SYNTAX_MESSAGE: &str = "Database rejected the statement";
pub const DATABASE_MESSAGE: &str = "Database error";

#[derive(Debug, Clone, Copy)]
pub struct ErrorTranslator {
    entity: EntityKind,
    op: &'static str,
}

impl ErrorTranslator {
    pub fn new(entity: EntityKind, op: &'static str) -> Self {
        Self { entity, op }
    }

    pub fn translate(&self, raw: RawError) -> ClassifiedError {
        match raw {
            RawError::Classified(err) => err,
            RawError::Validation(report) => self.validation(&report),
            RawError::Store(err) => self.store(&err),
            RawError::Internal(message) => self.internal(&message),
        }
    }

    fn validation(&self, report: &ValidationReport) -> ClassifiedError {
        let mut err = ClassifiedError::new(ErrorCode::ValidationError)
            .with_op(self.op)
            .with_message(report.first_message().unwrap_or(VALIDATION_FALLBACK));
        if let Some(detail) = report.details.first() {
            err = err.with_field(detail.path.as_str());
        }
        err
    }

    fn store(&self, store_err: &StoreError) -> ClassifiedError {
        match store_err.class() {
            StoreErrorClass::ConstraintViolation => {
                ClassifiedError::new(self.entity.duplicate_code())
                    .with_op(self.op)
                    .with_message(self.entity.duplicate_message())
                    .with_cause(store_err.message())
            }
            // Authentication failures can echo principals or connection
            // details; nothing of the original is forwarded.
            StoreErrorClass::Unauthorized => ClassifiedError::new(ErrorCode::DatabaseError)
                .with_op(self.op)
                .with_message(UNAUTHORIZED_MESSAGE),
            StoreErrorClass::Syntax => ClassifiedError::new(ErrorCode::DatabaseError)
                .with_op(self.op)
                .with_message(SYNTAX_MESSAGE)
                .with_cause(store_err.message()),
            StoreErrorClass::Other => ClassifiedError::new(ErrorCode::DatabaseError)
                .with_op(self.op)
                .with_message(DATABASE_MESSAGE)
                .with_cause(store_err.message()),
            StoreErrorClass::Uncoded => self.internal(store_err.message()),
        }
    }

    fn internal(&self, message: &str) -> ClassifiedError {
        ClassifiedError::new(ErrorCode::InternalServerError)
            .with_op(self.op)
            .with_message(format!("Failed to {}", self.op.replace('_', " ")))
            .with_cause(message)
    }
}
