//! Store-reported failures
//!
//! The store client reports failures as a message plus an optional status
//! code in the graph database's `Neo.*` code family.

use thiserror::Error;

/// Status codes the translator recognises
pub mod status {
    pub const CONSTRAINT_VALIDATION_FAILED: &str =
        "Neo.ClientError.Schema.ConstraintValidationFailed";
    pub const UNAUTHORIZED: &str = "Neo.ClientError.Security.Unauthorized";
    pub const SECURITY_PREFIX: &str = "Neo.ClientError.Security.";
    pub const SYNTAX_ERROR: &str = "Neo.ClientError.Statement.SyntaxError";
    pub const PARAMETER_MISSING: &str = "Neo.ClientError.Statement.ParameterMissing";
    pub const SERVICE_UNAVAILABLE: &str = "Neo.TransientError.General.DatabaseUnavailable";
}

/// Coarse class of a store error, derived from its status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorClass {
    ConstraintViolation,
    Unauthorized,
    Syntax,
    /// Some other recognisable status code
    Other,
    /// No status code at all (driver-level or unknown failure)
    Uncoded,
}

/// Error raised by a store client call
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct StoreError {
    code: Option<String>,
    message: String,
}

impl StoreError {
    /// Error carrying a store status code
    pub fn coded(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Error without a status code (connection drop, driver bug, ...)
    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn constraint_violation(message: impl Into<String>) -> Self {
        Self::coded(status::CONSTRAINT_VALIDATION_FAILED, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::coded(status::UNAUTHORIZED, message)
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::coded(status::SYNTAX_ERROR, message)
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn class(&self) -> StoreErrorClass {
        match self.code.as_deref() {
            None => StoreErrorClass::Uncoded,
            Some(status::CONSTRAINT_VALIDATION_FAILED) => StoreErrorClass::ConstraintViolation,
            Some(status::SYNTAX_ERROR) => StoreErrorClass::Syntax,
            Some(code) if code.starts_with(status::SECURITY_PREFIX) => {
                StoreErrorClass::Unauthorized
            }
            Some(_) => StoreErrorClass::Other,
        }
    }
}
