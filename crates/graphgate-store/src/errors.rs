//! Store-side error constructors
//!
//! Mirror the status codes and wording a graph database reports so the
//! core's translator sees realistic input.

use graphgate_core::graph::error::status;
use graphgate_core::graph::{Label, PropertyKey, StoreError};
use serde_json::Value;

/// Create a uniqueness constraint violation
pub fn constraint_violation(
    node_index: usize,
    label: Label,
    key: PropertyKey,
    value: &Value,
) -> StoreError {
    StoreError::constraint_violation(format!(
        "Node({}) already exists with label `{}` and property `{}` = {}",
        node_index, label, key, value
    ))
}

/// Create a missing-parameter error
pub fn parameter_missing(name: &str) -> StoreError {
    StoreError::coded(
        status::PARAMETER_MISSING,
        format!("Expected parameter(s): {}", name),
    )
}

/// Create a wrong-type parameter error
pub fn parameter_type(name: &str, expected: &str) -> StoreError {
    StoreError::coded(
        "Neo.ClientError.Statement.TypeError",
        format!("Parameter `{}` must be {}", name, expected),
    )
}
