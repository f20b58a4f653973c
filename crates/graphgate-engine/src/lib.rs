//! graphgate engine - entity mutation orchestration
//!
//! `MutationCore` runs every create / update / delete / relationship / read
//! operation through the same lifecycle: acquire a scoped session, validate,
//! pre-check uniqueness, write, shape the result, release. Failures are
//! translated exactly once at the operation boundary.
//!
//! ## Logging Ownership
//!
//! The engine owns lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure, with the failing phase
//!
//! Lower layers (store, core) use only `tracing::debug!()`.

pub mod commands;
mod invocation;
pub mod mutation_core;

pub use invocation::OpPhase;
pub use mutation_core::{MutationCore, Validators};
