//! Core types shared across the graphgate crates
//!
//! - **Correlation**: `RequestId` stamped on every mutation invocation
//! - **Schema constants**: canonical structured-log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
