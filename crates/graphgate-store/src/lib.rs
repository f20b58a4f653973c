//! graphgate store - in-process property graph
//!
//! Provides:
//! - `MemoryGraph`, a session-oriented store client over an in-memory
//!   label/property graph that executes the core's typed statements
//! - Optional native uniqueness constraints, reported with the same status
//!   code a graph database uses
//! - Session acquire/release and write accounting, plus fault injection,
//!   for exercising the mutation core's failure paths

pub mod errors;
mod exec;
pub mod memory;

pub use memory::{Edge, Fault, MemoryGraph, Node, SessionStats};
