//! Session-oriented graph store seam
//!
//! The core talks to the property-graph store only through [`GraphClient`]
//! and the sessions it hands out, and only by way of a [`SessionScope`] so
//! every acquired session is released exactly once.

pub mod client;
pub mod error;
pub mod result;
pub mod scope;
pub mod statement;

pub use client::{GraphClient, GraphSession};
pub use error::{StoreError, StoreErrorClass};
pub use result::{Counters, QueryResult, Record};
pub use scope::SessionScope;
pub use statement::{
    Direction, Hop, Label, Params, PropertyKey, RelType, Statement, COUNT_COLUMN, NODE_COLUMN,
};
