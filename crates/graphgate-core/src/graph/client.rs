//! graph::client
//!
//! Store client traits.
//!
//! # Design
//!
//! The traits are async because every call is a network round trip to the
//! graph database. Sessions are short-lived: one per mutation invocation,
//! returned to the client's pool by `close`.

use async_trait::async_trait;

use super::error::StoreError;
use super::result::QueryResult;
use super::statement::{Params, Statement};

/// Hands out sessions against one graph database
///
/// Implementations are shared by every concurrent invocation, so they must
/// be `Send + Sync`; the connection pool is the only shared state.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Acquire a session
    async fn open_session(&self) -> Result<Box<dyn GraphSession>, StoreError>;
}

/// A single acquired session
#[async_trait]
pub trait GraphSession: Send {
    /// Run one statement and wait for its full result
    async fn run(&mut self, statement: &Statement, params: &Params)
        -> Result<QueryResult, StoreError>;

    /// Return the session to its pool
    ///
    /// Synchronous so it can run from `Drop`.
    fn close(&mut self);
}
