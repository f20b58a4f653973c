//! Scoped session ownership
//!
//! `SessionScope` owns an acquired session and closes it when dropped, so
//! every exit path of an invocation (success, early `?` return, panic
//! unwind) releases the session exactly once.

use super::client::{GraphClient, GraphSession};
use super::error::StoreError;
use super::result::QueryResult;
use super::statement::{Params, Statement};

pub struct SessionScope {
    session: Option<Box<dyn GraphSession>>,
}

impl SessionScope {
    /// Acquire a session from the client
    ///
    /// # Errors
    ///
    /// Returns the client's error if no session can be opened; nothing needs
    /// releasing in that case.
    pub async fn acquire(client: &dyn GraphClient) -> Result<Self, StoreError> {
        let session = client.open_session().await?;
        tracing::debug!("session acquired");
        Ok(Self {
            session: Some(session),
        })
    }

    /// Run a statement through the owned session
    ///
    /// # Errors
    ///
    /// Propagates the store's error unchanged.
    pub async fn run(
        &mut self,
        statement: &Statement,
        params: &Params,
    ) -> Result<QueryResult, StoreError> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| StoreError::uncoded("session already released"))?;
        tracing::debug!(statement = %statement.cypher(), "running statement");
        session.run(statement, params).await
    }

    /// Release the session now rather than at end of scope
    pub fn release(mut self) {
        self.close_once();
    }

    fn close_once(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
            tracing::debug!("session released");
        }
    }
}

impl Drop for SessionScope {
    fn drop(&mut self) {
        self.close_once();
    }
}
