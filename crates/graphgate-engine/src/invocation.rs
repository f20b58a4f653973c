//! Per-invocation lifecycle: request id, phase tracking, boundary logging
//! and the single error translation at the operation boundary.

use graphgate_core::errors::{ClassifiedError, EntityKind, RawError};
use graphgate_core::graph::{GraphClient, SessionScope, StoreError};
use graphgate_core::translate::ErrorTranslator;
use graphgate_core::{log_op_end, log_op_error, log_op_start};
use graphgate_core_types::RequestId;
use std::fmt;
use std::time::Instant;

/// Operation state machine phases
///
/// Failure can occur in any phase; the session is released exactly once
/// whichever terminal is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpPhase {
    AcquiringSession,
    Validating,
    CheckingUniqueness,
    Writing,
    Reading,
    ShapingResult,
    ReleasingSession,
}

impl OpPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpPhase::AcquiringSession => "acquiring_session",
            OpPhase::Validating => "validating",
            OpPhase::CheckingUniqueness => "checking_uniqueness",
            OpPhase::Writing => "writing",
            OpPhase::Reading => "reading",
            OpPhase::ShapingResult => "shaping_result",
            OpPhase::ReleasingSession => "releasing_session",
        }
    }
}

impl fmt::Display for OpPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) struct Invocation {
    op: &'static str,
    entity: EntityKind,
    request_id: RequestId,
    phase: OpPhase,
    target: Option<String>,
    started: Instant,
}

impl Invocation {
    /// Mint a request id and log the start event
    pub(crate) fn begin(op: &'static str, entity: EntityKind) -> Self {
        let request_id = RequestId::new();
        log_op_start!(op, request_id = request_id.as_str());
        Self {
            op,
            entity,
            request_id,
            phase: OpPhase::AcquiringSession,
            target: None,
            started: Instant::now(),
        }
    }

    /// Record the id the invocation operates on
    pub(crate) fn target(&mut self, id: &str) {
        self.target = Some(id.to_string());
    }

    pub(crate) fn enter(&mut self, phase: OpPhase) {
        self.phase = phase;
        tracing::debug!(
            op = self.op,
            request_id = self.request_id.as_str(),
            phase = phase.as_str(),
            "phase transition"
        );
    }

    pub(crate) async fn acquire(
        &mut self,
        client: &dyn GraphClient,
    ) -> Result<SessionScope, StoreError> {
        self.enter(OpPhase::AcquiringSession);
        SessionScope::acquire(client).await
    }

    pub(crate) fn release(&mut self, scope: SessionScope) {
        self.enter(OpPhase::ReleasingSession);
        scope.release();
    }

    /// Translate any failure once, attach context, and log the outcome
    pub(crate) fn finish<T>(self, result: Result<T, RawError>) -> Result<T, ClassifiedError> {
        let duration_ms = self.started.elapsed().as_millis() as u64;
        match result {
            Ok(value) => {
                log_op_end!(
                    self.op,
                    duration_ms = duration_ms,
                    request_id = self.request_id.as_str()
                );
                Ok(value)
            }
            Err(raw) => {
                let mut err = ErrorTranslator::new(self.entity, self.op).translate(raw);
                if err.op().is_none() {
                    err = err.with_op(self.op);
                }
                if err.entity_id().is_none() {
                    if let Some(target) = &self.target {
                        err = err.with_entity_id(target.as_str());
                    }
                }
                let err = err.with_request_id(self.request_id.clone());

                log_op_error!(
                    self.op,
                    &err,
                    duration_ms = duration_ms,
                    request_id = self.request_id.as_str(),
                    phase = self.phase.as_str()
                );
                Err(err)
            }
        }
    }
}
