//! memory
//!
//! In-process graph store implementing the core's session client traits.
//!
//! # Design
//!
//! All sessions share one `Arc<Mutex<GraphState>>`; each statement runs
//! under the lock, so a single statement is atomic (the Post node and its
//! AUTHORED edge appear together) while consecutive statements of one
//! invocation can interleave with other invocations, just as separate round
//! trips do against a real server. `run` yields to the scheduler before
//! taking the lock to widen that interleaving.
//!
//! # Example
//!
//! ```
//! use graphgate_core::graph::{GraphClient, Label, Params, Statement};
//! use graphgate_store::MemoryGraph;
//!
//! # tokio_test_block_on(async {
//! let graph = MemoryGraph::new();
//! let mut session = graph.open_session().await.unwrap();
//! let result = session
//!     .run(&Statement::ListNodes { label: Label::User }, &Params::new())
//!     .await;
//! session.close();
//! assert!(result.is_err()); // offset/limit parameters are required
//! assert_eq!(graph.stats().closed, 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

use async_trait::async_trait;
use graphgate_core::config::StoreConfig;
use graphgate_core::graph::{
    GraphClient, GraphSession, Label, Params, PropertyKey, QueryResult, RelType, Statement,
    StoreError,
};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

use crate::exec;

/// A stored node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: Label,
    pub properties: Map<String, Value>,
}

impl Node {
    pub fn id(&self) -> Option<&str> {
        self.properties
            .get(PropertyKey::Id.as_str())
            .and_then(Value::as_str)
    }
}

/// A stored directed relationship, endpoints by node id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub rel: RelType,
    pub from: String,
    pub to: String,
}

/// Session and statement accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Sessions handed out
    pub opened: u64,
    /// `close` calls received
    pub closed: u64,
    /// Statements received, reads and writes
    pub statements: u64,
    /// Write statements received, whether or not they succeeded
    pub writes: u64,
}

impl SessionStats {
    pub fn balanced(&self) -> bool {
        self.opened == self.closed
    }
}

/// Failure to inject into the next matching call
#[derive(Debug, Clone)]
pub enum Fault {
    /// The next `open_session` fails
    OpenSession(StoreError),
    /// Counting from now, statement number `nth` (0-based) fails
    Statement { nth: u64, error: StoreError },
}

#[derive(Debug, Default)]
pub(crate) struct GraphState {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) unique: HashSet<(Label, PropertyKey)>,
    stats: SessionStats,
    fault: Option<Fault>,
    statement_log: Vec<Statement>,
}

impl GraphState {
    pub(crate) fn find_node(&self, label: Label, id: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.label == label && n.id() == Some(id))
    }

    /// Check `properties` against the unique constraints on `label`,
    /// ignoring the node at `skip`
    pub(crate) fn check_constraints(
        &self,
        label: Label,
        properties: &Map<String, Value>,
        skip: Option<usize>,
    ) -> Result<(), StoreError> {
        for (constrained_label, key) in &self.unique {
            if *constrained_label != label {
                continue;
            }
            let Some(value) = properties.get(key.as_str()) else {
                continue;
            };
            let clash = self.nodes.iter().enumerate().find(|(idx, node)| {
                Some(*idx) != skip
                    && node.label == label
                    && node.properties.get(key.as_str()) == Some(value)
            });
            if let Some((idx, _)) = clash {
                return Err(crate::errors::constraint_violation(idx, label, *key, value));
            }
        }
        Ok(())
    }

    fn take_statement_fault(&mut self) -> Option<StoreError> {
        match self.fault.take() {
            Some(Fault::Statement { nth: 0, error }) => Some(error),
            Some(Fault::Statement { nth, error }) => {
                self.fault = Some(Fault::Statement {
                    nth: nth - 1,
                    error,
                });
                None
            }
            other => {
                self.fault = other;
                None
            }
        }
    }

    fn take_open_fault(&mut self) -> Option<StoreError> {
        match self.fault.take() {
            Some(Fault::OpenSession(error)) => Some(error),
            other => {
                self.fault = other;
                None
            }
        }
    }
}

/// In-memory graph store; clones share the same graph
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    state: Arc<Mutex<GraphState>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        if config.unique_constraints {
            Self::new().with_user_constraints()
        } else {
            Self::new()
        }
    }

    /// Enforce uniqueness of `key` among `label` nodes on every write
    pub fn with_unique_constraint(self, label: Label, key: PropertyKey) -> Self {
        self.state.lock().unique.insert((label, key));
        self
    }

    /// The constraints a production deployment declares for users
    pub fn with_user_constraints(self) -> Self {
        self.with_unique_constraint(Label::User, PropertyKey::Id)
            .with_unique_constraint(Label::User, PropertyKey::Email)
            .with_unique_constraint(Label::User, PropertyKey::Username)
            .with_unique_constraint(Label::Post, PropertyKey::Id)
    }

    /// Arm a fault, replacing any pending one
    pub fn inject(&self, fault: Fault) {
        self.state.lock().fault = Some(fault);
    }

    pub fn clear_fault(&self) {
        self.state.lock().fault = None;
    }

    pub fn stats(&self) -> SessionStats {
        self.state.lock().stats
    }

    /// Every statement received, in order
    pub fn statements(&self) -> Vec<Statement> {
        self.state.lock().statement_log.clone()
    }

    pub fn node_count(&self, label: Label) -> usize {
        self.state
            .lock()
            .nodes
            .iter()
            .filter(|n| n.label == label)
            .count()
    }

    /// Properties of the first `label` node whose `key` equals `value`
    pub fn find(&self, label: Label, key: PropertyKey, value: &str) -> Option<Map<String, Value>> {
        self.state
            .lock()
            .nodes
            .iter()
            .find(|n| {
                n.label == label && n.properties.get(key.as_str()).and_then(Value::as_str) == Some(value)
            })
            .map(|n| n.properties.clone())
    }

    pub fn edge_count(&self, rel: RelType) -> usize {
        self.state.lock().edges.iter().filter(|e| e.rel == rel).count()
    }

    pub fn has_edge(&self, rel: RelType, from: &str, to: &str) -> bool {
        self.state
            .lock()
            .edges
            .iter()
            .any(|e| e.rel == rel && e.from == from && e.to == to)
    }

    /// Edges touching the node `id`, in either direction
    pub fn incident_edges(&self, id: &str) -> usize {
        self.state
            .lock()
            .edges
            .iter()
            .filter(|e| e.from == id || e.to == id)
            .count()
    }

    /// Seed a node directly, bypassing sessions and constraints
    pub fn insert_node(&self, label: Label, properties: Map<String, Value>) {
        self.state.lock().nodes.push(Node { label, properties });
    }

    /// Seed an edge directly
    pub fn insert_edge(&self, rel: RelType, from: impl Into<String>, to: impl Into<String>) {
        self.state.lock().edges.push(Edge {
            rel,
            from: from.into(),
            to: to.into(),
        });
    }
}

#[async_trait]
impl GraphClient for MemoryGraph {
    async fn open_session(&self) -> Result<Box<dyn GraphSession>, StoreError> {
        let mut state = self.state.lock();
        if let Some(error) = state.take_open_fault() {
            tracing::debug!(error = %error, "injected open_session failure");
            return Err(error);
        }
        state.stats.opened += 1;
        Ok(Box::new(MemorySession {
            state: self.state.clone(),
        }))
    }
}

struct MemorySession {
    state: Arc<Mutex<GraphState>>,
}

#[async_trait]
impl GraphSession for MemorySession {
    async fn run(
        &mut self,
        statement: &Statement,
        params: &Params,
    ) -> Result<QueryResult, StoreError> {
        tokio::task::yield_now().await;

        let mut state = self.state.lock();
        state.stats.statements += 1;
        if statement.is_write() {
            state.stats.writes += 1;
        }
        state.statement_log.push(statement.clone());

        if let Some(error) = state.take_statement_fault() {
            tracing::debug!(error = %error, "injected statement failure");
            return Err(error);
        }

        exec::execute(&mut state, statement, params)
    }

    fn close(&mut self) {
        self.state.lock().stats.closed += 1;
    }
}
