use serde_json::{Map, Value};

use super::statement::{COUNT_COLUMN, NODE_COLUMN};

/// One returned row, keyed by column name
///
/// Nodes come back as JSON objects of their properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.columns.insert(column.into(), value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Properties of the node bound to the standard node column
    pub fn node(&self) -> Option<&Map<String, Value>> {
        self.get(NODE_COLUMN).and_then(Value::as_object)
    }

    /// Total bound to the count column
    pub fn count(&self) -> Option<u64> {
        self.get(COUNT_COLUMN).and_then(Value::as_u64)
    }
}

/// Update counters reported alongside the rows of a write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub relationships_created: u64,
    pub relationships_deleted: u64,
    pub properties_set: u64,
}

/// Outcome of running one statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub records: Vec<Record>,
    pub counters: Counters,
}

impl QueryResult {
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
