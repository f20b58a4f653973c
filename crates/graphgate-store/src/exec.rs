//! Statement interpreter over the in-memory graph

use graphgate_core::graph::statement::param;
use graphgate_core::graph::{
    Counters, Direction, Hop, Label, Params, PropertyKey, QueryResult, Record, RelType, Statement,
    StoreError, COUNT_COLUMN, NODE_COLUMN,
};
use serde_json::{Map, Value};

use crate::errors::{parameter_missing, parameter_type};
use crate::memory::{Edge, GraphState, Node};

pub(crate) fn execute(
    state: &mut GraphState,
    statement: &Statement,
    params: &Params,
) -> Result<QueryResult, StoreError> {
    match statement {
        Statement::FindNode { label, key } => find_node(state, *label, *key, None, params),
        Statement::FindOtherNode { label, key } => {
            let exclude_id = str_param(params, param::EXCLUDE_ID)?;
            find_node(state, *label, *key, Some(exclude_id), params)
        }
        Statement::CreateNode { label } => create_node(state, *label, params),
        Statement::CreateAuthoredPost => create_authored_post(state, params),
        Statement::SetProperties { label, keys } => set_properties(state, *label, keys, params),
        Statement::DetachDelete { label } => detach_delete(state, *label, params),
        Statement::ListNodes { label } => {
            let (offset, limit) = page(params)?;
            let nodes: Vec<&Node> = state.nodes.iter().filter(|n| n.label == *label).collect();
            Ok(rows(nodes, offset, limit))
        }
        Statement::ListAuthoredPosts => {
            let author_id = str_param(params, param::AUTHOR_ID)?;
            let (offset, limit) = page(params)?;
            let nodes: Vec<&Node> = state
                .nodes
                .iter()
                .filter(|n| {
                    n.label == Label::Post
                        && n.id().is_some_and(|post_id| {
                            state.edges.iter().any(|e| {
                                e.rel == RelType::Authored && e.from == author_id && e.to == post_id
                            })
                        })
                })
                .collect();
            Ok(rows(nodes, offset, limit))
        }
        Statement::ListNeighbours(hop) => {
            let id = str_param(params, param::ID)?;
            let (offset, limit) = page(params)?;
            Ok(rows(neighbours(state, hop, id), offset, limit))
        }
        Statement::CountNeighbours(hop) => {
            let id = str_param(params, param::ID)?;
            let total = neighbours(state, hop, id).len() as u64;
            Ok(QueryResult {
                records: vec![Record::new().with(COUNT_COLUMN, Value::from(total))],
                counters: Counters::default(),
            })
        }
        Statement::MergeRelationship { from, rel, to } => {
            merge_relationship(state, *from, *rel, *to, params)
        }
        Statement::DeleteRelationship { from, rel, to } => {
            delete_relationship(state, *from, *rel, *to, params)
        }
    }
}

fn str_param<'a>(params: &'a Params, name: &str) -> Result<&'a str, StoreError> {
    params
        .get(name)
        .ok_or_else(|| parameter_missing(name))?
        .as_str()
        .ok_or_else(|| parameter_type(name, "a string"))
}

fn u64_param(params: &Params, name: &str) -> Result<u64, StoreError> {
    params
        .get(name)
        .ok_or_else(|| parameter_missing(name))?
        .as_u64()
        .ok_or_else(|| parameter_type(name, "a non-negative integer"))
}

fn page(params: &Params) -> Result<(usize, usize), StoreError> {
    let offset = u64_param(params, param::OFFSET)?;
    let limit = u64_param(params, param::LIMIT)?;
    Ok((
        usize::try_from(offset).unwrap_or(usize::MAX),
        usize::try_from(limit).unwrap_or(usize::MAX),
    ))
}

fn node_record(node: &Node) -> Record {
    Record::new().with(NODE_COLUMN, Value::Object(node.properties.clone()))
}

/// ORDER BY createdAt, id SKIP offset LIMIT limit
fn rows(mut nodes: Vec<&Node>, offset: usize, limit: usize) -> QueryResult {
    let sort_key = |n: &Node| {
        (
            n.properties
                .get(PropertyKey::CreatedAt.as_str())
                .and_then(Value::as_str)
                .map(str::to_owned),
            n.id().map(str::to_owned),
        )
    };
    nodes.sort_by_key(|n| sort_key(*n));
    QueryResult {
        records: nodes
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(node_record)
            .collect(),
        counters: Counters::default(),
    }
}

/// Nodes one hop from the anchor; none when the anchor does not match
fn neighbours<'a>(state: &'a GraphState, hop: &Hop, id: &str) -> Vec<&'a Node> {
    if state.find_node(hop.anchor, id).is_none() {
        return Vec::new();
    }
    state
        .nodes
        .iter()
        .filter(|n| {
            n.label == hop.other
                && n.id().is_some_and(|other_id| {
                    state.edges.iter().any(|e| {
                        e.rel == hop.rel
                            && match hop.direction {
                                Direction::Outgoing => e.from == id && e.to == other_id,
                                Direction::Incoming => e.from == other_id && e.to == id,
                            }
                    })
                })
        })
        .collect()
}

fn find_node(
    state: &GraphState,
    label: Label,
    key: PropertyKey,
    exclude_id: Option<&str>,
    params: &Params,
) -> Result<QueryResult, StoreError> {
    let value = params
        .get(key.as_str())
        .ok_or_else(|| parameter_missing(key.as_str()))?;
    let records = state
        .nodes
        .iter()
        .find(|n| {
            n.label == label
                && n.properties.get(key.as_str()) == Some(value)
                && (exclude_id.is_none() || n.id() != exclude_id)
        })
        .map(node_record)
        .into_iter()
        .collect();
    Ok(QueryResult {
        records,
        counters: Counters::default(),
    })
}

fn props_param(params: &Params) -> Result<Map<String, Value>, StoreError> {
    params
        .get(param::PROPS)
        .ok_or_else(|| parameter_missing(param::PROPS))?
        .as_object()
        .cloned()
        .ok_or_else(|| parameter_type(param::PROPS, "a map"))
}

fn push_node(
    state: &mut GraphState,
    label: Label,
    properties: Map<String, Value>,
) -> Result<(Record, Counters), StoreError> {
    state.check_constraints(label, &properties, None)?;
    let counters = Counters {
        nodes_created: 1,
        properties_set: properties.len() as u64,
        ..Counters::default()
    };
    let node = Node { label, properties };
    let record = node_record(&node);
    state.nodes.push(node);
    Ok((record, counters))
}

fn create_node(
    state: &mut GraphState,
    label: Label,
    params: &Params,
) -> Result<QueryResult, StoreError> {
    let (record, counters) = push_node(state, label, props_param(params)?)?;
    Ok(QueryResult {
        records: vec![record],
        counters,
    })
}

fn create_authored_post(state: &mut GraphState, params: &Params) -> Result<QueryResult, StoreError> {
    let author_id = str_param(params, param::AUTHOR_ID)?.to_string();
    let properties = props_param(params)?;

    // MATCH found no author: nothing is created
    if state.find_node(Label::User, &author_id).is_none() {
        return Ok(QueryResult::default());
    }

    let post_id = properties
        .get(PropertyKey::Id.as_str())
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| parameter_type("props.id", "a string"))?;

    let (record, mut counters) = push_node(state, Label::Post, properties)?;
    state.edges.push(Edge {
        rel: RelType::Authored,
        from: author_id,
        to: post_id,
    });
    counters.relationships_created = 1;

    Ok(QueryResult {
        records: vec![record],
        counters,
    })
}

fn set_properties(
    state: &mut GraphState,
    label: Label,
    keys: &[PropertyKey],
    params: &Params,
) -> Result<QueryResult, StoreError> {
    let id = str_param(params, param::ID)?;
    let Some(idx) = state.find_node(label, id) else {
        return Ok(QueryResult::default());
    };

    let mut updates = Map::new();
    for key in keys {
        let value = params
            .get(key.as_str())
            .ok_or_else(|| parameter_missing(key.as_str()))?;
        updates.insert(key.as_str().to_string(), value.clone());
    }
    state.check_constraints(label, &updates, Some(idx))?;

    let counters = Counters {
        properties_set: updates.len() as u64,
        ..Counters::default()
    };
    let node = &mut state.nodes[idx];
    node.properties.extend(updates);

    Ok(QueryResult {
        records: vec![node_record(node)],
        counters,
    })
}

fn detach_delete(
    state: &mut GraphState,
    label: Label,
    params: &Params,
) -> Result<QueryResult, StoreError> {
    let id = str_param(params, param::ID)?.to_string();
    let Some(idx) = state.find_node(label, &id) else {
        return Ok(QueryResult::default());
    };

    state.nodes.remove(idx);
    let before = state.edges.len();
    state.edges.retain(|e| e.from != id && e.to != id);

    Ok(QueryResult {
        records: Vec::new(),
        counters: Counters {
            nodes_deleted: 1,
            relationships_deleted: (before - state.edges.len()) as u64,
            ..Counters::default()
        },
    })
}

fn merge_relationship(
    state: &mut GraphState,
    from: Label,
    rel: RelType,
    to: Label,
    params: &Params,
) -> Result<QueryResult, StoreError> {
    let from_id = str_param(params, param::FROM_ID)?.to_string();
    let to_id = str_param(params, param::TO_ID)?.to_string();

    if state.find_node(from, &from_id).is_none() || state.find_node(to, &to_id).is_none() {
        return Ok(QueryResult::default());
    }

    let exists = state
        .edges
        .iter()
        .any(|e| e.rel == rel && e.from == from_id && e.to == to_id);
    let mut counters = Counters::default();
    if !exists {
        state.edges.push(Edge {
            rel,
            from: from_id.clone(),
            to: to_id.clone(),
        });
        counters.relationships_created = 1;
    }

    Ok(QueryResult {
        records: vec![Record::new()
            .with(param::FROM_ID, Value::from(from_id))
            .with(param::TO_ID, Value::from(to_id))],
        counters,
    })
}

fn delete_relationship(
    state: &mut GraphState,
    from: Label,
    rel: RelType,
    to: Label,
    params: &Params,
) -> Result<QueryResult, StoreError> {
    let from_id = str_param(params, param::FROM_ID)?.to_string();
    let to_id = str_param(params, param::TO_ID)?.to_string();

    if state.find_node(from, &from_id).is_none() || state.find_node(to, &to_id).is_none() {
        return Ok(QueryResult::default());
    }

    let before = state.edges.len();
    state
        .edges
        .retain(|e| !(e.rel == rel && e.from == from_id && e.to == to_id));

    Ok(QueryResult {
        records: Vec::new(),
        counters: Counters {
            relationships_deleted: (before - state.edges.len()) as u64,
            ..Counters::default()
        },
    })
}
