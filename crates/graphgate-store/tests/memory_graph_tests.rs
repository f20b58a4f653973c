//! Integration tests for the in-memory graph store.
//!
//! Statements go through `GraphClient` / `GraphSession` exactly as the
//! mutation core issues them.

use graphgate_core::config::StoreConfig;
use graphgate_core::graph::error::status;
use graphgate_core::graph::{
    GraphClient, Hop, Label, Params, PropertyKey, QueryResult, RelType, Statement, StoreError,
    StoreErrorClass,
};
use graphgate_store::{Fault, MemoryGraph};
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn params(value: Value) -> Params {
    value.as_object().cloned().unwrap()
}

fn user_props(id: &str, email: &str, username: &str, created_at: &str) -> Map<String, Value> {
    params(json!({
        "id": id,
        "email": email,
        "username": username,
        "createdAt": created_at,
    }))
}

async fn run(
    graph: &MemoryGraph,
    statement: Statement,
    params: Params,
) -> Result<QueryResult, StoreError> {
    let mut session = graph.open_session().await.unwrap();
    let result = session.run(&statement, &params).await;
    session.close();
    result
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unique_constraint_rejects_second_node() {
    let graph = MemoryGraph::new().with_user_constraints();
    let create = Statement::CreateNode { label: Label::User };

    run(
        &graph,
        create.clone(),
        params(json!({"props": user_props("u1", "ada@x.io", "ada", "2024-01-01T00:00:00.000Z")})),
    )
    .await
    .unwrap();

    let err = run(
        &graph,
        create,
        params(json!({"props": user_props("u2", "ada@x.io", "ada2", "2024-01-01T00:00:00.000Z")})),
    )
    .await
    .unwrap_err();

    assert_eq!(err.class(), StoreErrorClass::ConstraintViolation);
    assert_eq!(err.code(), Some(status::CONSTRAINT_VALIDATION_FAILED));
    assert!(err.message().contains("`email`"));
    assert_eq!(graph.node_count(Label::User), 1);
}

#[tokio::test]
async fn test_without_constraints_duplicates_are_stored() {
    let graph = MemoryGraph::new();
    for id in ["u1", "u2"] {
        run(
            &graph,
            Statement::CreateNode { label: Label::User },
            params(json!({"props": user_props(id, "same@x.io", "same", "2024-01-01T00:00:00.000Z")})),
        )
        .await
        .unwrap();
    }
    assert_eq!(graph.node_count(Label::User), 2);
}

#[tokio::test]
async fn test_config_toggles_native_constraints() {
    let create = Statement::CreateNode { label: Label::User };
    let dup = |id: &str| params(json!({"props": user_props(id, "same@x.io", "same", "t1")}));

    let enforced = MemoryGraph::from_config(&StoreConfig {
        unique_constraints: true,
    });
    run(&enforced, create.clone(), dup("u1")).await.unwrap();
    let err = run(&enforced, create.clone(), dup("u2")).await.unwrap_err();
    assert_eq!(err.class(), StoreErrorClass::ConstraintViolation);

    let relaxed = MemoryGraph::from_config(&StoreConfig {
        unique_constraints: false,
    });
    run(&relaxed, create.clone(), dup("u1")).await.unwrap();
    run(&relaxed, create, dup("u2")).await.unwrap();
    assert_eq!(relaxed.node_count(Label::User), 2);
}

#[tokio::test]
async fn test_set_properties_may_keep_own_unique_value() {
    let graph = MemoryGraph::new().with_user_constraints();
    graph.insert_node(
        Label::User,
        user_props("u1", "ada@x.io", "ada", "2024-01-01T00:00:00.000Z"),
    );

    let result = run(
        &graph,
        Statement::SetProperties {
            label: Label::User,
            keys: vec![PropertyKey::Email, PropertyKey::FullName],
        },
        params(json!({"id": "u1", "email": "ada@x.io", "fullName": "Ada L"})),
    )
    .await
    .unwrap();

    let node = result.first().and_then(|r| r.node()).unwrap();
    assert_eq!(node.get("fullName"), Some(&json!("Ada L")));
    assert_eq!(result.counters.properties_set, 2);
}

#[tokio::test]
async fn test_set_properties_on_missing_node_returns_no_rows() {
    let graph = MemoryGraph::new();
    let result = run(
        &graph,
        Statement::SetProperties {
            label: Label::User,
            keys: vec![PropertyKey::Username],
        },
        params(json!({"id": "ghost", "username": "nobody"})),
    )
    .await
    .unwrap();
    assert!(result.is_empty());
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_authored_post_created_with_edge() {
    let graph = MemoryGraph::new();
    graph.insert_node(
        Label::User,
        user_props("u1", "ada@x.io", "ada", "2024-01-01T00:00:00.000Z"),
    );

    let result = run(
        &graph,
        Statement::CreateAuthoredPost,
        params(json!({
            "authorId": "u1",
            "props": {"id": "p1", "title": "T", "content": "C"},
        })),
    )
    .await
    .unwrap();

    assert_eq!(result.counters.nodes_created, 1);
    assert_eq!(result.counters.relationships_created, 1);
    assert!(graph.has_edge(RelType::Authored, "u1", "p1"));
}

#[tokio::test]
async fn test_authored_post_without_author_creates_nothing() {
    let graph = MemoryGraph::new();
    let result = run(
        &graph,
        Statement::CreateAuthoredPost,
        params(json!({
            "authorId": "ghost",
            "props": {"id": "p1", "title": "T", "content": "C"},
        })),
    )
    .await
    .unwrap();

    assert!(result.is_empty());
    assert_eq!(graph.node_count(Label::Post), 0);
    assert_eq!(graph.edge_count(RelType::Authored), 0);
}

#[tokio::test]
async fn test_detach_delete_removes_incident_edges() {
    let graph = MemoryGraph::new();
    graph.insert_node(Label::User, user_props("u1", "a@x.io", "a", "t1"));
    graph.insert_node(Label::User, user_props("u2", "b@x.io", "b", "t2"));
    graph.insert_node(Label::Post, params(json!({"id": "p1"})));
    graph.insert_edge(RelType::Authored, "u1", "p1");
    graph.insert_edge(RelType::Follows, "u2", "u1");
    graph.insert_edge(RelType::Likes, "u2", "p1");

    let result = run(
        &graph,
        Statement::DetachDelete { label: Label::User },
        params(json!({"id": "u1"})),
    )
    .await
    .unwrap();

    assert_eq!(result.counters.nodes_deleted, 1);
    assert_eq!(result.counters.relationships_deleted, 2);
    assert_eq!(graph.incident_edges("u1"), 0);
    assert!(graph.has_edge(RelType::Likes, "u2", "p1"));
}

#[tokio::test]
async fn test_merge_relationship_is_idempotent() {
    let graph = MemoryGraph::new();
    graph.insert_node(Label::User, user_props("u1", "a@x.io", "a", "t1"));
    graph.insert_node(Label::User, user_props("u2", "b@x.io", "b", "t2"));
    let merge = Statement::MergeRelationship {
        from: Label::User,
        rel: RelType::Follows,
        to: Label::User,
    };
    let ids = params(json!({"fromId": "u1", "toId": "u2"}));

    let first = run(&graph, merge.clone(), ids.clone()).await.unwrap();
    let second = run(&graph, merge, ids).await.unwrap();

    assert_eq!(first.counters.relationships_created, 1);
    assert_eq!(second.counters.relationships_created, 0);
    assert_eq!(second.first().and_then(|r| r.get("toId")), Some(&json!("u2")));
    assert_eq!(graph.edge_count(RelType::Follows), 1);
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_orders_by_created_at_then_id() {
    let graph = MemoryGraph::new();
    graph.insert_node(Label::User, user_props("u3", "c@x.io", "c", "2024-01-02T00:00:00.000Z"));
    graph.insert_node(Label::User, user_props("u2", "b@x.io", "b", "2024-01-01T00:00:00.000Z"));
    graph.insert_node(Label::User, user_props("u1", "a@x.io", "a", "2024-01-01T00:00:00.000Z"));

    let result = run(
        &graph,
        Statement::ListNodes { label: Label::User },
        params(json!({"offset": 1, "limit": 5})),
    )
    .await
    .unwrap();

    let ids: Vec<&str> = result
        .records
        .iter()
        .filter_map(|r| r.node())
        .filter_map(|n| n.get("id").and_then(Value::as_str))
        .collect();
    assert_eq!(ids, vec!["u2", "u3"]);
}

fn node_ids(result: &QueryResult) -> Vec<&str> {
    result
        .records
        .iter()
        .filter_map(|r| r.node())
        .filter_map(|n| n.get("id").and_then(Value::as_str))
        .collect()
}

#[tokio::test]
async fn test_find_other_node_skips_excluded_owner() {
    let graph = MemoryGraph::new();
    // Duplicates left behind by an unguarded race; the excluded one first
    graph.insert_node(Label::User, user_props("u1", "same@x.io", "a", "t1"));
    graph.insert_node(Label::User, user_props("u2", "same@x.io", "b", "t2"));
    let find = Statement::FindOtherNode {
        label: Label::User,
        key: PropertyKey::Email,
    };

    let other = run(
        &graph,
        find.clone(),
        params(json!({"email": "same@x.io", "excludeId": "u1"})),
    )
    .await
    .unwrap();
    assert_eq!(node_ids(&other), vec!["u2"]);

    let none = run(
        &graph,
        find,
        params(json!({"email": "a@x.io", "excludeId": "u1"})),
    )
    .await
    .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_neighbours_follow_edge_direction() {
    let graph = MemoryGraph::new();
    graph.insert_node(Label::User, user_props("u1", "a@x.io", "a", "t1"));
    graph.insert_node(Label::User, user_props("u2", "b@x.io", "b", "t2"));
    graph.insert_node(Label::User, user_props("u3", "c@x.io", "c", "t3"));
    graph.insert_edge(RelType::Follows, "u2", "u1");
    graph.insert_edge(RelType::Follows, "u3", "u1");
    graph.insert_edge(RelType::Follows, "u1", "u3");

    let page = json!({"id": "u1", "offset": 0, "limit": 10});
    let followers = run(&graph, Statement::ListNeighbours(Hop::FOLLOWERS), params(page.clone()))
        .await
        .unwrap();
    assert_eq!(node_ids(&followers), vec!["u2", "u3"]);

    let following = run(&graph, Statement::ListNeighbours(Hop::FOLLOWING), params(page))
        .await
        .unwrap();
    assert_eq!(node_ids(&following), vec!["u3"]);

    let count = run(
        &graph,
        Statement::CountNeighbours(Hop::FOLLOWERS),
        params(json!({"id": "u1"})),
    )
    .await
    .unwrap();
    assert_eq!(count.first().and_then(|r| r.count()), Some(2));
}

#[tokio::test]
async fn test_neighbours_of_missing_anchor_are_empty() {
    let graph = MemoryGraph::new();
    graph.insert_node(Label::User, user_props("u1", "a@x.io", "a", "t1"));
    graph.insert_edge(RelType::Follows, "u1", "ghost");

    let count = run(
        &graph,
        Statement::CountNeighbours(Hop::FOLLOWERS),
        params(json!({"id": "ghost"})),
    )
    .await
    .unwrap();
    assert_eq!(count.first().and_then(|r| r.count()), Some(0));

    let author = run(
        &graph,
        Statement::ListNeighbours(Hop::AUTHOR),
        params(json!({"id": "ghost", "offset": 0, "limit": 1})),
    )
    .await
    .unwrap();
    assert!(author.is_empty());
}

#[tokio::test]
async fn test_missing_parameter_is_reported_with_status_code() {
    let graph = MemoryGraph::new();
    let err = run(
        &graph,
        Statement::FindNode {
            label: Label::User,
            key: PropertyKey::Email,
        },
        Params::new(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), Some(status::PARAMETER_MISSING));
}

// ---------------------------------------------------------------------------
// Accounting and faults
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_stats_count_sessions_and_writes() {
    let graph = MemoryGraph::new();
    run(
        &graph,
        Statement::CreateNode { label: Label::Post },
        params(json!({"props": {"id": "p1"}})),
    )
    .await
    .unwrap();
    run(
        &graph,
        Statement::FindNode {
            label: Label::Post,
            key: PropertyKey::Id,
        },
        params(json!({"id": "p1"})),
    )
    .await
    .unwrap();

    let stats = graph.stats();
    assert_eq!(stats.opened, 2);
    assert!(stats.balanced());
    assert_eq!(stats.statements, 2);
    assert_eq!(stats.writes, 1);
    assert_eq!(graph.statements().len(), 2);
}

#[tokio::test]
async fn test_statement_fault_fires_on_nth_statement_only() {
    let graph = MemoryGraph::new();
    graph.inject(Fault::Statement {
        nth: 1,
        error: StoreError::unauthorized("bad credentials for neo4j"),
    });
    let find = Statement::FindNode {
        label: Label::User,
        key: PropertyKey::Id,
    };
    let id = params(json!({"id": "u1"}));

    assert!(run(&graph, find.clone(), id.clone()).await.is_ok());
    let err = run(&graph, find.clone(), id.clone()).await.unwrap_err();
    assert_eq!(err.class(), StoreErrorClass::Unauthorized);
    assert!(run(&graph, find, id).await.is_ok());
}

#[tokio::test]
async fn test_open_fault_opens_nothing() {
    let graph = MemoryGraph::new();
    graph.inject(Fault::OpenSession(StoreError::uncoded("connection refused")));

    assert!(graph.open_session().await.is_err());
    assert_eq!(graph.stats().opened, 0);
    assert!(graph.open_session().await.is_ok());
}
