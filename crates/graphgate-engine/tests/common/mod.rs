//! Shared fixtures for the engine integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use graphgate_core::clock::FixedClock;
use graphgate_core::graph::{
    GraphClient, GraphSession, Label, Params, QueryResult, Statement, StoreError,
};
use graphgate_core::model::{CreatePostInput, CreateUserInput, Post, User};
use graphgate_engine::MutationCore;
use graphgate_store::MemoryGraph;
use serde_json::Value;
use std::sync::Arc;

/// 2023-11-14T22:13:20.123Z
pub const NOW_MILLIS: i64 = 1_700_000_000_123;
pub const NOW: &str = "2023-11-14T22:13:20.123Z";

/// Core over a constraint-free graph with the clock pinned at `NOW`
pub fn setup() -> (MutationCore, MemoryGraph) {
    setup_with(MemoryGraph::new())
}

pub fn setup_with(graph: MemoryGraph) -> (MutationCore, MemoryGraph) {
    let core = MutationCore::new(Arc::new(graph.clone()))
        .with_clock(Arc::new(FixedClock::from_millis(NOW_MILLIS)));
    (core, graph)
}

pub fn user_input(username: &str, email: &str) -> CreateUserInput {
    CreateUserInput {
        username: username.to_string(),
        email: email.to_string(),
        full_name: None,
    }
}

pub fn ada() -> CreateUserInput {
    CreateUserInput {
        username: "ada".to_string(),
        email: "ada@x.io".to_string(),
        full_name: Some("Ada Lovelace".to_string()),
    }
}

pub async fn seed_user(core: &MutationCore, username: &str) -> User {
    core.create_user(user_input(username, &format!("{username}@x.io")))
        .await
        .unwrap()
}

pub async fn seed_post(core: &MutationCore, author: &User, title: &str) -> Post {
    core.create_post(CreatePostInput {
        title: title.to_string(),
        content: format!("{title} body"),
        author_id: author.id.clone(),
    })
    .await
    .unwrap()
}

/// Client whose sessions delete the author just before the authored-post
/// write, as a concurrent delete landing between check and write would
pub struct AuthorVanishes {
    pub graph: MemoryGraph,
}

#[async_trait]
impl GraphClient for AuthorVanishes {
    async fn open_session(&self) -> Result<Box<dyn GraphSession>, StoreError> {
        let inner = self.graph.open_session().await?;
        Ok(Box::new(VanishingSession { inner }))
    }
}

struct VanishingSession {
    inner: Box<dyn GraphSession>,
}

#[async_trait]
impl GraphSession for VanishingSession {
    async fn run(
        &mut self,
        statement: &Statement,
        params: &Params,
    ) -> Result<QueryResult, StoreError> {
        if *statement == Statement::CreateAuthoredPost {
            if let Some(author) = params.get("authorId") {
                let mut delete = Params::new();
                delete.insert("id".to_string(), author.clone());
                self.inner
                    .run(&Statement::DetachDelete { label: Label::User }, &delete)
                    .await?;
            }
        }
        self.inner.run(statement, params).await
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

pub fn str_prop<'a>(props: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    props.get(key).and_then(Value::as_str)
}
