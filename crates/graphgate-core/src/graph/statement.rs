//! Typed graph statements
//!
//! The mutation core never concatenates caller input into query text. Every
//! label, property name and relationship type comes from the enums below,
//! and caller values travel only as parameters. `Statement::cypher` renders
//! the query text a Bolt-speaking store expects; in-process stores can match
//! on the variant directly.

use serde_json::{Map, Value};
use std::fmt;

/// Statement parameters, keyed by parameter name
pub type Params = Map<String, Value>;

/// Column every node-returning statement binds its node to
pub const NODE_COLUMN: &str = "n";

/// Column counting statements bind their total to
pub const COUNT_COLUMN: &str = "count";

/// Parameter names shared by the statements and the stores that run them
pub mod param {
    pub const ID: &str = "id";
    pub const EXCLUDE_ID: &str = "excludeId";
    pub const PROPS: &str = "props";
    pub const AUTHOR_ID: &str = "authorId";
    pub const FROM_ID: &str = "fromId";
    pub const TO_ID: &str = "toId";
    pub const OFFSET: &str = "offset";
    pub const LIMIT: &str = "limit";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    User,
    Post,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::User => "User",
            Label::Post => "Post",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allow-list of node property names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Id,
    Username,
    Email,
    FullName,
    Title,
    Content,
    CreatedAt,
    UpdatedAt,
}

impl PropertyKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKey::Id => "id",
            PropertyKey::Username => "username",
            PropertyKey::Email => "email",
            PropertyKey::FullName => "fullName",
            PropertyKey::Title => "title",
            PropertyKey::Content => "content",
            PropertyKey::CreatedAt => "createdAt",
            PropertyKey::UpdatedAt => "updatedAt",
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelType {
    Authored,
    Follows,
    Likes,
}

impl RelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelType::Authored => "AUTHORED",
            RelType::Follows => "FOLLOWS",
            RelType::Likes => "LIKES",
        }
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge direction as seen from the anchor node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// One hop from the anchor node matched by `id` to its `other` neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hop {
    pub anchor: Label,
    pub rel: RelType,
    pub direction: Direction,
    pub other: Label,
}

impl Hop {
    /// Users following the anchor user
    pub const FOLLOWERS: Hop = Hop {
        anchor: Label::User,
        rel: RelType::Follows,
        direction: Direction::Incoming,
        other: Label::User,
    };

    /// Users the anchor user follows
    pub const FOLLOWING: Hop = Hop {
        anchor: Label::User,
        rel: RelType::Follows,
        direction: Direction::Outgoing,
        other: Label::User,
    };

    /// Users who liked the anchor post
    pub const LIKERS: Hop = Hop {
        anchor: Label::Post,
        rel: RelType::Likes,
        direction: Direction::Incoming,
        other: Label::User,
    };

    /// The user who authored the anchor post
    pub const AUTHOR: Hop = Hop {
        anchor: Label::Post,
        rel: RelType::Authored,
        direction: Direction::Incoming,
        other: Label::User,
    };

    fn pattern(&self) -> String {
        let Hop {
            anchor, rel, other, ..
        } = self;
        match self.direction {
            Direction::Outgoing => format!("(:{anchor} {{id: $id}})-[:{rel}]->(n:{other})"),
            Direction::Incoming => format!("(:{anchor} {{id: $id}})<-[:{rel}]-(n:{other})"),
        }
    }
}

/// A statement the mutation core can issue through a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Point lookup on one property; parameter named after the property
    FindNode { label: Label, key: PropertyKey },
    /// Point lookup on one property among nodes other than `excludeId`
    FindOtherNode { label: Label, key: PropertyKey },
    /// Create one node from the `props` map
    CreateNode { label: Label },
    /// Create a Post and its AUTHORED edge from `authorId` in one write
    CreateAuthoredPost,
    /// Partial update of the node matched by `id`; one parameter per key
    SetProperties { label: Label, keys: Vec<PropertyKey> },
    /// Delete the node matched by `id` and every incident edge
    DetachDelete { label: Label },
    /// Page through nodes with `offset` / `limit`
    ListNodes { label: Label },
    /// Page through posts authored by `authorId`
    ListAuthoredPosts,
    /// Page through the neighbours one hop away from `id`
    ListNeighbours(Hop),
    /// Count the neighbours one hop away from `id`
    CountNeighbours(Hop),
    /// Ensure exactly one `rel` edge from `fromId` to `toId`
    MergeRelationship { from: Label, rel: RelType, to: Label },
    /// Remove the `rel` edge from `fromId` to `toId`, if any
    DeleteRelationship { from: Label, rel: RelType, to: Label },
}

impl Statement {
    /// Whether the statement mutates the graph
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Statement::FindNode { .. }
                | Statement::FindOtherNode { .. }
                | Statement::ListNodes { .. }
                | Statement::ListAuthoredPosts
                | Statement::ListNeighbours(_)
                | Statement::CountNeighbours(_)
        )
    }

    /// Render the query text
    pub fn cypher(&self) -> String {
        match self {
            Statement::FindNode { label, key } => {
                format!("MATCH (n:{label} {{{key}: ${key}}}) RETURN n LIMIT 1")
            }
            Statement::FindOtherNode { label, key } => format!(
                "MATCH (n:{label} {{{key}: ${key}}}) WHERE n.id <> $excludeId RETURN n LIMIT 1"
            ),
            Statement::CreateNode { label } => format!("CREATE (n:{label} $props) RETURN n"),
            Statement::CreateAuthoredPost => {
                "MATCH (u:User {id: $authorId}) CREATE (u)-[:AUTHORED]->(n:Post $props) RETURN n"
                    .to_string()
            }
            Statement::SetProperties { label, keys } => {
                let assignments = keys
                    .iter()
                    .map(|key| format!("n.{key} = ${key}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("MATCH (n:{label} {{id: $id}}) SET {assignments} RETURN n")
            }
            Statement::DetachDelete { label } => {
                format!("MATCH (n:{label} {{id: $id}}) DETACH DELETE n")
            }
            Statement::ListNodes { label } => format!(
                "MATCH (n:{label}) RETURN n ORDER BY n.createdAt, n.id SKIP $offset LIMIT $limit"
            ),
            Statement::ListAuthoredPosts => "MATCH (:User {id: $authorId})-[:AUTHORED]->(n:Post) \
                 RETURN n ORDER BY n.createdAt, n.id SKIP $offset LIMIT $limit"
                .to_string(),
            Statement::ListNeighbours(hop) => format!(
                "MATCH {} RETURN n ORDER BY n.createdAt, n.id SKIP $offset LIMIT $limit",
                hop.pattern()
            ),
            Statement::CountNeighbours(hop) => {
                format!("MATCH {} RETURN count(n) AS count", hop.pattern())
            }
            Statement::MergeRelationship { from, rel, to } => format!(
                "MATCH (a:{from} {{id: $fromId}}), (b:{to} {{id: $toId}}) \
                 MERGE (a)-[:{rel}]->(b) RETURN a.id AS fromId, b.id AS toId"
            ),
            Statement::DeleteRelationship { from, rel, to } => format!(
                "MATCH (:{from} {{id: $fromId}})-[r:{rel}]->(:{to} {{id: $toId}}) DELETE r"
            ),
        }
    }
}
