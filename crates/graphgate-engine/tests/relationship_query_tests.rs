//! Integration tests for FOLLOWS / LIKES edges and the read operations.

mod common;

use common::{ada, seed_post, seed_user, setup};
use graphgate_core::config::{GatewayConfig, LoggingConfig, PaginationConfig, StoreConfig};
use graphgate_core::errors::ErrorCode;
use graphgate_core::graph::{Label, RelType};
use graphgate_core::logging_facility::Profile;
use graphgate_core::model::User;
use graphgate_core::pagination::Pagination;
use graphgate_engine::MutationCore;
use graphgate_store::MemoryGraph;
use std::sync::Arc;

fn sorted_ids(users: &[User]) -> Vec<String> {
    let mut ids: Vec<String> = users.iter().map(|u| u.id.clone()).collect();
    ids.sort();
    ids
}

// ---------------------------------------------------------------------------
// follow / unfollow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_follow_is_idempotent() {
    let (core, graph) = setup();
    let ada = seed_user(&core, "ada").await;
    let grace = seed_user(&core, "grace").await;

    assert!(core.follow_user(&ada.id, &grace.id).await.unwrap());
    assert!(core.follow_user(&ada.id, &grace.id).await.unwrap());

    assert_eq!(graph.edge_count(RelType::Follows), 1);
    assert!(graph.has_edge(RelType::Follows, &ada.id, &grace.id));
}

#[tokio::test]
async fn test_unfollow_reports_whether_edge_existed() {
    let (core, graph) = setup();
    let ada = seed_user(&core, "ada").await;
    let grace = seed_user(&core, "grace").await;
    core.follow_user(&ada.id, &grace.id).await.unwrap();

    assert!(core.unfollow_user(&ada.id, &grace.id).await.unwrap());
    assert!(!core.unfollow_user(&ada.id, &grace.id).await.unwrap());
    assert_eq!(graph.edge_count(RelType::Follows), 0);
}

#[tokio::test]
async fn test_follow_self_is_bad_user_input() {
    let (core, graph) = setup();
    let ada = seed_user(&core, "ada").await;
    let statements = graph.stats().statements;

    let err = core.follow_user(&ada.id, &ada.id).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::BadUserInput);
    assert_eq!(graph.stats().statements, statements);
}

#[tokio::test]
async fn test_follow_missing_target_is_user_not_found() {
    let (core, _graph) = setup();
    let ada = seed_user(&core, "ada").await;

    let err = core.follow_user(&ada.id, "ghost").await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::UserNotFound);
    assert_eq!(err.field(), Some("targetUserId"));
    assert_eq!(err.entity_id(), Some("ghost"));
}

#[tokio::test]
async fn test_follow_blank_id_is_bad_user_input() {
    let (core, _graph) = setup();
    let err = core.follow_user("", "u2").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadUserInput);
    assert_eq!(err.field(), Some("userId"));
}

// ---------------------------------------------------------------------------
// like / unlike
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_like_and_unlike_post() {
    let (core, graph) = setup();
    let ada = seed_user(&core, "ada").await;
    let grace = seed_user(&core, "grace").await;
    let post = seed_post(&core, &ada, "Notes").await;

    assert!(core.like_post(&grace.id, &post.id).await.unwrap());
    assert!(graph.has_edge(RelType::Likes, &grace.id, &post.id));

    assert!(core.unlike_post(&grace.id, &post.id).await.unwrap());
    assert_eq!(graph.edge_count(RelType::Likes), 0);
}

#[tokio::test]
async fn test_like_missing_post_is_post_not_found() {
    let (core, graph) = setup();
    let ada = seed_user(&core, "ada").await;

    let err = core.like_post(&ada.id, "ghost").await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::PostNotFound);
    assert_eq!(graph.edge_count(RelType::Likes), 0);
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_get_user_round_trips_created_record() {
    let (core, _graph) = setup();
    let ada = seed_user(&core, "ada").await;

    assert_eq!(core.get_user(&ada.id).await.unwrap(), Some(ada));
    assert_eq!(core.get_user("ghost").await.unwrap(), None);
}

#[tokio::test]
async fn test_list_users_pages_in_creation_order() {
    let (core, _graph) = setup();
    let mut created = Vec::new();
    for name in ["u-a", "u-b", "u-c", "u-d", "u-e"] {
        created.push(seed_user(&core, name).await);
    }
    // Same createdAt everywhere under the pinned clock, so ordering is by id
    created.sort_by(|a, b| a.id.cmp(&b.id));

    let page = core.list_users(Pagination::new(2, 2)).await.unwrap();

    assert_eq!(page, created[2..4].to_vec());
}

#[tokio::test]
async fn test_posts_by_user_only_returns_own_posts() {
    let (core, _graph) = setup();
    let ada = seed_user(&core, "ada").await;
    let grace = seed_user(&core, "grace").await;
    seed_post(&core, &ada, "one").await;
    seed_post(&core, &ada, "two").await;
    seed_post(&core, &grace, "other").await;

    let posts = core
        .posts_by_user(&ada.id, Pagination::new(1, 10))
        .await
        .unwrap();

    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p.title != "other"));
    assert!(core
        .posts_by_user("ghost", Pagination::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_list_posts_pages_across_authors() {
    let (core, _graph) = setup();
    let ada = seed_user(&core, "ada").await;
    let grace = seed_user(&core, "grace").await;
    let mut created = vec![
        seed_post(&core, &ada, "one").await,
        seed_post(&core, &grace, "two").await,
        seed_post(&core, &ada, "three").await,
    ];
    created.sort_by(|a, b| a.id.cmp(&b.id));

    let first = core.list_posts(Pagination::new(1, 2)).await.unwrap();
    let second = core.list_posts(Pagination::new(2, 2)).await.unwrap();

    assert_eq!(first, created[0..2].to_vec());
    assert_eq!(second, created[2..].to_vec());
}

#[tokio::test]
async fn test_followers_and_following_read_back_edges() {
    let (core, _graph) = setup();
    let ada = seed_user(&core, "ada").await;
    let grace = seed_user(&core, "grace").await;
    let alan = seed_user(&core, "alan").await;
    core.follow_user(&grace.id, &ada.id).await.unwrap();
    core.follow_user(&alan.id, &ada.id).await.unwrap();
    core.follow_user(&ada.id, &alan.id).await.unwrap();

    let followers = core
        .followers(&ada.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(
        sorted_ids(&followers),
        sorted_ids(&[grace.clone(), alan.clone()])
    );
    let following = core
        .following(&ada.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(following, vec![alan.clone()]);

    assert_eq!(core.follower_count(&ada.id).await.unwrap(), 2);
    assert_eq!(core.following_count(&ada.id).await.unwrap(), 1);
    assert_eq!(core.follower_count(&grace.id).await.unwrap(), 0);

    core.unfollow_user(&grace.id, &ada.id).await.unwrap();
    assert_eq!(core.follower_count(&ada.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_likers_and_like_count_read_back_edges() {
    let (core, _graph) = setup();
    let ada = seed_user(&core, "ada").await;
    let grace = seed_user(&core, "grace").await;
    let post = seed_post(&core, &ada, "Notes").await;
    core.like_post(&grace.id, &post.id).await.unwrap();
    core.like_post(&grace.id, &post.id).await.unwrap();

    let likers = core
        .post_likers(&post.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(likers, vec![grace]);
    assert_eq!(core.like_count(&post.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_post_author_resolves_authored_edge() {
    let (core, _graph) = setup();
    let ada = seed_user(&core, "ada").await;
    let post = seed_post(&core, &ada, "Notes").await;

    assert_eq!(core.post_author(&post.id).await.unwrap(), Some(ada));
    assert_eq!(core.post_author("ghost").await.unwrap(), None);
}

#[tokio::test]
async fn test_relationship_reads_of_unknown_anchor_are_empty() {
    let (core, _graph) = setup();

    assert!(core
        .followers("ghost", Pagination::default())
        .await
        .unwrap()
        .is_empty());
    assert_eq!(core.like_count("ghost").await.unwrap(), 0);
}

#[tokio::test]
async fn test_relationship_reads_require_ids() {
    let (core, graph) = setup();

    let err = core.follower_count(" ").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadUserInput);
    assert_eq!(err.field(), Some("userId"));

    let err = core
        .post_likers("", Pagination::default())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("postId"));

    let err = core.post_author("").await.unwrap_err();
    assert_eq!(err.field(), Some("postId"));

    assert_eq!(graph.stats().statements, 0);
    assert!(graph.stats().balanced());
}

#[tokio::test]
async fn test_pagination_bounds_are_bad_user_input() {
    let (core, graph) = setup();

    let err = core.list_users(Pagination::new(0, 10)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadUserInput);
    assert_eq!(err.field(), Some("pageNumber"));

    let err = core.list_users(Pagination::new(1, 101)).await.unwrap_err();
    assert_eq!(err.field(), Some("pageSize"));

    let err = core.list_users(Pagination::new(1, 0)).await.unwrap_err();
    assert_eq!(err.field(), Some("pageSize"));

    assert_eq!(graph.stats().statements, 0);
}

#[tokio::test]
async fn test_configured_max_page_size_applies() {
    let (core, _graph) = setup();
    let core = core.with_pagination(PaginationConfig {
        default_page_size: 5,
        max_page_size: 20,
    });

    assert!(core.list_users(Pagination::new(1, 20)).await.is_ok());
    let err = core.list_users(Pagination::new(1, 21)).await.unwrap_err();
    assert_eq!(err.message(), "pageSize must be between 1 and 20");
}

#[tokio::test]
async fn test_from_config_applies_store_and_paging_settings() {
    let config = GatewayConfig {
        store: StoreConfig {
            unique_constraints: true,
        },
        logging: LoggingConfig {
            profile: Profile::Test,
        },
        pagination: PaginationConfig {
            default_page_size: 5,
            max_page_size: 20,
        },
    };
    let graph = MemoryGraph::from_config(&config.store);
    let core = MutationCore::from_config(Arc::new(graph.clone()), &config);

    assert_eq!(core.max_page_size(), 20);
    assert_eq!(core.default_page_size(), 5);
    let err = core.list_users(Pagination::new(1, 21)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadUserInput);

    core.create_user(ada()).await.unwrap();
    assert_eq!(graph.node_count(Label::User), 1);
}
