//! Favorite toggle engine and optimistic button scenarios
//!
//! Run with: cargo test -p integration-tests --test favorite_tests

use std::time::Duration;
use uuid::Uuid;

use curio_core::{Favorite, ReactionPolicy};
use curio_service::{FavoriteButton, FavoriteService, FavoriteView, ServiceError};
use integration_tests::{identity_a, identity_b, post_summary, TestHarness};

// ============================================================================
// Service
// ============================================================================

#[tokio::test]
async fn test_toggle_flips_row_existence() {
    let harness = TestHarness::single(identity_a());
    let service = FavoriteService::new(&harness.ctx);
    let post_id = Uuid::new_v4();

    let first = service.toggle(post_id).await.unwrap();
    assert!(first.favorited);
    assert_eq!(first.favorite.as_ref().map(|f| f.post_id), Some(post_id));
    assert!(service.is_favorited(post_id).await.unwrap());
    assert_eq!(service.count(post_id).await.unwrap(), 1);

    let second = service.toggle(post_id).await.unwrap();
    assert!(!second.favorited);
    assert!(second.favorite.is_none());
    assert!(!service.is_favorited(post_id).await.unwrap());
    assert_eq!(service.count(post_id).await.unwrap(), 0);
    assert!(harness.favorites.rows().is_empty());
}

#[tokio::test]
async fn test_list_newest_first_with_summaries() {
    let harness = TestHarness::single(identity_a());
    let service = FavoriteService::new(&harness.ctx);

    let older = post_summary("The Dybbuk Box", 120);
    let newer = post_summary("The Crying Boy", 60);
    harness.favorites.add_post(older.clone());
    harness.favorites.add_post(newer.clone());
    let gone = Uuid::new_v4();

    service.toggle(older.id).await.unwrap();
    service.toggle(newer.id).await.unwrap();
    service.toggle(gone).await.unwrap();

    // Another actor's favorites never show up
    FavoriteService::new(&harness.client_as(identity_b()))
        .toggle(older.id)
        .await
        .unwrap();

    let entries = service.list().await.unwrap();
    let post_ids: Vec<Uuid> = entries.iter().map(|e| e.favorite.post_id).collect();
    assert_eq!(post_ids, vec![gone, newer.id, older.id]);
    assert!(entries[0].post.is_none());
    assert_eq!(entries[1].post.as_ref().map(|p| p.title.as_str()), Some("The Crying Boy"));
}

#[tokio::test]
async fn test_remove_own_favorite() {
    let harness = TestHarness::single(identity_a());
    let service = FavoriteService::new(&harness.ctx);
    let post_id = Uuid::new_v4();

    let favorite = service.toggle(post_id).await.unwrap().favorite.unwrap();
    service.remove(favorite.id).await.unwrap();

    assert!(!service.is_favorited(post_id).await.unwrap());
}

#[tokio::test]
async fn test_remove_other_actors_favorite_is_not_found() {
    let harness = TestHarness::single(identity_a());
    let theirs = Favorite::new(Uuid::new_v4(), identity_b().actor_key());
    harness.favorites.seed(theirs.clone());

    let err = FavoriteService::new(&harness.ctx)
        .remove(theirs.id)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { resource: "Favorite", .. }));
    assert_eq!(harness.favorites.rows(), vec![theirs]);
}

#[tokio::test]
async fn test_reads_without_identity() {
    let harness = TestHarness::new(ReactionPolicy::single(), None);
    let service = FavoriteService::new(&harness.ctx);
    let post_id = Uuid::new_v4();

    assert!(!service.is_favorited(post_id).await.unwrap());
    assert!(service.list().await.unwrap().is_empty());

    let err = service.toggle(post_id).await.unwrap_err();
    assert!(err.is_authentication_required());
    assert_eq!(harness.store_calls(), 0);
}

// ============================================================================
// Optimistic button
// ============================================================================

#[tokio::test]
async fn test_button_toggle_success() {
    let harness = TestHarness::single(identity_a());
    let post_id = Uuid::new_v4();
    let button = FavoriteButton::new(harness.ctx.clone(), post_id, FavoriteView::new(false, 4));

    let view = button.toggle().await.unwrap();
    assert_eq!(view, FavoriteView::new(true, 5));
    assert_eq!(button.view(), view);
    assert_eq!(harness.favorites.rows().len(), 1);

    let view = button.toggle().await.unwrap();
    assert_eq!(view, FavoriteView::new(false, 4));
}

#[tokio::test]
async fn test_button_reverts_on_store_failure() {
    let harness = TestHarness::single(identity_a());
    let post_id = Uuid::new_v4();
    let before = FavoriteView::new(false, 7);
    let button = FavoriteButton::new(harness.ctx.clone(), post_id, before);

    harness.favorites.fail_writes(true);
    let err = button.toggle().await.unwrap_err();

    assert!(matches!(err, ServiceError::Domain(_)));
    assert_eq!(button.view(), before);
    assert!(harness.favorites.rows().is_empty());
}

#[tokio::test]
async fn test_button_shows_optimistic_state_while_in_flight() {
    let harness = TestHarness::single(identity_a());
    harness.favorites.set_write_delay(Duration::from_millis(50));
    harness.favorites.fail_writes(true);
    let button = FavoriteButton::new(harness.ctx.clone(), Uuid::new_v4(), FavoriteView::new(true, 1));

    let observe = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        button.view()
    };
    let (result, during) = tokio::join!(button.toggle(), observe);

    assert_eq!(during, FavoriteView::new(false, 0));
    assert!(result.is_err());
    assert_eq!(button.view(), FavoriteView::new(true, 1));
}

#[tokio::test]
async fn test_button_without_identity_leaves_view_alone() {
    let harness = TestHarness::new(ReactionPolicy::single(), None);
    let before = FavoriteView::new(false, 2);
    let button = FavoriteButton::new(harness.ctx.clone(), Uuid::new_v4(), before);

    let err = button.toggle().await.unwrap_err();
    assert!(matches!(err, ServiceError::AuthenticationRequired));
    assert_eq!(button.view(), before);
    assert_eq!(harness.store_calls(), 0);
}

#[tokio::test]
async fn test_button_load() {
    let harness = TestHarness::single(identity_a());
    let post_id = Uuid::new_v4();
    harness.favorites.seed(Favorite::new(post_id, identity_a().actor_key()));
    harness.favorites.seed(Favorite::new(post_id, identity_b().actor_key()));

    let button = FavoriteButton::new(harness.ctx.clone(), post_id, FavoriteView::default());
    let view = button.load().await.unwrap();
    assert_eq!(view, FavoriteView::new(true, 2));
}

#[tokio::test]
async fn test_button_with_stale_view_reloads_count() {
    let harness = TestHarness::single(identity_a());
    let post_id = Uuid::new_v4();
    // Favorited in another tab; this button never loaded
    harness.favorites.seed(Favorite::new(post_id, identity_a().actor_key()));
    harness.favorites.seed(Favorite::new(post_id, identity_b().actor_key()));
    let button = FavoriteButton::new(harness.ctx.clone(), post_id, FavoriteView::new(false, 0));

    let view = button.toggle().await.unwrap();

    // The store removed A's row; only B's remains
    assert_eq!(view, FavoriteView::new(false, 1));
    assert_eq!(button.view(), view);
    assert_eq!(harness.favorites.rows().len(), 1);
}

#[tokio::test]
async fn test_concurrent_button_toggles_queue() {
    let harness = TestHarness::single(identity_a());
    harness.favorites.set_write_delay(Duration::from_millis(20));
    let post_id = Uuid::new_v4();
    let button = FavoriteButton::new(harness.ctx.clone(), post_id, FavoriteView::new(false, 0));

    let (first, second) = tokio::join!(button.toggle(), button.toggle());

    // The second toggle starts from the first's settled state
    assert_eq!(first.unwrap(), FavoriteView::new(true, 1));
    assert_eq!(second.unwrap(), FavoriteView::new(false, 0));
    assert_eq!(button.view(), FavoriteView::new(false, 0));
    assert!(harness.favorites.rows().is_empty());
}
