//! Reaction toggle engine scenarios
//!
//! Run with: cargo test -p integration-tests --test reaction_tests

use std::collections::BTreeSet;
use std::time::Duration;

use curio_core::{DomainError, ReactionKind, ReactionTally};
use curio_service::{ReactionBoard, ReactionService, ReactionState, ServiceError, Transition};
use integration_tests::{identity_a, identity_b, image_target, post_target, TestHarness};

// ============================================================================
// Single-reaction policy
// ============================================================================

#[tokio::test]
async fn test_like_twice_scenario() {
    let harness = TestHarness::single(identity_a());
    let service = ReactionService::new(&harness.ctx);
    let post = post_target();

    let first = service.select(&post, ReactionKind::Like).await.unwrap();
    assert_eq!(first, Transition::Added { kind: ReactionKind::Like });

    let rows = harness.reactions.rows_for(&post);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].actor, identity_a().actor_key());
    assert_eq!(rows[0].kind, ReactionKind::Like);

    let counts = service.counts(&post).await;
    assert_eq!(counts.count(ReactionKind::Like), 1);
    assert_eq!(counts.total(), 1);

    let second = service.select(&post, ReactionKind::Like).await.unwrap();
    assert_eq!(second, Transition::Removed { kind: ReactionKind::Like });

    assert!(harness.reactions.rows_for(&post).is_empty());
    let counts = service.counts(&post).await;
    assert!(counts.is_empty());
    assert!(counts.counts_by_kind().is_empty());
}

#[tokio::test]
async fn test_odd_and_even_selections() {
    for times in 1..=6 {
        let harness = TestHarness::single(identity_a());
        let service = ReactionService::new(&harness.ctx);
        let post = post_target();

        for _ in 0..times {
            service.select(&post, ReactionKind::Scared).await.unwrap();
        }

        let state = service.state(&post).await.unwrap();
        if times % 2 == 1 {
            assert_eq!(state, ReactionState::ReactedAs(ReactionKind::Scared), "times = {times}");
        } else {
            assert_eq!(state, ReactionState::Unreacted, "times = {times}");
        }
    }
}

#[tokio::test]
async fn test_changing_kind_updates_row_in_place() {
    let harness = TestHarness::single(identity_a());
    let service = ReactionService::new(&harness.ctx);
    let post = post_target();

    service.select(&post, ReactionKind::Like).await.unwrap();
    let original_id = harness.reactions.rows_for(&post)[0].id;

    let transition = service.select(&post, ReactionKind::Skeptical).await.unwrap();
    assert_eq!(
        transition,
        Transition::Changed {
            from: ReactionKind::Like,
            to: ReactionKind::Skeptical
        }
    );

    let rows = harness.reactions.rows_for(&post);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, original_id);
    assert_eq!(rows[0].kind, ReactionKind::Skeptical);
    assert_eq!(
        service.state(&post).await.unwrap(),
        ReactionState::ReactedAs(ReactionKind::Skeptical)
    );
}

#[tokio::test]
async fn test_insert_then_find_own_round_trip() {
    let harness = TestHarness::single(identity_a());
    let service = ReactionService::new(&harness.ctx);
    let image = image_target();

    service.select(&image, ReactionKind::Love).await.unwrap();

    let own = harness
        .ctx
        .reaction_repo()
        .find_own(&identity_a().actor_key(), &image, None)
        .await
        .unwrap()
        .expect("own reaction");
    assert_eq!(own.kind, ReactionKind::Love);
    assert_eq!(own.target, image);
}

// ============================================================================
// Multi-reaction policy
// ============================================================================

#[tokio::test]
async fn test_multi_like_and_love() {
    let harness = TestHarness::multiple(identity_a());
    let service = ReactionService::new(&harness.ctx);
    let post = post_target();

    service.select(&post, ReactionKind::Like).await.unwrap();
    service.select(&post, ReactionKind::Love).await.unwrap();

    assert_eq!(harness.reactions.rows_for(&post).len(), 2);

    let snapshot = service.snapshot(&post).await;
    assert_eq!(snapshot.count(ReactionKind::Like), 1);
    assert_eq!(snapshot.count(ReactionKind::Love), 1);
    assert_eq!(snapshot.total(), 2);
    assert_eq!(
        snapshot.mine,
        BTreeSet::from([ReactionKind::Like, ReactionKind::Love])
    );

    let state = service.state(&post).await.unwrap();
    assert_eq!(
        state,
        ReactionState::ReactedWith(BTreeSet::from([ReactionKind::Like, ReactionKind::Love]))
    );
}

#[tokio::test]
async fn test_multi_kinds_toggle_independently() {
    let harness = TestHarness::multiple(identity_a());
    let service = ReactionService::new(&harness.ctx);
    let post = post_target();

    for _ in 0..3 {
        service.select(&post, ReactionKind::Laugh).await.unwrap();
    }
    for _ in 0..2 {
        service.select(&post, ReactionKind::Scared).await.unwrap();
    }

    let state = service.state(&post).await.unwrap();
    assert!(state.has(ReactionKind::Laugh));
    assert!(!state.has(ReactionKind::Scared));
    assert_eq!(harness.reactions.rows_for(&post).len(), 1);
}

// ============================================================================
// Multiple identities
// ============================================================================

#[tokio::test]
async fn test_two_identities_laugh_on_image() {
    let harness = TestHarness::single(identity_a());
    let image = image_target();
    let client_b = harness.client_as(identity_b());

    ReactionService::new(&harness.ctx)
        .select(&image, ReactionKind::Laugh)
        .await
        .unwrap();
    ReactionService::new(&client_b)
        .select(&image, ReactionKind::Laugh)
        .await
        .unwrap();

    let counts = ReactionService::new(&harness.ctx).counts(&image).await;
    assert_eq!(counts.count(ReactionKind::Laugh), 2);
    assert_eq!(counts.total(), 2);

    let repo = harness.ctx.reaction_repo();
    let own_a = repo
        .find_own(&identity_a().actor_key(), &image, None)
        .await
        .unwrap()
        .unwrap();
    let own_b = repo
        .find_own(&identity_b().actor_key(), &image, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(own_a.actor, identity_a().actor_key());
    assert_eq!(own_b.actor, identity_b().actor_key());
    assert_ne!(own_a.id, own_b.id);

    let reactors = ReactionService::new(&harness.ctx)
        .reactors(&image, ReactionKind::Laugh, 0)
        .await
        .unwrap();
    assert_eq!(reactors, vec![identity_a().actor_key()]);
}

#[tokio::test]
async fn test_snapshot_marks_only_own_kinds() {
    let harness = TestHarness::single(identity_a());
    let post = post_target();
    let client_b = harness.client_as(identity_b());

    ReactionService::new(&harness.ctx)
        .select(&post, ReactionKind::Like)
        .await
        .unwrap();
    ReactionService::new(&client_b)
        .select(&post, ReactionKind::Love)
        .await
        .unwrap();

    let snapshot = ReactionService::new(&harness.ctx).snapshot(&post).await;
    let counts = snapshot.counts();
    assert_eq!(counts.len(), 2);
    assert!(counts.iter().any(|c| c.kind == ReactionKind::Like && c.me));
    assert!(counts.iter().any(|c| c.kind == ReactionKind::Love && !c.me));
}

// ============================================================================
// Aggregation
// ============================================================================

#[tokio::test]
async fn test_aggregation_is_repeatable() {
    let harness = TestHarness::multiple(identity_a());
    let post = post_target();
    ReactionService::new(&harness.ctx)
        .select(&post, ReactionKind::Like)
        .await
        .unwrap();
    ReactionService::new(&harness.client_as(identity_b()))
        .select(&post, ReactionKind::Like)
        .await
        .unwrap();

    let rows = harness.reactions.rows_for(&post);
    let first = ReactionTally::from_rows(&rows);
    let second = ReactionTally::from_rows(&rows);
    assert_eq!(first, second);
    assert_eq!(first.count(ReactionKind::Like), 2);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_missing_identity_fails_before_store() {
    let harness = TestHarness::new(curio_core::ReactionPolicy::single(), None);
    let post = post_target();

    let err = ReactionService::new(&harness.ctx)
        .select(&post, ReactionKind::Like)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::AuthenticationRequired));
    assert_eq!(harness.store_calls(), 0);
}

#[tokio::test]
async fn test_snapshot_degrades_on_read_failure() {
    let harness = TestHarness::single(identity_a());
    let post = post_target();
    harness.reactions.fail_reads(true);

    let snapshot = ReactionService::new(&harness.ctx).snapshot(&post).await;
    assert!(snapshot.degraded);
    assert_eq!(snapshot.total(), 0);

    let counts = ReactionService::new(&harness.ctx).counts(&post).await;
    assert!(counts.is_empty());
}

#[tokio::test]
async fn test_board_reloads_after_failed_write() {
    let harness = TestHarness::single(identity_a());
    let post = post_target();
    let client_b = harness.client_as(identity_b());
    ReactionService::new(&client_b)
        .select(&post, ReactionKind::Love)
        .await
        .unwrap();

    let board = ReactionBoard::new(harness.ctx.clone(), post.clone());
    assert_eq!(board.view().total(), 0);

    harness.reactions.fail_writes(true);
    let err = board.select(ReactionKind::Like).await.unwrap_err();
    assert!(matches!(err, ServiceError::Domain(_)));
    assert_eq!(err.alert_message(), "Something went wrong. Please try again.");

    // The reload after the failed attempt shows store truth
    let view = board.view();
    assert_eq!(view.count(ReactionKind::Love), 1);
    assert_eq!(view.count(ReactionKind::Like), 0);
    assert!(view.mine.is_empty());
}

#[tokio::test]
async fn test_board_reflects_successful_select() {
    let harness = TestHarness::single(identity_a());
    let board = ReactionBoard::new(harness.ctx.clone(), image_target());

    board.select(ReactionKind::Scared).await.unwrap();
    let view = board.view();
    assert_eq!(view.count(ReactionKind::Scared), 1);
    assert!(view.is_mine(ReactionKind::Scared));

    board.select(ReactionKind::Scared).await.unwrap();
    assert_eq!(board.view().total(), 0);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_selects_serialize() {
    let harness = TestHarness::single(identity_a());
    harness.reactions.set_write_delay(Duration::from_millis(20));
    let post = post_target();
    let service = ReactionService::new(&harness.ctx);

    let (first, second) = tokio::join!(
        service.select(&post, ReactionKind::Like),
        service.select(&post, ReactionKind::Like)
    );

    // One added, the other saw that row and removed it
    let mut transitions = vec![first.unwrap(), second.unwrap()];
    transitions.sort_by_key(|t| matches!(t, Transition::Removed { .. }));
    assert_eq!(
        transitions,
        vec![
            Transition::Added { kind: ReactionKind::Like },
            Transition::Removed { kind: ReactionKind::Like }
        ]
    );
    assert!(harness.reactions.rows_for(&post).is_empty());
    assert!(harness.ctx.locks().is_empty());
}

#[tokio::test]
async fn test_single_policy_one_row_across_clients() {
    // Two clients signed in as A, each with its own lock table
    let harness = TestHarness::single(identity_a());
    harness.reactions.set_write_delay(Duration::from_millis(20));
    let other_client = harness.client_as(identity_a());
    let post = post_target();

    let here = ReactionService::new(&harness.ctx);
    let there = ReactionService::new(&other_client);
    let (like, love) = tokio::join!(
        here.select(&post, ReactionKind::Like),
        there.select(&post, ReactionKind::Love)
    );

    let (won, lost) = match (like, love) {
        (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
        other => panic!("exactly one select should win, got {other:?}"),
    };
    assert!(matches!(
        lost,
        ServiceError::Domain(DomainError::ReactionAlreadyExists)
    ));
    assert_eq!(lost.error_code(), "REACTION_ALREADY_EXISTS");

    let rows = harness.reactions.rows_for(&post);
    assert_eq!(rows.len(), 1);
    let Transition::Added { kind } = won else {
        panic!("expected an insert, got {won:?}");
    };
    assert_eq!(rows[0].kind, kind);
    assert_eq!(here.state(&post).await.unwrap(), ReactionState::ReactedAs(kind));
}

#[tokio::test]
async fn test_multiple_policy_kinds_coexist_across_clients() {
    let harness = TestHarness::multiple(identity_a());
    harness.reactions.set_write_delay(Duration::from_millis(20));
    let other_client = harness.client_as(identity_a());
    let post = post_target();

    let here = ReactionService::new(&harness.ctx);
    let there = ReactionService::new(&other_client);
    let (like, love) = tokio::join!(
        here.select(&post, ReactionKind::Like),
        there.select(&post, ReactionKind::Love)
    );

    assert_eq!(like.unwrap(), Transition::Added { kind: ReactionKind::Like });
    assert_eq!(love.unwrap(), Transition::Added { kind: ReactionKind::Love });
    assert_eq!(
        here.state(&post).await.unwrap(),
        ReactionState::ReactedWith(BTreeSet::from([ReactionKind::Like, ReactionKind::Love]))
    );
}
