//! Identity resolution scenarios
//!
//! Run with: cargo test -p integration-tests --test identity_tests

use std::sync::Arc;

use curio_common::SessionTokenVerifier;
use curio_core::traits::{IdentityProvider, TokenStore};
use curio_core::{Identity, ReactionKind, ReactionPolicy};
use curio_db::FileTokenStore;
use curio_service::{
    AnonymousIdentityProvider, ReactionService, ServiceError, SessionIdentityProvider,
};
use integration_tests::{
    context_builder, post_target, MemoryFavoriteRepository, MemoryReactionRepository,
    MemoryTokenStore, StaticSessionSource,
};

const TOKEN_KEY: &str = "curio_user_identifier";
const SECRET: &str = "integration-test-secret-with-enough-bytes";

fn verifier() -> SessionTokenVerifier {
    SessionTokenVerifier::new(SECRET, "authenticated")
}

// ============================================================================
// Anonymous
// ============================================================================

#[tokio::test]
async fn test_anonymous_token_created_once() {
    let store = Arc::new(MemoryTokenStore::new());
    let provider = AnonymousIdentityProvider::new(store.clone(), TOKEN_KEY);
    assert!(provider.current().is_none());

    provider.initialize().await.unwrap();
    let first = provider.resolve().await.unwrap().expect("identity");
    let second = provider.resolve().await.unwrap().expect("identity");

    assert_eq!(first, second);
    assert!(first.is_anonymous());
    assert_eq!(store.writes(), 1);
    assert_eq!(store.value(TOKEN_KEY), Some(first.actor_key().into_inner()));
    assert_eq!(provider.current(), Some(&first));

    let token = first.actor_key().into_inner();
    let parts: Vec<&str> = token.split('_').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "anon");
    assert_eq!(parts[2].len(), 9);
}

#[tokio::test]
async fn test_anonymous_token_reused_from_storage() {
    let store = Arc::new(MemoryTokenStore::with_value(TOKEN_KEY, "anon_existing_123456789"));
    let provider = AnonymousIdentityProvider::new(store.clone(), TOKEN_KEY);

    let identity = provider.resolve().await.unwrap();
    assert_eq!(
        identity,
        Some(Identity::Anonymous("anon_existing_123456789".to_string()))
    );
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_concurrent_first_resolve_writes_once() {
    let store = Arc::new(MemoryTokenStore::new());
    let provider = AnonymousIdentityProvider::new(store.clone(), TOKEN_KEY);

    let results = futures::future::join_all((0..8).map(|_| provider.resolve())).await;
    let identities: Vec<Identity> = results
        .into_iter()
        .map(|r| r.unwrap().expect("identity"))
        .collect();

    assert!(identities.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(store.writes(), 1);
}

#[tokio::test]
async fn test_anonymous_token_persists_in_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("client-storage.json");

    let first = AnonymousIdentityProvider::new(Arc::new(FileTokenStore::new(&path)), TOKEN_KEY)
        .resolve()
        .await
        .unwrap();

    // A new session over the same storage sees the same actor
    let store = Arc::new(FileTokenStore::new(&path));
    let second = AnonymousIdentityProvider::new(store.clone(), TOKEN_KEY)
        .resolve()
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        store.get(TOKEN_KEY).await.unwrap(),
        first.map(|i| i.actor_key().into_inner())
    );
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_session_resolves_account() {
    let token = verifier().issue("b0c6a6c2-account", 3600).unwrap();
    let source = Arc::new(StaticSessionSource::new(Some(token)));
    let provider = SessionIdentityProvider::new(source, verifier());

    provider.initialize().await.unwrap();
    let identity = provider.resolve().await.unwrap();
    assert_eq!(identity, Some(Identity::Account("b0c6a6c2-account".to_string())));
}

#[tokio::test]
async fn test_session_is_not_cached() {
    let source = Arc::new(StaticSessionSource::new(None));
    let provider = SessionIdentityProvider::new(source.clone(), verifier());
    assert_eq!(provider.resolve().await.unwrap(), None);

    source.sign_in(verifier().issue("account-1", 3600).unwrap());
    assert!(provider.resolve().await.unwrap().is_some());

    source.sign_out();
    assert_eq!(provider.resolve().await.unwrap(), None);
}

#[tokio::test]
async fn test_session_rejects_bad_tokens() {
    let expired = verifier().issue("account-1", -3600).unwrap();
    let foreign = SessionTokenVerifier::new("some-other-secret-value", "authenticated")
        .issue("account-1", 3600)
        .unwrap();

    for token in [expired, foreign, "garbage".to_string()] {
        let provider =
            SessionIdentityProvider::new(Arc::new(StaticSessionSource::new(Some(token))), verifier());
        assert_eq!(provider.resolve().await.unwrap(), None);
    }
}

#[tokio::test]
async fn test_signed_out_reaction_requires_authentication() {
    let reactions = Arc::new(MemoryReactionRepository::new());
    let provider = SessionIdentityProvider::new(Arc::new(StaticSessionSource::new(None)), verifier());

    let ctx = context_builder()
        .reaction_repo(reactions.clone())
        .favorite_repo(Arc::new(MemoryFavoriteRepository::new()))
        .identity(Arc::new(provider))
        .policy(ReactionPolicy::single())
        .build()
        .unwrap();

    let err = ReactionService::new(&ctx)
        .select(&post_target(), ReactionKind::Like)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::AuthenticationRequired));
    assert_eq!(reactions.calls(), 0);
}

#[test]
fn test_builder_requires_dependencies() {
    let err = context_builder()
        .reaction_repo(Arc::new(MemoryReactionRepository::new()))
        .build()
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}
