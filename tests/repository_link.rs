mod common;

use chrono::{Duration, Utc};
use std::sync::Arc;

use linkgate::domain::entities::{Link, LinkFilter};
use linkgate::domain::repositories::LinkRepository;
use linkgate::error::AppError;
use linkgate::infrastructure::persistence::SqliteLinkRepository;

async fn repo() -> SqliteLinkRepository {
    SqliteLinkRepository::new(Arc::new(common::test_pool().await))
}

#[tokio::test]
async fn test_create_and_find() {
    let repo = repo().await;
    let expires_at = Utc::now() + Duration::hours(2);

    let mut link = common::link("abc", &["https://a.test", "https://b.test"], "alice");
    link.expires_at = Some(expires_at);
    repo.create(&link).await.unwrap();

    let found = repo.find("abc").await.unwrap().unwrap();

    assert_eq!(found.alias, "abc");
    assert_eq!(found.targets, vec!["https://a.test", "https://b.test"]);
    assert!(found.multi);
    assert_eq!(found.owner, "alice");
    assert_eq!(found.click_count, 0);
    assert_eq!(found.expires_at, Some(expires_at));
}

#[tokio::test]
async fn test_find_missing() {
    let repo = repo().await;
    assert!(repo.find("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_duplicate_alias_conflicts() {
    let repo = repo().await;

    repo.create(&common::link("dup", &["https://a.test"], "alice"))
        .await
        .unwrap();

    let result = repo
        .create(&common::link("dup", &["https://b.test"], "bob"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));

    // The original record is untouched.
    let stored = repo.find("dup").await.unwrap().unwrap();
    assert_eq!(stored.owner, "alice");
}

#[tokio::test]
async fn test_list_newest_first_and_filtered() {
    let repo = repo().await;

    for (alias, owner) in [("first", "alice"), ("second", "bob"), ("third", "alice")] {
        repo.create(&common::link(alias, &["https://a.test"], owner))
            .await
            .unwrap();
    }

    let all: Vec<String> = repo
        .list(LinkFilter::All)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.alias)
        .collect();
    assert_eq!(all, vec!["third", "second", "first"]);

    let alice: Vec<String> = repo
        .list(LinkFilter::OwnedBy("alice".to_string()))
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.alias)
        .collect();
    assert_eq!(alice, vec!["third", "first"]);

    assert!(
        repo.list(LinkFilter::OwnedBy("carol".to_string()))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_update_never_lowers_click_count() {
    let repo = repo().await;
    let link = common::link("clicks", &["https://a.test"], "alice");
    repo.create(&link).await.unwrap();

    let mut ahead = link.clone();
    ahead.click_count = 7;
    repo.update(&ahead).await.unwrap();

    let mut stale = link.clone();
    stale.click_count = 3;
    repo.update(&stale).await.unwrap();

    assert_eq!(repo.find("clicks").await.unwrap().unwrap().click_count, 7);
}

#[tokio::test]
async fn test_update_rewrites_fields() {
    let repo = repo().await;
    let link = common::link("edit", &["https://a.test"], "alice");
    repo.create(&link).await.unwrap();

    let updated = Link {
        targets: vec!["https://b.test".to_string(), "https://c.test".to_string()],
        multi: true,
        click_count: 1,
        ..link
    };
    repo.update(&updated).await.unwrap();

    let stored = repo.find("edit").await.unwrap().unwrap();
    assert_eq!(stored.targets, updated.targets);
    assert!(stored.multi);
    assert_eq!(stored.click_count, 1);
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let repo = repo().await;
    let result = repo
        .update(&common::link("ghost", &["https://a.test"], "alice"))
        .await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete() {
    let repo = repo().await;
    repo.create(&common::link("gone", &["https://a.test"], "alice"))
        .await
        .unwrap();

    repo.delete("gone").await.unwrap();

    assert!(repo.find("gone").await.unwrap().is_none());
    assert!(matches!(
        repo.delete("gone").await,
        Err(AppError::NotFound { .. })
    ));
}
