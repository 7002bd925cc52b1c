//! Store tests against a real Postgres server.
//!
//! Each test creates its own migrated database from `DATABASE_URL`. Run with
//! `cargo test --test postgres_repository_tests -- --ignored`.

mod common;

use account_service::account::errors::AccountError;
use account_service::account::models::AccountChanges;
use account_service::account::models::AccountId;
use account_service::account::models::AccountName;
use account_service::account::models::EmailAddress;
use account_service::account::models::NewAccount;
use account_service::account::models::PageRequest;
use account_service::account::ports::AccountRepository;
use account_service::repositories::PostgresAccountRepository;
use common::TestDb;

fn new_account(name: &str, email: &str) -> NewAccount {
    NewAccount {
        name: AccountName::new(name.to_string()).unwrap(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_create_and_find() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    let alice = repository
        .create(new_account("Alice", "alice@example.com"))
        .await
        .expect("Failed to create account");
    assert!(alice.id.0 > 0);
    assert_eq!(alice.name.as_str(), "Alice");

    let by_id = repository.find_by_id(&alice.id).await.unwrap();
    assert_eq!(by_id.as_ref().map(|a| a.email.as_str()), Some("alice@example.com"));

    let by_email = repository.find_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.map(|a| a.id), Some(alice.id));

    assert!(repository.find_by_email("bob@example.com").await.unwrap().is_none());
    assert!(repository.find_by_id(&AccountId(9999)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_create_duplicate_email() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    repository
        .create(new_account("Alice", "alice@example.com"))
        .await
        .unwrap();

    let result = repository
        .create(new_account("Another Alice", "alice@example.com"))
        .await;
    assert!(matches!(result, Err(AccountError::DuplicateEmail(ref email)) if email == "alice@example.com"));

    assert_eq!(repository.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_update_applies_only_given_fields() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    let alice = repository
        .create(new_account("Alice", "alice@example.com"))
        .await
        .unwrap();

    let updated = repository
        .update(
            &alice.id,
            AccountChanges {
                name: Some(AccountName::new("Alicia".to_string()).unwrap()),
                password_hash: Some("new-hash".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update account");

    assert_eq!(updated.id, alice.id);
    assert_eq!(updated.name.as_str(), "Alicia");
    assert_eq!(updated.email.as_str(), "alice@example.com");
    assert_eq!(updated.password_hash, "new-hash");
    assert_eq!(updated.created_at, alice.created_at);
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_update_to_taken_email() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    let alice = repository
        .create(new_account("Alice", "alice@example.com"))
        .await
        .unwrap();
    repository
        .create(new_account("Bob", "bob@example.com"))
        .await
        .unwrap();

    let result = repository
        .update(
            &alice.id,
            AccountChanges {
                email: Some(EmailAddress::new("bob@example.com".to_string()).unwrap()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AccountError::DuplicateEmail(ref email)) if email == "bob@example.com"));

    let unchanged = repository.find_by_id(&alice.id).await.unwrap().unwrap();
    assert_eq!(unchanged.email.as_str(), "alice@example.com");
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_update_and_delete_missing_account() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    let missing = AccountId(424242);

    let update = repository
        .update(
            &missing,
            AccountChanges {
                name: Some(AccountName::new("Nobody".to_string()).unwrap()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(AccountError::NotFound(_))));

    let delete = repository.delete(&missing).await;
    assert!(matches!(delete, Err(AccountError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_delete_removes_account() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    let alice = repository
        .create(new_account("Alice", "alice@example.com"))
        .await
        .unwrap();

    repository.delete(&alice.id).await.expect("Failed to delete account");

    assert!(repository.find_by_id(&alice.id).await.unwrap().is_none());
    assert!(matches!(
        repository.delete(&alice.id).await,
        Err(AccountError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires Postgres at DATABASE_URL"]
async fn test_list_and_paginate_in_id_order() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    let mut ids = Vec::new();
    for i in 1..=25 {
        let account = repository
            .create(new_account(&format!("User {i}"), &format!("user{i}@example.com")))
            .await
            .unwrap();
        ids.push(account.id);
    }

    let all = repository.list_all().await.unwrap();
    assert_eq!(all.iter().map(|a| a.id).collect::<Vec<_>>(), ids);

    let second = repository
        .paginate(PageRequest::new(2, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(second.iter().map(|a| a.id).collect::<Vec<_>>(), ids[10..20]);

    let last = repository
        .paginate(PageRequest::new(3, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(last.iter().map(|a| a.id).collect::<Vec<_>>(), ids[20..]);

    let beyond = repository
        .paginate(PageRequest::new(4, 10).unwrap())
        .await
        .unwrap();
    assert!(beyond.is_empty());
}
