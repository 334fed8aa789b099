//! Exercises `PgStore` against a live database.
//!
//! Run with `DATABASE_URL` pointing at a scratch database:
//! `cargo test --test postgres -- --ignored`

use dotenv::dotenv;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use taskguard::models::{NewUser, Role, TaskChanges, TaskInput, TaskStatus, User};
use taskguard::policy::TaskScope;
use taskguard::store::{PgStore, TaskRepository, UserRepository};
use taskguard::AppError;

async fn connect() -> PgStore {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let store = PgStore::connect(&database_url, 2)
        .await
        .expect("Failed to connect to test DB");
    store.migrate().await.expect("Failed to run migrations");
    store
}

async fn seed_user(store: &PgStore, name: &str, role: Role) -> User {
    // Unique per run so the suite can share a database.
    let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4());
    store
        .insert(NewUser {
            name: name.into(),
            email,
            password_hash: "not-a-real-hash".into(),
            role,
        })
        .await
        .expect("user is inserted")
}

fn input(title: &str) -> TaskInput {
    TaskInput {
        title: title.into(),
        description: None,
        status: None,
    }
}

#[actix_rt::test]
#[ignore = "needs DATABASE_URL"]
async fn test_duplicate_email_maps_to_email_taken() {
    let store = connect().await;
    let user = seed_user(&store, "Dup", Role::User).await;

    let err = store
        .insert(NewUser {
            name: "Again".into(),
            email: user.email.clone(),
            password_hash: "x".into(),
            role: Role::User,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmailTaken));

    store.delete(user.id).await.expect("cleanup");
}

#[actix_rt::test]
#[ignore = "needs DATABASE_URL"]
async fn test_scoped_queries_hide_foreign_tasks() {
    let store = connect().await;
    let alice = seed_user(&store, "Alice", Role::User).await;
    let bob = seed_user(&store, "Bob", Role::User).await;

    let task = store.create(input("private"), alice.id).await.unwrap();
    assert_eq!(task.status, TaskStatus::Pending);

    let bob_scope = TaskScope::OwnedBy(bob.id);
    assert!(store.get_visible(task.id, bob_scope).await.unwrap().is_none());
    assert!(store.list_visible(bob_scope).await.unwrap().is_empty());

    let changes = TaskChanges {
        title: Some("hijacked".into()),
        ..TaskChanges::default()
    };
    assert!(store
        .update_visible(task.id, &changes, bob_scope)
        .await
        .unwrap()
        .is_none());
    assert!(!store.delete_visible(task.id, bob_scope).await.unwrap());

    let view = store
        .get_visible(task.id, TaskScope::All)
        .await
        .unwrap()
        .expect("unscoped read sees the task");
    assert_eq!(view.task.title, "private");
    assert_eq!(view.owner_name.as_deref(), Some("Alice"));

    let own = store
        .get_visible(task.id, TaskScope::OwnedBy(alice.id))
        .await
        .unwrap()
        .expect("owner sees the task");
    assert_eq!(own.owner_name, None);

    store.delete(alice.id).await.unwrap();
    store.delete(bob.id).await.unwrap();
}

#[actix_rt::test]
#[ignore = "needs DATABASE_URL"]
async fn test_update_advances_timestamp_and_delete_cascades() {
    let store = connect().await;
    let owner = seed_user(&store, "Owner", Role::User).await;
    let task = store.create(input("draft"), owner.id).await.unwrap();

    let changes = TaskChanges {
        status: Some(TaskStatus::Completed),
        ..TaskChanges::default()
    };
    let updated = store
        .update_visible(task.id, &changes, TaskScope::OwnedBy(owner.id))
        .await
        .unwrap()
        .expect("owner may update");
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.title, "draft");
    assert!(updated.updated_at > task.updated_at);

    assert!(store.delete(owner.id).await.unwrap());
    assert!(store
        .get_visible(task.id, TaskScope::All)
        .await
        .unwrap()
        .is_none());

    let err = store.create(input("ghost"), owner.id).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}
