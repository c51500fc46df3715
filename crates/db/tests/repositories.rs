//! Integration tests for the repository layer against a real database:
//! - Dream ownership data and partial updates
//! - Cascade delete of tasks, resources and vision items
//! - Task ordering and completion timestamps
//! - Session expiry and revocation
//! - Unique username constraint

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use dreamboard_core::resources::ResourceType;
use dreamboard_core::tasks::{TaskPriority, TaskStatus};
use dreamboard_core::types::{DbId, Timestamp};
use dreamboard_db::models::dream::{CreateDream, UpdateDream};
use dreamboard_db::models::resource::CreateResource;
use dreamboard_db::models::session::CreateSession;
use dreamboard_db::models::task::{CreateTask, UpdateTask};
use dreamboard_db::models::user::CreateUser;
use dreamboard_db::models::vision_item::CreateVisionItem;
use dreamboard_db::repositories::{
    DreamRepo, ResourceRepo, SessionRepo, TaskRepo, UserRepo, VisionItemRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_dream(pool: &PgPool, user_id: DbId, title: &str) -> DbId {
    DreamRepo::create(
        pool,
        user_id,
        &CreateDream {
            title: title.to_string(),
            description: None,
            cover_image: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_task(
    title: &str,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<Timestamp>,
) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        status: Some(status),
        priority: Some(priority),
        due_date,
    }
}

fn new_resource(title: &str) -> CreateResource {
    CreateResource {
        title: title.to_string(),
        description: None,
        resource_type: ResourceType::Article,
        url: "https://example.com/guide".to_string(),
        is_verified: None,
        is_free: None,
        read_time: Some(5),
        duration: None,
    }
}

fn new_vision_item(url: &str) -> CreateVisionItem {
    CreateVisionItem {
        title: None,
        description: None,
        item_type: None,
        url: url.to_string(),
    }
}

async fn count_for_dream(pool: &PgPool, table: &str, dream_id: DbId) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table} WHERE dream_id = $1"))
        .bind(dream_id)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

// ---------------------------------------------------------------------------
// Dreams
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_dream_gets_initial_advice_fields(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;
    let dream_id = new_dream(&pool, user_id, "Run a marathon").await;

    let dream = DreamRepo::find_by_id(&pool, dream_id).await.unwrap().unwrap();
    assert_eq!(dream.user_id, user_id);
    assert_eq!(dream.next_action.as_deref(), Some(""));
    assert_eq!(dream.ai_confidence, Some(75));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_keeps_untouched_fields(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;
    let dream_id = new_dream(&pool, user_id, "Run a marathon").await;

    let updated = DreamRepo::update(
        &pool,
        dream_id,
        &UpdateDream {
            description: Some(Some("Sub four hours".into())),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "Run a marathon");
    assert_eq!(updated.description.as_deref(), Some("Sub four hours"));
    assert_eq!(updated.user_id, user_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_of_missing_dream_returns_none(pool: PgPool) {
    let result = DreamRepo::update(&pool, 9999, &UpdateDream::default())
        .await
        .unwrap();
    assert!(result.is_none());

    let advice = DreamRepo::update_advice(&pool, 9999, "Go", 50).await.unwrap();
    assert!(advice.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dreams_are_listed_per_user(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    new_dream(&pool, alice, "First").await;
    new_dream(&pool, alice, "Second").await;
    new_dream(&pool, bob, "Other").await;

    let titles: Vec<String> = DreamRepo::list_by_user(&pool, alice)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.title)
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_dream_removes_all_dependents(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;
    let doomed = new_dream(&pool, user_id, "Doomed").await;
    let kept = new_dream(&pool, user_id, "Kept").await;

    for dream_id in [doomed, kept] {
        TaskRepo::create(
            &pool,
            dream_id,
            &new_task("Step", TaskStatus::ToDo, TaskPriority::Medium, None),
        )
        .await
        .unwrap();
        ResourceRepo::create(&pool, dream_id, &new_resource("Guide"))
            .await
            .unwrap();
        VisionItemRepo::create(&pool, dream_id, &new_vision_item("https://img.test/a.png"))
            .await
            .unwrap();
    }

    assert!(DreamRepo::delete(&pool, doomed).await.unwrap());

    assert!(DreamRepo::find_by_id(&pool, doomed).await.unwrap().is_none());
    for table in ["tasks", "resources", "vision_items"] {
        assert_eq!(count_for_dream(&pool, table, doomed).await, 0, "{table}");
        assert_eq!(count_for_dream(&pool, table, kept).await, 1, "{table}");
    }

    assert!(!DreamRepo::delete(&pool, doomed).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_waits_for_in_flight_dependent_insert(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;
    let dream_id = new_dream(&pool, user_id, "Learn piano").await;

    let mut tx = pool.begin().await.unwrap();
    sqlx::query("INSERT INTO tasks (dream_id, title) VALUES ($1, 'Late')")
        .bind(dream_id)
        .execute(&mut *tx)
        .await
        .unwrap();

    let deleting = tokio::spawn({
        let pool = pool.clone();
        async move { DreamRepo::delete(&pool, dream_id).await }
    });
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    tx.commit().await.unwrap();

    assert!(deleting.await.unwrap().unwrap());
    assert_eq!(count_for_dream(&pool, "tasks", dream_id).await, 0);
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_defaults_apply(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;
    let dream_id = new_dream(&pool, user_id, "Learn piano").await;

    let task = TaskRepo::create(
        &pool,
        dream_id,
        &CreateTask {
            title: "Buy keyboard".into(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(task.status, TaskStatus::ToDo);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert!(task.completed_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tasks_list_pending_by_priority_then_due_date_with_done_last(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;
    let dream_id = new_dream(&pool, user_id, "Learn piano").await;
    let soon = Utc::now() + Duration::days(1);
    let later = Utc::now() + Duration::days(10);

    let inputs = [
        new_task("done-high", TaskStatus::Done, TaskPriority::High, Some(soon)),
        new_task("low", TaskStatus::ToDo, TaskPriority::Low, Some(soon)),
        new_task("high-later", TaskStatus::Doing, TaskPriority::High, Some(later)),
        new_task("high-undated", TaskStatus::ToDo, TaskPriority::High, None),
        new_task("high-soon", TaskStatus::ToDo, TaskPriority::High, Some(soon)),
        new_task("medium", TaskStatus::ToDo, TaskPriority::Medium, None),
    ];
    for input in &inputs {
        TaskRepo::create(&pool, dream_id, input).await.unwrap();
    }

    let titles: Vec<String> = TaskRepo::list_by_dream(&pool, dream_id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();

    assert_eq!(
        titles,
        vec!["high-soon", "high-later", "high-undated", "medium", "low", "done-high"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_update_applies_only_given_fields(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;
    let dream_id = new_dream(&pool, user_id, "Learn piano").await;
    let task = TaskRepo::create(
        &pool,
        dream_id,
        &new_task("Scales", TaskStatus::Doing, TaskPriority::High, None),
    )
    .await
    .unwrap();

    let stamp = Utc::now();
    let done = TaskRepo::update(
        &pool,
        task.id,
        &UpdateTask {
            status: Some(TaskStatus::Done),
            ..Default::default()
        },
        Some(stamp),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(done.status, TaskStatus::Done);
    assert_eq!(done.priority, TaskPriority::High);
    assert_eq!(done.title, "Scales");
    assert!(done.completed_at.is_some());

    // Leaving Done with no new stamp keeps the old one.
    let reopened = TaskRepo::update(
        &pool,
        task.id,
        &UpdateTask {
            status: Some(TaskStatus::ToDo),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(reopened.status, TaskStatus::ToDo);
    assert_eq!(reopened.completed_at, done.completed_at);

    let missing = TaskRepo::update(&pool, 9999, &UpdateTask::default(), None)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_update_can_clear_nullable_fields(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;
    let dream_id = new_dream(&pool, user_id, "Learn piano").await;
    let due = Utc::now() + Duration::days(30);
    let task = TaskRepo::create(
        &pool,
        dream_id,
        &CreateTask {
            description: Some("Daily".into()),
            ..new_task("Scales", TaskStatus::ToDo, TaskPriority::Low, Some(due))
        },
    )
    .await
    .unwrap();
    assert!(task.due_date.is_some());

    // Absent fields are kept.
    let renamed = TaskRepo::update(
        &pool,
        task.id,
        &UpdateTask {
            title: Some("Arpeggios".into()),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.description.as_deref(), Some("Daily"));
    assert_eq!(renamed.due_date, task.due_date);

    // Explicit nulls clear them.
    let cleared = TaskRepo::update(
        &pool,
        task.id,
        &UpdateTask {
            description: Some(None),
            due_date: Some(None),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.title, "Arpeggios");
    assert!(cleared.description.is_none());
    assert!(cleared.due_date.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dream_update_can_clear_nullable_fields(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;
    let dream_id = DreamRepo::create(
        &pool,
        user_id,
        &CreateDream {
            title: "Run a marathon".into(),
            description: Some("Sub four hours".into()),
            cover_image: Some("https://img.test/run.png".into()),
        },
    )
    .await
    .unwrap()
    .id;

    let cleared = DreamRepo::update(
        &pool,
        dream_id,
        &UpdateDream {
            description: Some(None),
            cover_image: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(cleared.description.is_none());
    assert!(cleared.cover_image.is_none());
    assert_eq!(cleared.next_action.as_deref(), Some(""));
    assert_eq!(cleared.ai_confidence, Some(75));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_for_missing_dream_is_rejected(pool: PgPool) {
    let result = TaskRepo::create(
        &pool,
        9999,
        &new_task("Orphan", TaskStatus::ToDo, TaskPriority::Low, None),
    )
    .await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

// ---------------------------------------------------------------------------
// Resources and vision items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn resource_and_vision_item_defaults_apply(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;
    let dream_id = new_dream(&pool, user_id, "Learn piano").await;

    let resource = ResourceRepo::create(&pool, dream_id, &new_resource("Guide"))
        .await
        .unwrap();
    assert!(!resource.is_verified);
    assert!(resource.is_free);
    assert_eq!(resource.resource_type, ResourceType::Article);

    let item = VisionItemRepo::create(&pool, dream_id, &new_vision_item("https://img.test/p.png"))
        .await
        .unwrap();
    assert_eq!(item.item_type, "image");

    assert_eq!(ResourceRepo::list_by_dream(&pool, dream_id).await.unwrap().len(), 1);
    assert_eq!(VisionItemRepo::list_by_dream(&pool, dream_id).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Users and sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_violates_unique_constraint(pool: PgPool) {
    new_user(&pool, "taken").await;

    let result = UserRepo::create(
        &pool,
        &CreateUser {
            username: "taken".into(),
            password_hash: "x".into(),
        },
    )
    .await;

    let err = result.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_users_username"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_live_sessions_are_found(pool: PgPool) {
    let user_id = new_user(&pool, "dreamer").await;

    let live = CreateSession {
        user_id,
        token_hash: "live".into(),
        expires_at: Utc::now() + Duration::hours(1),
    };
    let expired = CreateSession {
        user_id,
        token_hash: "expired".into(),
        expires_at: Utc::now() - Duration::hours(1),
    };
    SessionRepo::create(&pool, &live).await.unwrap();
    SessionRepo::create(&pool, &expired).await.unwrap();

    let found = SessionRepo::find_active_by_token_hash(&pool, "live")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.user_id, user_id);
    assert!(SessionRepo::find_active_by_token_hash(&pool, "expired")
        .await
        .unwrap()
        .is_none());

    assert!(SessionRepo::revoke_by_token_hash(&pool, "live").await.unwrap());
    assert!(!SessionRepo::revoke_by_token_hash(&pool, "live").await.unwrap());
    assert!(SessionRepo::find_active_by_token_hash(&pool, "live")
        .await
        .unwrap()
        .is_none());

    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 2);
}
