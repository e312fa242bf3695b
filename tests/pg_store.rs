//! Constraint mapping against a real Postgres. Each test returns early when
//! `DATABASE_URL` is not set.

use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use time::macros::date;

use finance_tracker::{
    config::AppConfig,
    db::StoreError,
    expenses::repo_types::{ExpenseFields, NewExpense},
    state::AppState,
    users::repo_types::NewUser,
};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_email(prefix: &str) -> String {
    let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}{count}_{timestamp}@test.example.com")
}

async fn pg_state() -> Option<AppState> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let config = AppConfig {
        database_url,
        max_connections: 2,
        ..AppConfig::default()
    };
    Some(AppState::init(config).await.expect("Failed to connect to database"))
}

fn new_user(email: String) -> NewUser {
    NewUser {
        name: Some("A".into()),
        email,
        password_hash: "hash".into(),
        created_at: None,
    }
}

#[tokio::test]
async fn duplicate_email_maps_to_duplicate() {
    let Some(state) = pg_state().await else { return };
    let email = unique_email("dup");

    let user = state.users.insert(new_user(email.clone())).await.expect("first insert");
    let err = state.users.insert(new_user(email)).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate("email")), "got {err:?}");

    state.users.delete_by_id(user.id).await.expect("cleanup");
}

#[tokio::test]
async fn orphan_expense_maps_to_missing_parent() {
    let Some(state) = pg_state().await else { return };

    let err = state
        .expenses
        .insert(NewExpense {
            user_id: -1,
            fields: ExpenseFields {
                amount: Decimal::new(1250, 2),
                category: "food".into(),
                description: "lunch".into(),
                date: date!(2024 - 01 - 05),
            },
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingParent("user")), "got {err:?}");
}

#[tokio::test]
async fn deleting_user_cascades_in_postgres() {
    let Some(state) = pg_state().await else { return };
    let user = state
        .users
        .insert(new_user(unique_email("cascade")))
        .await
        .expect("insert user");
    state
        .expenses
        .insert(NewExpense {
            user_id: user.id,
            fields: ExpenseFields {
                amount: Decimal::new(500, 2),
                category: "food".into(),
                description: "snack".into(),
                date: date!(2024 - 01 - 06),
            },
        })
        .await
        .expect("insert expense");

    assert!(state.users.delete_by_id(user.id).await.expect("delete user"));
    assert!(state.expenses.find_by_user(user.id).await.expect("query").is_empty());
}
