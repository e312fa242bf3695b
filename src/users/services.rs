use std::collections::HashMap;

use tracing::{info, warn};

use super::{
    dto::{CreateUserRequest, UserSummary, UserView},
    password::hash_password,
    repo_types::{NewUser, User},
};
use crate::{
    db::StoreError,
    error::ApiError,
    expenses::dto::ExpenseView,
    state::AppState,
};

/// Hashes the password and stores the user; a duplicate email surfaces as a conflict.
pub async fn create_user(st: &AppState, req: CreateUserRequest) -> Result<UserSummary, ApiError> {
    let email = req
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::Validation("missing required field `email`".into()))?;
    let password = req
        .password
        .ok_or_else(|| ApiError::Validation("missing required field `password`".into()))?;

    let password_hash = hash_password(&password)?;

    let user = st
        .users
        .insert(NewUser {
            name: req.name,
            email,
            password_hash,
            created_at: req.created_at,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => {
                warn!("email already registered");
                ApiError::Conflict("email already registered".into())
            }
            other => other.into(),
        })?;

    info!(user_id = user.id, "user created");
    Ok(user.into())
}

pub async fn get_all_users(st: &AppState) -> Result<Vec<UserView>, ApiError> {
    let users = st.users.find_all().await?;
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    let mut owned: HashMap<i64, Vec<ExpenseView>> = HashMap::new();
    for expense in st.expenses.find_by_users(&ids).await? {
        owned
            .entry(expense.user_id)
            .or_default()
            .push(expense.into());
    }
    Ok(users
        .into_iter()
        .map(|u| {
            let expenses = owned.remove(&u.id).unwrap_or_default();
            UserView {
                user: u.into(),
                expenses,
            }
        })
        .collect())
}

pub async fn get_user_by_id(st: &AppState, id: i64) -> Result<UserView, ApiError> {
    match st.users.find_by_id(id).await? {
        Some(user) => with_expenses(st, user).await,
        None => Err(ApiError::NotFound(format!("user {id} not found"))),
    }
}

pub async fn get_user_by_email(st: &AppState, email: &str) -> Result<UserView, ApiError> {
    match st.users.find_by_email(email.trim()).await? {
        Some(user) => with_expenses(st, user).await,
        None => Err(ApiError::NotFound(format!("no user with email {email}"))),
    }
}

pub async fn delete_user(st: &AppState, id: i64) -> Result<(), ApiError> {
    if st.users.delete_by_id(id).await? {
        info!(user_id = id, "user deleted");
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("user {id} not found")))
    }
}

pub async fn delete_all_users(st: &AppState) -> Result<u64, ApiError> {
    let removed = st.users.delete_all().await?;
    info!(removed, "all users deleted");
    Ok(removed)
}

async fn with_expenses(st: &AppState, user: User) -> Result<UserView, ApiError> {
    let expenses = st
        .expenses
        .find_by_user(user.id)
        .await?
        .into_iter()
        .map(ExpenseView::from)
        .collect();
    Ok(UserView {
        user: user.into(),
        expenses,
    })
}
