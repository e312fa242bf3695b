use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateUserRequest, UserSummary, UserView},
    services,
};
use crate::{error::ApiError, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users",
            get(list_users).post(create_user).delete(delete_all_users),
        )
        .route("/api/users/:id", get(get_user))
        .route("/api/users/email/:email", get(get_user_by_email))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<UserSummary>, ApiError> {
    let Json(payload) = payload?;
    let user = services::create_user(&state, payload).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, ApiError> {
    Ok(Json(services::get_all_users(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserView>, ApiError> {
    let Path(id) = id?;
    Ok(Json(services::get_user_by_id(&state, id).await?))
}

#[instrument(skip(state))]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    email: Result<Path<String>, PathRejection>,
) -> Result<Json<UserView>, ApiError> {
    let Path(email) = email?;
    Ok(Json(services::get_user_by_email(&state, &email).await?))
}

#[instrument(skip(state))]
pub async fn delete_all_users(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    services::delete_all_users(&state).await?;
    Ok("All users deleted successfully")
}
