use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{parse_date, ExpensePayload, ExpenseView},
    services,
};
use crate::{error::ApiError, state::AppState};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/api/expenses", post(add_expense))
        .route("/api/expenses/:id", put(update_expense).delete(delete_expense))
        .route("/api/expenses/user/:user_id", get(list_expenses))
        .route("/api/expenses/user/:user_id/date/:date", get(list_expenses_by_date))
}

#[instrument(skip(state, payload))]
pub async fn add_expense(
    State(state): State<AppState>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ApiError> {
    let Json(payload) = payload?;
    let expense = services::add_expense(&state, &payload).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<ExpenseView>>, ApiError> {
    let Path(user_id) = user_id?;
    let expenses = services::get_expenses_by_user(&state, user_id).await?;
    Ok(Json(expenses))
}

#[instrument(skip(state))]
pub async fn list_expenses_by_date(
    State(state): State<AppState>,
    params: Result<Path<(i64, String)>, PathRejection>,
) -> Result<Json<Vec<ExpenseView>>, ApiError> {
    let Path((user_id, raw_date)) = params?;
    let date = parse_date(&raw_date, "date").map_err(|e| ApiError::Validation(e.to_string()))?;
    let expenses = services::get_expenses_by_date(&state, user_id, date).await?;
    Ok(Json(expenses))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Json<ExpenseView>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let expense = services::update_expense(&state, id, &payload).await?;
    Ok(Json(expense))
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    services::delete_expense(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
