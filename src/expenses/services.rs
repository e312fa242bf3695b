use time::Date;
use tracing::{info, warn};

use super::dto::{ExpensePayload, ExpenseView};
use crate::{error::ApiError, state::AppState};

pub async fn add_expense(st: &AppState, payload: &ExpensePayload) -> Result<ExpenseView, ApiError> {
    let new = payload
        .new_expense()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let user_id = new.user_id;
    let expense = st.expenses.insert(new).await.map_err(|e| {
        warn!(error = %e, %user_id, "insert expense failed");
        ApiError::from(e)
    })?;
    info!(expense_id = expense.id, %user_id, "expense created");
    Ok(expense.into())
}

pub async fn get_expenses_by_user(st: &AppState, user_id: i64) -> Result<Vec<ExpenseView>, ApiError> {
    let rows = st.expenses.find_by_user(user_id).await?;
    Ok(rows.into_iter().map(ExpenseView::from).collect())
}

pub async fn get_expenses_by_date(
    st: &AppState,
    user_id: i64,
    date: Date,
) -> Result<Vec<ExpenseView>, ApiError> {
    let rows = st.expenses.find_by_user_and_date(user_id, date).await?;
    Ok(rows.into_iter().map(ExpenseView::from).collect())
}

pub async fn update_expense(
    st: &AppState,
    id: i64,
    payload: &ExpensePayload,
) -> Result<ExpenseView, ApiError> {
    let fields = payload
        .fields()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    match st.expenses.update(id, fields).await? {
        Some(expense) => {
            info!(expense_id = id, "expense updated");
            Ok(expense.into())
        }
        None => {
            warn!(expense_id = id, "update of unknown expense");
            Err(ApiError::NotFound(format!("expense {id} not found")))
        }
    }
}

pub async fn delete_expense(st: &AppState, id: i64) -> Result<(), ApiError> {
    if st.expenses.delete_by_id(id).await? {
        info!(expense_id = id, "expense deleted");
        Ok(())
    } else {
        warn!(expense_id = id, "delete of unknown expense");
        Err(ApiError::NotFound(format!("expense {id} not found")))
    }
}
