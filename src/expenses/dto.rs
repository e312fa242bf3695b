use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{macros::format_description, Date};

use super::repo_types::{Expense, ExpenseFields, NewExpense};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Why a request field could not be turned into its typed value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),

    #[error("field `{field}` is malformed: {reason}")]
    Malformed { field: &'static str, reason: String },
}

impl FieldError {
    fn malformed(field: &'static str, reason: impl std::fmt::Display) -> Self {
        FieldError::Malformed {
            field,
            reason: reason.to_string(),
        }
    }
}

/// Body of `POST /api/expenses` and `PUT /api/expenses/{id}`.
///
/// Each field takes a JSON string or number; numbers are read through their
/// textual form so form-encoded clients sending `"12.50"` and JSON clients
/// sending `12.5` both work.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    pub amount: Option<Value>,
    pub category: Option<Value>,
    pub description: Option<Value>,
    pub date: Option<Value>,
    pub user_id: Option<Value>,
}

impl ExpensePayload {
    /// Amount, category, description and date, all required.
    pub fn fields(&self) -> Result<ExpenseFields, FieldError> {
        let amount = parse_amount(&required(&self.amount, "amount")?)?;
        let category = required(&self.category, "category")?;
        let description = required(&self.description, "description")?;
        let date = parse_date(&required(&self.date, "date")?, "date")?;
        Ok(ExpenseFields {
            amount,
            category,
            description,
            date,
        })
    }

    pub fn new_expense(&self) -> Result<NewExpense, FieldError> {
        let fields = self.fields()?;
        let raw = required(&self.user_id, "userId")?;
        let user_id = raw
            .trim()
            .parse::<i64>()
            .map_err(|e| FieldError::malformed("userId", e))?;
        Ok(NewExpense { user_id, fields })
    }
}

fn required(value: &Option<Value>, field: &'static str) -> Result<String, FieldError> {
    match value {
        None | Some(Value::Null) => Err(FieldError::Missing(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
        Some(_) => Err(FieldError::malformed(field, "expected a string or number")),
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, FieldError> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| FieldError::malformed("amount", e))
}

/// Parses an ISO calendar date such as `2024-01-05`.
pub fn parse_date(raw: &str, field: &'static str) -> Result<Date, FieldError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| FieldError::malformed(field, e))
}

/// Outbound expense shape; the owner appears only as its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseView {
    pub id: i64,
    /// Emitted as a JSON number (an `f64`), so amounts beyond ~15 significant
    /// digits lose precision on the way out. Storage keeps the exact decimal.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub user_id: i64,
}

impl From<Expense> for ExpenseView {
    fn from(e: Expense) -> Self {
        Self {
            id: e.id,
            amount: e.amount,
            category: e.category,
            description: e.description,
            date: e.date,
            user_id: e.user_id,
        }
    }
}
