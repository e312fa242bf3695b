use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;

use super::repo_types::{Expense, ExpenseFields, NewExpense};
use crate::db::StoreError;

#[async_trait]
pub trait ExpenseRepo: Send + Sync {
    async fn insert(&self, new: NewExpense) -> Result<Expense, StoreError>;
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Expense>, StoreError>;
    async fn find_by_users(&self, user_ids: &[i64]) -> Result<Vec<Expense>, StoreError>;
    async fn find_by_user_and_date(&self, user_id: i64, date: Date)
        -> Result<Vec<Expense>, StoreError>;
    /// Overwrites every mutable field; `None` when no expense has this id.
    async fn update(&self, id: i64, fields: ExpenseFields) -> Result<Option<Expense>, StoreError>;
    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgExpenseRepo {
    db: PgPool,
}

impl PgExpenseRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExpenseRepo for PgExpenseRepo {
    async fn insert(&self, new: NewExpense) -> Result<Expense, StoreError> {
        let NewExpense { user_id, fields } = new;
        sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (user_id, amount, category, description, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, amount, category, description, date
            "#,
        )
        .bind(user_id)
        .bind(fields.amount)
        .bind(fields.category)
        .bind(fields.description)
        .bind(fields.date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| StoreError::from_sqlx(e, "expense", "user"))
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Expense>, StoreError> {
        let rows = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, amount, category, description, date
            FROM expenses
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_users(&self, user_ids: &[i64]) -> Result<Vec<Expense>, StoreError> {
        let rows = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, amount, category, description, date
            FROM expenses
            WHERE user_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_user_and_date(
        &self,
        user_id: i64,
        date: Date,
    ) -> Result<Vec<Expense>, StoreError> {
        let rows = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, amount, category, description, date
            FROM expenses
            WHERE user_id = $1 AND date = $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: i64, fields: ExpenseFields) -> Result<Option<Expense>, StoreError> {
        let row = sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses
               SET amount = $2, category = $3, description = $4, date = $5
             WHERE id = $1
            RETURNING id, user_id, amount, category, description, date
            "#,
        )
        .bind(id)
        .bind(fields.amount)
        .bind(fields.category)
        .bind(fields.description)
        .bind(fields.date)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
