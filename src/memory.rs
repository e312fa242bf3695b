use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::Date;
use tokio::sync::RwLock;

use crate::{
    db::StoreError,
    expenses::{
        repo::ExpenseRepo,
        repo_types::{Expense, ExpenseFields, NewExpense},
    },
    users::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
};

#[derive(Default)]
struct Tables {
    next_user_id: i64,
    next_expense_id: i64,
    users: BTreeMap<i64, User>,
    expenses: BTreeMap<i64, Expense>,
}

/// Process-local store with the same constraints as the Postgres schema:
/// unique email, expense owner must exist, deleting a user drops its expenses.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == new.email) {
            return Err(StoreError::Duplicate("email"));
        }
        t.next_user_id += 1;
        let user = User {
            id: t.next_user_id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            created_at: new.created_at,
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        let removed = t.users.remove(&id).is_some();
        if removed {
            t.expenses.retain(|_, e| e.user_id != id);
        }
        Ok(removed)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut t = self.tables.write().await;
        let count = t.users.len() as u64;
        t.users.clear();
        t.expenses.clear();
        Ok(count)
    }
}

#[async_trait]
impl ExpenseRepo for MemoryStore {
    async fn insert(&self, new: NewExpense) -> Result<Expense, StoreError> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&new.user_id) {
            return Err(StoreError::MissingParent("user"));
        }
        t.next_expense_id += 1;
        let NewExpense { user_id, fields } = new;
        let expense = Expense {
            id: t.next_expense_id,
            user_id,
            amount: fields.amount,
            category: fields.category,
            description: fields.description,
            date: fields.date,
        };
        t.expenses.insert(expense.id, expense.clone());
        Ok(expense)
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Expense>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.expenses
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_users(&self, user_ids: &[i64]) -> Result<Vec<Expense>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.expenses
            .values()
            .filter(|e| user_ids.contains(&e.user_id))
            .cloned()
            .collect())
    }

    async fn find_by_user_and_date(
        &self,
        user_id: i64,
        date: Date,
    ) -> Result<Vec<Expense>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.expenses
            .values()
            .filter(|e| e.user_id == user_id && e.date == date)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, fields: ExpenseFields) -> Result<Option<Expense>, StoreError> {
        let mut t = self.tables.write().await;
        Ok(t.expenses.get_mut(&id).map(|e| {
            e.apply(fields);
            e.clone()
        }))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.expenses.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use time::macros::date;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: None,
            email: email.into(),
            password_hash: "hash".into(),
            created_at: None,
        }
    }

    fn new_expense(user_id: i64, date: Date) -> NewExpense {
        NewExpense {
            user_id,
            fields: ExpenseFields {
                amount: Decimal::new(500, 2),
                category: "food".into(),
                description: "snack".into(),
                date,
            },
        }
    }

    #[tokio::test]
    async fn ids_are_generated_sequentially() {
        let store = MemoryStore::new();
        let a = UserRepo::insert(&store, new_user("a@x.com")).await.unwrap();
        let b = UserRepo::insert(&store, new_user("b@x.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[tokio::test]
    async fn rejects_duplicate_email_and_orphan_expense() {
        let store = MemoryStore::new();
        UserRepo::insert(&store, new_user("a@x.com")).await.unwrap();
        let dup = UserRepo::insert(&store, new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(dup, StoreError::Duplicate("email")));

        let orphan = ExpenseRepo::insert(&store, new_expense(42, date!(2024 - 01 - 05)))
            .await
            .unwrap_err();
        assert!(matches!(orphan, StoreError::MissingParent("user")));
    }

    #[tokio::test]
    async fn deleting_a_user_drops_only_its_expenses() {
        let store = MemoryStore::new();
        let a = UserRepo::insert(&store, new_user("a@x.com")).await.unwrap();
        let b = UserRepo::insert(&store, new_user("b@x.com")).await.unwrap();
        ExpenseRepo::insert(&store, new_expense(a.id, date!(2024 - 01 - 05))).await.unwrap();
        ExpenseRepo::insert(&store, new_expense(b.id, date!(2024 - 01 - 05))).await.unwrap();

        assert!(UserRepo::delete_by_id(&store, a.id).await.unwrap());
        assert!(store.find_by_user(a.id).await.unwrap().is_empty());
        assert_eq!(store.find_by_user(b.id).await.unwrap().len(), 1);
        assert!(!UserRepo::delete_by_id(&store, a.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_of_missing_expense_returns_none() {
        let store = MemoryStore::new();
        let fields = new_expense(1, date!(2024 - 01 - 05)).fields;
        assert!(store.update(7, fields).await.unwrap().is_none());
    }
}
