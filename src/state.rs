use std::sync::Arc;

use sqlx::PgPool;
use tracing::warn;

use crate::{
    config::AppConfig,
    db,
    expenses::repo::{ExpenseRepo, PgExpenseRepo},
    memory::MemoryStore,
    users::repo::{PgUserRepo, UserRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub expenses: Arc<dyn ExpenseRepo>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config).await?;

        // Run migrations if present
        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            warn!(error = %e, "migrations folder not found or migration failed; continuing");
        }

        Ok(Self::from_pool(db, Arc::new(config)))
    }

    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self {
            config,
            users: Arc::new(PgUserRepo::new(db.clone())),
            expenses: Arc::new(PgExpenseRepo::new(db)),
        }
    }

    /// State backed by a fresh [`MemoryStore`]; nothing is shared between calls.
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            config: Arc::new(AppConfig::default()),
            users: Arc::new(store.clone()),
            expenses: Arc::new(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_state_binds_to_default_address() {
        let state = AppState::in_memory();
        assert_eq!(state.config.bind_addr(), "0.0.0.0:8080");
    }
}
