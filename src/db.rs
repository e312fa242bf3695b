use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Failure raised by a repository, independent of the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error("referenced {0} does not exist")]
    MissingParent(&'static str),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl StoreError {
    /// Classifies constraint violations; `unique` and `parent` name the offending column or row.
    pub fn from_sqlx(err: sqlx::Error, unique: &'static str, parent: &'static str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate(unique);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingParent(parent);
            }
        }
        StoreError::Database(err)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_opaque() {
        let err = StoreError::from_sqlx(sqlx::Error::RowNotFound, "email", "user");
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn messages_name_the_offending_field() {
        assert_eq!(StoreError::Duplicate("email").to_string(), "email already exists");
        assert_eq!(
            StoreError::MissingParent("user").to_string(),
            "referenced user does not exist"
        );
    }
}
