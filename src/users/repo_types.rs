use sqlx::FromRow;
use time::OffsetDateTime;

/// User row; the hash never leaves the service layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub created_at: Option<OffsetDateTime>,
}
