use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::User;
use crate::expenses::dto::ExpenseView;

/// Inbound user object. The plaintext password only ever lives here.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// User without its expenses; returned on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// User together with the expenses it owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserView {
    #[serde(flatten)]
    pub user: UserSummary,
    pub expenses: Vec<ExpenseView>,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_never_carries_credentials() {
        let summary = UserSummary::from(User {
            id: 1,
            name: Some("A".into()),
            email: "a@x.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: None,
        });
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            json!({ "id": 1, "name": "A", "email": "a@x.com", "createdAt": null })
        );
    }

    #[test]
    fn request_ignores_unknown_fields_and_redacts_debug() {
        let req: CreateUserRequest = serde_json::from_value(json!({
            "id": 99,
            "name": "A",
            "email": "a@x.com",
            "password": "hunter2",
            "expenses": []
        }))
        .expect("request should deserialize");
        assert_eq!(req.email.as_deref(), Some("a@x.com"));
        assert!(req.created_at.is_none());
        let debug = format!("{req:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn created_at_accepts_rfc3339() {
        let req: CreateUserRequest = serde_json::from_value(json!({
            "email": "a@x.com",
            "password": "p",
            "createdAt": "2024-01-05T10:00:00Z"
        }))
        .expect("request should deserialize");
        assert_eq!(req.created_at.map(|t| t.unix_timestamp()), Some(1_704_448_800));
    }
}
