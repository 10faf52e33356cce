use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::policy::Owned;

/// Which of the guarded columns a user query loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Neither email nor password hash.
    Default,
    WithEmail,
    /// Email and password hash, for credential checks only.
    WithCredentials,
}

impl Projection {
    pub(crate) fn columns(self) -> &'static str {
        match self {
            Projection::Default => {
                "id, first_name, last_name, NULL::text AS email, NULL::text AS password_hash, \
                 verified, photo, created_at, updated_at"
            }
            Projection::WithEmail => {
                "id, first_name, last_name, email, NULL::text AS password_hash, \
                 verified, photo, created_at, updated_at"
            }
            Projection::WithCredentials => {
                "id, first_name, last_name, email, password_hash, \
                 verified, photo, created_at, updated_at"
            }
        }
    }
}

/// User record. `email` and `password_hash` are only populated when the
/// query asked for them.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // Argon2 PHC string
    pub verified: bool,
    pub photo: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Owned for User {
    fn owner_id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Single-use secret proving control of the registered email address.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationToken {
    pub user_id: Uuid,
    pub secret: String,
    pub created_at: OffsetDateTime,
}
