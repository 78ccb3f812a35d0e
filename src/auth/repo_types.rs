use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::password::HashedPassword;

/// User as seen outside the auth layer. Has no password field at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Internal authentication view. Only produced by an explicit credentials
/// lookup and never serialized.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: PublicUser,
    pub password_hash: HashedPassword,
}

#[derive(Debug, FromRow)]
pub(crate) struct CredentialsRow {
    #[sqlx(flatten)]
    pub user: PublicUser,
    pub password_hash: String,
}

impl From<CredentialsRow> for UserCredentials {
    fn from(r: CredentialsRow) -> Self {
        Self {
            user: r.user,
            password_hash: HashedPassword::from_stored(r.password_hash),
        }
    }
}

/// Data needed to create a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: HashedPassword,
}
