use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    password::HashedPassword,
    repo::UserRepo,
    repo_types::{NewUser, PublicUser},
};
use crate::error::{AppError, CONFLICT_MESSAGE};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    // Verified against when the email is unknown, so that path costs a full hash check too.
    static ref DUMMY_HASH: HashedPassword =
        HashedPassword::hash("placeholder-password-for-unknown-users").expect("argon2 hash");
}

/// Computes the placeholder hash now instead of on the first unknown-email login.
pub fn prime_dummy_hash() {
    lazy_static::initialize(&DUMMY_HASH);
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

async fn hash_blocking(plain: String) -> anyhow::Result<HashedPassword> {
    tokio::task::spawn_blocking(move || HashedPassword::hash(&plain))
        .await
        .context("password hashing task")?
}

async fn verify_blocking(hash: HashedPassword, plain: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || hash.verify(&plain))
        .await
        .context("password verification task")?
}

/// Creates a user. Expects already-normalized input.
///
/// The existence pre-check only produces a friendlier early answer; the
/// store's unique constraints decide races, and their `Duplicate` error
/// becomes the same conflict.
pub async fn register(
    users: &dyn UserRepo,
    username: &str,
    email: &str,
    password: &str,
) -> Result<PublicUser, AppError> {
    if users.exists_by_email_or_username(email, username).await? {
        warn!(%email, %username, "email or username already registered");
        return Err(AppError::Conflict(CONFLICT_MESSAGE.into()));
    }

    let password_hash = hash_blocking(password.to_owned()).await?;

    let user = users
        .create(NewUser {
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash,
        })
        .await
        .map_err(|e| {
            warn!(error = %e, %email, "create user failed");
            AppError::from(e)
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Returns the user when `password` matches. Unknown email and wrong
/// password both yield `None` after the same amount of hashing work.
pub async fn verify_credentials(
    users: &dyn UserRepo,
    email: &str,
    password: &str,
) -> Result<Option<PublicUser>, AppError> {
    let (hash, user) = match users.find_credentials_by_email(email).await? {
        Some(creds) => (creds.password_hash, Some(creds.user)),
        None => (DUMMY_HASH.clone(), None),
    };

    let matches = verify_blocking(hash, password.to_owned()).await?;
    Ok(user.filter(|_| matches))
}
