use lazy_static::lazy_static;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    password::{hash_password, verify_password},
    repo::UserRepo,
    repo_types::User,
};
use crate::error::AppError;

pub const DUPLICATE_USERNAME: &str = "Username already exists";

lazy_static! {
    // Checked against on unknown usernames so both login failures cost one Argon2 run.
    static ref DUMMY_HASH: String =
        hash_password("volunteer-intake-dummy-password").unwrap_or_default();
}

/// Creates a user with a salted Argon2 hash. Fails if the username is taken.
pub async fn register(
    users: &dyn UserRepo,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }

    if users.find_by_username(username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::Validation(DUPLICATE_USERNAME.into()));
    }

    let hash = hash_password(password)?;

    // A concurrent registration can still win between the lookup and the insert.
    let Some(user) = users.create(username, &hash).await? else {
        warn!(%username, "username taken during insert");
        return Err(AppError::Validation(DUPLICATE_USERNAME.into()));
    };

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Resolves credentials to a user ID. Unknown usernames and wrong passwords
/// produce the same error.
pub async fn verify_credentials(
    users: &dyn UserRepo,
    username: &str,
    password: &str,
) -> Result<Uuid, AppError> {
    let username = username.trim();
    let Some(user) = users.find_by_username(username).await? else {
        let _ = verify_password(password, &DUMMY_HASH);
        warn!(%username, "login unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    Ok(user.id)
}
