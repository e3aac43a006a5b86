use anyhow::anyhow;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use diesel::prelude::*;

use crate::accounts::db_types::{CreateUser, UserRecord};
use crate::accounts::processor_enums::{SessionContext, SignedInOutputArgs};
use crate::utils::app_config::AppConfig;
use crate::utils::commons::DbConn;
use crate::utils::error::{ActionError, StoreError};

pub fn create_user(conn: DbConn, args: &CreateUser) -> Result<UserRecord, StoreError> {
    use crate::schema::users::table as UsersTable;

    let record = diesel::insert_into(UsersTable)
        .values(args)
        .get_result::<UserRecord>(conn)?;

    Ok(record)
}

pub fn find_user_by_username(conn: DbConn, name: &str) -> Result<Option<UserRecord>, StoreError> {
    use crate::schema::users::dsl::*;

    let record = users
        .filter(username.eq(name))
        .first::<UserRecord>(conn)
        .optional()?;

    Ok(record)
}

pub fn delete_user(conn: DbConn, user_id: i32) -> Result<usize, StoreError> {
    use crate::schema::users::dsl::*;

    let removed = diesel::delete(users.filter(id.eq(user_id))).execute(conn)?;

    Ok(removed)
}

/// Argon2id with a fresh random salt, PHC string encoded.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Hashing failed: {}", e))?
        .to_string();

    Ok(hash)
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Binds a fresh session to `user`, revoking whatever token came with the request.
pub async fn start_session(
    app_config: &AppConfig,
    context: &mut SessionContext,
    user: &UserRecord,
) -> Result<SignedInOutputArgs, ActionError> {
    if let Some(previous) = context.presented.take() {
        app_config.sessions.destroy(&previous).await?;
    }

    let token = app_config.sessions.create(user.id).await?;
    context.presented = Some(token.clone());

    Ok(SignedInOutputArgs {
        username: user.username.clone(),
        profile_pic: None,
        session: token,
    })
}
