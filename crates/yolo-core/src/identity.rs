//! Identity store: registration, lookup, profile edits and the balance
//! primitive every ledger movement goes through.

use rusqlite::Connection;
use tracing::{info, warn};
use uuid::Uuid;
use yolo_db::queries::users;
use yolo_types::{ProfileUpdate, User, UserId, REGISTRATION_BONUS};

use crate::error::{CoreError, Result};
use crate::ledger::{self, MintReason};
use crate::Engine;

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidArgument(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Load a user or fail with `NotFound`.
pub(crate) fn require_user(conn: &Connection, id: &UserId) -> Result<User> {
    users::get(conn, id)?.ok_or_else(|| CoreError::NotFound(format!("user {id}")))
}

pub fn create(
    conn: &Connection,
    now: u64,
    username: &str,
    email: &str,
    credential_hash: &str,
) -> Result<User> {
    let username = required("username", username)?;
    let email = required("email", email)?;

    if users::get_by_username(conn, &username)?.is_some() {
        return Err(CoreError::Conflict(format!("username {username} is taken")));
    }
    if users::get_by_email(conn, &email)?.is_some() {
        return Err(CoreError::Conflict(format!("email {email} is registered")));
    }

    let mut user = User {
        id: Uuid::new_v4(),
        display_name: username.clone(),
        username,
        email,
        credential_hash: credential_hash.to_string(),
        avatar: None,
        bio: None,
        balance: 0,
        created_at: now,
    };
    users::insert(conn, &user)?;
    user.balance = ledger::mint(
        conn,
        &user.id,
        REGISTRATION_BONUS as i64,
        MintReason::Registration,
    )?;

    info!(user = %user.id, username = %user.username, "User registered");
    Ok(user)
}

pub fn update_profile(conn: &Connection, id: &UserId, update: &ProfileUpdate) -> Result<User> {
    if let Some(name) = &update.display_name {
        if name.trim().is_empty() {
            return Err(CoreError::InvalidArgument(
                "display_name must not be empty".into(),
            ));
        }
    }
    if !update.is_empty() {
        users::update_profile(conn, id, update)?;
    }
    require_user(conn, id)
}

/// Apply `delta` to a user's balance and return the new balance.
///
/// The balance never drops below zero; a debit larger than the balance is
/// clamped and logged.
pub fn adjust_balance(conn: &Connection, id: &UserId, delta: i64) -> Result<u64> {
    let current = users::balance(conn, id)?
        .ok_or_else(|| CoreError::NotFound(format!("user {id}")))?;
    let target = current as i64 + delta;
    let next = if target < 0 {
        warn!(user = %id, balance = current, delta, "Debit clamped at zero");
        0
    } else {
        target as u64
    };
    users::set_balance(conn, id, next)?;
    Ok(next)
}

pub fn credential_hash_for(conn: &Connection, email: &str) -> Result<Option<(UserId, String)>> {
    Ok(users::get_by_email(conn, email.trim())?.map(|u| (u.id, u.credential_hash)))
}

impl Engine {
    /// Register a new account with the starting balance.
    pub fn register(&self, username: &str, email: &str, credential_hash: &str) -> Result<User> {
        self.write(|conn, now| create(conn, now, username, email, credential_hash))
    }

    pub fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        self.read(|conn| Ok(users::get(conn, id)?))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.read(|conn| Ok(users::get_by_email(conn, email.trim())?))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.read(|conn| Ok(users::get_by_username(conn, username.trim())?))
    }

    /// The stored credential hash for a login email, for an external check.
    pub fn credential_hash_for(&self, email: &str) -> Result<Option<(UserId, String)>> {
        self.read(|conn| credential_hash_for(conn, email))
    }

    pub fn update_profile(&self, id: &UserId, update: &ProfileUpdate) -> Result<User> {
        self.write(|conn, _| update_profile(conn, id, update))
    }

    pub fn adjust_balance(&self, id: &UserId, delta: i64) -> Result<u64> {
        self.write(|conn, _| adjust_balance(conn, id, delta))
    }
}
