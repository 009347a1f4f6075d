//! User query functions.

use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;
use yolo_types::{ProfileUpdate, User, UserSummary};

use crate::{DbError, Result};

const COLUMNS: &str =
    "id, username, email, credential_hash, display_name, avatar, bio, balance, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        credential_hash: row.get(3)?,
        display_name: row.get(4)?,
        avatar: row.get(5)?,
        bio: row.get(6)?,
        balance: row.get::<_, i64>(7)? as u64,
        created_at: row.get::<_, i64>(8)? as u64,
    })
}

/// Read a `UserSummary` from five columns starting at `offset`
/// (`id, username, display_name, avatar, balance`). Returns `None` when the
/// id column is NULL, as produced by a LEFT JOIN with no match.
pub(crate) fn summary_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<UserSummary>> {
    let Some(id) = row.get::<_, Option<Uuid>>(offset)? else {
        return Ok(None);
    };
    Ok(Some(UserSummary {
        id,
        username: row.get(offset + 1)?,
        display_name: row.get(offset + 2)?,
        avatar: row.get(offset + 3)?,
        balance: row.get::<_, i64>(offset + 4)? as u64,
    }))
}

/// Insert a new user.
pub fn insert(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO users
             (id, username, email, credential_hash, display_name, avatar, bio, balance, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            user.id,
            user.username,
            user.email,
            user.credential_hash,
            user.display_name,
            user.avatar,
            user.bio,
            user.balance as i64,
            user.created_at as i64,
        ],
    )?;
    Ok(())
}

/// Get a user by id.
pub fn get(conn: &Connection, id: &Uuid) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(user)
}

/// Get a user by email.
pub fn get_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE email = ?1"),
            [email],
            from_row,
        )
        .optional()?;
    Ok(user)
}

/// Get a user by username.
pub fn get_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE username = ?1"),
            [username],
            from_row,
        )
        .optional()?;
    Ok(user)
}

/// Apply a partial profile update. Unset fields are left unchanged.
pub fn update_profile(conn: &Connection, id: &Uuid, update: &ProfileUpdate) -> Result<()> {
    let updated = conn.execute(
        "UPDATE users SET
            display_name = COALESCE(?2, display_name),
            avatar = COALESCE(?3, avatar),
            bio = COALESCE(?4, bio)
         WHERE id = ?1",
        rusqlite::params![id, update.display_name, update.avatar, update.bio],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("user {id}")));
    }
    Ok(())
}

/// Get a user's balance.
pub fn balance(conn: &Connection, id: &Uuid) -> Result<Option<u64>> {
    let balance = conn
        .query_row("SELECT balance FROM users WHERE id = ?1", [id], |row| {
            row.get::<_, i64>(0)
        })
        .optional()?;
    Ok(balance.map(|b| b as u64))
}

/// Overwrite a user's balance.
pub fn set_balance(conn: &Connection, id: &Uuid, balance: u64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE users SET balance = ?2 WHERE id = ?1",
        rusqlite::params![id, balance as i64],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("user {id}")));
    }
    Ok(())
}

/// Load every user in creation order.
pub fn load_all(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM users ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Replace the whole collection. Dependent rows must already be gone.
pub fn replace_all(conn: &Connection, users: &[User]) -> Result<()> {
    conn.execute("DELETE FROM users", [])?;
    for user in users {
        insert(conn, user)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_insert_and_lookup() {
        let conn = test_db();
        let alice = fixtures::user(&conn, "alice", 5);

        assert_eq!(get(&conn, &alice.id).expect("get"), Some(alice.clone()));
        assert_eq!(
            get_by_email(&conn, "alice@example.com").expect("by email"),
            Some(alice.clone())
        );
        assert_eq!(
            get_by_username(&conn, "alice").expect("by username"),
            Some(alice)
        );
        assert_eq!(get_by_username(&conn, "bob").expect("missing"), None);
    }

    #[test]
    fn test_duplicate_username_is_constraint() {
        let conn = test_db();
        let alice = fixtures::user(&conn, "alice", 5);
        let mut copy = alice.clone();
        copy.id = Uuid::new_v4();
        copy.email = "other@example.com".into();
        let err = insert(&conn, &copy).expect_err("duplicate username");
        assert!(err.is_constraint());
    }

    #[test]
    fn test_update_profile_partial() {
        let conn = test_db();
        let alice = fixtures::user(&conn, "alice", 5);

        let update = ProfileUpdate {
            bio: Some("chaos enjoyer".into()),
            ..ProfileUpdate::default()
        };
        update_profile(&conn, &alice.id, &update).expect("update");

        let stored = get(&conn, &alice.id).expect("get").expect("exists");
        assert_eq!(stored.bio.as_deref(), Some("chaos enjoyer"));
        assert_eq!(stored.display_name, "alice");

        let missing = update_profile(&conn, &Uuid::new_v4(), &update);
        assert!(matches!(missing, Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_balance_roundtrip() {
        let conn = test_db();
        let alice = fixtures::user(&conn, "alice", 5);
        set_balance(&conn, &alice.id, 12).expect("set");
        assert_eq!(balance(&conn, &alice.id).expect("balance"), Some(12));
        assert_eq!(balance(&conn, &Uuid::new_v4()).expect("missing"), None);
    }

    #[test]
    fn test_replace_all() {
        let conn = test_db();
        fixtures::user(&conn, "alice", 5);
        let bob = User {
            id: Uuid::new_v4(),
            username: "bob".into(),
            email: "bob@example.com".into(),
            credential_hash: "opaque".into(),
            display_name: "Bob".into(),
            avatar: None,
            bio: None,
            balance: 3,
            created_at: 2000,
        };
        replace_all(&conn, std::slice::from_ref(&bob)).expect("replace");
        assert_eq!(load_all(&conn).expect("load"), vec![bob]);
    }
}
