//! Follow graph query functions.

use std::collections::HashSet;

use rusqlite::{Connection, Row};
use uuid::Uuid;
use yolo_types::{Follow, FollowEntry, UserSummary};

use crate::{DbError, Result};

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<FollowEntry> {
    Ok(FollowEntry {
        user: UserSummary {
            id: row.get(0)?,
            username: row.get(1)?,
            display_name: row.get(2)?,
            avatar: row.get(3)?,
            balance: row.get::<_, i64>(4)? as u64,
        },
        bio: row.get(5)?,
        is_following: None,
    })
}

pub fn exists(conn: &Connection, follower_id: &Uuid, followee_id: &Uuid) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ?1 AND followee_id = ?2)",
        [follower_id, followee_id],
        |row| row.get(0),
    )?;
    Ok(found)
}

pub fn insert(conn: &Connection, follow: &Follow) -> Result<()> {
    conn.execute(
        "INSERT INTO follows (follower_id, followee_id, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![follow.follower_id, follow.followee_id, follow.created_at as i64],
    )?;
    Ok(())
}

pub fn remove(conn: &Connection, follower_id: &Uuid, followee_id: &Uuid) -> Result<()> {
    let deleted = conn.execute(
        "DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2",
        [follower_id, followee_id],
    )?;
    if deleted == 0 {
        return Err(DbError::NotFound("follow edge".into()));
    }
    Ok(())
}

/// Users that `user_id` follows, newest edge first.
pub fn following(conn: &Connection, user_id: &Uuid) -> Result<Vec<FollowEntry>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.username, u.display_name, u.avatar, u.balance, u.bio
         FROM follows f JOIN users u ON u.id = f.followee_id
         WHERE f.follower_id = ?1
         ORDER BY f.created_at DESC, f.rowid DESC",
    )?;
    let rows = stmt
        .query_map([user_id], entry_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Users following `user_id`, newest edge first.
pub fn followers(conn: &Connection, user_id: &Uuid) -> Result<Vec<FollowEntry>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.username, u.display_name, u.avatar, u.balance, u.bio
         FROM follows f JOIN users u ON u.id = f.follower_id
         WHERE f.followee_id = ?1
         ORDER BY f.created_at DESC, f.rowid DESC",
    )?;
    let rows = stmt
        .query_map([user_id], entry_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Ids of everyone `user_id` follows.
pub fn followee_ids(conn: &Connection, user_id: &Uuid) -> Result<HashSet<Uuid>> {
    let mut stmt = conn.prepare("SELECT followee_id FROM follows WHERE follower_id = ?1")?;
    let ids = stmt
        .query_map([user_id], |row| row.get::<_, Uuid>(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(ids)
}

pub fn count_following(conn: &Connection, user_id: &Uuid) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM follows WHERE follower_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

pub fn count_followers(conn: &Connection, user_id: &Uuid) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM follows WHERE followee_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

pub fn load_all(conn: &Connection) -> Result<Vec<Follow>> {
    let mut stmt = conn.prepare(
        "SELECT follower_id, followee_id, created_at FROM follows ORDER BY created_at, rowid",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Follow {
                follower_id: row.get(0)?,
                followee_id: row.get(1)?,
                created_at: row.get::<_, i64>(2)? as u64,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn replace_all(conn: &Connection, follows: &[Follow]) -> Result<()> {
    conn.execute("DELETE FROM follows", [])?;
    for follow in follows {
        insert(conn, follow)?;
    }
    Ok(())
}
