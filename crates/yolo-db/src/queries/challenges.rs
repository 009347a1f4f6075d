//! Challenge query functions.

use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;
use yolo_types::{Challenge, ChallengeCard, ChallengeStatus};

use super::{label_error, opt_u64, users};
use crate::{DbError, Result};

const COLUMNS: &str = "c.id, c.user_id, c.title, c.description, c.category, c.difficulty, \
     c.estimated_time, c.status, c.photo_url, c.completed_at, c.created_at";

/// Number of columns in [`COLUMNS`].
const WIDTH: usize = 11;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Challenge> {
    let category: String = row.get(4)?;
    let status: String = row.get(7)?;
    Ok(Challenge {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: category.parse().map_err(|e| label_error(4, e))?,
        difficulty: row.get(5)?,
        estimated_time: row.get(6)?,
        status: status.parse().map_err(|e| label_error(7, e))?,
        photo_url: row.get(8)?,
        completed_at: opt_u64(row, 9)?,
        created_at: row.get::<_, i64>(10)? as u64,
    })
}

/// Challenge columns followed by owner summary, like count and comment count.
fn card_from_row(row: &Row<'_>) -> rusqlite::Result<ChallengeCard> {
    Ok(ChallengeCard {
        challenge: from_row(row)?,
        owner: users::summary_at(row, WIDTH)?,
        like_count: row.get::<_, i64>(WIDTH + 5)? as u64,
        comment_count: row.get::<_, i64>(WIDTH + 6)? as u64,
    })
}

fn card_query(filter: &str) -> String {
    format!(
        "SELECT {COLUMNS},
                u.id, u.username, u.display_name, u.avatar, u.balance,
                (SELECT COUNT(*) FROM likes l WHERE l.challenge_id = c.id),
                (SELECT COUNT(*) FROM comments m WHERE m.challenge_id = c.id)
         FROM challenges c
         LEFT JOIN users u ON u.id = c.user_id
         WHERE c.status = 'completed' {filter}
         ORDER BY COALESCE(c.completed_at, c.created_at) DESC, c.rowid DESC"
    )
}

/// Insert a challenge.
pub fn insert(conn: &Connection, challenge: &Challenge) -> Result<()> {
    conn.execute(
        "INSERT INTO challenges (id, user_id, title, description, category, difficulty,
                                 estimated_time, status, photo_url, completed_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            challenge.id,
            challenge.user_id,
            challenge.title,
            challenge.description,
            challenge.category.as_str(),
            challenge.difficulty,
            challenge.estimated_time,
            challenge.status.as_str(),
            challenge.photo_url,
            challenge.completed_at.map(|t| t as i64),
            challenge.created_at as i64,
        ],
    )?;
    Ok(())
}

/// Get a challenge by id.
pub fn get(conn: &Connection, id: &Uuid) -> Result<Option<Challenge>> {
    let challenge = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM challenges c WHERE c.id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(challenge)
}

/// Get the user's active challenge, if any.
pub fn active_for_user(conn: &Connection, user_id: &Uuid) -> Result<Option<Challenge>> {
    let challenge = conn
        .query_row(
            &format!(
                "SELECT {COLUMNS} FROM challenges c WHERE c.user_id = ?1 AND c.status = 'active'"
            ),
            [user_id],
            from_row,
        )
        .optional()?;
    Ok(challenge)
}

/// All challenges of a user, newest first.
pub fn list_for_user(conn: &Connection, user_id: &Uuid) -> Result<Vec<Challenge>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM challenges c WHERE c.user_id = ?1
         ORDER BY c.created_at DESC, c.rowid DESC"
    ))?;
    let rows = stmt
        .query_map([user_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// `(total, completed)` challenge counts for a user.
pub fn counts_for_user(conn: &Connection, user_id: &Uuid) -> Result<(u64, u64)> {
    let (total, completed): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(status = 'completed'), 0)
         FROM challenges WHERE user_id = ?1",
        [user_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok((total as u64, completed as u64))
}

/// Transition an active challenge to completed.
pub fn mark_completed(
    conn: &Connection,
    id: &Uuid,
    photo_url: &str,
    completed_at: u64,
) -> Result<()> {
    let updated = conn.execute(
        "UPDATE challenges SET status = ?2, photo_url = ?3, completed_at = ?4
         WHERE id = ?1 AND status = ?5",
        rusqlite::params![
            id,
            ChallengeStatus::Completed.as_str(),
            photo_url,
            completed_at as i64,
            ChallengeStatus::Active.as_str(),
        ],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("active challenge {id}")));
    }
    Ok(())
}

/// Delete a challenge row. Its likes and comments must be removed first.
pub fn delete(conn: &Connection, id: &Uuid) -> Result<()> {
    let deleted = conn.execute("DELETE FROM challenges WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(DbError::NotFound(format!("challenge {id}")));
    }
    Ok(())
}

/// Completed challenges across all users, most recently completed first.
pub fn completed_feed(conn: &Connection, limit: u32, offset: u32) -> Result<Vec<ChallengeCard>> {
    let mut stmt = conn.prepare(&format!("{} LIMIT ?1 OFFSET ?2", card_query("")))?;
    let rows = stmt
        .query_map([limit, offset], card_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Completed challenges of one user, most recently completed first.
pub fn completed_for_user(conn: &Connection, user_id: &Uuid) -> Result<Vec<ChallengeCard>> {
    let mut stmt = conn.prepare(&card_query("AND c.user_id = ?1"))?;
    let rows = stmt
        .query_map([user_id], card_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Load every challenge in creation order.
pub fn load_all(conn: &Connection) -> Result<Vec<Challenge>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM challenges c ORDER BY c.created_at, c.rowid"
    ))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Replace the whole collection. Dependent likes and comments must already be gone.
pub fn replace_all(conn: &Connection, challenges: &[Challenge]) -> Result<()> {
    conn.execute("DELETE FROM challenges", [])?;
    for challenge in challenges {
        insert(conn, challenge)?;
    }
    Ok(())
}
