//! Like query functions.

use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;
use yolo_types::Like;

use crate::{DbError, Result};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Like> {
    Ok(Like {
        id: row.get(0)?,
        challenge_id: row.get(1)?,
        user_id: row.get(2)?,
        created_at: row.get::<_, i64>(3)? as u64,
    })
}

/// Insert a like. Fails with a constraint error if the pair already exists.
pub fn insert(conn: &Connection, like: &Like) -> Result<()> {
    conn.execute(
        "INSERT INTO likes (id, challenge_id, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![like.id, like.challenge_id, like.user_id, like.created_at as i64],
    )?;
    Ok(())
}

/// Find the like `user_id` gave to `challenge_id`.
pub fn find(conn: &Connection, challenge_id: &Uuid, user_id: &Uuid) -> Result<Option<Like>> {
    let like = conn
        .query_row(
            "SELECT id, challenge_id, user_id, created_at FROM likes
             WHERE challenge_id = ?1 AND user_id = ?2",
            [challenge_id, user_id],
            from_row,
        )
        .optional()?;
    Ok(like)
}

pub fn remove(conn: &Connection, id: &Uuid) -> Result<()> {
    let deleted = conn.execute("DELETE FROM likes WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(DbError::NotFound(format!("like {id}")));
    }
    Ok(())
}

pub fn count_for_challenge(conn: &Connection, challenge_id: &Uuid) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM likes WHERE challenge_id = ?1",
        [challenge_id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Users currently liking a challenge, in like order.
pub fn likers(conn: &Connection, challenge_id: &Uuid) -> Result<Vec<Uuid>> {
    let mut stmt = conn.prepare(
        "SELECT user_id FROM likes WHERE challenge_id = ?1 ORDER BY created_at, rowid",
    )?;
    let rows = stmt
        .query_map([challenge_id], |row| row.get::<_, Uuid>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Delete every like on a challenge. Returns the number removed.
pub fn delete_for_challenge(conn: &Connection, challenge_id: &Uuid) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM likes WHERE challenge_id = ?1", [challenge_id])?;
    Ok(deleted)
}

pub fn load_all(conn: &Connection) -> Result<Vec<Like>> {
    let mut stmt = conn.prepare(
        "SELECT id, challenge_id, user_id, created_at FROM likes ORDER BY created_at, rowid",
    )?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn replace_all(conn: &Connection, likes: &[Like]) -> Result<()> {
    conn.execute("DELETE FROM likes", [])?;
    for like in likes {
        insert(conn, like)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;
    use yolo_types::ChallengeStatus;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    fn like(challenge_id: Uuid, user_id: Uuid, at: u64) -> Like {
        Like {
            id: Uuid::new_v4(),
            challenge_id,
            user_id,
            created_at: at,
        }
    }

    #[test]
    fn test_pair_is_unique() {
        let conn = test_db();
        let alice = fixtures::user(&conn, "alice", 5);
        let bob = fixtures::user(&conn, "bob", 5);
        let challenge = fixtures::challenge(&conn, &alice, ChallengeStatus::Completed, 100);

        insert(&conn, &like(challenge.id, bob.id, 1)).expect("first");
        let err = insert(&conn, &like(challenge.id, bob.id, 2)).expect_err("duplicate");
        assert!(err.is_constraint());
    }

    #[test]
    fn test_find_and_remove() {
        let conn = test_db();
        let alice = fixtures::user(&conn, "alice", 5);
        let bob = fixtures::user(&conn, "bob", 5);
        let challenge = fixtures::challenge(&conn, &alice, ChallengeStatus::Completed, 100);
        let given = like(challenge.id, bob.id, 1);
        insert(&conn, &given).expect("insert");

        assert_eq!(
            find(&conn, &challenge.id, &bob.id).expect("find"),
            Some(given.clone())
        );
        assert_eq!(find(&conn, &challenge.id, &alice.id).expect("find"), None);

        remove(&conn, &given.id).expect("remove");
        assert_eq!(count_for_challenge(&conn, &challenge.id).expect("count"), 0);
        assert!(matches!(remove(&conn, &given.id), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_likers_and_bulk_delete() {
        let conn = test_db();
        let alice = fixtures::user(&conn, "alice", 5);
        let bob = fixtures::user(&conn, "bob", 5);
        let carol = fixtures::user(&conn, "carol", 5);
        let challenge = fixtures::challenge(&conn, &alice, ChallengeStatus::Completed, 100);
        insert(&conn, &like(challenge.id, carol.id, 1)).expect("insert");
        insert(&conn, &like(challenge.id, bob.id, 2)).expect("insert");

        assert_eq!(
            likers(&conn, &challenge.id).expect("likers"),
            vec![carol.id, bob.id]
        );
        assert_eq!(delete_for_challenge(&conn, &challenge.id).expect("delete"), 2);
        assert!(load_all(&conn).expect("load").is_empty());
    }
}
