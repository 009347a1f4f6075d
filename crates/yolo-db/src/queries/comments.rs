//! Comment query functions.

use rusqlite::{Connection, Row};
use uuid::Uuid;
use yolo_types::{Comment, CommentView};

use super::users;
use crate::Result;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        challenge_id: row.get(1)?,
        user_id: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get::<_, i64>(4)? as u64,
    })
}

/// Insert a comment.
pub fn insert(conn: &Connection, comment: &Comment) -> Result<()> {
    conn.execute(
        "INSERT INTO comments (id, challenge_id, user_id, content, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            comment.id,
            comment.challenge_id,
            comment.user_id,
            comment.content,
            comment.created_at as i64,
        ],
    )?;
    Ok(())
}

/// Comments on a challenge with their authors, oldest first.
pub fn list_for_challenge(conn: &Connection, challenge_id: &Uuid) -> Result<Vec<CommentView>> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.challenge_id, m.user_id, m.content, m.created_at,
                u.id, u.username, u.display_name, u.avatar, u.balance
         FROM comments m
         LEFT JOIN users u ON u.id = m.user_id
         WHERE m.challenge_id = ?1
         ORDER BY m.created_at, m.rowid",
    )?;
    let rows = stmt
        .query_map([challenge_id], |row| {
            Ok(CommentView {
                comment: from_row(row)?,
                author: users::summary_at(row, 5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_for_challenge(conn: &Connection, challenge_id: &Uuid) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM comments WHERE challenge_id = ?1",
        [challenge_id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Delete every comment on a challenge. Returns the number removed.
pub fn delete_for_challenge(conn: &Connection, challenge_id: &Uuid) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM comments WHERE challenge_id = ?1",
        [challenge_id],
    )?;
    Ok(deleted)
}

/// Load every comment in creation order.
pub fn load_all(conn: &Connection) -> Result<Vec<Comment>> {
    let mut stmt = conn.prepare(
        "SELECT id, challenge_id, user_id, content, created_at
         FROM comments ORDER BY created_at, rowid",
    )?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn replace_all(conn: &Connection, comments: &[Comment]) -> Result<()> {
    conn.execute("DELETE FROM comments", [])?;
    for comment in comments {
        insert(conn, comment)?;
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

    fn comment(challenge_id: Uuid, user_id: Uuid, content: &str, at: u64) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            challenge_id,
            user_id,
            content: content.to_string(),
            created_at: at,
        }
    }

    #[test]
    fn test_list_oldest_first_with_author() {
        let conn = test_db();
        let alice = fixtures::user(&conn, "alice", 5);
        let bob = fixtures::user(&conn, "bob", 5);
        let challenge = fixtures::challenge(&conn, &alice, ChallengeStatus::Completed, 100);

        insert(&conn, &comment(challenge.id, bob.id, "second", 300)).expect("insert");
        insert(&conn, &comment(challenge.id, alice.id, "first", 200)).expect("insert");

        let views = list_for_challenge(&conn, &challenge.id).expect("list");
        let bodies: Vec<&str> = views.iter().map(|v| v.comment.content.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
        assert_eq!(
            views[1].author.as_ref().map(|a| a.username.as_str()),
            Some("bob")
        );
        assert_eq!(count_for_challenge(&conn, &challenge.id).expect("count"), 2);
    }

    #[test]
    fn test_delete_for_challenge_scoped() {
        let conn = test_db();
        let alice = fixtures::user(&conn, "alice", 5);
        let one = fixtures::challenge(&conn, &alice, ChallengeStatus::Completed, 100);
        let two = fixtures::challenge(&conn, &alice, ChallengeStatus::Completed, 200);
        insert(&conn, &comment(one.id, alice.id, "a", 1)).expect("insert");
        insert(&conn, &comment(one.id, alice.id, "b", 2)).expect("insert");
        insert(&conn, &comment(two.id, alice.id, "c", 3)).expect("insert");

        assert_eq!(delete_for_challenge(&conn, &one.id).expect("delete"), 2);
        assert_eq!(load_all(&conn).expect("load").len(), 1);
    }
}
