//! Daily check-in query functions.

use rusqlite::Connection;
use uuid::Uuid;
use yolo_types::CheckIn;

use crate::Result;

/// Record a check-in. Returns `false` if one already exists for that day.
pub fn insert(conn: &Connection, check_in: &CheckIn) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO check_ins (user_id, day) VALUES (?1, ?2)",
        rusqlite::params![check_in.user_id, check_in.day as i64],
    )?;
    Ok(inserted == 1)
}

pub fn exists(conn: &Connection, user_id: &Uuid, day: u64) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM check_ins WHERE user_id = ?1 AND day = ?2)",
        rusqlite::params![user_id, day as i64],
        |row| row.get(0),
    )?;
    Ok(found)
}

pub fn load_all(conn: &Connection) -> Result<Vec<CheckIn>> {
    let mut stmt = conn.prepare("SELECT user_id, day FROM check_ins ORDER BY day, rowid")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CheckIn {
                user_id: row.get(0)?,
                day: row.get::<_, i64>(1)? as u64,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn replace_all(conn: &Connection, check_ins: &[CheckIn]) -> Result<()> {
    conn.execute("DELETE FROM check_ins", [])?;
    for check_in in check_ins {
        insert(conn, check_in)?;
    }
    Ok(())
}
