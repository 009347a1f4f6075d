//! Whole-database snapshots.
//!
//! A snapshot holds every collection in load order. On disk it is one JSON
//! array per collection inside a directory:
//!
//! ```text
//! users.json  challenges.json  comments.json  likes.json  check_ins.json  follows.json
//! ```

use std::fs;
use std::path::Path;

use rusqlite::{Connection, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use yolo_types::{Challenge, CheckIn, Comment, Follow, Like, User};

use crate::queries::{challenges, check_ins, comments, follows, likes, users};
use crate::{DbError, Result};

pub const USERS_FILE: &str = "users.json";
pub const CHALLENGES_FILE: &str = "challenges.json";
pub const COMMENTS_FILE: &str = "comments.json";
pub const LIKES_FILE: &str = "likes.json";
pub const CHECK_INS_FILE: &str = "check_ins.json";
pub const FOLLOWS_FILE: &str = "follows.json";

/// How [`Snapshot::read_dir`] treats a missing or unparseable file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadMode {
    /// Startup import: the collection is treated as empty and a warning logged.
    Startup,
    /// Mid-run import: the read fails.
    Strict,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub challenges: Vec<Challenge>,
    pub comments: Vec<Comment>,
    pub likes: Vec<Like>,
    pub check_ins: Vec<CheckIn>,
    pub follows: Vec<Follow>,
}

impl Snapshot {
    /// Load every collection.
    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(Self {
            users: users::load_all(conn)?,
            challenges: challenges::load_all(conn)?,
            comments: comments::load_all(conn)?,
            likes: likes::load_all(conn)?,
            check_ins: check_ins::load_all(conn)?,
            follows: follows::load_all(conn)?,
        })
    }

    /// Replace every collection with this snapshot in one transaction.
    ///
    /// Dependent collections are cleared before the ones they reference and
    /// inserted after them, so foreign keys hold at every statement.
    pub fn restore(&self, conn: &mut Connection) -> Result<()> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        comments::replace_all(&tx, &[])?;
        likes::replace_all(&tx, &[])?;
        check_ins::replace_all(&tx, &[])?;
        follows::replace_all(&tx, &[])?;
        challenges::replace_all(&tx, &[])?;

        users::replace_all(&tx, &self.users)?;
        challenges::replace_all(&tx, &self.challenges)?;
        comments::replace_all(&tx, &self.comments)?;
        likes::replace_all(&tx, &self.likes)?;
        check_ins::replace_all(&tx, &self.check_ins)?;
        follows::replace_all(&tx, &self.follows)?;
        tx.commit()?;

        info!(
            users = self.users.len(),
            challenges = self.challenges.len(),
            "Snapshot restored"
        );
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.challenges.is_empty()
            && self.comments.is_empty()
            && self.likes.is_empty()
            && self.check_ins.is_empty()
            && self.follows.is_empty()
    }

    /// Read a snapshot directory.
    pub fn read_dir(dir: &Path, mode: ReadMode) -> Result<Self> {
        Ok(Self {
            users: read_collection(dir, USERS_FILE, mode)?,
            challenges: read_collection(dir, CHALLENGES_FILE, mode)?,
            comments: read_collection(dir, COMMENTS_FILE, mode)?,
            likes: read_collection(dir, LIKES_FILE, mode)?,
            check_ins: read_collection(dir, CHECK_INS_FILE, mode)?,
            follows: read_collection(dir, FOLLOWS_FILE, mode)?,
        })
    }

    /// Write a snapshot directory, creating it if needed.
    pub fn write_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        write_collection(dir, USERS_FILE, &self.users)?;
        write_collection(dir, CHALLENGES_FILE, &self.challenges)?;
        write_collection(dir, COMMENTS_FILE, &self.comments)?;
        write_collection(dir, LIKES_FILE, &self.likes)?;
        write_collection(dir, CHECK_INS_FILE, &self.check_ins)?;
        write_collection(dir, FOLLOWS_FILE, &self.follows)?;
        Ok(())
    }
}

fn read_collection<T: DeserializeOwned>(dir: &Path, name: &str, mode: ReadMode) -> Result<Vec<T>> {
    let path = dir.join(name);
    let parsed = fs::read_to_string(&path)
        .map_err(DbError::Io)
        .and_then(|content| {
            serde_json::from_str::<Vec<T>>(&content)
                .map_err(|e| DbError::Serialization(format!("{}: {e}", path.display())))
        });

    match (parsed, mode) {
        (Ok(records), _) => Ok(records),
        (Err(e), ReadMode::Startup) => {
            warn!("Treating {} as empty: {e}", path.display());
            Ok(Vec::new())
        }
        (Err(e), ReadMode::Strict) => Err(e),
    }
}

fn write_collection<T: Serialize>(dir: &Path, name: &str, records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| DbError::Serialization(e.to_string()))?;
    fs::write(dir.join(name), json)?;
    Ok(())
}
