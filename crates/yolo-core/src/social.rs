//! Follow graph.

use rusqlite::Connection;
use tracing::debug;
use yolo_db::queries::{challenges, follows};
use yolo_types::{Follow, FollowEntry, FollowOutcome, UserId, UserProfile, UserStats};

use crate::error::{CoreError, Result};
use crate::identity::require_user;
use crate::Engine;

/// Flip the follower→followee edge.
pub fn toggle_follow(
    conn: &Connection,
    now: u64,
    follower: &UserId,
    followee: &UserId,
) -> Result<FollowOutcome> {
    let following = if follows::exists(conn, follower, followee)? {
        follows::remove(conn, follower, followee)?;
        false
    } else {
        if follower == followee {
            return Err(CoreError::InvalidArgument("cannot follow yourself".into()));
        }
        require_user(conn, follower)?;
        require_user(conn, followee)?;
        follows::insert(
            conn,
            &Follow {
                follower_id: *follower,
                followee_id: *followee,
                created_at: now,
            },
        )?;
        true
    };

    debug!(follower = %follower, followee = %followee, following, "Follow toggled");
    Ok(FollowOutcome {
        following,
        followers_count: follows::count_followers(conn, followee)?,
    })
}

fn annotate(
    conn: &Connection,
    mut entries: Vec<FollowEntry>,
    viewer: Option<&UserId>,
) -> Result<Vec<FollowEntry>> {
    if let Some(viewer) = viewer {
        let followed = follows::followee_ids(conn, viewer)?;
        for entry in &mut entries {
            entry.is_following = Some(followed.contains(&entry.user.id));
        }
    }
    Ok(entries)
}

pub fn profile(conn: &Connection, user: &UserId, viewer: Option<&UserId>) -> Result<UserProfile> {
    let record = require_user(conn, user)?;
    let (total, completed) = challenges::counts_for_user(conn, user)?;
    let is_following = match viewer {
        Some(viewer) => Some(follows::exists(conn, viewer, user)?),
        None => None,
    };
    Ok(UserProfile {
        stats: UserStats {
            total,
            completed,
            balance: record.balance,
        },
        following_count: follows::count_following(conn, user)?,
        followers_count: follows::count_followers(conn, user)?,
        is_following,
        bio: record.bio.clone(),
        user: record.summary(),
    })
}

impl Engine {
    pub fn toggle_follow(&self, follower: &UserId, followee: &UserId) -> Result<FollowOutcome> {
        self.write(|conn, now| toggle_follow(conn, now, follower, followee))
    }

    /// Who `user` follows, newest first, annotated for `viewer`.
    pub fn following(&self, user: &UserId, viewer: Option<&UserId>) -> Result<Vec<FollowEntry>> {
        self.read(|conn| {
            require_user(conn, user)?;
            annotate(conn, follows::following(conn, user)?, viewer)
        })
    }

    /// Who follows `user`, newest first, annotated for `viewer`.
    pub fn followers(&self, user: &UserId, viewer: Option<&UserId>) -> Result<Vec<FollowEntry>> {
        self.read(|conn| {
            require_user(conn, user)?;
            annotate(conn, follows::followers(conn, user)?, viewer)
        })
    }

    pub fn count_following(&self, user: &UserId) -> Result<u64> {
        self.read(|conn| Ok(follows::count_following(conn, user)?))
    }

    pub fn count_followers(&self, user: &UserId) -> Result<u64> {
        self.read(|conn| Ok(follows::count_followers(conn, user)?))
    }

    pub fn profile(&self, user: &UserId, viewer: Option<&UserId>) -> Result<UserProfile> {
        self.read(|conn| profile(conn, user, viewer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use yolo_types::User;

    fn setup() -> (Engine, User, User, User) {
        let engine = Engine::open_memory().expect("open");
        let a = engine.register("alice", "alice@example.com", "h").expect("a");
        let b = engine.register("bob", "bob@example.com", "h").expect("b");
        let c = engine.register("carol", "carol@example.com", "h").expect("c");
        (engine, a, b, c)
    }

    #[test]
    fn test_toggle_alternates() {
        let (engine, alice, bob, _) = setup();
        let flips: Vec<bool> = (0..3)
            .map(|_| engine.toggle_follow(&alice.id, &bob.id).expect("toggle").following)
            .collect();
        assert_eq!(flips, vec![true, false, true]);
        assert_eq!(engine.count_followers(&bob.id).expect("count"), 1);
        assert_eq!(engine.count_following(&alice.id).expect("count"), 1);
    }

    #[test]
    fn test_toggle_rejects_self_and_unknown() {
        let (engine, alice, _, _) = setup();
        assert!(matches!(
            engine.toggle_follow(&alice.id, &alice.id),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            engine.toggle_follow(&alice.id, &Uuid::new_v4()),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_outcome_reports_followers() {
        let (engine, alice, bob, carol) = setup();
        engine.toggle_follow(&alice.id, &carol.id).expect("a->c");
        let outcome = engine.toggle_follow(&bob.id, &carol.id).expect("b->c");
        assert_eq!(outcome.followers_count, 2);
        let outcome = engine.toggle_follow(&alice.id, &carol.id).expect("unfollow");
        assert_eq!(outcome.followers_count, 1);
    }

    #[test]
    fn test_lists_annotated_for_viewer() {
        let (engine, alice, bob, carol) = setup();
        engine.toggle_follow(&alice.id, &bob.id).expect("a->b");
        engine.toggle_follow(&alice.id, &carol.id).expect("a->c");
        engine.toggle_follow(&carol.id, &bob.id).expect("c->b");

        let seen_by_carol = engine
            .following(&alice.id, Some(&carol.id))
            .expect("following");
        let flags: Vec<(String, Option<bool>)> = seen_by_carol
            .into_iter()
            .map(|e| (e.user.username, e.is_following))
            .collect();
        assert_eq!(
            flags,
            vec![("carol".to_string(), Some(false)), ("bob".to_string(), Some(true))]
        );

        let plain = engine.followers(&bob.id, None).expect("followers");
        assert_eq!(plain.len(), 2);
        assert!(plain.iter().all(|e| e.is_following.is_none()));
    }

    #[test]
    fn test_profile() {
        let (engine, alice, bob, _) = setup();
        engine.toggle_follow(&bob.id, &alice.id).expect("b->a");

        let seen_by_bob = engine.profile(&alice.id, Some(&bob.id)).expect("profile");
        assert_eq!(seen_by_bob.user.username, "alice");
        assert_eq!(seen_by_bob.followers_count, 1);
        assert_eq!(seen_by_bob.following_count, 0);
        assert_eq!(seen_by_bob.is_following, Some(true));
        assert_eq!(seen_by_bob.stats.balance, 5);

        let anonymous = engine.profile(&alice.id, None).expect("profile");
        assert_eq!(anonymous.is_following, None);
        assert!(matches!(
            engine.profile(&Uuid::new_v4(), None),
            Err(CoreError::NotFound(_))
        ));
    }
}
