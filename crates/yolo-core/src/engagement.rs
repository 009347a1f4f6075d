//! Likes, comments and daily check-ins.

use rusqlite::Connection;
use tracing::{debug, info};
use uuid::Uuid;
use yolo_db::queries::{check_ins, comments, likes, users};
use yolo_types::{
    day_of, ChallengeId, CheckIn, CheckInOutcome, CheckInStatus, Comment, CommentView, Like,
    LikeOutcome, UserId, CHECK_IN_BONUS, LIKE_COST,
};

use crate::error::{CoreError, Result};
use crate::identity::require_user;
use crate::ledger::{self, MintReason};
use crate::lifecycle::require_challenge;
use crate::Engine;

/// Like or unlike a challenge.
///
/// Liking moves one point from the liker to the owner; unliking moves it
/// back and fails with `InsufficientBalance` if the owner has since spent
/// it. Owners cannot create a like on their own challenges.
pub fn toggle_like(
    conn: &Connection,
    now: u64,
    challenge_id: &ChallengeId,
    user: &UserId,
) -> Result<LikeOutcome> {
    let challenge = require_challenge(conn, challenge_id)?;
    require_user(conn, user)?;

    let liked = match likes::find(conn, challenge_id, user)? {
        Some(existing) => {
            ledger::transfer(conn, &challenge.user_id, user, LIKE_COST)?;
            likes::remove(conn, &existing.id)?;
            false
        }
        None => {
            if challenge.user_id == *user {
                return Err(CoreError::InvalidArgument(
                    "cannot like your own challenge".into(),
                ));
            }
            ledger::transfer(conn, user, &challenge.user_id, LIKE_COST)?;
            likes::insert(
                conn,
                &Like {
                    id: Uuid::new_v4(),
                    challenge_id: *challenge_id,
                    user_id: *user,
                    created_at: now,
                },
            )?;
            true
        }
    };

    let user_balance = users::balance(conn, user)?.unwrap_or_default();
    debug!(challenge = %challenge_id, user = %user, liked, "Like toggled");
    Ok(LikeOutcome {
        liked,
        like_count: likes::count_for_challenge(conn, challenge_id)?,
        user_balance,
    })
}

pub fn add_comment(
    conn: &Connection,
    now: u64,
    challenge_id: &ChallengeId,
    user: &UserId,
    text: &str,
) -> Result<CommentView> {
    require_challenge(conn, challenge_id)?;
    let author = require_user(conn, user)?;
    let content = text.trim();
    if content.is_empty() {
        return Err(CoreError::InvalidArgument("comment must not be empty".into()));
    }

    let comment = Comment {
        id: Uuid::new_v4(),
        challenge_id: *challenge_id,
        user_id: *user,
        content: content.to_string(),
        created_at: now,
    };
    comments::insert(conn, &comment)?;
    Ok(CommentView {
        comment,
        author: Some(author.summary()),
    })
}

/// Claim today's check-in bonus. A second claim on the same UTC day is a
/// soft failure that leaves the balance untouched.
pub fn check_in(conn: &Connection, now: u64, user: &UserId) -> Result<CheckInOutcome> {
    let balance = require_user(conn, user)?.balance;
    let day = day_of(now);
    if !check_ins::insert(conn, &CheckIn { user_id: *user, day })? {
        return Ok(CheckInOutcome {
            success: false,
            new_balance: balance,
        });
    }

    let new_balance = ledger::mint(conn, user, CHECK_IN_BONUS as i64, MintReason::CheckIn)?;
    info!(user = %user, day, "Checked in");
    Ok(CheckInOutcome {
        success: true,
        new_balance,
    })
}

impl Engine {
    pub fn toggle_like(&self, challenge: &ChallengeId, user: &UserId) -> Result<LikeOutcome> {
        self.write(|conn, now| toggle_like(conn, now, challenge, user))
    }

    pub fn add_comment(
        &self,
        challenge: &ChallengeId,
        user: &UserId,
        text: &str,
    ) -> Result<CommentView> {
        self.write(|conn, now| add_comment(conn, now, challenge, user, text))
    }

    /// Comments on a challenge, oldest first.
    pub fn comments(&self, challenge: &ChallengeId) -> Result<Vec<CommentView>> {
        self.read(|conn| {
            require_challenge(conn, challenge)?;
            Ok(comments::list_for_challenge(conn, challenge)?)
        })
    }

    pub fn has_liked(&self, challenge: &ChallengeId, user: &UserId) -> Result<bool> {
        self.read(|conn| Ok(likes::find(conn, challenge, user)?.is_some()))
    }

    pub fn like_count(&self, challenge: &ChallengeId) -> Result<u64> {
        self.read(|conn| Ok(likes::count_for_challenge(conn, challenge)?))
    }

    pub fn check_in(&self, user: &UserId) -> Result<CheckInOutcome> {
        self.write(|conn, now| check_in(conn, now, user))
    }

    pub fn check_in_status(&self, user: &UserId) -> Result<CheckInStatus> {
        self.read(|conn| {
            let balance = require_user(conn, user)?.balance;
            Ok(CheckInStatus {
                checked_in: check_ins::exists(conn, user, day_of(self.now()))?,
                balance,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use proptest::prelude::*;
    use yolo_types::{Category, Challenge, ChallengeDraft, User};

    use crate::clock::ManualTimeSource;

    struct Fixture {
        engine: Engine,
        clock: Arc<ManualTimeSource>,
        owner: User,
        fan: User,
        challenge: Challenge,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualTimeSource::new(1_700_000_000));
        let engine = Engine::open_memory()
            .expect("open")
            .with_time_source(clock.clone());
        let owner = engine
            .register("owner", "owner@example.com", "h")
            .expect("owner");
        let fan = engine.register("fan", "fan@example.com", "h").expect("fan");
        let draft = ChallengeDraft {
            title: "Run a 5k".into(),
            description: "Before breakfast".into(),
            category: Category::Physical,
            difficulty: 70,
            estimated_time: None,
        };
        let challenge = engine.accept_challenge(&owner.id, &draft).expect("accept");
        Fixture {
            engine,
            clock,
            owner,
            fan,
            challenge,
        }
    }

    fn balance(engine: &Engine, user: &User) -> u64 {
        engine
            .get_user(&user.id)
            .expect("get")
            .expect("exists")
            .balance
    }

    #[test]
    fn test_like_then_unlike() {
        let f = fixture();
        let liked = f
            .engine
            .toggle_like(&f.challenge.id, &f.fan.id)
            .expect("like");
        assert!(liked.liked);
        assert_eq!((liked.like_count, liked.user_balance), (1, 4));
        assert_eq!(balance(&f.engine, &f.owner), 6);
        assert!(f.engine.has_liked(&f.challenge.id, &f.fan.id).expect("has"));

        let unliked = f
            .engine
            .toggle_like(&f.challenge.id, &f.fan.id)
            .expect("unlike");
        assert!(!unliked.liked);
        assert_eq!((unliked.like_count, unliked.user_balance), (0, 5));
        assert_eq!(balance(&f.engine, &f.owner), 5);
    }

    #[test]
    fn test_self_like_forbidden_before_balance_check() {
        let f = fixture();
        f.engine.adjust_balance(&f.owner.id, -5).expect("drain");
        let err = f
            .engine
            .toggle_like(&f.challenge.id, &f.owner.id)
            .expect_err("self like");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_like_with_empty_balance() {
        let f = fixture();
        f.engine.adjust_balance(&f.fan.id, -5).expect("drain");
        let err = f
            .engine
            .toggle_like(&f.challenge.id, &f.fan.id)
            .expect_err("broke");
        assert!(matches!(
            err,
            CoreError::InsufficientBalance {
                required: 1,
                available: 0
            }
        ));
        assert_eq!(balance(&f.engine, &f.fan), 0);
        assert_eq!(balance(&f.engine, &f.owner), 5);
        assert_eq!(f.engine.like_count(&f.challenge.id).expect("count"), 0);
    }

    #[test]
    fn test_like_missing_challenge() {
        let f = fixture();
        assert!(matches!(
            f.engine.toggle_like(&Uuid::new_v4(), &f.fan.id),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_comments() {
        let f = fixture();
        let view = f
            .engine
            .add_comment(&f.challenge.id, &f.fan.id, "  go go go  ")
            .expect("comment");
        assert_eq!(view.comment.content, "go go go");
        assert_eq!(view.author.map(|a| a.username), Some("fan".to_string()));

        f.clock.advance(5);
        f.engine
            .add_comment(&f.challenge.id, &f.owner.id, "thanks")
            .expect("reply");
        let thread = f.engine.comments(&f.challenge.id).expect("list");
        let bodies: Vec<&str> = thread.iter().map(|v| v.comment.content.as_str()).collect();
        assert_eq!(bodies, vec!["go go go", "thanks"]);

        assert!(matches!(
            f.engine.add_comment(&f.challenge.id, &f.fan.id, " \n\t"),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            f.engine.add_comment(&Uuid::new_v4(), &f.fan.id, "hi"),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_check_in_once_per_utc_day() {
        let f = fixture();
        let first = f.engine.check_in(&f.fan.id).expect("first");
        assert!(first.success);
        assert_eq!(first.new_balance, 10);

        let second = f.engine.check_in(&f.fan.id).expect("second");
        assert!(!second.success);
        assert_eq!(second.new_balance, 10);

        let status = f.engine.check_in_status(&f.fan.id).expect("status");
        assert!(status.checked_in);

        // 2023-11-14T22:13:20Z plus two hours is the next UTC day.
        f.clock.advance(2 * 3600);
        assert!(!f.engine.check_in_status(&f.fan.id).expect("status").checked_in);
        let next = f.engine.check_in(&f.fan.id).expect("next day");
        assert!(next.success);
        assert_eq!(next.new_balance, 15);
    }

    #[test]
    fn test_unlike_after_owner_spent_the_point() {
        let f = fixture();
        f.engine
            .toggle_like(&f.challenge.id, &f.fan.id)
            .expect("like");
        f.engine.adjust_balance(&f.owner.id, -6).expect("spend");

        let err = f
            .engine
            .toggle_like(&f.challenge.id, &f.fan.id)
            .expect_err("owner is broke");
        assert!(matches!(
            err,
            CoreError::InsufficientBalance {
                required: 1,
                available: 0
            }
        ));
        assert!(f.engine.has_liked(&f.challenge.id, &f.fan.id).expect("has"));
        assert_eq!(balance(&f.engine, &f.fan), 4);
        assert_eq!(balance(&f.engine, &f.owner), 0);
    }

    #[test]
    fn test_imported_self_like_can_be_removed() {
        let f = fixture();
        let mut snapshot = f.engine.export_snapshot().expect("export");
        snapshot.likes.push(Like {
            id: Uuid::new_v4(),
            challenge_id: f.challenge.id,
            user_id: f.owner.id,
            created_at: 1_700_000_000,
        });
        f.engine.import_snapshot(&snapshot).expect("import");

        let outcome = f
            .engine
            .toggle_like(&f.challenge.id, &f.owner.id)
            .expect("unlike own");
        assert!(!outcome.liked);
        assert_eq!((outcome.like_count, outcome.user_balance), (0, 5));
        assert!(matches!(
            f.engine.toggle_like(&f.challenge.id, &f.owner.id),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_like_unlike_pairs_conserve_balances(
            pairs in 0usize..8,
            extra in proptest::bool::ANY,
        ) {
            let f = fixture();
            for _ in 0..(pairs * 2) {
                f.engine.toggle_like(&f.challenge.id, &f.fan.id).expect("toggle");
            }
            prop_assert_eq!(balance(&f.engine, &f.fan), 5);
            prop_assert_eq!(balance(&f.engine, &f.owner), 5);

            if extra {
                f.engine.toggle_like(&f.challenge.id, &f.fan.id).expect("toggle");
                prop_assert_eq!(balance(&f.engine, &f.fan) + balance(&f.engine, &f.owner), 10);
            }
        }
    }
}
