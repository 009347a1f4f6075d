//! # yolo-types
//!
//! Shared domain records and operation outcomes for the Yolo workspace.
//! Every record here is persisted by `yolo-db` and returned by `yolo-core`.

pub mod challenge;
pub mod engagement;
pub mod identity;
pub mod social;

pub use challenge::{
    Category, Challenge, ChallengeCard, ChallengeDetail, ChallengeDraft, ChallengeStatus,
    DeleteOutcome,
};
pub use engagement::{
    CheckIn, CheckInOutcome, CheckInStatus, Comment, CommentView, Like, LikeOutcome,
};
pub use identity::{ProfileUpdate, PublicUser, User, UserProfile, UserStats, UserSummary};
pub use social::{Follow, FollowEntry, FollowOutcome};

/// Common identifier aliases.
pub type UserId = uuid::Uuid;
pub type ChallengeId = uuid::Uuid;
pub type CommentId = uuid::Uuid;
pub type LikeId = uuid::Uuid;

/// Points minted to every new account.
pub const REGISTRATION_BONUS: u64 = 5;

/// Points minted by a successful daily check-in.
pub const CHECK_IN_BONUS: u64 = 5;

/// Points minted when a challenge is completed.
pub const COMPLETION_BONUS: u64 = 10;

/// Points moved from liker to owner by one like.
pub const LIKE_COST: u64 = 1;

/// Length of a check-in day in seconds. Days are counted in UTC.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Difficulty bounds for a challenge (inclusive).
pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 100;

/// Error parsing a stored enum label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseLabelError {
    #[error("unknown category: {0}")]
    Category(String),

    #[error("unknown challenge status: {0}")]
    Status(String),
}

/// The UTC calendar day containing `timestamp` (Unix seconds).
pub fn day_of(timestamp: u64) -> u64 {
    timestamp / SECONDS_PER_DAY
}
