//! Likes, comments and check-ins.

use serde::{Deserialize, Serialize};

use crate::identity::UserSummary;
use crate::{ChallengeId, CommentId, LikeId, UserId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct Comment {
    pub id: CommentId,
    pub challenge_id: ChallengeId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: u64,
}

/// A comment together with its author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Option<UserSummary>,
}

/// One heart given by `user_id` to the owner of `challenge_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: LikeId,
    pub challenge_id: ChallengeId,
    pub user_id: UserId,
    pub created_at: u64,
}

/// A daily check-in. `day` is the UTC day number (see [`crate::day_of`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub user_id: UserId,
    pub day: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct LikeOutcome {
    /// State after the toggle.
    pub liked: bool,
    pub like_count: u64,
    /// The liker's balance after the toggle.
    pub user_balance: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct CheckInOutcome {
    /// False when the user already checked in today.
    pub success: bool,
    pub new_balance: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct CheckInStatus {
    pub checked_in: bool,
    pub balance: u64,
}
