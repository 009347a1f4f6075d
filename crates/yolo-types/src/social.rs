//! Follow graph records.

use serde::{Deserialize, Serialize};

use crate::identity::UserSummary;
use crate::UserId;

/// Directed edge: `follower_id` follows `followee_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: UserId,
    pub followee_id: UserId,
    pub created_at: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct FollowOutcome {
    /// Edge state after the toggle.
    pub following: bool,
    /// The followee's follower count after the toggle.
    pub followers_count: u64,
}

/// An entry in a following/followers list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct FollowEntry {
    #[serde(flatten)]
    pub user: UserSummary,
    pub bio: Option<String>,
    /// Whether the viewer follows this entry. `None` without a viewer.
    pub is_following: Option<bool>,
}
