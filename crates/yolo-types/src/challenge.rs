//! Challenge records and lifecycle outcomes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::identity::UserSummary;
use crate::{ChallengeId, ParseLabelError, UserId};

/// Challenge category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Social,
    Physical,
    Mental,
    Chaos,
}

/// Lifecycle status of a challenge.
///
/// `Pending` describes a suggestion the caller holds but has not accepted.
/// It is never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    Pending,
    Active,
    Completed,
}

/// A generated suggestion the user is accepting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct ChallengeDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    /// 1-100.
    pub difficulty: u8,
    #[serde(default)]
    pub estimated_time: Option<String>,
}

/// A persisted challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct Challenge {
    pub id: ChallengeId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: u8,
    pub estimated_time: Option<String>,
    pub status: ChallengeStatus,
    pub photo_url: Option<String>,
    pub completed_at: Option<u64>,
    pub created_at: u64,
}

/// A completed challenge as shown on the wall.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct ChallengeCard {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub owner: Option<UserSummary>,
    pub like_count: u64,
    pub comment_count: u64,
}

/// A single challenge with engagement counters for a viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct ChallengeDetail {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub owner: Option<UserSummary>,
    pub like_count: u64,
    pub comment_count: u64,
    /// False when no viewer is known.
    pub liked_by_viewer: bool,
}

/// Result of deleting a challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct DeleteOutcome {
    /// Points requested from the owner: received likes plus completion bonus.
    pub deducted: u64,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Social => "SOCIAL",
            Category::Physical => "PHYSICAL",
            Category::Mental => "MENTAL",
            Category::Chaos => "CHAOS",
        }
    }
}

impl FromStr for Category {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SOCIAL" => Ok(Category::Social),
            "PHYSICAL" => Ok(Category::Physical),
            "MENTAL" => Ok(Category::Mental),
            "CHAOS" => Ok(Category::Chaos),
            other => Err(ParseLabelError::Category(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Pending => "pending",
            ChallengeStatus::Active => "active",
            ChallengeStatus::Completed => "completed",
        }
    }
}

impl FromStr for ChallengeStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ChallengeStatus::Pending),
            "active" => Ok(ChallengeStatus::Active),
            "completed" => Ok(ChallengeStatus::Completed),
            other => Err(ParseLabelError::Status(other.to_string())),
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Challenge {
    pub fn is_active(&self) -> bool {
        self.status == ChallengeStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == ChallengeStatus::Completed
    }
}
