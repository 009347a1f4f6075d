//! User records and identity views.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// A stored user account.
///
/// `credential_hash` is opaque to this workspace; it is produced and checked
/// by the external credential service. Use [`User::public`] when a record
/// leaves the process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub credential_hash: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    /// Spendable hearts. Never negative.
    pub balance: u64,
    pub created_at: u64,
}

/// A user record without the credential hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub balance: u64,
    pub created_at: u64,
}

/// Identity summary attached to feed cards, comments and follow lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub balance: u64,
}

/// Partial profile update. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Challenge counters for a user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct UserStats {
    pub total: u64,
    pub completed: u64,
    pub balance: u64,
}

/// Public profile page for a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
pub struct UserProfile {
    pub user: UserSummary,
    pub bio: Option<String>,
    pub stats: UserStats,
    pub following_count: u64,
    pub followers_count: u64,
    /// Whether the viewer follows this user. `None` without a viewer.
    pub is_following: Option<bool>,
}

impl User {
    /// Strip the credential hash.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
            balance: self.balance,
            created_at: self.created_at,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            avatar: self.avatar.clone(),
            balance: self.balance,
        }
    }
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.avatar.is_none() && self.bio.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: uuid::Uuid::nil(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            credential_hash: "$argon2id$opaque".into(),
            display_name: "Alice".into(),
            avatar: None,
            bio: Some("hi".into()),
            balance: 7,
            created_at: 1000,
        }
    }

    #[test]
    fn test_public_view_drops_credential() {
        let json = serde_json::to_value(sample().public()).expect("serialize");
        assert!(json.get("credential_hash").is_none());
        assert_eq!(json["balance"], 7);
    }

    #[test]
    fn test_profile_update_defaults() {
        let update: ProfileUpdate = serde_json::from_str(r#"{"bio":"new"}"#).expect("parse");
        assert_eq!(update.bio.as_deref(), Some("new"));
        assert!(update.display_name.is_none());
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }
}
