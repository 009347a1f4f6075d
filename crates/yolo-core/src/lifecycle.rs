//! Challenge lifecycle: accept, complete, delete, and the read views.
//!
//! A user holds at most one active challenge. Completion mints the bonus;
//! deletion reverses the bonus and every like the challenge still holds.

use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;
use yolo_db::queries::{challenges, comments, likes, users};
use yolo_types::{
    Challenge, ChallengeCard, ChallengeDetail, ChallengeDraft, ChallengeId, ChallengeStatus,
    DeleteOutcome, UserId, UserStats, COMPLETION_BONUS, LIKE_COST, MAX_DIFFICULTY,
    MIN_DIFFICULTY,
};

use crate::error::{CoreError, Result};
use crate::identity::require_user;
use crate::ledger::{self, MintReason};
use crate::Engine;

pub(crate) fn require_challenge(conn: &Connection, id: &ChallengeId) -> Result<Challenge> {
    challenges::get(conn, id)?.ok_or_else(|| CoreError::NotFound(format!("challenge {id}")))
}

fn validate(draft: &ChallengeDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(CoreError::InvalidArgument("title must not be empty".into()));
    }
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&draft.difficulty) {
        return Err(CoreError::InvalidArgument(format!(
            "difficulty {} outside {MIN_DIFFICULTY}-{MAX_DIFFICULTY}",
            draft.difficulty
        )));
    }
    Ok(())
}

pub fn accept(
    conn: &Connection,
    now: u64,
    user: &UserId,
    draft: &ChallengeDraft,
) -> Result<Challenge> {
    require_user(conn, user)?;
    validate(draft)?;
    if let Some(active) = challenges::active_for_user(conn, user)? {
        return Err(CoreError::Conflict(format!(
            "user {user} already has active challenge {}",
            active.id
        )));
    }

    let challenge = Challenge {
        id: Uuid::new_v4(),
        user_id: *user,
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        category: draft.category,
        difficulty: draft.difficulty,
        estimated_time: draft.estimated_time.clone(),
        status: ChallengeStatus::Active,
        photo_url: None,
        completed_at: None,
        created_at: now,
    };
    challenges::insert(conn, &challenge)?;
    info!(user = %user, challenge = %challenge.id, "Challenge accepted");
    Ok(challenge)
}

pub fn complete(
    conn: &Connection,
    now: u64,
    id: &ChallengeId,
    requester: &UserId,
    proof: &str,
) -> Result<Challenge> {
    let proof = proof.trim();
    if proof.is_empty() {
        return Err(CoreError::InvalidArgument("proof reference must not be empty".into()));
    }
    let challenge = require_challenge(conn, id)?;
    if challenge.user_id != *requester {
        return Err(CoreError::Forbidden(format!("challenge {id} belongs to another user")));
    }
    if !challenge.is_active() {
        return Err(CoreError::InvalidState(format!(
            "challenge {id} is {}",
            challenge.status
        )));
    }

    challenges::mark_completed(conn, id, proof, now)?;
    ledger::mint(
        conn,
        requester,
        COMPLETION_BONUS as i64,
        MintReason::Completion,
    )?;
    info!(challenge = %id, "Challenge completed");
    require_challenge(conn, id)
}

/// Delete a challenge and undo what it earned.
///
/// The owner loses one point per current like plus the completion bonus if
/// the challenge was completed; each current liker gets their point back.
pub fn delete(conn: &Connection, id: &ChallengeId, requester: &UserId) -> Result<DeleteOutcome> {
    let challenge = require_challenge(conn, id)?;
    if challenge.user_id != *requester {
        return Err(CoreError::Forbidden(format!("challenge {id} belongs to another user")));
    }

    let likers = likes::likers(conn, id)?;
    let received = likers.len() as u64 * LIKE_COST;
    let bonus = if challenge.is_completed() { COMPLETION_BONUS } else { 0 };
    let deducted = received + bonus;

    let removed_comments = comments::delete_for_challenge(conn, id)?;
    likes::delete_for_challenge(conn, id)?;
    challenges::delete(conn, id)?;

    let mut entries: Vec<(UserId, i64)> = likers
        .iter()
        .map(|liker| (*liker, LIKE_COST as i64))
        .collect();
    entries.push((challenge.user_id, -(deducted as i64)));
    ledger::refund_batch(conn, &entries)?;

    info!(
        challenge = %id,
        likes = likers.len(),
        comments = removed_comments,
        deducted,
        reason = %MintReason::DeletionReversal,
        "Challenge deleted"
    );
    Ok(DeleteOutcome { deducted })
}

pub fn detail(
    conn: &Connection,
    id: &ChallengeId,
    viewer: Option<&UserId>,
) -> Result<ChallengeDetail> {
    let challenge = require_challenge(conn, id)?;
    let owner = users::get(conn, &challenge.user_id)?.map(|u| u.summary());
    let liked_by_viewer = match viewer {
        Some(viewer) => likes::find(conn, id, viewer)?.is_some(),
        None => false,
    };
    Ok(ChallengeDetail {
        like_count: likes::count_for_challenge(conn, id)?,
        comment_count: comments::count_for_challenge(conn, id)?,
        owner,
        liked_by_viewer,
        challenge,
    })
}

pub fn stats(conn: &Connection, user: &UserId) -> Result<UserStats> {
    let balance = require_user(conn, user)?.balance;
    let (total, completed) = challenges::counts_for_user(conn, user)?;
    Ok(UserStats {
        total,
        completed,
        balance,
    })
}

impl Engine {
    /// Accept a suggestion as the user's active challenge.
    pub fn accept_challenge(&self, user: &UserId, draft: &ChallengeDraft) -> Result<Challenge> {
        self.write(|conn, now| accept(conn, now, user, draft))
    }

    /// Complete an active challenge with a proof reference.
    pub fn complete_challenge(
        &self,
        id: &ChallengeId,
        requester: &UserId,
        proof: &str,
    ) -> Result<Challenge> {
        self.write(|conn, now| complete(conn, now, id, requester, proof))
    }

    pub fn delete_challenge(&self, id: &ChallengeId, requester: &UserId) -> Result<DeleteOutcome> {
        self.write(|conn, _| delete(conn, id, requester))
    }

    pub fn active_challenge(&self, user: &UserId) -> Result<Option<Challenge>> {
        self.read(|conn| Ok(challenges::active_for_user(conn, user)?))
    }

    /// Every challenge of a user, newest first.
    pub fn challenges_for_user(&self, user: &UserId) -> Result<Vec<Challenge>> {
        self.read(|conn| Ok(challenges::list_for_user(conn, user)?))
    }

    /// The public wall: completed challenges, most recently completed first.
    pub fn completed_feed(&self, limit: u32, offset: u32) -> Result<Vec<ChallengeCard>> {
        self.read(|conn| Ok(challenges::completed_feed(conn, limit, offset)?))
    }

    pub fn completed_for_user(&self, user: &UserId) -> Result<Vec<ChallengeCard>> {
        self.read(|conn| {
            require_user(conn, user)?;
            Ok(challenges::completed_for_user(conn, user)?)
        })
    }

    pub fn challenge_detail(
        &self,
        id: &ChallengeId,
        viewer: Option<&UserId>,
    ) -> Result<ChallengeDetail> {
        self.read(|conn| detail(conn, id, viewer))
    }

    pub fn user_stats(&self, user: &UserId) -> Result<UserStats> {
        self.read(|conn| stats(conn, user))
    }
}
