//! Points ledger.
//!
//! Points enter the system only through [`mint`]. Likes and unlikes move
//! them between users with [`transfer`], and the compensations after a
//! deletion are applied as one [`refund_batch`].

use std::collections::BTreeMap;
use std::fmt;

use rusqlite::Connection;
use tracing::{debug, info};
use yolo_db::queries::users;
use yolo_types::UserId;

use crate::error::{CoreError, Result};
use crate::identity::adjust_balance;
use crate::Engine;

/// Why points were created or destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MintReason {
    Registration,
    CheckIn,
    Completion,
    DeletionReversal,
}

impl fmt::Display for MintReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MintReason::Registration => "registration",
            MintReason::CheckIn => "check_in",
            MintReason::Completion => "completion",
            MintReason::DeletionReversal => "deletion_reversal",
        })
    }
}

/// Create (or, with a negative amount, destroy) points. Returns the new balance.
pub fn mint(conn: &Connection, user: &UserId, amount: i64, reason: MintReason) -> Result<u64> {
    let balance = adjust_balance(conn, user, amount)?;
    info!(user = %user, amount, %reason, balance, "Points minted");
    Ok(balance)
}

/// Move `amount` from `from` to `to`. Fails without touching either balance
/// if `from` cannot cover it. Returns both new balances.
pub fn transfer(conn: &Connection, from: &UserId, to: &UserId, amount: u64) -> Result<(u64, u64)> {
    let available =
        users::balance(conn, from)?.ok_or_else(|| CoreError::NotFound(format!("user {from}")))?;
    if users::balance(conn, to)?.is_none() {
        return Err(CoreError::NotFound(format!("user {to}")));
    }
    if available < amount {
        return Err(CoreError::InsufficientBalance {
            required: amount,
            available,
        });
    }

    let from_balance = adjust_balance(conn, from, -(amount as i64))?;
    let to_balance = adjust_balance(conn, to, amount as i64)?;
    debug!(from = %from, to = %to, amount, "Points transferred");
    Ok((from_balance, to_balance))
}

/// Apply signed balance adjustments. Entries for the same user are summed
/// first so each user is clamped at most once.
pub fn refund_batch(conn: &Connection, entries: &[(UserId, i64)]) -> Result<()> {
    let mut totals: BTreeMap<UserId, i64> = BTreeMap::new();
    for (user, amount) in entries {
        *totals.entry(*user).or_default() += amount;
    }
    for (user, amount) in totals {
        if amount != 0 {
            adjust_balance(conn, &user, amount)?;
        }
    }
    Ok(())
}

impl Engine {
    pub fn mint(&self, user: &UserId, amount: i64, reason: MintReason) -> Result<u64> {
        self.write(|conn, _| mint(conn, user, amount, reason))
    }

    pub fn transfer(&self, from: &UserId, to: &UserId, amount: u64) -> Result<(u64, u64)> {
        self.write(|conn, _| transfer(conn, from, to, amount))
    }

    pub fn refund_batch(&self, entries: &[(UserId, i64)]) -> Result<()> {
        self.write(|conn, _| refund_batch(conn, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yolo_types::User;

    fn setup() -> (Engine, User, User) {
        let engine = Engine::open_memory().expect("open");
        let alice = engine
            .register("alice", "alice@example.com", "h")
            .expect("alice");
        let bob = engine.register("bob", "bob@example.com", "h").expect("bob");
        (engine, alice, bob)
    }

    fn balance(engine: &Engine, user: &User) -> u64 {
        engine
            .get_user(&user.id)
            .expect("get")
            .expect("exists")
            .balance
    }

    #[test]
    fn test_mint_and_reverse() {
        let (engine, alice, _) = setup();
        assert_eq!(
            engine
                .mint(&alice.id, 10, MintReason::Completion)
                .expect("mint"),
            15
        );
        assert_eq!(
            engine
                .mint(&alice.id, -10, MintReason::DeletionReversal)
                .expect("reverse"),
            5
        );
    }

    #[test]
    fn test_transfer_checks_balance() {
        let (engine, alice, bob) = setup();
        assert_eq!(engine.transfer(&bob.id, &alice.id, 5).expect("transfer"), (0, 10));

        let err = engine.transfer(&bob.id, &alice.id, 1).expect_err("empty");
        assert!(matches!(
            err,
            CoreError::InsufficientBalance {
                required: 1,
                available: 0
            }
        ));
        assert_eq!(balance(&engine, &alice), 10);
        assert_eq!(balance(&engine, &bob), 0);
    }

    #[test]
    fn test_transfer_to_unknown_user_moves_nothing() {
        let (engine, alice, _) = setup();
        let err = engine
            .transfer(&alice.id, &uuid::Uuid::new_v4(), 1)
            .expect_err("unknown recipient");
        assert!(matches!(err, CoreError::NotFound(_)));
        assert_eq!(balance(&engine, &alice), 5);
    }

    #[test]
    fn test_refund_batch_coalesces() {
        let (engine, alice, bob) = setup();
        // Summed to -4 for alice, so the floor is never touched mid-batch.
        engine
            .refund_batch(&[(alice.id, -8), (bob.id, 1), (alice.id, 4), (bob.id, 1)])
            .expect("batch");
        assert_eq!(balance(&engine, &alice), 1);
        assert_eq!(balance(&engine, &bob), 7);
    }

    #[test]
    fn test_refund_batch_is_atomic() {
        let (engine, alice, _) = setup();
        let err = engine
            .refund_batch(&[(alice.id, 3), (uuid::Uuid::new_v4(), 1)])
            .expect_err("unknown user");
        assert!(matches!(err, CoreError::NotFound(_)));
        assert_eq!(balance(&engine, &alice), 5);
    }
}
