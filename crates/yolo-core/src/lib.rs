//! # yolo-core
//!
//! Engagement ledger and challenge lifecycle engine.
//!
//! [`Engine`] owns the store. Each module adds its operations to `Engine`
//! and also exposes them as free functions over a `&Connection`, so they
//! compose inside one transaction:
//!
//! - [`identity`]: registration, lookup, profile, the balance primitive
//! - [`ledger`]: mint, transfer, batched refunds
//! - [`lifecycle`]: accept / complete / delete and the feed views
//! - [`social`]: follow graph and profiles
//! - [`engagement`]: likes, comments, daily check-in

pub mod clock;
pub mod engagement;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod lifecycle;
pub mod social;
pub mod store;

pub use clock::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use error::{CoreError, Result};
pub use ledger::MintReason;
pub use store::Engine;
pub use yolo_db::snapshot::{ReadMode, Snapshot};
