//! Integration test crate for the Yolo engine.
//!
//! This crate has no library code. It only contains end-to-end scenarios
//! that drive `yolo_core::Engine` across identity, lifecycle, engagement
//! and snapshot boundaries.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p yolo-integration-tests
//! ```
