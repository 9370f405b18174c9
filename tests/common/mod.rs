#![allow(dead_code)]
//! Shared integration test utilities.
//!
//! Import with:
//! ```
//! mod common;
//! use common::*;
//! ```

pub use handoff::test_utils::init_test_logging;

/// Initialize logging and announce the running test.
pub fn init_test(name: &str) {
    init_test_logging();
    handoff::test_phase!(name);
}
