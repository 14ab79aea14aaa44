//! Test utilities for the marketplace crate.
//!
//! Shared helpers for unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and when the `test-support` feature is on.

pub mod clock;
