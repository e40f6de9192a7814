//! Drill for memorizing a letter-substitution cipher.
//!
//! The binary in `main.rs` is thin CLI and terminal glue; everything it drives
//! lives here so benchmarks and integration tests can reach it.

pub mod app;
pub mod cheatsheet;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod event;
pub mod session;
pub mod store;
pub mod ui;
