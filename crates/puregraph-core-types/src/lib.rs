//! Core types shared across puregraph facilities
//!
//! This crate provides the foundational vocabulary used by both the error
//! and logging facilities of `puregraph-core` and by the CLI:
//!
//! - **Schema constants**: Canonical field keys and event names

pub mod schema;
