//! Core types shared across SimCheck facilities
//!
//! This crate holds the canonical field keys and event names used by the
//! logging facility in `simcheck-core` and by the CLI, so every crate emits
//! the same structured log shape.

pub mod schema;
