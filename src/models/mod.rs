//! Core data models for the species registry.
//!
//! These entities map cleanly to database tables via `sqlx::FromRow` and
//! serialize naturally as JSON via `serde`.

pub mod form;
pub mod session;
pub mod species;
