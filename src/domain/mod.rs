//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `screening` - Screening call stages, entity extraction and the dialogue engine

pub mod foundation;
pub mod screening;
