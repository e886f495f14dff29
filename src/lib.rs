//! Screening Agent - Scripted candidate screening calls
//!
//! This crate implements the dialogue engine of an automated screening
//! call: entity extraction from candidate utterances and the stage
//! machine that decides what the agent says next.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
