//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod screening;

pub use screening::{
    // Commands
    ProcessUtteranceCommand, ProcessUtteranceError, ProcessUtteranceHandler,
    ProcessUtteranceResult, StartCallCommand, StartCallError, StartCallHandler, StartCallResult,
    // Queries
    GetConversationError, GetConversationHandler, GetConversationQuery,
};
