//! Screening call command and query handlers.
//!
//! Starting a call, processing candidate utterances and reading a call back.

mod get_conversation;
mod process_utterance;
mod start_call;

pub use get_conversation::{GetConversationError, GetConversationHandler, GetConversationQuery};
pub use process_utterance::{
    ProcessUtteranceCommand, ProcessUtteranceError, ProcessUtteranceHandler,
    ProcessUtteranceResult,
};
pub use start_call::{StartCallCommand, StartCallError, StartCallHandler, StartCallResult};
