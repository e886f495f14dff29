//! Screening call domain module.
//!
//! Drives an automated candidate screening call: extracts facts from each
//! candidate utterance and walks the call through its fixed stages.

mod context;
mod datetime;
mod engine;
mod entities;
mod extractor;
mod stage;
pub mod templates;

pub use context::{infer_stage_from_transcript, ConversationContext, Speaker, TranscriptEntry};
pub use engine::{Answer, AnswerKeywords, DialogueConfig, DialogueEngine, TurnOutcome};
pub use entities::Entities;
pub use extractor::{
    extract_compensation, extract_date_time, extract_entities, extract_notice_period,
    CompensationFigures, EntityExtractor, PatternExtractor,
};
pub use stage::Stage;
