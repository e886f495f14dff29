//! Conversation context for a screening call.
//!
//! The context is owned by the caller (persisted between turns); the
//! dialogue engine only reads snapshots of it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, Timestamp};

use super::entities::Entities;
use super::stage::Stage;

/// Transcripts shorter than this carry no usable stage markers.
const MIN_TRANSCRIPT_LEN: usize = 10;

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// Call bookkeeping, e.g. which job the call is about.
    System,
    Agent,
    Candidate,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Agent => "Agent",
            Self::Candidate => "Candidate",
        }
    }
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// 1-based position in the transcript.
    pub sequence: u32,
    pub speaker: Speaker,
    pub text: String,
}

/// Running state of one screening call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    id: ConversationId,
    transcript: Vec<TranscriptEntry>,
    stage: Option<Stage>,
    entities: Entities,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ConversationContext {
    /// Starts a new call: `Greeting` stage, empty transcript, no entities.
    pub fn begin() -> Self {
        Self::begin_with_id(ConversationId::new())
    }

    /// Starts a new call under a caller-chosen id.
    pub fn begin_with_id(id: ConversationId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            transcript: Vec::new(),
            stage: Some(Stage::Greeting),
            entities: Entities::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a context from stored parts.
    ///
    /// `stage` may be `None` for records written before stages were stored;
    /// [`ConversationContext::determine_stage`] then falls back to the transcript.
    pub fn reconstitute(
        id: ConversationId,
        transcript: Vec<TranscriptEntry>,
        stage: Option<Stage>,
        entities: Entities,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            transcript,
            stage,
            entities,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// The explicitly stored stage, if any.
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    /// Cumulative entities across all turns so far.
    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Appends a transcript line and returns it.
    pub fn record(&mut self, speaker: Speaker, text: impl Into<String>) -> &TranscriptEntry {
        let sequence = self.transcript.len() as u32 + 1;
        self.transcript.push(TranscriptEntry {
            sequence,
            speaker,
            text: text.into(),
        });
        self.touch();
        &self.transcript[self.transcript.len() - 1]
    }

    /// Merges one turn's extraction into the cumulative entities.
    pub fn apply_entities(&mut self, latest: &Entities) {
        self.entities.merge(latest);
        self.touch();
    }

    pub fn set_stage(&mut self, stage: Stage) {
        self.stage = Some(stage);
        self.touch();
    }

    /// Renders the transcript as `Speaker: text` lines.
    pub fn transcript_text(&self) -> String {
        self.transcript
            .iter()
            .map(|entry| format!("{}: {}", entry.speaker.label(), entry.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Resolves the stage the conversation is in.
    ///
    /// The stored stage is authoritative; only contexts without one fall
    /// back to scanning the transcript.
    pub fn determine_stage(&self) -> Stage {
        match self.stage {
            Some(stage) => stage,
            None => infer_stage_from_transcript(&self.transcript_text()),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

/// Guesses the stage from agent phrases left in a transcript.
///
/// Markers are checked from the most advanced stage backwards so a
/// partially completed call resolves to the furthest point it reached.
pub fn infer_stage_from_transcript(transcript: &str) -> Stage {
    if transcript.len() < MIN_TRANSCRIPT_LEN {
        return Stage::Greeting;
    }

    let text = transcript.to_lowercase();

    if text.contains("calendar invitation") || text.contains("anything else you") {
        return Stage::Closing;
    }
    if text.contains("scheduled your interview") && text.contains("is that correct") {
        return Stage::Confirmation;
    }
    if text.contains("available for an interview") {
        return Stage::Availability;
    }
    if text.contains("current and expected ctc") {
        return Stage::Ctc;
    }
    if text.contains("notice period") {
        return Stage::NoticePeriod;
    }
    // "interested in" marks the greeting, which is also the default.
    Stage::Greeting
}
