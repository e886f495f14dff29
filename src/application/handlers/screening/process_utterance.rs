//! ProcessUtterance command handler.
//!
//! Runs one turn of a screening call: extract, merge, decide, persist.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::foundation::{ConversationId, StateMachine, ValidationError};
use crate::domain::screening::{
    DialogueEngine, Entities, EntityExtractor, Speaker, Stage,
};
use crate::ports::{ConversationRepository, RepositoryError};

/// Command to process one candidate utterance.
#[derive(Debug, Clone)]
pub struct ProcessUtteranceCommand {
    pub conversation_id: ConversationId,
    /// What the candidate said (speech-to-text output).
    pub utterance: String,
}

impl ProcessUtteranceCommand {
    pub fn new(conversation_id: ConversationId, utterance: impl Into<String>) -> Self {
        Self {
            conversation_id,
            utterance: utterance.into(),
        }
    }
}

/// Errors that can occur when processing an utterance.
#[derive(Debug, Clone, Error)]
pub enum ProcessUtteranceError {
    /// Utterance is empty or whitespace only.
    #[error("Validation error: utterance cannot be empty")]
    EmptyUtterance,

    /// No call is stored under the given id.
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    /// The engine proposed an edge the stage machine does not allow.
    #[error("Invalid stage transition: {0}")]
    InvalidTransition(String),

    /// Repository error during load or save.
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<RepositoryError> for ProcessUtteranceError {
    fn from(err: RepositoryError) -> Self {
        ProcessUtteranceError::RepositoryError(err.to_string())
    }
}

impl From<ValidationError> for ProcessUtteranceError {
    fn from(err: ValidationError) -> Self {
        ProcessUtteranceError::InvalidTransition(err.to_string())
    }
}

/// Result of one processed turn.
#[derive(Debug, Clone)]
pub struct ProcessUtteranceResult {
    /// What the agent says next.
    pub response: String,
    /// Stage the call is in after this turn.
    pub stage: Stage,
    /// Entities found in this utterance alone.
    pub extracted: Entities,
    /// Cumulative entities after merging this turn.
    pub entities: Entities,
}

/// Handler for ProcessUtterance commands.
pub struct ProcessUtteranceHandler {
    repository: Arc<dyn ConversationRepository>,
    extractor: Arc<dyn EntityExtractor>,
    engine: Arc<DialogueEngine>,
}

impl ProcessUtteranceHandler {
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        extractor: Arc<dyn EntityExtractor>,
        engine: Arc<DialogueEngine>,
    ) -> Self {
        Self {
            repository,
            extractor,
            engine,
        }
    }

    /// Handles a process utterance command.
    ///
    /// Load and save are not locked together; callers must not process two
    /// utterances of the same call concurrently.
    pub async fn handle(
        &self,
        cmd: ProcessUtteranceCommand,
    ) -> Result<ProcessUtteranceResult, ProcessUtteranceError> {
        let utterance = cmd.utterance.trim();
        if utterance.is_empty() {
            return Err(ProcessUtteranceError::EmptyUtterance);
        }

        let mut context = self
            .repository
            .find_by_id(&cmd.conversation_id)
            .await?
            .ok_or(ProcessUtteranceError::NotFound(cmd.conversation_id))?;

        let current = context.determine_stage();

        let extracted = self.extractor.extract(utterance);
        context.apply_entities(&extracted);
        context.record(Speaker::Candidate, utterance);
        if current.collects_entity() && extracted.is_empty() {
            debug!(
                conversation_id = %cmd.conversation_id,
                stage = current.label(),
                "no entity found in answer"
            );
        } else {
            debug!(
                conversation_id = %cmd.conversation_id,
                ?extracted,
                "entities extracted"
            );
        }

        let outcome = self.engine.advance(utterance, context.entities(), current);
        let next = current.transition_to(outcome.next_stage)?;
        debug!(
            conversation_id = %cmd.conversation_id,
            from = current.label(),
            to = next.label(),
            "stage decided"
        );

        context.record(Speaker::Agent, outcome.response.clone());
        context.set_stage(next);

        self.repository.save(&context).await?;

        Ok(ProcessUtteranceResult {
            response: outcome.response,
            stage: next,
            extracted,
            entities: *context.entities(),
        })
    }
}
