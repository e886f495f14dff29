//! StartCall command handler.
//!
//! Opens a screening call: creates its context, records the greeting and
//! persists it so later utterances can be processed against it.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::foundation::ConversationId;
use crate::domain::screening::{ConversationContext, DialogueEngine, Speaker};
use crate::ports::{ConversationRepository, RepositoryError};

/// Command to start a screening call.
#[derive(Debug, Clone, Default)]
pub struct StartCallCommand {
    /// Job the call is about, recorded in the transcript when present.
    pub job_title: Option<String>,
}

impl StartCallCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_job(job_title: impl Into<String>) -> Self {
        Self {
            job_title: Some(job_title.into()),
        }
    }
}

/// Errors that can occur when starting a call.
#[derive(Debug, Clone, Error)]
pub enum StartCallError {
    /// Repository error during persistence.
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<RepositoryError> for StartCallError {
    fn from(err: RepositoryError) -> Self {
        StartCallError::RepositoryError(err.to_string())
    }
}

/// Result of starting a call.
#[derive(Debug, Clone)]
pub struct StartCallResult {
    pub conversation_id: ConversationId,
    /// Opening line the agent speaks.
    pub greeting: String,
}

/// Handler for StartCall commands.
pub struct StartCallHandler {
    repository: Arc<dyn ConversationRepository>,
    engine: Arc<DialogueEngine>,
}

impl StartCallHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>, engine: Arc<DialogueEngine>) -> Self {
        Self { repository, engine }
    }

    pub async fn handle(&self, cmd: StartCallCommand) -> Result<StartCallResult, StartCallError> {
        let mut context = ConversationContext::begin();

        let job_title = cmd
            .job_title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty());
        if let Some(title) = job_title {
            context.record(Speaker::System, format!("Call initiated for job: {}", title));
        }

        let greeting = self.engine.greeting();
        context.record(Speaker::Agent, greeting.clone());

        self.repository.save(&context).await?;

        info!(
            conversation_id = %context.id(),
            job_title = job_title.unwrap_or("-"),
            "screening call started"
        );

        Ok(StartCallResult {
            conversation_id: context.id(),
            greeting,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryConversationRepository;
    use crate::domain::screening::{templates, DialogueConfig, Stage};
    use async_trait::async_trait;

    struct FailingRepository;

    #[async_trait]
    impl ConversationRepository for FailingRepository {
        async fn save(&self, _context: &ConversationContext) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("unavailable".to_string()))
        }

        async fn find_by_id(
            &self,
            _id: &ConversationId,
        ) -> Result<Option<ConversationContext>, RepositoryError> {
            Ok(None)
        }
    }

    fn handler_with(repo: Arc<InMemoryConversationRepository>) -> StartCallHandler {
        StartCallHandler::new(repo, Arc::new(DialogueEngine::default()))
    }

    #[tokio::test]
    async fn start_call_persists_greeting_context() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let handler = handler_with(repo.clone());

        let result = handler.handle(StartCallCommand::new()).await.unwrap();
        assert_eq!(result.greeting, templates::GENERIC_GREETING);

        let stored = repo.find_by_id(&result.conversation_id).await.unwrap().unwrap();
        assert_eq!(stored.stage(), Some(Stage::Greeting));
        assert_eq!(stored.transcript().len(), 1);
        assert_eq!(stored.transcript()[0].speaker, Speaker::Agent);
        assert_eq!(stored.transcript()[0].text, result.greeting);
    }

    #[tokio::test]
    async fn start_call_records_job_title() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let handler = handler_with(repo.clone());

        let result = handler
            .handle(StartCallCommand::for_job("Backend Engineer"))
            .await
            .unwrap();

        let stored = repo.find_by_id(&result.conversation_id).await.unwrap().unwrap();
        assert_eq!(stored.transcript()[0].speaker, Speaker::System);
        assert_eq!(
            stored.transcript()[0].text,
            "Call initiated for job: Backend Engineer"
        );
        assert_eq!(stored.transcript()[1].speaker, Speaker::Agent);
    }

    #[tokio::test]
    async fn blank_job_title_is_not_recorded() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let handler = handler_with(repo.clone());

        let result = handler.handle(StartCallCommand::for_job("  ")).await.unwrap();

        let stored = repo.find_by_id(&result.conversation_id).await.unwrap().unwrap();
        assert_eq!(stored.transcript().len(), 1);
    }

    #[tokio::test]
    async fn greeting_uses_configured_company() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let engine = DialogueEngine::new(DialogueConfig::default().with_company_name("Acme"));
        let handler = StartCallHandler::new(repo, Arc::new(engine));

        let result = handler.handle(StartCallCommand::new()).await.unwrap();
        assert!(result.greeting.contains("this is Acme calling"));
    }

    #[tokio::test]
    async fn storage_failure_is_reported() {
        let handler =
            StartCallHandler::new(Arc::new(FailingRepository), Arc::new(DialogueEngine::default()));

        let result = handler.handle(StartCallCommand::new()).await;
        assert!(matches!(result, Err(StartCallError::RepositoryError(msg)) if msg.contains("unavailable")));
    }
}
