//! GetConversationHandler - Query handler for retrieving a screening call.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::ConversationId;
use crate::domain::screening::ConversationContext;
use crate::ports::{ConversationRepository, RepositoryError};

/// Query to get a conversation.
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub conversation_id: ConversationId,
}

/// Errors that can occur when reading a conversation.
#[derive(Debug, Clone, Error)]
pub enum GetConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<RepositoryError> for GetConversationError {
    fn from(err: RepositoryError) -> Self {
        GetConversationError::RepositoryError(err.to_string())
    }
}

/// Handler for getting conversations.
pub struct GetConversationHandler {
    repository: Arc<dyn ConversationRepository>,
}

impl GetConversationHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetConversationQuery,
    ) -> Result<ConversationContext, GetConversationError> {
        self.repository
            .find_by_id(&query.conversation_id)
            .await?
            .ok_or(GetConversationError::NotFound(query.conversation_id))
    }
}
