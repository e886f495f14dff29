//! Conversation repository port.
//!
//! Defines the contract for persisting screening call contexts between
//! turns. The context is the whole aggregate; implementations store and
//! return it as a unit.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::ConversationId;
use crate::domain::screening::ConversationContext;

/// Errors raised by conversation storage.
///
/// A missing conversation is not an error at this level; lookups return
/// `Ok(None)` and handlers decide what that means.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Repository port for screening call contexts.
///
/// Implementations do not serialize concurrent turns of the same call;
/// callers process one utterance per conversation at a time.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Inserts or replaces a context, keyed by its id.
    async fn save(&self, context: &ConversationContext) -> Result<(), RepositoryError>;

    /// Finds a context by id.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> Result<Option<ConversationContext>, RepositoryError>;

    /// Checks whether a context is stored under `id`.
    async fn exists(&self, id: &ConversationId) -> Result<bool, RepositoryError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
