//! In-Memory Conversation Repository Adapter
//!
//! Keeps screening call contexts in a process-local map.
//! Useful for testing, development and the interactive binary.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ConversationId;
use crate::domain::screening::ConversationContext;
use crate::ports::{ConversationRepository, RepositoryError};

/// In-memory storage for conversation contexts
#[derive(Debug, Clone)]
pub struct InMemoryConversationRepository {
    contexts: Arc<RwLock<HashMap<ConversationId, ConversationContext>>>,
}

impl InMemoryConversationRepository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self {
            contexts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored conversations
    pub async fn len(&self) -> usize {
        self.contexts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contexts.read().await.is_empty()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.contexts.write().await.clear();
    }
}

impl Default for InMemoryConversationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn save(&self, context: &ConversationContext) -> Result<(), RepositoryError> {
        let mut contexts = self.contexts.write().await;
        contexts.insert(context.id(), context.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> Result<Option<ConversationContext>, RepositoryError> {
        let contexts = self.contexts.read().await;
        Ok(contexts.get(id).cloned())
    }

    async fn exists(&self, id: &ConversationId) -> Result<bool, RepositoryError> {
        Ok(self.contexts.read().await.contains_key(id))
    }
}
