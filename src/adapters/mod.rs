//! Adapters - Implementations of port interfaces.
//!
//! - `storage` - Conversation context storage

pub mod storage;

pub use storage::InMemoryConversationRepository;
