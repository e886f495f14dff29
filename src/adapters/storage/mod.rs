//! Storage Adapters
//!
//! Implementations of the ConversationRepository port.
//!
//! ## Available Adapters
//!
//! - **InMemoryConversationRepository** - Stores contexts in memory (single process, testing)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryConversationRepository;
//!
//! let repository = Arc::new(InMemoryConversationRepository::new());
//! ```

mod in_memory_conversation_repository;

pub use in_memory_conversation_repository::InMemoryConversationRepository;
