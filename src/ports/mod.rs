//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationRepository` - Persistence of screening call contexts

mod conversation_repository;

pub use conversation_repository::{ConversationRepository, RepositoryError};
