// This is the main library file that re-exports the public API
// and defines the module structure.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm_service;
pub mod message;
pub mod provider;
pub mod registry;
pub mod secret;

// Re-export the main types for convenient usage
pub use chat::{ChatSession, SYSTEM_INSTRUCTION};
pub use config::{AppConfig, ConfigError, ProviderSettings};
pub use error::{Error, Result};
pub use llm_service::{ChatCall, ChatService, HttpChatService, MockChatService};
pub use message::{ChatMessage, Role};
pub use provider::{HttpTranslator, WireFormat};
pub use registry::{ProviderDefaults, ProviderId};
pub use secret::Secret;
