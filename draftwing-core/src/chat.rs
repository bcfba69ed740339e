use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{AppConfig, ProviderSettings};
use crate::error::{Error, Result};
use crate::llm_service::{ChatCall, ChatService};
use crate::message::ChatMessage;
use crate::registry::ProviderId;
use crate::secret::Secret;

/// The steering prompt seeded at index 0 of every conversation.
pub const SYSTEM_INSTRUCTION: &str = "You are a writing assistant built into a Markdown blog \
editor. Help the author draft, revise, and polish posts, answer questions about Markdown \
syntax and front matter, and keep replies concise enough to paste straight into the editor.";

/// One conversation with the configured provider.
///
/// The session owns its history exclusively: index 0 is always the system
/// instruction, turns are append-only, and the only truncation is
/// [`ChatSession::reset`]. Provider settings are snapshotted at
/// construction; editing the application config later requires a new
/// session.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use draftwing_core::{ChatSession, MockChatService, ProviderId, ProviderSettings};
///
/// let service = Arc::new(MockChatService::new());
/// let session = ChatSession::new(ProviderId::OpenAi, ProviderSettings::default(), service);
/// assert_eq!(session.history().len(), 1);
/// ```
pub struct ChatSession {
    provider: ProviderId,
    settings: ProviderSettings,
    history: Vec<ChatMessage>,
    service: Arc<dyn ChatService>,
}

impl ChatSession {
    /// Creates a session seeded with the system instruction. No I/O.
    pub fn new(
        provider: ProviderId,
        settings: ProviderSettings,
        service: Arc<dyn ChatService>,
    ) -> Self {
        Self {
            provider,
            settings,
            history: vec![ChatMessage::system(SYSTEM_INSTRUCTION)],
            service,
        }
    }

    /// Creates a session for the provider selected in `config`, or `None`
    /// when that provider has no credential configured.
    pub fn from_config(config: &AppConfig, service: Arc<dyn ChatService>) -> Option<Self> {
        let settings = config.selected_settings();
        settings.credential()?;
        Some(Self::new(config.llm_provider, settings, service))
    }

    /// The provider this session talks to
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// The conversation so far, system instruction first
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Sends one user turn and returns the text to display.
    ///
    /// On success the reply is appended to the history and returned. On any
    /// failure the history keeps only the user turn and the returned string
    /// is `"Error: "` plus the failure message; the caller decides whether
    /// to show it as a chat bubble. The session stays usable either way.
    pub async fn send_message(&mut self, text: impl Into<String>) -> String {
        self.history.push(ChatMessage::user(text));
        match self.request_reply().await {
            Ok(reply) => {
                self.history.push(ChatMessage::assistant(reply.clone()));
                reply
            }
            Err(e) => {
                warn!(provider = %self.provider, error = %e, "chat request failed");
                format!("Error: {e}")
            }
        }
    }

    /// Fetches the model catalogue for this session's provider
    ///
    /// # Errors
    ///
    /// Returns an error when no credential is configured or the catalogue
    /// request fails.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let call = self.call_with(Vec::new())?;
        self.service.list_models(&call).await
    }

    /// Starts a new topic: drops the whole history and reseeds the system
    /// instruction. Idempotent.
    pub fn reset(&mut self) {
        self.history.clear();
        self.history.push(ChatMessage::system(SYSTEM_INSTRUCTION));
    }

    async fn request_reply(&self) -> Result<String> {
        let call = self.call_with(self.history.clone())?;
        debug!(
            provider = %self.provider,
            model = %call.model,
            turns = call.messages.len(),
            "dispatching chat request"
        );
        self.service.send(&call).await
    }

    fn call_with(&self, messages: Vec<ChatMessage>) -> Result<ChatCall> {
        let Some(key) = self.settings.credential() else {
            return Err(Error::MissingCredential(self.provider));
        };
        Ok(ChatCall {
            provider: self.provider,
            base_url: self.settings.effective_base_url(self.provider).to_string(),
            api_key: Secret::new(key.to_string()),
            model: self.settings.effective_model(self.provider).to_string(),
            messages,
        })
    }
}
