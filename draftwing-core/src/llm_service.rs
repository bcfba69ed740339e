use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::message::ChatMessage;
use crate::provider::{WireFormat, translator_for};
use crate::registry::ProviderId;
use crate::secret::Secret;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One fully resolved outbound call: the provider identity, its effective
/// endpoint configuration, and the conversation to send.
#[derive(Debug, Clone)]
pub struct ChatCall {
    pub provider: ProviderId,
    pub base_url: String,
    pub api_key: Secret<String>,
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// This is anything that can answer a chat call.
///
/// The HTTP implementation talks to the real vendor APIs; the mock answers
/// from a script so session behavior can be tested without a network.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Sends the conversation and returns the assistant's reply text
    async fn send(&self, call: &ChatCall) -> Result<String>;

    /// Fetches the provider's model catalogue
    async fn list_models(&self, call: &ChatCall) -> Result<Vec<String>>;
}

/// A `ChatService` that sends requests over HTTP.
///
/// The wire format is chosen per call from the provider identity and the
/// effective base URL, so a Claude or Gemini call transparently downgrades
/// to the OpenAI-compatible shape when pointed at a relay host.
pub struct HttpChatService {
    client: Client,
}

impl HttpChatService {
    /// Creates a service with the default transport timeouts
    /// (120 s per request, 10 s to connect)
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_timeouts(DEFAULT_REQUEST_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Creates a service with caller-chosen transport timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeouts(request: Duration, connect: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request)
            .connect_timeout(connect)
            .build()?;
        Ok(Self { client })
    }

    async fn execute(&self, request: reqwest::Request) -> Result<String> {
        debug!(method = %request.method(), url = %request.url(), "sending provider request");
        let response = self.client.execute(request).await?;
        let status = response.status();
        info!(%status, "provider responded");
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn send(&self, call: &ChatCall) -> Result<String> {
        let format = WireFormat::select(call.provider, &call.base_url);
        debug!(provider = %call.provider, ?format, "routing chat call");
        let translator = translator_for(format);
        let request = translator.accept(call)?;
        let body = self.execute(request).await?;
        translator.parse(body)
    }

    async fn list_models(&self, call: &ChatCall) -> Result<Vec<String>> {
        let format = WireFormat::select(call.provider, &call.base_url);
        let translator = translator_for(format);
        let request = translator.models_request(call)?;
        let body = self.execute(request).await?;
        translator.parse_models(body)
    }
}

/// A scripted `ChatService` for tests.
///
/// Replies are consumed in order; when the script runs dry the mock falls
/// back to a fixed reply. Every call is recorded for inspection.
#[derive(Default)]
pub struct MockChatService {
    replies: Mutex<VecDeque<Result<String>>>,
    models: Mutex<Vec<String>>,
    calls: Mutex<Vec<ChatCall>>,
}

impl MockChatService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply
    pub fn enqueue_reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queues a failure
    pub fn enqueue_error(&self, error: Error) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Sets the catalogue returned by `list_models`
    pub fn set_models(&self, models: Vec<String>) {
        *self.models.lock().unwrap() = models;
    }

    /// Returns the most recent call, if any
    pub fn last_call(&self) -> Option<ChatCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Returns every recorded call
    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatService for MockChatService {
    async fn send(&self, call: &ChatCall) -> Result<String> {
        self.calls.lock().unwrap().push(call.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("This is a scripted reply.".to_string()))
    }

    async fn list_models(&self, call: &ChatCall) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push(call.clone());
        Ok(self.models.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ChatMessage;

    fn call() -> ChatCall {
        ChatCall {
            provider: ProviderId::OpenAi,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: Secret::new("sk-test".to_string()),
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hello")],
        }
    }

    #[test]
    fn test_mock_replays_script_then_falls_back() {
        tokio_test::block_on(async {
            let mock = MockChatService::new();
            mock.enqueue_reply("first");

            assert_eq!(mock.send(&call()).await.unwrap(), "first");
            assert_eq!(mock.send(&call()).await.unwrap(), "This is a scripted reply.");
            assert_eq!(mock.calls().len(), 2);
        });
    }

    #[test]
    fn test_mock_records_the_call_it_saw() {
        tokio_test::block_on(async {
            let mock = MockChatService::new();
            mock.send(&call()).await.unwrap();

            let seen = mock.last_call().unwrap();
            assert_eq!(seen.provider, ProviderId::OpenAi);
            assert_eq!(seen.model, "gpt-4o-mini");
            assert_eq!(seen.messages.len(), 1);
        });
    }

    #[test]
    fn test_mock_surfaces_queued_errors() {
        tokio_test::block_on(async {
            let mock = MockChatService::new();
            mock.enqueue_error(Error::Http {
                status: 500,
                body: "boom".to_string(),
            });

            let result = mock.send(&call()).await;
            assert!(matches!(result, Err(Error::Http { status: 500, .. })));
        });
    }
}
