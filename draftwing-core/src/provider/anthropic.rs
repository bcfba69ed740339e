use reqwest::header::HeaderValue;
use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::llm_service::ChatCall;
use crate::message::Role;
use crate::provider::HttpTranslator;

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Anthropic's native `/v1/messages` wire format, used for Claude against
/// the official host.
pub struct AnthropicNative;

impl HttpTranslator for AnthropicNative {
    fn accept(&self, call: &ChatCall) -> Result<Request> {
        let url = Url::parse(&format!(
            "{}/v1/messages",
            call.base_url.trim_end_matches('/')
        ))?;
        debug!(%url, model = %call.model, "building messages request");

        let mut request = Request::new(Method::POST, url);
        insert_auth_headers(&mut request, call)?;
        request
            .headers_mut()
            .insert("Content-Type", HeaderValue::from_static("application/json"));

        // The messages array must not carry a system role; its content moves
        // into the top-level `system` field instead.
        let mut system_parts: Vec<&str> = Vec::new();
        let mut messages: Vec<WireMessage<'_>> = Vec::new();
        for msg in &call.messages {
            match msg.role {
                Role::System => system_parts.push(&msg.content),
                Role::Assistant => messages.push(WireMessage {
                    role: "assistant",
                    content: &msg.content,
                }),
                _ => messages.push(WireMessage {
                    role: "user",
                    content: &msg.content,
                }),
            }
        }

        let payload = MessagesRequest {
            model: &call.model,
            max_tokens: MAX_TOKENS,
            system: if system_parts.is_empty() {
                None
            } else {
                Some(system_parts.join("\n\n"))
            },
            messages,
        };
        *request.body_mut() = Some(serde_json::to_vec(&payload)?.into());

        Ok(request)
    }

    fn parse(&self, raw: String) -> Result<String> {
        let response: MessagesResponse =
            serde_json::from_str(&raw).map_err(|e| Error::MalformedResponse(e.to_string()))?;
        let Some(text) = response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
        else {
            warn!("messages response carried no text block");
            return Ok(String::new());
        };
        Ok(text)
    }

    fn models_request(&self, call: &ChatCall) -> Result<Request> {
        let url = Url::parse(&format!(
            "{}/v1/models",
            call.base_url.trim_end_matches('/')
        ))?;
        let mut request = Request::new(Method::GET, url);
        insert_auth_headers(&mut request, call)?;
        Ok(request)
    }

    fn parse_models(&self, raw: String) -> Result<Vec<String>> {
        let catalogue: ModelsResponse =
            serde_json::from_str(&raw).map_err(|e| Error::MalformedResponse(e.to_string()))?;
        Ok(catalogue.data.into_iter().map(|entry| entry.id).collect())
    }
}

fn insert_auth_headers(request: &mut Request, call: &ChatCall) -> Result<()> {
    let key = HeaderValue::from_str(call.api_key.expose())
        .map_err(|_| Error::Authentication("API key is not a valid header value".into()))?;
    request.headers_mut().insert("x-api-key", key);
    request
        .headers_mut()
        .insert("anthropic-version", HeaderValue::from_static(API_VERSION));
    Ok(())
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}
