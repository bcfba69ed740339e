use reqwest::header::HeaderValue;
use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::llm_service::ChatCall;
use crate::provider::HttpTranslator;

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 4096;

/// The `/chat/completions` wire format: OpenAI itself, Qwen, DeepSeek, and
/// Claude/Gemini when routed through an OpenAI-compatible relay.
pub struct OpenAiCompatible;

impl HttpTranslator for OpenAiCompatible {
    fn accept(&self, call: &ChatCall) -> Result<Request> {
        let url = Url::parse(&format!(
            "{}/chat/completions",
            call.base_url.trim_end_matches('/')
        ))?;
        debug!(%url, model = %call.model, "building chat completions request");

        let mut request = Request::new(Method::POST, url);
        insert_bearer_auth(&mut request, call)?;
        request
            .headers_mut()
            .insert("Content-Type", HeaderValue::from_static("application/json"));

        let payload = ChatCompletionsRequest {
            model: &call.model,
            // Roles pass through unchanged; the system turn stays in-line
            messages: call
                .messages
                .iter()
                .map(|msg| WireMessage {
                    role: msg.role.as_str(),
                    content: &msg.content,
                })
                .collect(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        *request.body_mut() = Some(serde_json::to_vec(&payload)?.into());

        Ok(request)
    }

    fn parse(&self, raw: String) -> Result<String> {
        let response: ChatCompletionsResponse =
            serde_json::from_str(&raw).map_err(|e| Error::MalformedResponse(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);
        let Some(content) = content else {
            warn!("chat completions response carried no message content");
            return Ok(String::new());
        };

        Ok(flatten_content(&content))
    }

    fn models_request(&self, call: &ChatCall) -> Result<Request> {
        let url = Url::parse(&format!("{}/models", call.base_url.trim_end_matches('/')))?;
        let mut request = Request::new(Method::GET, url);
        insert_bearer_auth(&mut request, call)?;
        Ok(request)
    }

    fn parse_models(&self, raw: String) -> Result<Vec<String>> {
        let catalogue: ModelsResponse =
            serde_json::from_str(&raw).map_err(|e| Error::MalformedResponse(e.to_string()))?;
        Ok(catalogue.data.into_iter().map(|entry| entry.id).collect())
    }
}

fn insert_bearer_auth(request: &mut Request, call: &ChatCall) -> Result<()> {
    let auth: HeaderValue = format!("Bearer {}", call.api_key.expose())
        .parse()
        .map_err(|_| Error::Authentication("API key is not a valid header value".into()))?;
    request.headers_mut().insert("Authorization", auth);
    Ok(())
}

/// Extracts reply text from the `content` field, which vendors ship either
/// as a plain string or as an array of typed parts ("thinking" models wrap
/// text in structured blocks). Anything else decodes to an empty string so
/// vendor quirks degrade to a blank reply instead of a hard failure.
fn flatten_content(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter(|part| part.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        other => {
            warn!(shape = %value_kind(other), "unexpected content shape in chat completions response");
            String::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<Value>,
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
