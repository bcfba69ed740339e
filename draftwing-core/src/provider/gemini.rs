use reqwest::header::HeaderValue;
use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::llm_service::ChatCall;
use crate::message::Role;
use crate::provider::HttpTranslator;

const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Google's native `generateContent` wire format, used for Gemini against
/// the official host. The credential travels as a query parameter; that is
/// how the vendor's API authenticates, not a shortcut.
pub struct GoogleNative;

impl HttpTranslator for GoogleNative {
    fn accept(&self, call: &ChatCall) -> Result<Request> {
        let url = Url::parse(&format!(
            "{}/models/{}:generateContent?key={}",
            call.base_url.trim_end_matches('/'),
            call.model,
            call.api_key.expose()
        ))?;
        debug!(endpoint = "generateContent", model = %call.model, "building request");

        let mut request = Request::new(Method::POST, url);
        request
            .headers_mut()
            .insert("Content-Type", HeaderValue::from_static("application/json"));

        let mut system_parts: Vec<&str> = Vec::new();
        let mut contents: Vec<WireContent<'_>> = Vec::new();
        for msg in &call.messages {
            match msg.role {
                Role::System => system_parts.push(&msg.content),
                Role::Assistant => contents.push(WireContent {
                    role: "model",
                    parts: vec![WirePart { text: &msg.content }],
                }),
                _ => contents.push(WireContent {
                    role: "user",
                    parts: vec![WirePart { text: &msg.content }],
                }),
            }
        }

        let payload = GenerateContentRequest {
            system_instruction: if system_parts.is_empty() {
                None
            } else {
                Some(SystemInstruction {
                    parts: vec![OwnedPart {
                        text: system_parts.join("\n\n"),
                    }],
                })
            },
            contents,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };
        *request.body_mut() = Some(serde_json::to_vec(&payload)?.into());

        Ok(request)
    }

    fn parse(&self, raw: String) -> Result<String> {
        let response: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| Error::MalformedResponse(e.to_string()))?;
        let Some(text) = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
        else {
            warn!("generateContent response carried no text part");
            return Ok(String::new());
        };
        Ok(text)
    }

    fn models_request(&self, call: &ChatCall) -> Result<Request> {
        let url = Url::parse(&format!(
            "{}/models?key={}",
            call.base_url.trim_end_matches('/'),
            call.api_key.expose()
        ))?;
        Ok(Request::new(Method::GET, url))
    }

    fn parse_models(&self, raw: String) -> Result<Vec<String>> {
        let catalogue: ModelsCatalogue =
            serde_json::from_str(&raw).map_err(|e| Error::MalformedResponse(e.to_string()))?;
        Ok(catalogue
            .models
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: Vec<WireContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<OwnedPart>,
}

#[derive(Serialize)]
struct OwnedPart {
    text: String,
}

#[derive(Serialize)]
struct WireContent<'a> {
    role: &'static str,
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ModelsCatalogue {
    #[serde(default)]
    models: Vec<NamedModel>,
}

#[derive(Deserialize)]
struct NamedModel {
    name: String,
}
