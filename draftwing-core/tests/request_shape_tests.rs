use draftwing_core::llm_service::ChatCall;
use draftwing_core::message::ChatMessage;
use draftwing_core::provider::{HttpTranslator, WireFormat, translator_for};
use draftwing_core::registry::ProviderId;
use draftwing_core::secret::Secret;
use parameterized::*;

fn call(provider: ProviderId, base_url: &str) -> ChatCall {
    ChatCall {
        provider,
        base_url: base_url.to_string(),
        api_key: Secret::new("sk-test".to_string()),
        model: provider.defaults().model.to_string(),
        messages: vec![
            ChatMessage::system("You are a helpful writing assistant."),
            ChatMessage::user("What is the capital of France?"),
            ChatMessage::assistant("Paris."),
            ChatMessage::user("And of Italy?"),
        ],
    }
}

fn routed_request(provider: ProviderId, base_url: &str) -> reqwest::Request {
    let call = call(provider, base_url);
    let translator = translator_for(WireFormat::select(call.provider, &call.base_url));
    translator.accept(&call).unwrap()
}

fn body_json(request: &reqwest::Request) -> serde_json::Value {
    let bytes = request
        .body()
        .and_then(|body| body.as_bytes())
        .expect("request body is buffered");
    serde_json::from_slice(bytes).expect("request body is json")
}

// Routing matrix: which wire format each identity + host combination selects
#[parameterized(
    provider = {
        ProviderId::OpenAi, ProviderId::Qwen, ProviderId::DeepSeek,
        ProviderId::Claude, ProviderId::Claude,
        ProviderId::Gemini, ProviderId::Gemini
    },
    base_url = {
        "https://api.openai.com/v1",
        "https://dashscope.aliyuncs.com/compatible-mode/v1",
        "https://api.deepseek.com/v1",
        "https://api.anthropic.com",
        "https://my-proxy.example.com/v1",
        "https://generativelanguage.googleapis.com/v1beta",
        "https://gemini-relay.example.org/v1"
    },
    expected = {
        WireFormat::OpenAiCompatible,
        WireFormat::OpenAiCompatible,
        WireFormat::OpenAiCompatible,
        WireFormat::AnthropicNative,
        WireFormat::OpenAiCompatible,
        WireFormat::GoogleNative,
        WireFormat::OpenAiCompatible
    }
)]
fn test_wire_format_routing(provider: ProviderId, base_url: &str, expected: WireFormat) {
    assert_eq!(WireFormat::select(provider, base_url), expected);
}

#[test]
fn test_openai_request_shape() {
    let request = routed_request(ProviderId::OpenAi, "https://api.openai.com/v1");

    assert_eq!(request.method(), "POST");
    assert_eq!(
        request.url().as_str(),
        "https://api.openai.com/v1/chat/completions"
    );
    assert_eq!(
        request.headers().get("Authorization").unwrap(),
        "Bearer sk-test"
    );
    assert_eq!(
        request.headers().get("Content-Type").unwrap(),
        "application/json"
    );

    let body = body_json(&request);
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["temperature"], 0.7);
    assert_eq!(body["max_tokens"], 4096);
    // Roles pass through unchanged, system turn included in-line
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][2]["role"], "assistant");
}

#[test]
fn test_trailing_slash_is_stripped_before_join() {
    let request = routed_request(ProviderId::DeepSeek, "https://api.deepseek.com/v1/");
    assert_eq!(
        request.url().as_str(),
        "https://api.deepseek.com/v1/chat/completions"
    );
}

#[test]
fn test_claude_official_host_uses_native_wire() {
    let request = routed_request(ProviderId::Claude, "https://api.anthropic.com");

    assert_eq!(request.method(), "POST");
    assert_eq!(request.url().as_str(), "https://api.anthropic.com/v1/messages");
    assert_eq!(request.headers().get("x-api-key").unwrap(), "sk-test");
    assert_eq!(
        request.headers().get("anthropic-version").unwrap(),
        "2023-06-01"
    );
    assert!(request.headers().get("Authorization").is_none());

    let body = body_json(&request);
    assert_eq!(body["model"], "claude-3-5-sonnet-20241022");
    assert_eq!(body["max_tokens"], 4096);
    // The system turn moves to the top-level field and out of the array
    assert_eq!(body["system"], "You are a helpful writing assistant.");
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert!(messages.iter().all(|m| m["role"] != "system"));
    assert_eq!(messages[1]["role"], "assistant");
}

#[test]
fn test_claude_behind_proxy_downgrades_to_compatible_wire() {
    let request = routed_request(ProviderId::Claude, "https://my-proxy.example.com/v1");

    assert!(request.url().as_str().ends_with("/chat/completions"));
    assert_eq!(
        request.headers().get("Authorization").unwrap(),
        "Bearer sk-test"
    );
    assert!(request.headers().get("x-api-key").is_none());
}

#[test]
fn test_gemini_official_host_uses_native_wire() {
    let request = routed_request(
        ProviderId::Gemini,
        "https://generativelanguage.googleapis.com/v1beta",
    );

    assert_eq!(request.method(), "POST");
    assert!(request.url().as_str().contains(
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:generateContent"
    ));
    // Credential rides in the query string, never in a header
    assert!(request.url().as_str().contains("key=sk-test"));
    assert!(request.headers().get("Authorization").is_none());
    assert!(request.headers().get("x-api-key").is_none());

    let body = body_json(&request);
    assert_eq!(
        body["systemInstruction"]["parts"][0]["text"],
        "You are a helpful writing assistant."
    );
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[0]["parts"][0]["text"], "What is the capital of France?");
    assert_eq!(body["generationConfig"]["temperature"], 0.7);
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 4096);
}

#[test]
fn test_gemini_behind_relay_downgrades_to_compatible_wire() {
    let request = routed_request(ProviderId::Gemini, "https://gemini-relay.example.org/v1");

    assert!(request.url().as_str().ends_with("/chat/completions"));
    assert_eq!(
        request.headers().get("Authorization").unwrap(),
        "Bearer sk-test"
    );
}

#[test]
fn test_model_catalogue_requests() {
    let openai_call = call(ProviderId::OpenAi, "https://api.openai.com/v1");
    let request = translator_for(WireFormat::OpenAiCompatible)
        .models_request(&openai_call)
        .unwrap();
    assert_eq!(request.method(), "GET");
    assert_eq!(request.url().as_str(), "https://api.openai.com/v1/models");
    assert_eq!(
        request.headers().get("Authorization").unwrap(),
        "Bearer sk-test"
    );

    let claude_call = call(ProviderId::Claude, "https://api.anthropic.com");
    let request = translator_for(WireFormat::AnthropicNative)
        .models_request(&claude_call)
        .unwrap();
    assert_eq!(request.method(), "GET");
    assert_eq!(request.url().as_str(), "https://api.anthropic.com/v1/models");
    assert_eq!(request.headers().get("x-api-key").unwrap(), "sk-test");

    let gemini_call = call(
        ProviderId::Gemini,
        "https://generativelanguage.googleapis.com/v1beta",
    );
    let request = translator_for(WireFormat::GoogleNative)
        .models_request(&gemini_call)
        .unwrap();
    assert_eq!(request.method(), "GET");
    assert_eq!(
        request.url().as_str(),
        "https://generativelanguage.googleapis.com/v1beta/models?key=sk-test"
    );
}
