use reqwest::Request;
use url::Url;

use crate::error::Result;
use crate::llm_service::ChatCall;
use crate::registry::ProviderId;

// Include the wire-format-specific modules
pub mod anthropic;
pub mod gemini;
pub mod openai;

/// An `HttpTranslator` turns a provider-agnostic chat call into a vendor
/// HTTP request and decodes the vendor's reply back into plain text.
///
/// Both halves are pure: `accept` only builds a [`reqwest::Request`] and
/// `parse` only reads a body string, so the wire formats can be tested
/// without any network.
pub trait HttpTranslator: Send + Sync {
    /// Converts a chat call into an HTTP request
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL cannot be assembled into
    /// an endpoint, the credential is not header-safe, or the payload fails
    /// to serialize.
    fn accept(&self, call: &ChatCall) -> Result<Request>;

    /// Decodes a raw 2xx response body into the assistant's reply text.
    ///
    /// A body whose expected reply field is absent decodes to an empty
    /// string; only a body that is not JSON at all is an error.
    fn parse(&self, raw: String) -> Result<String>;

    /// Builds the model-catalogue request for this wire format
    ///
    /// # Errors
    ///
    /// Same failure modes as [`HttpTranslator::accept`].
    fn models_request(&self, call: &ChatCall) -> Result<Request>;

    /// Decodes the vendor's model catalogue into plain identifiers
    fn parse_models(&self, raw: String) -> Result<Vec<String>>;
}

/// The three JSON request/response shapes the adapter can speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// The de facto standard `/chat/completions` shape
    OpenAiCompatible,
    /// Anthropic's `/v1/messages` shape
    AnthropicNative,
    /// Google's `models/{model}:generateContent` shape
    GoogleNative,
}

impl WireFormat {
    /// Selects the wire format for a provider and its effective base URL.
    ///
    /// Claude and Gemini speak their native formats only against the
    /// vendor's official host; any other host is assumed to be a relay
    /// that understands the OpenAI-compatible shape. An unparsable base
    /// URL counts as a non-official host.
    ///
    /// # Examples
    ///
    /// ```
    /// use draftwing_core::provider::WireFormat;
    /// use draftwing_core::registry::ProviderId;
    ///
    /// let format = WireFormat::select(ProviderId::Claude, "https://api.anthropic.com");
    /// assert_eq!(format, WireFormat::AnthropicNative);
    ///
    /// let format = WireFormat::select(ProviderId::Claude, "https://my-relay.example.com/v1");
    /// assert_eq!(format, WireFormat::OpenAiCompatible);
    /// ```
    pub fn select(provider: ProviderId, base_url: &str) -> Self {
        match provider {
            ProviderId::Claude if host_contains(base_url, "anthropic.com") => {
                WireFormat::AnthropicNative
            }
            ProviderId::Gemini if host_contains(base_url, "googleapis.com") => {
                WireFormat::GoogleNative
            }
            _ => WireFormat::OpenAiCompatible,
        }
    }
}

fn host_contains(base_url: &str, needle: &str) -> bool {
    Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.contains(needle)))
        .unwrap_or(false)
}

/// Returns the translator implementing a wire format. Translators are
/// stateless; per-call configuration travels inside the [`ChatCall`].
pub fn translator_for(format: WireFormat) -> &'static dyn HttpTranslator {
    match format {
        WireFormat::OpenAiCompatible => &openai::OpenAiCompatible,
        WireFormat::AnthropicNative => &anthropic::AnthropicNative,
        WireFormat::GoogleNative => &gemini::GoogleNative,
    }
}
