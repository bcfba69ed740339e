use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an LLM provider the assistant panel can talk to.
///
/// The set is closed: every identity has a static entry in the registry,
/// and the wire-format routing in [`crate::provider`] is total over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// OpenAI
    OpenAi,
    /// Anthropic Claude
    Claude,
    /// Google Gemini
    Gemini,
    /// Alibaba Qwen (OpenAI-compatible endpoint)
    Qwen,
    /// DeepSeek (OpenAI-compatible endpoint)
    DeepSeek,
}

/// Static per-provider defaults used by the settings screen and by
/// [`crate::config::ProviderSettings`] fallback resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderDefaults {
    /// Human-readable provider name
    pub display_name: &'static str,
    /// Default API base URL
    pub base_url: &'static str,
    /// Default model identifier
    pub model: &'static str,
    /// Placeholder shown in the credential input field
    pub key_placeholder: &'static str,
    /// Short description for the settings screen
    pub description: &'static str,
}

impl ProviderId {
    /// Every provider identity, in settings-screen order
    pub const ALL: [ProviderId; 5] = [
        ProviderId::OpenAi,
        ProviderId::Claude,
        ProviderId::Gemini,
        ProviderId::Qwen,
        ProviderId::DeepSeek,
    ];

    /// Returns the registry entry for this provider
    ///
    /// # Examples
    ///
    /// ```
    /// use draftwing_core::registry::ProviderId;
    ///
    /// assert_eq!(ProviderId::OpenAi.defaults().base_url, "https://api.openai.com/v1");
    /// assert_eq!(ProviderId::DeepSeek.defaults().model, "deepseek-chat");
    /// ```
    pub fn defaults(self) -> &'static ProviderDefaults {
        match self {
            ProviderId::OpenAi => &ProviderDefaults {
                display_name: "OpenAI",
                base_url: "https://api.openai.com/v1",
                model: "gpt-4o-mini",
                key_placeholder: "sk-...",
                description: "OpenAI chat completions API",
            },
            ProviderId::Claude => &ProviderDefaults {
                display_name: "Claude",
                base_url: "https://api.anthropic.com",
                model: "claude-3-5-sonnet-20241022",
                key_placeholder: "sk-ant-...",
                description: "Anthropic messages API",
            },
            ProviderId::Gemini => &ProviderDefaults {
                display_name: "Gemini",
                base_url: "https://generativelanguage.googleapis.com/v1beta",
                model: "gemini-2.0-flash-exp",
                key_placeholder: "AIza...",
                description: "Google generative language API",
            },
            ProviderId::Qwen => &ProviderDefaults {
                display_name: "Qwen",
                base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1",
                model: "qwen-plus",
                key_placeholder: "sk-...",
                description: "Alibaba DashScope, OpenAI-compatible mode",
            },
            ProviderId::DeepSeek => &ProviderDefaults {
                display_name: "DeepSeek",
                base_url: "https://api.deepseek.com/v1",
                model: "deepseek-chat",
                key_placeholder: "sk-...",
                description: "DeepSeek platform, OpenAI-compatible API",
            },
        }
    }

    /// Returns the configuration tag for this provider
    ///
    /// # Examples
    ///
    /// ```
    /// use draftwing_core::registry::ProviderId;
    ///
    /// assert_eq!(ProviderId::DeepSeek.as_str(), "deepseek");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Claude => "claude",
            ProviderId::Gemini => "gemini",
            ProviderId::Qwen => "qwen",
            ProviderId::DeepSeek => "deepseek",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.defaults().display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_total() {
        for id in ProviderId::ALL {
            let defaults = id.defaults();
            assert!(!defaults.display_name.is_empty());
            assert!(defaults.base_url.starts_with("https://"));
            assert!(!defaults.model.is_empty());
            assert!(!defaults.key_placeholder.is_empty());
        }
    }

    #[test]
    fn test_provider_display() {
        assert_eq!(ProviderId::OpenAi.to_string(), "OpenAI");
        assert_eq!(ProviderId::Claude.to_string(), "Claude");
        assert_eq!(ProviderId::Qwen.to_string(), "Qwen");
    }

    #[test]
    fn test_config_tags_match_serde() {
        for id in ProviderId::ALL {
            let tag = serde_json::to_string(&id).unwrap();
            assert_eq!(tag, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_openai_compatible_family_defaults() {
        // Qwen and DeepSeek speak the OpenAI wire format, so their default
        // endpoints must already point at a /v1-style compatible root.
        assert!(ProviderId::Qwen.defaults().base_url.ends_with("/v1"));
        assert!(ProviderId::DeepSeek.defaults().base_url.ends_with("/v1"));
    }
}
