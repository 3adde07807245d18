use crate::error::{PovarError, Result};

/// Chat provider used for recipe analysis. All variants expose
/// OpenAI-compatible chat-completions endpoints.
#[derive(Clone, Debug, Default)]
pub enum Provider {
    #[default]
    Openai,
    Grok,
    Gemini,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-5.1",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-3-pro",
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Openai => "OpenAI",
            Provider::Grok => "Grok",
            Provider::Gemini => "Gemini",
        }
    }

    /// Validate that the API key is set for this provider
    pub fn validate_api_key(&self) -> Result<String> {
        let config = self.config();
        std::env::var(config.env_var).map_err(|_| PovarError::MissingApiKey {
            env_var: config.env_var.to_string(),
        })
    }
}

/// Hosted speech-to-text endpoint. Fixed independently of the chat
/// provider: only the OpenAI stack offers one here.
pub struct TranscriberConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/audio/transcriptions",
            model: "whisper-1",
            env_var: "OPENAI_API_KEY",
        }
    }
}

impl TranscriberConfig {
    pub fn validate_api_key(&self) -> Result<String> {
        std::env::var(self.env_var).map_err(|_| PovarError::MissingApiKey {
            env_var: self.env_var.to_string(),
        })
    }
}
