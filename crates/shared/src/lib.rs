pub mod error;
pub mod events;
pub mod language;
pub mod waste;

pub mod settings {
    use serde::{Deserialize, Serialize};
    use std::env;

    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
    pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

    /// Connection settings for the generative-AI gateway.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct GatewaySettings {
        pub api_key: Option<String>,
        pub text_model: String,  // e.g., "gemini-2.5-flash"
        pub image_model: String, // e.g., "gemini-2.5-flash-image"
        pub base_url: String,
    }

    impl Default for GatewaySettings {
        fn default() -> Self {
            Self {
                api_key: None,
                text_model: DEFAULT_TEXT_MODEL.into(),
                image_model: DEFAULT_IMAGE_MODEL.into(),
                base_url: DEFAULT_BASE_URL.into(),
            }
        }
    }

    impl GatewaySettings {
        /// Defaults overlaid with whatever the environment provides.
        pub fn from_env() -> Self {
            let mut settings = Self::default();
            settings.api_key = env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("API_KEY"))
                .ok()
                .filter(|k| !k.trim().is_empty());
            if let Ok(model) = env::var("ECOLOOP_TEXT_MODEL") {
                settings.text_model = model;
            }
            if let Ok(model) = env::var("ECOLOOP_IMAGE_MODEL") {
                settings.image_model = model;
            }
            if let Ok(url) = env::var("ECOLOOP_GEMINI_BASE_URL") {
                settings.base_url = url;
            }
            settings
        }

        pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
            self.api_key = Some(key.into());
            self
        }
    }
}

pub mod agent_api {
    use serde::{Deserialize, Serialize};

    /// Speaker of a conversational turn, in the remote service's vocabulary.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ChatRole {
        User,
        Model,
    }

    impl ChatRole {
        pub fn as_str(&self) -> &'static str {
            match self {
                ChatRole::User => "user",
                ChatRole::Model => "model",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ChatMessage {
        pub role: ChatRole,
        pub content: String,
    }

    impl ChatMessage {
        pub fn user(content: impl Into<String>) -> Self {
            Self {
                role: ChatRole::User,
                content: content.into(),
            }
        }

        pub fn model(content: impl Into<String>) -> Self {
            Self {
                role: ChatRole::Model,
                content: content.into(),
            }
        }
    }

    /// One step of a streamed model reply.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StreamChunk {
        Text(String),
        Error(String),
        Done,
    }
}
