use std::env;

use crate::error::ConfigError;

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub model: String,
    pub api_url: String,
    pub temperature: f32,
}

impl ProviderConfig {
    /// Reads `{ROLE}_MODEL`, `{ROLE}_API_URL` and `{ROLE}_TEMPERATURE`.
    pub fn from_env(role: &str) -> Self {
        let prefix = role.to_uppercase();

        // Get model from env or use defaults
        let model = env::var(format!("{}_MODEL", prefix)).unwrap_or_else(|_| {
            match role {
                "vision" => "gemini-1.5-flash",
                "advice" => "gemini-2.5-pro-exp-03-25",
                _ => "gemini-1.5-flash",
            }
            .to_string()
        });

        // Get API URL from env or derive it from the model
        let api_url = env::var(format!("{}_API_URL", prefix))
            .unwrap_or_else(|_| format!("{}/{}:generateContent", GEMINI_BASE_URL, model));

        // Get temperature from env or use default
        let temperature = env::var(format!("{}_TEMPERATURE", prefix))
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(match role {
                "vision" => 0.4,
                _ => 0.7,
            });

        Self {
            model,
            api_url,
            temperature,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub vision: ProviderConfig,
    pub advice: ProviderConfig,
    pub search_max_results: usize,
    pub search_url: String,
}

impl AppConfig {
    /// Loads configuration. The Gemini key may come from the command line;
    /// otherwise `GEMINI_API_KEY` must be set.
    pub fn from_env(api_key_override: Option<String>) -> Result<Self, ConfigError> {
        let gemini_api_key = api_key_override
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env::var(GEMINI_API_KEY_VAR).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingCredential(GEMINI_API_KEY_VAR))?;

        let search_max_results = match env::var("SEARCH_MAX_RESULTS") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SEARCH_MAX_RESULTS".to_string(),
                value,
            })?,
            Err(_) => 5,
        };

        let search_url = env::var("SEARCH_URL")
            .unwrap_or_else(|_| "https://html.duckduckgo.com/html/".to_string());

        Ok(Self {
            gemini_api_key,
            vision: ProviderConfig::from_env("vision"),
            advice: ProviderConfig::from_env("advice"),
            search_max_results,
            search_url,
        })
    }
}
