use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::ServiceError;
use crate::food::MealImage;
use crate::providers::traits::{CompletionProvider, ImageAnalysisProvider};

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    config: ProviderConfig,
}

impl GeminiProvider {
    pub fn new(api_key: String, config: ProviderConfig) -> Self {
        Self {
            api_key,
            client: Client::new(),
            config,
        }
    }

    async fn generate(&self, body: Value) -> Result<String, ServiceError> {
        debug!(model = %self.config.model, "sending generateContent request");

        let response = self
            .client
            .post(&self.config.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let response_json: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(_) if !status.is_success() => Value::String(text),
            Err(e) => return Err(ServiceError::MalformedResponse(e.to_string())),
        };

        extract_text(status, &response_json).map_err(|e| {
            warn!(model = %self.config.model, error = %e, "gemini request failed");
            e
        })
    }
}

/// Pulls the answer text out of a `generateContent` response, classifying
/// quota, safety and format failures.
pub fn extract_text(status: StatusCode, response_json: &Value) -> Result<String, ServiceError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ServiceError::Quota(error_message(response_json)));
    }
    if !status.is_success() {
        return Err(ServiceError::Api {
            status: status.as_u16(),
            body: error_message(response_json),
        });
    }

    // Check for API-level errors
    if let Some(error) = response_json.get("error") {
        let message = error_message(response_json);
        return Err(match error.get("status").and_then(Value::as_str) {
            Some("RESOURCE_EXHAUSTED") => ServiceError::Quota(message),
            _ => ServiceError::Api {
                status: error.get("code").and_then(Value::as_u64).unwrap_or(0) as u16,
                body: message,
            },
        });
    }

    if let Some(reason) = response_json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(ServiceError::SafetyBlocked(reason.to_string()));
    }

    let candidate = response_json
        .get("candidates")
        .and_then(|c| c.get(0))
        .ok_or_else(|| ServiceError::MalformedResponse("no candidates in response".to_string()))?;

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(match candidate.get("finishReason").and_then(Value::as_str) {
            Some(reason @ ("SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST")) => {
                ServiceError::SafetyBlocked(reason.to_string())
            }
            _ => ServiceError::MalformedResponse("response has no text".to_string()),
        });
    }

    Ok(text)
}

fn error_message(response_json: &Value) -> String {
    response_json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| match response_json {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, system_message: &str, prompt: &str) -> Result<String, ServiceError> {
        self.generate(json!({
            "systemInstruction": {
                "parts": [{ "text": system_message }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": self.config.temperature
            }
        }))
        .await
    }

    fn get_model_info(&self) -> String {
        self.config.model.clone()
    }
}

#[async_trait]
impl ImageAnalysisProvider for GeminiProvider {
    async fn analyze_image(&self, prompt: &str, image: &MealImage) -> Result<String, ServiceError> {
        let data = image
            .to_base64()
            .map_err(|e| ServiceError::MalformedResponse(format!("could not encode image: {}", e)))?;

        self.generate(json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": prompt },
                    {
                        "inline_data": {
                            "mime_type": image.mime_type(),
                            "data": data
                        }
                    }
                ]
            }],
            "generationConfig": {
                "temperature": self.config.temperature
            }
        }))
        .await
    }

    fn get_model_info(&self) -> String {
        self.config.model.clone()
    }
}
