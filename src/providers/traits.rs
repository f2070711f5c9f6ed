use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::food::MealImage;

/// Plain text completion against a language model.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, system_message: &str, prompt: &str) -> Result<String, ServiceError>;

    fn get_model_info(&self) -> String;
}

/// Multimodal model that answers a prompt about a photo.
#[async_trait]
pub trait ImageAnalysisProvider: Send + Sync {
    async fn analyze_image(&self, prompt: &str, image: &MealImage) -> Result<String, ServiceError>;

    fn get_model_info(&self) -> String;
}

/// Produces follow-up advice from a finished meal analysis.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn advise(&self, analysis: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ServiceError>;
}
