pub mod advice;
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod food;
pub mod providers;
pub mod session;
pub mod workflow;

// Re-export commonly used items
pub use advice::{AdviceAgent, AdvisorProfile};
pub use error::{ConfigError, NutritionError, ServiceError};
pub use session::Session;
pub use workflow::MealWorkflow;
