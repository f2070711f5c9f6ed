pub mod duckduckgo;
pub mod gemini;
pub mod traits;
