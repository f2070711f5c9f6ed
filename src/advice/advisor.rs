use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Persona handed to the advice model as its system message.
///
/// Profiles can be loaded from JSON so the advisor can be swapped without a
/// rebuild (`--advisor dietitian.json`). Missing fields fall back to the
/// built-in dietary planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorProfile {
    pub name: String,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub expected_output: Vec<String>,
}

impl AdvisorProfile {
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let to_config_error = |reason: String| ConfigError::AdvisorProfile {
            path: path.display().to_string(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| to_config_error(e.to_string()))?;
        let mut profile = Self::from_json(&content).map_err(|e| to_config_error(e.to_string()))?;

        let defaults = Self::dietary_planner();
        if profile.description.is_empty() {
            profile.description = defaults.description;
        }
        if profile.instructions.is_empty() {
            profile.instructions = defaults.instructions;
        }
        if profile.expected_output.is_empty() {
            profile.expected_output = defaults.expected_output;
        }
        Ok(profile)
    }

    pub fn generate_system_prompt(&self) -> String {
        let mut prompt = format!("You are {}.", self.name);

        if !self.description.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.description.join("\n"));
        }

        if !self.instructions.is_empty() {
            prompt.push_str("\n\nInstructions:\n");
            let bullets: Vec<String> = self.instructions.iter().map(|i| format!("- {}", i)).collect();
            prompt.push_str(&bullets.join("\n"));
        }

        if !self.expected_output.is_empty() {
            prompt.push_str("\n\nExpected output:\n");
            prompt.push_str(&self.expected_output.join("\n"));
        }

        prompt.push_str("\n\nRespond in markdown.");
        prompt
    }

    /// The default advisor: a nutritionist that also plans workouts, yoga and
    /// meditation.
    pub fn dietary_planner() -> Self {
        Self {
            name: "Dietary Planner".to_string(),
            description: to_lines(&[
                "Creates personalized dietary plans based on user input.",
                "Generates customized workout routines based on fitness goals.",
                "Combines diet and workout plans into a holistic health strategy.",
                "Expert nutritionist and dietary advisor specializing in personalized meal planning and evidence-based nutritional recommendations.",
            ]),
            instructions: to_lines(&[
                "Generate a diet plan with breakfast, lunch, dinner, and snacks.",
                "Consider dietary preferences like Keto, Vegetarian, or Low Carb.",
                "Ensure proper hydration and electrolyte balance.",
                "Provide nutritional breakdown including macronutrients and vitamins.",
                "Suggest meal preparation tips for easy implementation.",
                "Use the web search results provided with the request when they are relevant.",
                "Create a workout plan including warm-ups, main exercises, and cool-downs.",
                "Adjust workouts based on fitness level: Beginner, Intermediate, Advanced.",
                "Consider weight loss, muscle gain, endurance, or flexibility goals.",
                "Provide safety tips and injury prevention advice.",
                "Suggest progress tracking methods for motivation.",
                "Merge personalized diet and fitness plans for a comprehensive approach, use tables if possible.",
                "Ensure alignment between diet and exercise for optimal results.",
                "Suggest lifestyle tips for motivation and consistency.",
                "Provide realistic nutritional advice tailored to the user's data with engaging emojis, including meal modifications, portion control, and healthy eating practices.",
                "Recommend specific yoga asanas based on the user's fitness level and health conditions.",
                "Include optimal timing for yoga practice (morning/evening) with duration.",
                "List 3-4 specific yogasanas with their benefits and duration.",
                "Suggest meditation techniques aligned with the user's lifestyle and goals.",
            ]),
            expected_output: to_lines(&[
                "Capture the user data from the meal analysis you are given.",
                "Return additional information with clear bullet points and emojis in the headings, merging diet, workout and realistic nutritional advice tailored to the user's data.",
                "Include a dedicated '🧘 Yoga & Meditation Corner' section with:",
                "- Best time to practice (morning/evening with specific timing)",
                "- 3-4 specific yogasanas names with their benefits",
                "- Duration for each asana (in minutes)",
                "- Total session duration",
                "- Meditation technique with timing",
                "- Breathing exercises (pranayama) if applicable",
            ]),
        }
    }
}

impl Default for AdvisorProfile {
    fn default() -> Self {
        Self::dietary_planner()
    }
}

impl std::fmt::Display for AdvisorProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn to_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_prompt_mentions_yoga_corner() {
        let prompt = AdvisorProfile::default().generate_system_prompt();
        assert!(prompt.starts_with("You are Dietary Planner."));
        assert!(prompt.contains("🧘 Yoga & Meditation Corner"));
        assert!(prompt.contains("- Generate a diet plan with breakfast, lunch, dinner, and snacks."));
    }

    #[test]
    fn test_from_json_keeps_given_fields() {
        let profile = AdvisorProfile::from_json(
            r#"{"name": "Sports Dietitian", "instructions": ["Focus on recovery meals."]}"#,
        )
        .unwrap();
        assert_eq!(profile.name, "Sports Dietitian");
        assert_eq!(profile.instructions, vec!["Focus on recovery meals."]);
        assert!(profile.description.is_empty());
    }

    #[test]
    fn test_from_file_fills_missing_sections() {
        let path = std::env::temp_dir().join(format!("advisor-{}.json", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"name": "Coach", "description": ["Endurance coach."]}}"#).unwrap();

        let profile = AdvisorProfile::from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(profile.name, "Coach");
        assert_eq!(profile.description, vec!["Endurance coach."]);
        assert_eq!(profile.instructions, AdvisorProfile::dietary_planner().instructions);
    }

    #[test]
    fn test_from_file_reports_path() {
        let err = AdvisorProfile::from_file("/nonexistent/advisor.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/advisor.json"));
    }
}
