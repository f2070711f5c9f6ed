pub mod formatter;
pub mod meal_image;
pub mod profile;
pub mod prompt;
pub mod tdee;
pub mod validation;

// Re-export common types
pub use meal_image::MealImage;
pub use profile::{
    ActivityLevel, BmrFormula, DietaryPreference, FitnessGoal, UserProfile, Weather,
};
pub use tdee::TdeeEstimate;
