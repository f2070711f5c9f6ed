use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Activity level used for the TDEE multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietaryPreference {
    Balanced,
    Keto,
    Vegetarian,
    LowCarb,
    Vegan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    Maintenance,
    Endurance,
    Flexibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Summer,
    Rainy,
    Winter,
    Moderate,
}

/// Which Mifflin-St Jeor constant to apply.
///
/// No sex is collected from the user, so the male constant (+5) is the
/// default. Callers that know better can pick the female constant (-161).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BmrFormula {
    #[default]
    MifflinStJeorMale,
    MifflinStJeorFemale,
}

impl BmrFormula {
    pub fn offset(self) -> f64 {
        match self {
            BmrFormula::MifflinStJeorMale => 5.0,
            BmrFormula::MifflinStJeorFemale => -161.0,
        }
    }
}

/// Error returned when a label does not name any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

// Labels are what the user sees and what goes into prompts; variant names are
// accepted too so "LowCarb", "low carb" and "low_carb" all parse.
macro_rules! labelled_enum {
    ($ty:ident, $kind:literal, [$($variant:ident => $label:literal),+ $(,)?]) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                $(
                    if wanted == normalize($label) || wanted == normalize(stringify!($variant)) {
                        return Ok($ty::$variant);
                    }
                )+
                Err(UnknownVariant {
                    kind: $kind,
                    value: s.to_string(),
                    expected: $ty::ALL.iter().map(|v| v.label()).collect::<Vec<_>>().join(", "),
                })
            }
        }
    };
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

labelled_enum!(ActivityLevel, "activity level", [
    Low => "Low",
    Moderate => "Moderate",
    High => "High",
]);

labelled_enum!(DietaryPreference, "dietary preference", [
    Balanced => "Balanced",
    Keto => "Keto",
    Vegetarian => "Vegetarian",
    LowCarb => "Low Carb",
    Vegan => "Vegan",
]);

labelled_enum!(FitnessGoal, "fitness goal", [
    WeightLoss => "Weight Loss",
    MuscleGain => "Muscle Gain",
    Maintenance => "Maintenance",
    Endurance => "Endurance",
    Flexibility => "Flexibility",
]);

labelled_enum!(Weather, "weather", [
    Summer => "Summer",
    Rainy => "Rainy",
    Winter => "Winter",
    Moderate => "Moderate",
]);

/// Personal parameters collected from the user for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(range(min = 10, max = 100))]
    pub age: Option<u32>,
    #[serde(default)]
    #[validate(range(min = 30.0, max = 200.0), custom = "finite")]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 100.0, max = 250.0), custom = "finite")]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default)]
    pub dietary_preference: Option<DietaryPreference>,
    #[serde(default)]
    pub fitness_goal: Option<FitnessGoal>,
    #[serde(default)]
    pub high_blood_pressure: Option<bool>,
    #[serde(default)]
    pub high_blood_sugar: Option<bool>,
    #[serde(default)]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub bmr_formula: BmrFormula,
}

impl UserProfile {
    /// The name, if one was given and it is not blank.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

// Range checks let NaN through.
fn finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        return Ok(());
    }
    let mut err = ValidationError::new("not_finite");
    err.message = Some("must be a finite number".into());
    Err(err)
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Parses the Yes/No answers the form offers, plus the usual boolean spellings.
pub fn parse_yes_no(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_in_any_spelling() {
        assert_eq!("Low Carb".parse::<DietaryPreference>().unwrap(), DietaryPreference::LowCarb);
        assert_eq!("lowcarb".parse::<DietaryPreference>().unwrap(), DietaryPreference::LowCarb);
        assert_eq!("low_carb".parse::<DietaryPreference>().unwrap(), DietaryPreference::LowCarb);
        assert_eq!("weight loss".parse::<FitnessGoal>().unwrap(), FitnessGoal::WeightLoss);
        assert_eq!("HIGH".parse::<ActivityLevel>().unwrap(), ActivityLevel::High);
        assert_eq!("rainy".parse::<Weather>().unwrap(), Weather::Rainy);
    }

    #[test]
    fn test_unknown_label_lists_choices() {
        let err = "extreme".parse::<ActivityLevel>().unwrap_err();
        assert_eq!(err.kind, "activity level");
        assert!(err.to_string().contains("Low, Moderate, High"));
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(FitnessGoal::MuscleGain.to_string(), "Muscle Gain");
        assert_eq!(DietaryPreference::LowCarb.to_string(), "Low Carb");
    }

    #[test]
    fn test_profile_bounds_are_validated() {
        let mut profile = UserProfile {
            age: Some(30),
            weight_kg: Some(60.0),
            height_cm: Some(160.0),
            ..Default::default()
        };
        assert!(profile.validate().is_ok());

        profile.age = Some(9);
        profile.height_cm = Some(251.0);
        let errors = profile.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("age"));
        assert!(fields.contains_key("height_cm"));
        assert!(!fields.contains_key("weight_kg"));
    }

    #[test]
    fn test_nan_measurements_fail_validation() {
        let profile = UserProfile {
            weight_kg: Some(f64::NAN),
            height_cm: Some(f64::INFINITY),
            ..Default::default()
        };
        let errors = profile.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["weight_kg"][0].code, "not_finite");
        assert!(fields.contains_key("height_cm"));
    }

    #[test]
    fn test_absent_fields_pass_validation() {
        assert!(UserProfile::default().validate().is_ok());
    }

    #[test]
    fn test_blank_name_is_absent() {
        let profile = UserProfile { name: Some("   ".into()), ..Default::default() };
        assert_eq!(profile.display_name(), None);
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(parse_yes_no("Yes"), Some(true));
        assert_eq!(parse_yes_no(" no "), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(yes_no(true), "Yes");
    }

    #[test]
    fn test_formula_offsets() {
        assert_eq!(BmrFormula::default(), BmrFormula::MifflinStJeorMale);
        assert_eq!(BmrFormula::MifflinStJeorMale.offset(), 5.0);
        assert_eq!(BmrFormula::MifflinStJeorFemale.offset(), -161.0);
    }
}
