//! Total Daily Energy Expenditure estimate.
//!
//! BMR comes from the Mifflin-St Jeor equation
//! `10 x weight_kg + 6.25 x height_cm - 5 x age + offset`, and is scaled by an
//! activity multiplier. The figures are advisory estimates only.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use super::profile::{ActivityLevel, BmrFormula, UserProfile};

/// Multiplier applied when the activity level is missing or unrecognized.
pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "kcal", rename_all = "snake_case")]
pub enum TdeeEstimate {
    Kcal(u32),
    NotComputable,
}

impl TdeeEstimate {
    pub fn kcal(self) -> Option<u32> {
        match self {
            TdeeEstimate::Kcal(kcal) => Some(kcal),
            TdeeEstimate::NotComputable => None,
        }
    }

    /// Sentinel form: 0 when the estimate could not be computed.
    pub fn as_kcal(self) -> u32 {
        self.kcal().unwrap_or(0)
    }
}

impl fmt::Display for TdeeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TdeeEstimate::Kcal(kcal) => write!(f, "{} kcal", kcal),
            TdeeEstimate::NotComputable => f.write_str("not computable"),
        }
    }
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Low => 1.2,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
        }
    }
}

/// Multiplier for a free-text activity level; anything unrecognized counts as Low.
pub fn activity_multiplier(level: &str) -> f64 {
    level
        .parse::<ActivityLevel>()
        .map(ActivityLevel::multiplier)
        .unwrap_or(DEFAULT_ACTIVITY_MULTIPLIER)
}

pub fn bmr(weight_kg: f64, height_cm: f64, age_years: u32, formula: BmrFormula) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) + formula.offset()
}

/// Estimates daily calorie needs with the default formula variant.
pub fn estimate(
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    age_years: Option<u32>,
    activity_level: Option<ActivityLevel>,
) -> TdeeEstimate {
    estimate_with_formula(weight_kg, height_cm, age_years, activity_level, BmrFormula::default())
}

pub fn estimate_with_formula(
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    age_years: Option<u32>,
    activity_level: Option<ActivityLevel>,
    formula: BmrFormula,
) -> TdeeEstimate {
    let (Some(weight), Some(height), Some(age), Some(activity)) =
        (weight_kg, height_cm, age_years, activity_level)
    else {
        return TdeeEstimate::NotComputable;
    };
    from_bmr(bmr(weight, height, age, formula), activity.multiplier())
}

/// Estimates from un-parsed form text. Blank or non-numeric values make the
/// estimate not computable; an unrecognized activity level falls back to Low.
pub fn estimate_raw(weight: &str, height: &str, age: &str, activity_level: &str) -> TdeeEstimate {
    if [weight, height, age, activity_level].iter().any(|v| v.trim().is_empty()) {
        return TdeeEstimate::NotComputable;
    }

    let parsed = (
        weight.trim().parse::<f64>(),
        height.trim().parse::<f64>(),
        age.trim().parse::<u32>(),
    );
    let (Ok(weight), Ok(height), Ok(age)) = parsed else {
        warn!(weight, height, age, "invalid input for TDEE calculation");
        return TdeeEstimate::NotComputable;
    };

    from_bmr(
        bmr(weight, height, age, BmrFormula::default()),
        activity_multiplier(activity_level),
    )
}

impl UserProfile {
    pub fn tdee(&self) -> TdeeEstimate {
        estimate_with_formula(
            self.weight_kg,
            self.height_cm,
            self.age,
            self.activity_level,
            self.bmr_formula,
        )
    }
}

fn from_bmr(bmr: f64, multiplier: f64) -> TdeeEstimate {
    let tdee = (bmr * multiplier).floor();
    if !tdee.is_finite() || tdee <= 0.0 || tdee > f64::from(u32::MAX) {
        warn!(bmr, multiplier, "TDEE estimate out of range");
        return TdeeEstimate::NotComputable;
    }
    TdeeEstimate::Kcal(tdee as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [ActivityLevel; 3] = [ActivityLevel::Low, ActivityLevel::Moderate, ActivityLevel::High];

    #[test]
    fn test_low_activity_reference_value() {
        // bmr = 700 + 1062.5 - 125 + 5 = 1642.5
        assert_eq!(
            estimate(Some(70.0), Some(170.0), Some(25), Some(ActivityLevel::Low)),
            TdeeEstimate::Kcal(1971)
        );
    }

    #[test]
    fn test_moderate_activity_reference_value() {
        // bmr = 600 + 1000 - 150 + 5 = 1455
        assert_eq!(
            estimate(Some(60.0), Some(160.0), Some(30), Some(ActivityLevel::Moderate)),
            TdeeEstimate::Kcal(2255)
        );
    }

    #[test]
    fn test_high_activity_multiplier() {
        // 1455 * 1.725 = 2509.875
        assert_eq!(
            estimate(Some(60.0), Some(160.0), Some(30), Some(ActivityLevel::High)),
            TdeeEstimate::Kcal(2509)
        );
    }

    #[test]
    fn test_female_formula_variant() {
        // bmr = 600 + 1000 - 150 - 161 = 1289; 1289 * 1.2 = 1546.8
        assert_eq!(
            estimate_with_formula(
                Some(60.0),
                Some(160.0),
                Some(30),
                Some(ActivityLevel::Low),
                BmrFormula::MifflinStJeorFemale
            ),
            TdeeEstimate::Kcal(1546)
        );
    }

    #[test]
    fn test_every_missing_combination_is_not_computable() {
        for mask in 0u8..15 {
            let weight = (mask & 1 != 0).then_some(70.0);
            let height = (mask & 2 != 0).then_some(170.0);
            let age = (mask & 4 != 0).then_some(25);
            let activity = (mask & 8 != 0).then_some(ActivityLevel::Moderate);
            let result = estimate(weight, height, age, activity);
            assert_eq!(result, TdeeEstimate::NotComputable, "mask {:04b}", mask);
            assert_eq!(result.as_kcal(), 0);
        }
    }

    #[test]
    fn test_positive_across_bounds() {
        for weight in [30.0, 115.0, 200.0] {
            for height in [100.0, 175.0, 250.0] {
                for age in [10, 55, 100] {
                    for level in LEVELS {
                        let kcal = estimate(Some(weight), Some(height), Some(age), Some(level)).as_kcal();
                        assert!(kcal > 0, "{} {} {} {:?}", weight, height, age, level);
                    }
                }
            }
        }
    }

    #[test]
    fn test_monotonic_in_each_metric() {
        for level in LEVELS {
            let at = |w: f64, h: f64, a: u32| estimate(Some(w), Some(h), Some(a), Some(level)).as_kcal();

            let mut prev = 0;
            for w in (30..=200).step_by(10) {
                let kcal = at(f64::from(w), 170.0, 40);
                assert!(kcal >= prev);
                prev = kcal;
            }
            assert!(at(31.0, 170.0, 40) > at(30.0, 170.0, 40));

            let mut prev = 0;
            for h in (100..=250).step_by(10) {
                let kcal = at(70.0, f64::from(h), 40);
                assert!(kcal >= prev);
                prev = kcal;
            }

            let mut prev = u32::MAX;
            for a in (10..=100).step_by(5) {
                let kcal = at(70.0, 170.0, a);
                assert!(kcal <= prev);
                prev = kcal;
            }
            assert!(at(70.0, 170.0, 20) > at(70.0, 170.0, 60));
        }
    }

    #[test]
    fn test_unknown_activity_defaults_to_low() {
        assert_eq!(activity_multiplier("couch potato"), 1.2);
        assert_eq!(activity_multiplier("moderate"), 1.55);
        assert_eq!(
            estimate_raw("70", "170", "25", "sometimes"),
            estimate(Some(70.0), Some(170.0), Some(25), Some(ActivityLevel::Low))
        );
    }

    #[test]
    fn test_raw_input_missing_or_non_numeric() {
        assert_eq!(estimate_raw("", "170", "25", "Low"), TdeeEstimate::NotComputable);
        assert_eq!(estimate_raw("70", "170", "25", " "), TdeeEstimate::NotComputable);
        assert_eq!(estimate_raw("seventy", "170", "25", "Low"), TdeeEstimate::NotComputable);
        assert_eq!(estimate_raw("70", "170", "25.5", "Low"), TdeeEstimate::NotComputable);
        assert_eq!(estimate_raw(" 70 ", "170", "25", "Low"), TdeeEstimate::Kcal(1971));
    }

    #[test]
    fn test_profile_tdee_uses_profile_formula() {
        let mut profile = UserProfile {
            age: Some(30),
            weight_kg: Some(60.0),
            height_cm: Some(160.0),
            activity_level: Some(ActivityLevel::Moderate),
            ..Default::default()
        };
        assert_eq!(profile.tdee(), TdeeEstimate::Kcal(2255));
        profile.bmr_formula = BmrFormula::MifflinStJeorFemale;
        assert!(profile.tdee().as_kcal() < 2255);
    }

    #[test]
    fn test_display() {
        assert_eq!(TdeeEstimate::Kcal(2255).to_string(), "2255 kcal");
        assert_eq!(TdeeEstimate::NotComputable.to_string(), "not computable");
    }
}
