use super::profile::{yes_no, UserProfile};
use super::tdee::TdeeEstimate;

/// Where the structured part of the model's answer begins.
pub const BREAKDOWN_MARKER: &str = "Detailed Breakdown:";

pub const GREETING_PREFIX: &str = "👋 Hello";

const INTRO: &str = "Here is the nutritional breakdown of your meal, considering your inputs:";

pub fn greeting(profile: &UserProfile) -> String {
    match profile.display_name() {
        Some(name) => format!("{} {},", GREETING_PREFIX, name),
        None => format!("{},", GREETING_PREFIX),
    }
}

/// `- Label: value` lines for the profile fields that are present.
pub fn input_bullets(profile: &UserProfile, tdee: TdeeEstimate) -> Vec<String> {
    let mut bullets = Vec::new();

    if let Some(age) = profile.age {
        bullets.push(format!("- Age: {} years", age));
    }
    if let Some(weight) = profile.weight_kg {
        bullets.push(format!("- Weight: {:.1} kg", weight));
    }
    if let Some(height) = profile.height_cm {
        bullets.push(format!("- Height: {:.1} cm", height));
    }
    if let Some(activity) = profile.activity_level {
        bullets.push(format!("- Activity Level: {}", activity));
    }
    if let Some(diet) = profile.dietary_preference {
        bullets.push(format!("- Dietary Preference: {}", diet));
    }
    if let Some(goal) = profile.fitness_goal {
        bullets.push(format!("- Fitness Goal: {}", goal));
    }
    if let Some(kcal) = tdee.kcal() {
        bullets.push(format!("- Estimated Daily Calorie Needs: {} kcal", kcal));
    }
    if let Some(bp) = profile.high_blood_pressure {
        bullets.push(format!("- High Blood Pressure: {}", yes_no(bp)));
    }
    if let Some(sugar) = profile.high_blood_sugar {
        bullets.push(format!("- High Blood Sugar: {}", yes_no(sugar)));
    }
    if let Some(weather) = profile.weather {
        bullets.push(format!("- Weather: {}", weather));
    }

    bullets
}

/// Greeting line plus the block listing which inputs were used.
pub fn header(profile: &UserProfile, tdee: TdeeEstimate) -> String {
    let mut header = format!("{}\n{}\n", greeting(profile), INTRO);
    let bullets = input_bullets(profile, tdee);
    if !bullets.is_empty() {
        header.push('\n');
        header.push_str(&bullets.join("\n"));
        header.push('\n');
    }
    header
}

/// Puts the personalized header in front of the model's answer.
///
/// When the answer contains [`BREAKDOWN_MARKER`], everything from the marker
/// on is kept byte for byte and whatever preceded it is dropped. Otherwise the
/// whole answer is appended unchanged.
pub fn format(raw_model_text: &str, profile: &UserProfile, tdee: TdeeEstimate) -> String {
    let body = match raw_model_text.find(BREAKDOWN_MARKER) {
        Some(k) => &raw_model_text[k..],
        None => {
            tracing::debug!("model response has no breakdown marker; passing it through");
            raw_model_text
        }
    };
    format!("{}\n\n{}", header(profile, tdee), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::profile::{ActivityLevel, FitnessGoal, Weather};

    fn profile() -> UserProfile {
        UserProfile {
            name: Some("Asha".into()),
            age: Some(30),
            weight_kg: Some(60.0),
            height_cm: Some(160.0),
            activity_level: Some(ActivityLevel::Moderate),
            fitness_goal: Some(FitnessGoal::Endurance),
            high_blood_sugar: Some(true),
            weather: Some(Weather::Summer),
            ..Default::default()
        }
    }

    #[test]
    fn test_greeting_with_and_without_name() {
        assert_eq!(greeting(&profile()), "👋 Hello Asha,");
        assert_eq!(greeting(&UserProfile::default()), "👋 Hello,");
    }

    #[test]
    fn test_bullets_follow_fixed_order_and_skip_absent() {
        let p = profile();
        let bullets = input_bullets(&p, p.tdee());
        assert_eq!(
            bullets,
            vec![
                "- Age: 30 years",
                "- Weight: 60.0 kg",
                "- Height: 160.0 cm",
                "- Activity Level: Moderate",
                "- Fitness Goal: Endurance",
                "- Estimated Daily Calorie Needs: 2255 kcal",
                "- High Blood Sugar: Yes",
                "- Weather: Summer",
            ]
        );
    }

    #[test]
    fn test_splices_from_marker() {
        let raw = "Sure! Here you go.\n**Detailed Breakdown:**\n\n1. **Rice** 🍚\n   * Calories: ~200 kcal\n";
        let k = raw.find(BREAKDOWN_MARKER).unwrap();
        let p = profile();
        let out = format(raw, &p, p.tdee());

        assert!(out.starts_with("👋 Hello Asha,\n"));
        assert!(out.ends_with(&raw[k..]));
        assert!(!out.contains("Sure! Here you go."));
        assert_eq!(out, format!("{}\n\n{}", header(&p, p.tdee()), &raw[k..]));
    }

    #[test]
    fn test_fallback_keeps_everything() {
        let raw = "  I could not find structured data, but this looks like a salad.  \n";
        let p = UserProfile::default();
        let out = format(raw, &p, TdeeEstimate::NotComputable);
        assert_eq!(
            out,
            format!(
                "👋 Hello,\nHere is the nutritional breakdown of your meal, considering your inputs:\n\n\n{}",
                raw
            )
        );
        assert!(out.ends_with(raw));
    }

    #[test]
    fn test_format_is_idempotent() {
        let raw = "x\nDetailed Breakdown: one item";
        let p = profile();
        assert_eq!(format(raw, &p, p.tdee()), format(raw, &p, p.tdee()));
    }

    #[test]
    fn test_header_without_inputs_has_no_bullets() {
        let h = header(&UserProfile { name: Some("Bo".into()), ..Default::default() }, TdeeEstimate::NotComputable);
        assert_eq!(h, "👋 Hello Bo,\nHere is the nutritional breakdown of your meal, considering your inputs:\n");
    }
}
