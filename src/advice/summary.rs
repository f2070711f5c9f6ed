use crate::food::formatter::GREETING_PREFIX;

/// Lines the advisor sometimes echoes back from its input.
const ECHO_MARKER: &str = "User Data (from";

pub const DEFAULT_USER_LABEL: &str = "User";

pub const STATIC_RECOMMENDATIONS: &str = "\
---

### 📝 AI-Powered Recommendations:
- ✅ Choose low-sodium and low-sugar options where possible.
- 🥗 Add fiber-rich veggies (spinach, broccoli, kale) for gut health and blood sugar support.
- 💧 Stay hydrated: aim for 2-3 liters per day, especially in summer.
- 🧘 Incorporate movement (e.g., yoga, walks, light strength training) aligned with your fitness goal.
- 📏 Control portion sizes, especially carbs and sauces, for better calorie management.
- 🔁 Revisit your plan every 1-2 weeks and tweak based on your progress and energy levels.

- 🧘 **Yoga & Meditation Tips:**
- 🧘‍♀️ Practice a short yoga flow to increase flexibility and reduce stress.
- 🕉️ Consider meditation to improve mindfulness and balance.
- 🌅 Try morning stretches to energize your day and improve circulation.

---";

pub const FOOTER: &str =
    "AI estimations are approximate. Consult professionals for precise advice.";

/// Drops the lines where the advisor restates the user's data.
pub fn clean_advice(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.contains(ECHO_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Name to address the summary to, taken from the analysis greeting.
pub fn user_label(analysis: &str) -> String {
    analysis
        .lines()
        .find(|line| line.contains(GREETING_PREFIX))
        .map(|line| {
            line.replacen(GREETING_PREFIX, "", 1)
                .trim()
                .trim_matches(',')
                .trim()
                .to_string()
        })
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| DEFAULT_USER_LABEL.to_string())
}

/// Cleaned advice followed by the fixed recommendations block.
pub fn personalized_summary(raw: &str, analysis: &str) -> String {
    format!(
        "### 📌 Personalized Summary for {}\n\n{}\n\n{}",
        user_label(analysis),
        clean_advice(raw),
        STATIC_RECOMMENDATIONS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_advice_drops_echo_lines() {
        let raw = "## 🥗 Diet Plan\nUser Data (from analysis): Asha, 30\n- Breakfast: oats\n**User Data (from image)**";
        assert_eq!(clean_advice(raw), "## 🥗 Diet Plan\n- Breakfast: oats");
    }

    #[test]
    fn test_user_label_from_greeting() {
        let analysis = "👋 Hello Asha,\nHere is the nutritional breakdown";
        assert_eq!(user_label(analysis), "Asha");
    }

    #[test]
    fn test_user_label_defaults() {
        assert_eq!(user_label("no greeting here"), "User");
        assert_eq!(user_label("👋 Hello ,"), "User");
    }

    #[test]
    fn test_summary_appends_recommendations() {
        let summary = personalized_summary("Eat greens.", "👋 Hello Ravi,");
        assert!(summary.starts_with("### 📌 Personalized Summary for Ravi"));
        assert!(summary.contains("Eat greens."));
        assert!(summary.ends_with(STATIC_RECOMMENDATIONS));
        assert!(summary.contains("Yoga & Meditation Tips"));
    }
}
