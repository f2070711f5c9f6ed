use super::profile::{yes_no, UserProfile};
use super::tdee::TdeeEstimate;

/// Instruction sent to the vision model with every meal photo.
pub const BASE_PROMPT: &str = r#"
You are an expert AI nutritional consultant 🧑‍⚕️ analyzing food items and drinks from an image 📸.
Identify each food item or drink component visible, estimate its calorie count 🔢, and give a brief nutritional overview (estimated protein, carbs, fats and vitamins where possible). Aim for the most informative answer the image allows.

Present the information clearly for each item, followed by the total estimated calories if several items are present. Use emojis to keep it engaging!

Also include:
1. 🕐 **Meal Time Relevance**: based on the composition of the food, suggest the best time to eat it (breakfast, lunch, dinner, snack, avoid late at night, ...) and why.
2. 🚦 **Health Traffic Light Indicators**: for each food item, rate the sugar, salt and saturated fat levels independently using:
    - 🟢 Green: Healthy/low
    - 🟡 Amber: Moderate/acceptable
    - 🔴 Red: High, caution

Format your response like this:

**Detailed Breakdown:**

1.  **[Food Item Name 1]** 🍎
    * Calories: ~[Number] kcal
    * Nutrition Notes: [Brief notes, e.g. good source of fiber, high in sugar, estimated protein/carbs/fats]
    * Meal Time Relevance: [e.g. Breakfast, Snack]
    * Health Traffic Light Indicators: [e.g. Sugar: 🟢, Salt: 🟡, Saturated Fat: 🔴]
2.  **[Food Item Name 2]** 🍕
    * Calories: ~[Number] kcal
    * Nutrition Notes: [Brief notes]
    * Meal Time Relevance: [e.g. Lunch, Dinner]
    * Health Traffic Light Indicators: [e.g. Sugar: 🟢, Salt: 🟡, Saturated Fat: 🔴]
3.  **[Food/Drink Item Name 3]** (if applicable)
    * Calories: ~[Number] kcal
    * Nutrition Notes: [Brief notes]
    * Meal Time Relevance: [e.g. Snack]
    * Health Traffic Light Indicators: [e.g. Sugar: 🟢, Salt: 🟡, Saturated Fat: 🔴]

---
**Total Estimated Calories:** ~[Total Calories] kcal 📊

---
**Expert Nutritional Insights & Considerations:** 💡
[Give a nutritional summary based *specifically* on the items identified in the image, covering:
* 🍽️ **Overall Meal Profile:** (balanced? high in carbs, fat or protein?)
* ✅ **Key Benefits:** (positive nutritional aspects of the main ingredients)
* ⚠️ **Potential Considerations/Side Effects:** (high sodium, sugar or saturated fat if applicable and the effects of overconsumption; stay factual and avoid overly strong warnings)
* ❤️‍🩹 **Notes for Health Conditions:** (general considerations for people managing high blood pressure or diabetes, e.g. sodium for BP, carbohydrate/sugar for diabetes; suggest moderation or healthier preparation where relevant)
* ℹ️ **Disclaimer:** End **explicitly** with this sentence: "Note: This information is for general awareness and educational purposes only, and does not substitute professional medical or nutritional advice. Consult with a healthcare provider for personalized guidance."]

---

**🎯 Health & Weather Considerations:**
- **High Blood Pressure:** ❤️‍🩹 [If the user answered 'Yes' for high blood pressure, rate the meal's sodium content (low/moderate/high) and suggest specific adjustments such as cutting processed items or adding potassium-rich foods.]
- **High Blood Sugar:** 🩸 [If the user answered 'Yes' for high blood sugar, rate the meal's likely glycemic impact (low/moderate/high) and suggest focusing on fiber, protein or low-GI alternatives relevant to the meal.]
- **Weather:** ☀️🌧️❄️ [Based on the selected weather ([Summer/Rainy/Winter/Moderate]), say whether the meal suits it (hydrating/warming) and suggest small adjustments such as portion size or weather-appropriate sides.]

---
**✅ Personalized Suggestions:**
- Based on the Fitness Goal ([Weight Loss/Muscle Gain/etc.]): You may want to add [lean protein/greens/healthy fats] or reduce [sugar/fried components] to better support your goal.
- Based on Dietary Preference ([Keto/Low Carb/etc.]): This meal seems [compatible/partially compatible/not compatible] with a [Preference] diet because [reason]. Consider [specific adjustments such as swapping rice for cauliflower rice or dropping a sugary sauce].
"#;

const CONTEXT_INTRO: &str = "Here is some context about the user:";
const TAILOR_INSTRUCTION: &str = "Please use this information to tailor your response, especially the 'Health & Weather Considerations' and 'Personalized Suggestions' sections.";

/// One sentence per profile field that is present, in a fixed order.
pub fn context_clauses(profile: &UserProfile, tdee: TdeeEstimate) -> Vec<String> {
    let mut clauses = Vec::new();

    if let Some(name) = profile.display_name() {
        clauses.push(format!("The user's name is {}.", name));
    }
    if let Some(age) = profile.age {
        clauses.push(format!("The user is {} years old.", age));
    }
    if let Some(weight) = profile.weight_kg {
        clauses.push(format!("The user weighs {:.1} kg.", weight));
    }
    if let Some(height) = profile.height_cm {
        clauses.push(format!("The user is {:.1} cm tall.", height));
    }
    if let Some(activity) = profile.activity_level {
        clauses.push(format!("The user's activity level is {}.", activity));
    }
    if let Some(diet) = profile.dietary_preference {
        clauses.push(format!("The user's dietary preference is {}.", diet));
    }
    if let Some(goal) = profile.fitness_goal {
        clauses.push(format!("The user's fitness goal is {}.", goal));
    }
    if let Some(kcal) = tdee.kcal() {
        clauses.push(format!("The user's estimated daily calorie needs are {} kcal.", kcal));
    }
    if let Some(bp) = profile.high_blood_pressure {
        clauses.push(format!("The user has high blood pressure: {}.", yes_no(bp)));
    }
    if let Some(sugar) = profile.high_blood_sugar {
        clauses.push(format!("The user has high blood sugar: {}.", yes_no(sugar)));
    }
    if let Some(weather) = profile.weather {
        clauses.push(format!("The current weather is {}.", weather));
    }

    clauses
}

/// Builds the prompt for the vision model. Without any profile context the
/// template is returned unchanged; otherwise the context preamble is put in
/// front of it.
pub fn compose(base_template: &str, profile: &UserProfile, tdee: TdeeEstimate) -> String {
    let clauses = context_clauses(profile, tdee);
    if clauses.is_empty() {
        return base_template.to_string();
    }

    format!(
        "{} {} {} {}",
        CONTEXT_INTRO,
        clauses.join(" "),
        TAILOR_INSTRUCTION,
        base_template
    )
}
