use super::profile::UserProfile;

/// Lists every required field that is still missing, in form order.
///
/// The analysis may only run once this returns an empty list.
pub fn missing_required_fields(profile: &UserProfile) -> Vec<String> {
    let mut messages = Vec::new();

    if profile.display_name().is_none() {
        messages.push("Please enter your name");
    }
    if profile.age.is_none() {
        messages.push("Please enter your age");
    }
    if profile.weight_kg.is_none() {
        messages.push("Please enter your weight");
    }
    if profile.height_cm.is_none() {
        messages.push("Please enter your height");
    }
    if profile.activity_level.is_none() {
        messages.push("Please select your activity level");
    }
    if profile.dietary_preference.is_none() {
        messages.push("Please select your dietary preference");
    }
    if profile.fitness_goal.is_none() {
        messages.push("Please select your fitness goal");
    }

    messages.into_iter().map(String::from).collect()
}
