use colored::Colorize;
use validator::Validate;

use crate::error::NutritionError;
use crate::food::profile::{parse_yes_no, yes_no};
use crate::food::{ActivityLevel, BmrFormula, DietaryPreference, FitnessGoal, UserProfile, Weather};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Age,
    Weight,
    Height,
    Activity,
    Diet,
    Goal,
    BloodPressure,
    BloodSugar,
    Weather,
    Formula,
}

/// Field names accepted by `set` and `unset`, with their aliases.
const FIELDS: &[(Field, &str, &[&str])] = &[
    (Field::Name, "name", &[]),
    (Field::Age, "age", &[]),
    (Field::Weight, "weight", &["weight_kg"]),
    (Field::Height, "height", &["height_cm"]),
    (Field::Activity, "activity", &["activity_level"]),
    (Field::Diet, "diet", &["dietary_preference", "preference"]),
    (Field::Goal, "goal", &["fitness_goal"]),
    (Field::BloodPressure, "bp", &["blood_pressure", "high_blood_pressure"]),
    (Field::BloodSugar, "sugar", &["blood_sugar", "high_blood_sugar"]),
    (Field::Weather, "weather", &[]),
    (Field::Formula, "formula", &["bmr_formula"]),
];

pub fn field_names() -> Vec<&'static str> {
    FIELDS.iter().map(|(_, name, _)| *name).collect()
}

fn parse_field(field: &str) -> Result<Field, String> {
    let field = field.to_lowercase();
    FIELDS
        .iter()
        .find(|(_, name, aliases)| *name == field || aliases.contains(&field.as_str()))
        .map(|(f, _, _)| *f)
        .ok_or_else(|| format!("Unknown field '{}'. Fields: {}", field, field_names().join(", ")))
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a number, got '{}'", what, value.trim()))
}

fn parse_measure(value: &str, what: &str) -> Result<f64, String> {
    let measure: f64 = parse_number(value, what)?;
    if !measure.is_finite() {
        return Err(format!("{} must be a finite number, got '{}'", what, value.trim()));
    }
    Ok(measure)
}

fn parse_flag(value: &str, what: &str) -> Result<bool, String> {
    parse_yes_no(value).ok_or_else(|| format!("{} must be Yes or No, got '{}'", what, value.trim()))
}

fn parse_formula(value: &str) -> Result<BmrFormula, String> {
    match value.trim().to_lowercase().as_str() {
        "male" | "m" | "+5" | "5" => Ok(BmrFormula::MifflinStJeorMale),
        "female" | "f" | "-161" => Ok(BmrFormula::MifflinStJeorFemale),
        other => Err(format!("Unknown BMR formula '{}'. Use male or female", other)),
    }
}

/// Applies `set <field> <value>`. The profile is only changed when the new
/// value parses and stays within the accepted ranges.
pub fn set_field(profile: &mut UserProfile, field: &str, value: &str) -> Result<(), String> {
    let mut updated = profile.clone();
    match parse_field(field)? {
        Field::Name => updated.name = Some(value.trim().to_string()).filter(|n| !n.is_empty()),
        Field::Age => updated.age = Some(parse_number(value, "Age")?),
        Field::Weight => updated.weight_kg = Some(parse_measure(value, "Weight")?),
        Field::Height => updated.height_cm = Some(parse_measure(value, "Height")?),
        Field::Activity => {
            updated.activity_level = Some(value.parse::<ActivityLevel>().map_err(|e| e.to_string())?)
        }
        Field::Diet => {
            updated.dietary_preference =
                Some(value.parse::<DietaryPreference>().map_err(|e| e.to_string())?)
        }
        Field::Goal => updated.fitness_goal = Some(value.parse::<FitnessGoal>().map_err(|e| e.to_string())?),
        Field::BloodPressure => updated.high_blood_pressure = Some(parse_flag(value, "High blood pressure")?),
        Field::BloodSugar => updated.high_blood_sugar = Some(parse_flag(value, "High blood sugar")?),
        Field::Weather => updated.weather = Some(value.parse::<Weather>().map_err(|e| e.to_string())?),
        Field::Formula => updated.bmr_formula = parse_formula(value)?,
    }

    updated
        .validate()
        .map_err(|e| NutritionError::from(e).to_string())?;
    *profile = updated;
    Ok(())
}

pub fn unset_field(profile: &mut UserProfile, field: &str) -> Result<(), String> {
    match parse_field(field)? {
        Field::Name => profile.name = None,
        Field::Age => profile.age = None,
        Field::Weight => profile.weight_kg = None,
        Field::Height => profile.height_cm = None,
        Field::Activity => profile.activity_level = None,
        Field::Diet => profile.dietary_preference = None,
        Field::Goal => profile.fitness_goal = None,
        Field::BloodPressure => profile.high_blood_pressure = None,
        Field::BloodSugar => profile.high_blood_sugar = None,
        Field::Weather => profile.weather = None,
        Field::Formula => profile.bmr_formula = BmrFormula::default(),
    }
    Ok(())
}

fn show_value<T: std::fmt::Display>(value: Option<T>) -> colored::ColoredString {
    match value {
        Some(v) => v.to_string().cyan(),
        None => "not set".dimmed(),
    }
}

pub fn print_profile(profile: &UserProfile) {
    println!("\n👤 Your Profile:");
    println!("  Name:               {}", show_value(profile.display_name()));
    println!("  Age:                {}", show_value(profile.age.map(|a| format!("{} years", a))));
    println!("  Weight:             {}", show_value(profile.weight_kg.map(|w| format!("{:.1} kg", w))));
    println!("  Height:             {}", show_value(profile.height_cm.map(|h| format!("{:.1} cm", h))));
    println!("  Activity Level:     {}", show_value(profile.activity_level));
    println!("  Dietary Preference: {}", show_value(profile.dietary_preference));
    println!("  Fitness Goal:       {}", show_value(profile.fitness_goal));
    println!("  High Blood Pressure: {}", show_value(profile.high_blood_pressure.map(yes_no)));
    println!("  High Blood Sugar:   {}", show_value(profile.high_blood_sugar.map(yes_no)));
    println!("  Weather:            {}", show_value(profile.weather));
    println!();
}
