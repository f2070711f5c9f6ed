use colored::Colorize;

use super::profile::field_names;

pub fn print_help() {
    println!("\n🍽️ Meal Analysis Commands:");
    println!("  image <path>   - Load a meal photo (jpg, jpeg, png)");
    println!("  analyze        - Analyze the loaded photo with your profile");
    println!("  advice         - Get web-augmented diet, workout and yoga advice");
    println!("  show           - Show the latest analysis and advice");
    println!();

    println!("👤 Profile Commands:");
    println!("  profile                - Show your profile");
    println!("  set <field> <value>    - Set a profile field");
    println!("  unset <field>          - Clear a profile field");
    println!("  tdee                   - Show your estimated daily calorie needs");
    println!("  tdee <w> <h> <age> <activity> - Estimate for other values");
    println!("  Fields: {}", field_names().join(", ").cyan());
    println!("  Example: set activity moderate, set goal weight loss, set bp no");
    println!();

    println!("⚙️ System Commands:");
    println!("  help  - Show this help menu");
    println!("  exit  - Exit the program");
    println!();
}

pub fn print_goodbye() {
    println!("👋 Goodbye!");
}
