use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::advice::summary::FOOTER;
use crate::error::NutritionError;
use crate::food::tdee::{estimate_raw, TdeeEstimate};
use crate::food::MealImage;
use crate::session::Session;
use crate::workflow::MealWorkflow;

mod profile;
mod system;

pub use profile::{set_field, unset_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Exit,
}

/// Interactive shell state: one session and the workflow that drives it.
pub struct CommandHandler {
    session: Session,
    workflow: MealWorkflow,
}

impl CommandHandler {
    pub fn new(workflow: MealWorkflow) -> Self {
        Self {
            session: Session::new(),
            workflow,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<CommandOutcome, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(CommandOutcome::Continue);
        }

        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command.to_lowercase().as_str() {
            "help" => system::print_help(),
            "exit" | "quit" => {
                system::print_goodbye();
                return Ok(CommandOutcome::Exit);
            }
            "profile" => profile::print_profile(&self.session.profile),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or("Usage: set <field> <value>")?;
                set_field(&mut self.session.profile, field, value)?;
                println!("✅ {} updated", field.cyan());
            }
            "unset" => {
                if rest.is_empty() {
                    return Err("Usage: unset <field>".to_string());
                }
                unset_field(&mut self.session.profile, rest)?;
                println!("🧹 {} cleared", rest.cyan());
            }
            "tdee" if rest.is_empty() => show_tdee(
                self.session.profile.tdee(),
                "Set age, weight, height and activity first.",
            ),
            "tdee" => show_tdee(quick_tdee(rest)?, "Weight, height and age must be plain numbers."),
            "image" => self.load_image(rest)?,
            "analyze" => self.analyze().await?,
            "advice" => self.advise().await?,
            "show" => self.show_results(),
            _ => return Err(format!("Unknown command '{}'. Type 'help' for available commands.", command)),
        }
        Ok(CommandOutcome::Continue)
    }

    fn load_image(&mut self, path: &str) -> Result<(), String> {
        if path.is_empty() {
            return Err("Usage: image <path>".to_string());
        }
        let image = MealImage::open(Path::new(path)).map_err(|e| e.to_string())?;
        let (width, height) = image.dimensions();
        self.session.attach_image(image);
        println!("📸 Loaded {} ({}x{})", path.bright_yellow(), width, height);
        Ok(())
    }

    async fn analyze(&mut self) -> Result<(), String> {
        let spinner = "🔍 Analyzing your meal...";
        let result = with_spinner(spinner, self.workflow.analyze(&mut self.session)).await;

        match result {
            Ok(analysis) => {
                println!("\n🔬 Nutritional Analysis:");
                println!("{}", analysis.text.truecolor(255, 236, 179));
                println!("\n💡 Type 'advice' for a personalized diet and workout plan.");
                Ok(())
            }
            Err(NutritionError::MissingFields(fields)) => {
                println!("{}", "⚠️ Please complete the following required fields:".yellow());
                for field in &fields {
                    println!("  - {}", field);
                }
                Err("Analysis not started.".to_string())
            }
            Err(e) => Err(format!("❌ {}", e)),
        }
    }

    async fn advise(&mut self) -> Result<(), String> {
        let advice = with_spinner("🤖 Searching the web...", self.workflow.advise(&mut self.session))
            .await
            .map_err(|e| format!("❌ Web search failed: {}", e))?;

        println!("\n{}", advice.summary.truecolor(255, 236, 179));
        println!("\n{}", FOOTER.dimmed());
        Ok(())
    }

    fn show_results(&self) {
        match self.session.analysis() {
            Some(analysis) => {
                println!("\n🔬 Nutritional Analysis ({}):", analysis.created_at.format("%H:%M:%S"));
                println!("{}", analysis.text.truecolor(255, 236, 179));
            }
            None => println!("No analysis yet. Load a photo with 'image <path>' and run 'analyze'."),
        }

        if let Some(advice) = self.session.advice() {
            println!("\n{}", advice.summary.truecolor(255, 236, 179));
            println!("\n{}", FOOTER.dimmed());
        }
    }
}

fn show_tdee(tdee: TdeeEstimate, hint: &str) {
    match tdee.kcal() {
        Some(kcal) => println!("🔥 Est. Daily Needs (TDEE): {}", format!("{} kcal", kcal).green().bold()),
        None => println!("{}", format!("🔥 TDEE not computable. {}", hint).yellow()),
    }
}

/// `tdee <weight> <height> <age> <activity>` without touching the profile.
/// The activity level may be several words and falls back to Low.
fn quick_tdee(args: &str) -> Result<TdeeEstimate, String> {
    let mut parts = args.splitn(4, char::is_whitespace);
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(weight), Some(height), Some(age), Some(activity)) => {
            Ok(estimate_raw(weight, height, age, activity))
        }
        _ => Err("Usage: tdee [<weight kg> <height cm> <age> <activity>]".to_string()),
    }
}

/// Runs `task` with a terminal spinner.
async fn with_spinner<F: Future>(message: &str, task: F) -> F::Output {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    let output = task.await;
    pb.finish_and_clear();
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::tests::{FakeAdvisor, FakeVision};
    use std::sync::Arc;

    fn handler(vision: FakeVision) -> CommandHandler {
        CommandHandler::new(MealWorkflow::new(Arc::new(vision), Arc::new(FakeAdvisor::default())))
    }

    fn png_file() -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("meal-{}.png", uuid::Uuid::new_v4()));
        std::fs::write(&path, crate::food::meal_image::tests::png_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_full_session_through_commands() {
        let mut handler = handler(FakeVision::default());
        for command in [
            "set name Asha",
            "set age 30",
            "set weight 70",
            "set height 175",
            "set activity moderate",
            "set diet vegetarian",
            "set goal weight loss",
        ] {
            assert_eq!(handler.handle_command(command).await, Ok(CommandOutcome::Continue));
        }

        let path = png_file();
        handler.handle_command(&format!("image {}", path.display())).await.unwrap();
        std::fs::remove_file(&path).ok();

        handler.handle_command("analyze").await.unwrap();
        assert!(handler.session().analysis().is_some());

        handler.handle_command("advice").await.unwrap();
        assert!(handler.session().advice().is_some());
    }

    #[tokio::test]
    async fn test_analyze_refuses_incomplete_profile() {
        let mut handler = handler(FakeVision::default());
        let path = png_file();
        handler.handle_command(&format!("image {}", path.display())).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert!(handler.handle_command("analyze").await.is_err());
        assert!(handler.session().analysis().is_none());
        assert!(handler.session().image().is_some());
    }

    #[test]
    fn test_quick_tdee_from_typed_values() {
        assert_eq!(quick_tdee("70 170 25 low"), Ok(TdeeEstimate::Kcal(1971)));
        assert_eq!(quick_tdee("70 170 25 couch potato"), Ok(TdeeEstimate::Kcal(1971)));
        assert_eq!(quick_tdee("seventy 170 25 low"), Ok(TdeeEstimate::NotComputable));
        assert!(quick_tdee("70 170").is_err());
    }

    #[tokio::test]
    async fn test_quick_tdee_leaves_profile_alone() {
        let mut handler = handler(FakeVision::default());
        assert!(handler.handle_command("tdee 70 170 25 moderate").await.is_ok());
        assert!(handler.handle_command("tdee 70").await.is_err());
        assert!(handler.session().profile.weight_kg.is_none());
    }

    #[tokio::test]
    async fn test_errors_and_exit() {
        let mut handler = handler(FakeVision::default());
        assert!(handler.handle_command("image photo.gif").await.is_err());
        assert!(handler.handle_command("set age").await.is_err());
        assert!(handler.handle_command("advice").await.is_err());
        assert!(handler.handle_command("dance").await.is_err());
        assert_eq!(handler.handle_command("  ").await, Ok(CommandOutcome::Continue));
        assert_eq!(handler.handle_command("exit").await, Ok(CommandOutcome::Exit));
    }
}
