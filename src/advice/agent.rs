use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::advisor::AdvisorProfile;
use crate::error::ServiceError;
use crate::food::formatter::BREAKDOWN_MARKER;
use crate::providers::traits::{AdviceProvider, CompletionProvider, SearchResult, WebSearchProvider};

const MAX_FOOD_QUERIES: usize = 3;

/// Advice model backed by web search.
///
/// Each request searches the web for the foods in the analysis and the
/// user's goal, then asks the completion model for a plan with those results
/// attached. Search is best-effort; the completion call is not.
pub struct AdviceAgent {
    profile: AdvisorProfile,
    completion: Box<dyn CompletionProvider + Send + Sync>,
    search: Box<dyn WebSearchProvider + Send + Sync>,
}

impl AdviceAgent {
    pub fn new(
        profile: AdvisorProfile,
        completion: Box<dyn CompletionProvider + Send + Sync>,
        search: Box<dyn WebSearchProvider + Send + Sync>,
    ) -> Self {
        Self { profile, completion, search }
    }

    async fn gather_web_context(&self, queries: &[String]) -> Vec<(String, Vec<SearchResult>)> {
        let mut context = Vec::new();
        for query in queries {
            match self.search.search(query).await {
                Ok(results) if !results.is_empty() => {
                    debug!(query = %query, count = results.len(), "web search results");
                    context.push((query.clone(), results));
                }
                Ok(_) => debug!(query = %query, "web search returned nothing"),
                Err(e) => {
                    warn!(query = %query, error = %e, "web search failed; continuing without it");
                }
            }
        }
        context
    }
}

#[async_trait]
impl AdviceProvider for AdviceAgent {
    async fn advise(&self, analysis: &str) -> Result<String, ServiceError> {
        let queries = search_queries(analysis);
        info!(advisor = %self.profile, queries = queries.len(), "preparing advice");

        let context = self.gather_web_context(&queries).await;
        let prompt = build_prompt(analysis, &context);

        self.completion
            .complete(&self.profile.generate_system_prompt(), &prompt)
            .await
    }
}

/// Food item names from the numbered `**Item**` lines of the breakdown.
pub fn food_items(analysis: &str) -> Vec<String> {
    let breakdown = analysis
        .find(BREAKDOWN_MARKER)
        .map(|k| &analysis[k + BREAKDOWN_MARKER.len()..])
        .unwrap_or(analysis);

    let mut items: Vec<String> = Vec::new();
    for line in breakdown.lines() {
        let line = line.trim_start();
        let Some(rest) = strip_list_number(line) else {
            continue;
        };
        let Some(name) = bold_text(rest) else {
            continue;
        };
        let name = name.trim_matches(|c: char| c == '[' || c == ']').trim();
        if name.is_empty() || name.ends_with(':') {
            continue;
        }
        if !items.iter().any(|i| i.eq_ignore_ascii_case(name)) {
            items.push(name.to_string());
        }
    }
    items
}

/// Value of a `- Label: value` bullet in the analysis header.
pub fn bullet_value<'a>(analysis: &'a str, label: &str) -> Option<&'a str> {
    let prefix = format!("- {}:", label);
    analysis
        .lines()
        .find_map(|line| line.trim().strip_prefix(prefix.as_str()))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Search queries for one advice request: a few foods, then the goal and diet.
pub fn search_queries(analysis: &str) -> Vec<String> {
    let mut queries: Vec<String> = food_items(analysis)
        .into_iter()
        .take(MAX_FOOD_QUERIES)
        .map(|food| format!("{} nutrition facts", food))
        .collect();

    let goal = bullet_value(analysis, "Fitness Goal");
    let diet = bullet_value(analysis, "Dietary Preference");
    match (diet, goal) {
        (Some(diet), Some(goal)) => queries.push(format!("{} diet plan for {}", diet, goal.to_lowercase())),
        (None, Some(goal)) => queries.push(format!("diet and workout plan for {}", goal.to_lowercase())),
        (Some(diet), None) => queries.push(format!("{} diet meal ideas", diet)),
        (None, None) => {}
    }
    queries
}

pub fn build_prompt(analysis: &str, context: &[(String, Vec<SearchResult>)]) -> String {
    let mut prompt = format!("Here is the user's meal analysis:\n\n{}\n", analysis);

    if context.is_empty() {
        prompt.push_str("\nNo web search results are available; rely on your own knowledge.\n");
    } else {
        prompt.push_str("\nWeb search results:\n");
        for (query, results) in context {
            prompt.push_str(&format!("\n### {}\n", query));
            for result in results {
                if result.snippet.is_empty() {
                    prompt.push_str(&format!("- [{}]({})\n", result.title, result.url));
                } else {
                    prompt.push_str(&format!("- [{}]({}): {}\n", result.title, result.url, result.snippet));
                }
            }
        }
    }

    prompt.push_str("\nUsing the analysis and the results above, write personalized diet, workout and lifestyle advice.");
    prompt
}

fn strip_list_number(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.').map(str::trim_start)
}

fn bold_text(s: &str) -> Option<&str> {
    let start = s.find("**")? + 2;
    let len = s[start..].find("**")?;
    Some(&s[start..start + len])
}
