use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::ServiceError;
use crate::providers::traits::{SearchResult, WebSearchProvider};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) meal-lens/0.1";

/// Web search through DuckDuckGo's HTML endpoint (no API key required).
#[derive(Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new(endpoint: impl Into<String>, max_results: usize) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            max_results,
        }
    }
}

#[async_trait]
impl WebSearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ServiceError> {
        debug!(query, "searching DuckDuckGo");

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status: status.as_u16(), body });
        }

        let html = response.text().await?;
        Ok(parse_results(&html, self.max_results))
    }
}

/// Parses a DuckDuckGo HTML results page.
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let (Ok(result_sel), Ok(link_sel), Ok(snippet_sel)) = (
        Selector::parse("div.result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    document
        .select(&result_sel)
        .filter_map(|result| {
            let link = result.select(&link_sel).next()?;
            let title = collapse_whitespace(&link.text().collect::<String>());
            let url = resolve_link(link.value().attr("href")?)?;
            let snippet = result
                .select(&snippet_sel)
                .next()
                .map(|s| collapse_whitespace(&s.text().collect::<String>()))
                .unwrap_or_default();

            (!title.is_empty()).then_some(SearchResult { title, url, snippet })
        })
        .take(max_results)
        .collect()
}

/// DuckDuckGo wraps result links in a redirect (`//duckduckgo.com/l/?uddg=...`);
/// unwrap it to the target URL.
fn resolve_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{}", href)
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    if parsed.path() == "/l/" {
        if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
            return Some(target.into_owned());
        }
    }
    Some(parsed.to_string())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
