use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    backoff::{Backoff, DEFAULT_BASE_DELAY},
    config::QuoteConfig,
    error::{DashboardError, Result},
    model::Quote,
};

use super::QuoteProvider;

pub const LOCAL_QUOTES: [&str; 5] = [
    "The only way to do great work is to love what you do.",
    "Believe you can and you're halfway there.",
    "It always seems impossible until it's done.",
    "Don't watch the clock; do what it does. Keep going.",
    "Success is not final, failure is not fatal: it is the courage to continue that counts.",
];

const PROMPT: &str = "Give me one short, original motivational quote.";
const SYSTEM_INSTRUCTION: &str = "You write single motivational quotes of at most two sentences. \
     Reply with the quote text only, without attribution, quotation marks or commentary.";

/// Uniformly random entry from [`LOCAL_QUOTES`].
pub fn local_quote() -> Quote {
    LOCAL_QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(LOCAL_QUOTES[0])
        .to_string()
}

/// Trims whitespace and any surrounding quote characters.
pub fn clean_quote(raw: &str) -> String {
    const QUOTE_CHARS: [char; 6] = ['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

    raw.trim_matches(|c: char| c.is_whitespace() || QUOTE_CHARS.contains(&c))
        .to_string()
}

/// Cleaned generated text, or `EmptyResponse` when nothing is left.
fn non_empty_quote(raw: &str) -> Result<Quote> {
    let cleaned = clean_quote(raw);
    if cleaned.is_empty() {
        Err(DashboardError::EmptyResponse)
    } else {
        Ok(cleaned)
    }
}

/// Quote generator backed by a generative-text endpoint.
///
/// Without an API key no request is ever made. With one, the request runs
/// through [`Backoff`], and any failure falls back to a local quote.
#[derive(Debug, Clone)]
pub struct RemoteQuoteProvider {
    api_key: Option<String>,
    base_url: String,
    model: String,
    backoff: Backoff,
    http: Client,
}

impl RemoteQuoteProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self::from_config(&QuoteConfig::default(), api_key)
    }

    pub fn from_config(config: &QuoteConfig, api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            backoff: Backoff::new(config.max_attempts, DEFAULT_BASE_DELAY),
            http: Client::new(),
        }
    }

    /// Provider that only serves local quotes.
    pub fn local_only() -> Self {
        Self::new(None)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_retry_delay(self, base_delay: Duration) -> Self {
        let max_attempts = self.backoff.max_attempts();
        self.with_backoff(Backoff::new(max_attempts, base_delay))
    }

    pub fn is_local_only(&self) -> bool {
        self.api_key.is_none()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn generate_once(&self, api_key: &str) -> Result<String> {
        let body = GenerateRequest::new(PROMPT, SYSTEM_INSTRUCTION);

        let res = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DashboardError::Http(e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| DashboardError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(DashboardError::Http(format!(
                "status {}: {}",
                status,
                truncate_body(&text)
            )));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| DashboardError::Parse(e.to_string()))?;

        parsed
            .first_text()
            .map(str::to_owned)
            .ok_or_else(|| DashboardError::Parse("missing candidates[0].content.parts[0].text".into()))
    }
}

#[async_trait]
impl QuoteProvider for RemoteQuoteProvider {
    async fn quote(&self) -> Quote {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("no API key configured, serving local quote");
            return local_quote();
        };

        let generated = self
            .backoff
            .execute(|| self.generate_once(api_key))
            .await
            .and_then(|raw| non_empty_quote(&raw));

        match generated {
            Ok(quote) => quote,
            Err(err) => {
                warn!("quote generation failed, using local quote: {err}");
                local_quote()
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str, system: &'a str) -> Self {
        Self {
            contents: vec![Content::text(prompt)],
            system_instruction: Content::text(system),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_quote_strips_quotes_and_whitespace() {
        assert_eq!(clean_quote("  \"Keep going.\"\n"), "Keep going.");
        assert_eq!(clean_quote("\u{201C}Start now.\u{201D}"), "Start now.");
        assert_eq!(clean_quote("'Don't stop.'"), "Don't stop.");
        assert_eq!(clean_quote(" \" ' "), "");
    }

    #[test]
    fn blank_generated_text_is_an_empty_response() {
        assert_eq!(non_empty_quote(" \"\" \n"), Err(DashboardError::EmptyResponse));
        assert_eq!(non_empty_quote("'Go on.'"), Ok("Go on.".to_string()));
    }

    #[test]
    fn local_quote_comes_from_fixed_list() {
        for _ in 0..50 {
            let quote = local_quote();
            assert!(LOCAL_QUOTES.contains(&quote.as_str()));
        }
    }

    #[test]
    fn request_body_has_prompt_and_system_instruction() {
        let body = serde_json::to_value(GenerateRequest::new("p", "s")).expect("serialize");

        assert_eq!(body["contents"][0]["parts"][0]["text"], "p");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "s");
    }

    #[test]
    fn response_text_extraction_handles_missing_pieces() {
        let full: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hi"}]}}]}"#,
        )
        .expect("parse");
        assert_eq!(full.first_text(), Some("Hi"));

        let empty: GenerateResponse = serde_json::from_str("{}").expect("parse");
        assert_eq!(empty.first_text(), None);

        let no_parts: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).expect("parse");
        assert_eq!(no_parts.first_text(), None);
    }

    #[test]
    fn blank_api_key_means_local_only() {
        assert!(RemoteQuoteProvider::new(Some("  ".into())).is_local_only());
        assert!(RemoteQuoteProvider::local_only().is_local_only());
        assert!(!RemoteQuoteProvider::new(Some("KEY".into())).is_local_only());
    }

    #[test]
    fn endpoint_includes_model() {
        let provider = RemoteQuoteProvider::new(Some("KEY".into())).with_base_url("http://host/");

        assert_eq!(
            provider.endpoint(),
            "http://host/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[tokio::test]
    async fn local_only_provider_never_touches_network() {
        let provider = RemoteQuoteProvider::local_only().with_base_url("http://127.0.0.1:1");

        let quote = provider.quote().await;

        assert!(LOCAL_QUOTES.contains(&quote.as_str()));
    }
}
