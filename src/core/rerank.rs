//! Remote re-ranking of search candidates through an OpenAI-compatible
//! chat-completions endpoint.
//!
//! The request carries the query and a compact view of every candidate and
//! asks for `{"results":[{"id", "score"}]}`.  Anything that does not parse
//! into that shape is "no results" and the caller keeps its local order.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::search::SearchCandidate;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Settings of the optional remote re-rank.  Each value can be baked in at
/// build time through the same environment variable names.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRankConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for RemoteRankConfig {
    fn default() -> Self {
        Self {
            enabled: option_env!("FOLIO_REMOTE_RANK").is_some_and(parse_flag),
            api_key: option_env!("FOLIO_RANK_API_KEY").map(str::to_string),
            endpoint: option_env!("FOLIO_RANK_ENDPOINT")
                .unwrap_or(DEFAULT_ENDPOINT)
                .to_string(),
            model: option_env!("FOLIO_RANK_MODEL")
                .unwrap_or(DEFAULT_MODEL)
                .to_string(),
            timeout_secs: 8,
        }
    }
}

/// Truthy flag values accepted in the config file and the environment.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// One remotely ranked id.  Simpler prompt variants return a `reason`
/// instead of a `score`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteHit {
    pub id: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Error)]
pub enum RerankError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ranking endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Something that can reorder candidates for a query.
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(
        &self,
        query: &str,
        candidates: &[SearchCandidate],
    ) -> Result<Vec<RemoteHit>, RerankError>;
}

const SYSTEM_PROMPT: &str = "You are a ranking function. Given a user query string and a list of \
entries, return a JSON object with an array named \"results\" of objects {id, score} sorted by \
best match, where score is a relevance between 0 and 1. Only include ids from the input list.";

#[derive(Serialize)]
struct CandidateView<'a> {
    id: &'a str,
    name: &'a str,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    tech: &'a [String],
}

/// HTTP client for the chat-completions ranking call.
pub struct ChatReranker {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ChatReranker {
    /// `None` when the feature flag is off or no credential is configured.
    pub fn from_config(config: &RemoteRankConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let api_key = config.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("remote ranking disabled, client build failed: {e}");
                return None;
            }
        };
        Some(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: api_key.to_string(),
        })
    }

    fn request_body(&self, query: &str, candidates: &[SearchCandidate]) -> serde_json::Value {
        let items: Vec<CandidateView<'_>> = candidates
            .iter()
            .map(|c| CandidateView {
                id: &c.id,
                name: &c.name,
                label: &c.secondary_label,
                description: c.description.as_deref(),
                tech: &c.tech,
            })
            .collect();
        let items_json = serde_json::to_string(&items).unwrap_or_else(|_| "[]".into());
        serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Query: {query}\nItems: {items_json}\nReturn only JSON like \
                         {{\"results\":[{{\"id\":string,\"score\":number}}]}}"
                    ),
                },
            ],
            "response_format": { "type": "json_object" },
        })
    }
}

#[async_trait]
impl Reranker for ChatReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: &[SearchCandidate],
    ) -> Result<Vec<RemoteHit>, RerankError> {
        let body = self.request_body(query, candidates);
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RerankError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json().await?;
        Ok(parse_chat_response(&json))
    }
}

/// Pull the ranking out of a chat-completions response.
pub fn parse_chat_response(json: &serde_json::Value) -> Vec<RemoteHit> {
    json.pointer("/choices/0/message/content")
        .and_then(|c| c.as_str())
        .map(parse_results)
        .unwrap_or_default()
}

/// Parse `{"results":[...]}` from the model's message content.  When every
/// hit carries a score the hits are ordered by it (stable); otherwise the
/// listed order stands.
pub fn parse_results(content: &str) -> Vec<RemoteHit> {
    #[derive(Deserialize)]
    struct Envelope {
        results: Vec<RemoteHit>,
    }

    let Ok(envelope) = serde_json::from_str::<Envelope>(content) else {
        tracing::debug!("remote ranking content had an unexpected shape");
        return Vec::new();
    };
    let mut hits = envelope.results;
    if !hits.is_empty() && hits.iter().all(|h| h.score.is_some()) {
        hits.sort_by(|a, b| {
            let (a, b) = (a.score.unwrap_or(0.0), b.score.unwrap_or(0.0));
            b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
        });
    }
    hits
}
