use super::decode::decode_batch;
use super::{NewsBatch, NewsFetcher};
use crate::config::GeminiConfig;
use crate::error::QueryError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    default_query: String,
    client: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, default_query: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("cybershield/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            default_query: default_query.into(),
            client,
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// The topic actually sent: the query if it has any content, else the default topic.
    pub fn resolve_topic<'a>(&'a self, query: Option<&'a str>) -> &'a str {
        match query.map(str::trim) {
            Some(q) if !q.is_empty() => q,
            _ => &self.default_query,
        }
    }

    /// Request body for `generateContent`: grounded search plus a JSON response schema.
    pub fn build_request(&self, topic: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(topic) }]
            }],
            "tools": [{ "google_search": {} }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

fn build_prompt(topic: &str) -> String {
    format!(
        "Search for the latest and most impactful cybersecurity news related to: \"{}\".\n\
         Return the data in a structured JSON format following this schema:\n\
         - articles: Array of objects with title, summary, source, url, publishedAt, \
         category (one of: General, Breach, Ransomware, Policy, Exploit, Economics), \
         relevanceScore (0-100), sentiment (positive, negative, neutral), and 3 keywords.\n\
         - insights: An object with threatLevel (Low, Moderate, High, Critical), \
         topTrends (list of 3-5 strings), and a brief overall summary of the current landscape.\n\n\
         Ensure you use Google Search grounding for accuracy.",
        topic
    )
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "articles": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "summary": { "type": "STRING" },
                        "source": { "type": "STRING" },
                        "url": { "type": "STRING" },
                        "publishedAt": { "type": "STRING" },
                        "category": { "type": "STRING" },
                        "relevanceScore": { "type": "NUMBER" },
                        "sentiment": { "type": "STRING" },
                        "keywords": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["title", "summary", "source", "url", "category", "relevanceScore"]
                }
            },
            "insights": {
                "type": "OBJECT",
                "properties": {
                    "threatLevel": { "type": "STRING" },
                    "topTrends": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" }
                    },
                    "summary": { "type": "STRING" }
                },
                "required": ["threatLevel", "topTrends", "summary"]
            }
        }
    })
}

/// Concatenate the text parts of the first candidate. No candidate means an empty payload.
fn payload_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl NewsFetcher for GeminiClient {
    async fn fetch(&self, query: Option<&str>) -> Result<NewsBatch, QueryError> {
        let topic = self.resolve_topic(query);
        debug!(model = %self.model, topic, "querying gemini");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(topic))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&body);
            warn!(%status, %message, "gemini request rejected");
            return Err(QueryError::Api { status, message });
        }

        let envelope: GenerateContentResponse = if body.trim().is_empty() {
            GenerateContentResponse::default()
        } else {
            serde_json::from_str(&body)?
        };

        let stamp = chrono::Utc::now().timestamp_millis();
        let batch = decode_batch(&payload_text(envelope), stamp)?;

        info!(
            topic,
            items = batch.items.len(),
            threat_level = %batch.insights.threat_level,
            "gemini query complete"
        );

        Ok(batch)
    }
}
