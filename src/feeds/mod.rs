pub mod decode;
pub mod gemini;

use crate::error::QueryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_QUERY: &str = "latest cybersecurity news, breaches, and ransomware";

#[derive(Debug, Clone)]
pub struct FeedMessage {
    pub seq: u64,
    pub data: FeedData,
}

#[derive(Debug, Clone)]
pub enum FeedData {
    Batch(NewsBatch),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub published_at: String,
    pub category: Category,
    pub relevance_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub threat_level: ThreatLevel,
    pub top_trends: Vec<String>,
    pub summary: String,
}

impl Default for Insights {
    fn default() -> Self {
        Self {
            threat_level: ThreatLevel::Low,
            top_trends: Vec::new(),
            summary: "No data available.".to_string(),
        }
    }
}

/// One response from the news service: the articles plus exactly one insight snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NewsBatch {
    pub items: Vec<NewsItem>,
    pub insights: Insights,
}

/// Article category. Values the service invents are kept in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    General,
    Breach,
    Ransomware,
    Policy,
    Exploit,
    Economics,
    Unrecognized(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::General => "General",
            Category::Breach => "Breach",
            Category::Ransomware => "Ransomware",
            Category::Policy => "Policy",
            Category::Exploit => "Exploit",
            Category::Economics => "Economics",
            Category::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "general" => Category::General,
            "breach" => Category::Breach,
            "ransomware" => Category::Ransomware,
            "policy" => Category::Policy,
            "exploit" => Category::Exploit,
            "economics" => Category::Economics,
            _ => Category::Unrecognized(raw),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unrecognized(String),
}

impl Sentiment {
    pub fn as_str(&self) -> &str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Sentiment {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "neutral" => Sentiment::Neutral,
            _ => Sentiment::Unrecognized(raw),
        }
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.as_str().to_string()
    }
}

/// Coarse severity of the current landscape, as judged by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThreatLevel {
    Low,
    Moderate,
    High,
    Critical,
    Unrecognized(String),
}

impl ThreatLevel {
    pub fn as_str(&self) -> &str {
        match self {
            ThreatLevel::Low => "Low",
            ThreatLevel::Moderate => "Moderate",
            ThreatLevel::High => "High",
            ThreatLevel::Critical => "Critical",
            ThreatLevel::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for ThreatLevel {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "low" => ThreatLevel::Low,
            "moderate" => ThreatLevel::Moderate,
            "high" => ThreatLevel::High,
            "critical" => ThreatLevel::Critical,
            _ => ThreatLevel::Unrecognized(raw),
        }
    }
}

impl From<ThreatLevel> for String {
    fn from(level: ThreatLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait NewsFetcher: Send + Sync {
    /// Run one query against the news service. `None` or a blank query means the default topic.
    async fn fetch(&self, query: Option<&str>) -> Result<NewsBatch, QueryError>;
}
