use super::{Category, Insights, NewsBatch, NewsItem, Sentiment, ThreatLevel};
use crate::error::QueryError;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    title: String,
    summary: String,
    source: String,
    url: String,
    #[serde(default)]
    published_at: Option<String>,
    category: Category,
    relevance_score: f64,
    #[serde(default)]
    sentiment: Option<Sentiment>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInsights {
    #[serde(default)]
    threat_level: Option<ThreatLevel>,
    #[serde(default)]
    top_trends: Option<Vec<String>>,
    #[serde(default)]
    summary: Option<String>,
}

impl From<WireInsights> for Insights {
    fn from(wire: WireInsights) -> Self {
        let fallback = Insights::default();
        Self {
            threat_level: wire.threat_level.unwrap_or(fallback.threat_level),
            top_trends: wire.top_trends.unwrap_or(fallback.top_trends),
            summary: wire.summary.unwrap_or(fallback.summary),
        }
    }
}

/// Decode the service's text payload into a batch.
///
/// A blank payload counts as `{}`. Missing `articles` gives no items, missing
/// `insights` gives [`Insights::default`]. Every article present must carry the
/// required fields; the first one that doesn't fails the whole batch.
/// Ids are `"{stamp}-{index}"`, so they are unique within one batch.
pub fn decode_batch(text: &str, stamp: i64) -> Result<NewsBatch, QueryError> {
    let text = strip_code_fence(text);
    let root = if text.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str(text)?
    };

    let mut root = match root {
        Value::Object(map) => map,
        other => {
            return Err(QueryError::InvalidPayload(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let articles = match root.remove("articles") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(articles)) => articles,
        Some(other) => {
            return Err(QueryError::InvalidPayload(format!(
                "`articles` must be an array, got {}",
                json_kind(&other)
            )))
        }
    };

    let items = articles
        .into_iter()
        .enumerate()
        .map(|(index, value)| decode_article(index, value, stamp))
        .collect::<Result<Vec<_>, _>>()?;

    let insights = match root.remove("insights") {
        None | Some(Value::Null) => Insights::default(),
        Some(value @ Value::Object(_)) => serde_json::from_value::<WireInsights>(value)
            .map(Insights::from)
            .map_err(|e| QueryError::InvalidPayload(format!("`insights`: {}", e)))?,
        Some(other) => {
            return Err(QueryError::InvalidPayload(format!(
                "`insights` must be an object, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(NewsBatch { items, insights })
}

fn decode_article(index: usize, value: Value, stamp: i64) -> Result<NewsItem, QueryError> {
    let wire: WireArticle =
        serde_json::from_value(value).map_err(|e| QueryError::InvalidArticle {
            index,
            reason: e.to_string(),
        })?;

    Ok(NewsItem {
        id: format!("{}-{}", stamp, index),
        title: wire.title,
        summary: wire.summary,
        source: wire.source,
        url: wire.url,
        published_at: wire.published_at.unwrap_or_default(),
        category: wire.category,
        relevance_score: wire.relevance_score,
        sentiment: wire.sentiment,
        keywords: wire.keywords.unwrap_or_default(),
    })
}

/// Grounded responses sometimes arrive wrapped in a markdown ```json fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SCENARIO_A: &str = r#"{"articles": [{"title":"X","summary":"Y","source":"Z","url":"http://a","category":"Breach","relevanceScore":90}], "insights": {"threatLevel":"Critical","topTrends":["ransomware"],"summary":"Spike detected"}}"#;

    fn article(title: &str) -> Value {
        serde_json::json!({
            "title": title,
            "summary": "summary",
            "source": "source",
            "url": "https://example.com",
            "category": "Exploit",
            "relevanceScore": 55
        })
    }

    #[test]
    fn test_decode_full_payload() {
        let batch = decode_batch(SCENARIO_A, 1700000000000).unwrap();
        assert_eq!(batch.items.len(), 1);

        let item = &batch.items[0];
        assert_eq!(item.id, "1700000000000-0");
        assert_eq!(item.title, "X");
        assert_eq!(item.category, Category::Breach);
        assert_eq!(item.relevance_score, 90.0);
        assert_eq!(item.published_at, "");
        assert!(item.keywords.is_empty());
        assert_eq!(item.sentiment, None);

        assert_eq!(batch.insights.threat_level, ThreatLevel::Critical);
        assert_eq!(batch.insights.top_trends, vec!["ransomware".to_string()]);
        assert_eq!(batch.insights.summary, "Spike detected");
    }

    #[test]
    fn test_missing_insights_uses_default() {
        let payload = serde_json::json!({ "articles": [article("a")] }).to_string();
        let batch = decode_batch(&payload, 1).unwrap();
        assert_eq!(batch.insights, Insights::default());
    }

    #[test]
    fn test_null_insights_uses_default() {
        let batch = decode_batch(r#"{"insights": null}"#, 1).unwrap();
        assert_eq!(batch.insights, Insights::default());
    }

    #[test]
    fn test_missing_articles_is_empty_not_error() {
        let batch = decode_batch(
            r#"{"insights": {"threatLevel":"High","topTrends":[],"summary":"s"}}"#,
            1,
        )
        .unwrap();
        assert!(batch.items.is_empty());
        assert_eq!(batch.insights.threat_level, ThreatLevel::High);
    }

    #[test]
    fn test_empty_object_and_blank_payload() {
        for payload in ["{}", "", "   \n"] {
            let batch = decode_batch(payload, 1).unwrap();
            assert!(batch.items.is_empty());
            assert_eq!(batch.insights, Insights::default());
        }
    }

    #[test]
    fn test_ids_unique_within_batch() {
        let articles: Vec<Value> = (0..25).map(|i| article(&format!("t{}", i))).collect();
        let payload = serde_json::json!({ "articles": articles }).to_string();
        let batch = decode_batch(&payload, 42).unwrap();

        let ids: HashSet<&str> = batch.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), 25);
        assert_eq!(batch.items[24].id, "42-24");
    }

    #[test]
    fn test_partial_insights_fill_missing_fields() {
        let batch = decode_batch(r#"{"insights": {"threatLevel":"Moderate"}}"#, 1).unwrap();
        assert_eq!(batch.insights.threat_level, ThreatLevel::Moderate);
        assert!(batch.insights.top_trends.is_empty());
        assert_eq!(batch.insights.summary, "No data available.");
    }

    #[test]
    fn test_open_enums_pass_through() {
        let payload = r#"{"articles": [{"title":"t","summary":"s","source":"src","url":"u","category":"Cloud","relevanceScore":120.5,"sentiment":"mixed","keywords":["a","b","c","d"]}], "insights": {"threatLevel":"Elevated","topTrends":[],"summary":""}}"#;
        let batch = decode_batch(payload, 1).unwrap();
        let item = &batch.items[0];
        assert_eq!(item.category, Category::Unrecognized("Cloud".to_string()));
        assert_eq!(item.relevance_score, 120.5);
        assert_eq!(
            item.sentiment,
            Some(Sentiment::Unrecognized("mixed".to_string()))
        );
        assert_eq!(item.keywords.len(), 4);
        assert_eq!(
            batch.insights.threat_level,
            ThreatLevel::Unrecognized("Elevated".to_string())
        );
    }

    #[test]
    fn test_article_missing_required_field() {
        let mut bad = article("b");
        bad.as_object_mut().unwrap().remove("url");
        let payload = serde_json::json!({ "articles": [article("a"), bad] }).to_string();

        match decode_batch(&payload, 1) {
            Err(QueryError::InvalidArticle { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("url"), "reason was: {}", reason);
            }
            other => panic!("expected InvalidArticle, got {:?}", other),
        }
    }

    #[test]
    fn test_article_wrong_score_type() {
        let mut bad = article("a");
        bad["relevanceScore"] = Value::String("high".to_string());
        let payload = serde_json::json!({ "articles": [bad] }).to_string();
        assert!(matches!(
            decode_batch(&payload, 1),
            Err(QueryError::InvalidArticle { index: 0, .. })
        ));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            decode_batch("Here is the news you asked for", 1),
            Err(QueryError::Decode(_))
        ));
    }

    #[test]
    fn test_top_level_array_rejected() {
        assert!(matches!(
            decode_batch("[1, 2]", 1),
            Err(QueryError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_articles_wrong_type_rejected() {
        assert!(matches!(
            decode_batch(r#"{"articles": "none"}"#, 1),
            Err(QueryError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_code_fenced_payload() {
        let fenced = format!("```json\n{}\n```", SCENARIO_A);
        let batch = decode_batch(&fenced, 1).unwrap();
        assert_eq!(batch.items.len(), 1);
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }
}
