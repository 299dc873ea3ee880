//! Activity Provider
//!
//! Trait seam between the reconciliation worker and the external platform.
//! Production uses [`YouTubeFactory`] (reqwest with a bounded timeout);
//! tests inject scripted fakes.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Provider errors — always recovered locally by skipping the affected
/// account for the current pass.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Credential rejected: {0}")]
    Credential(String),

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// One item from an account's recent-activity feed.
///
/// `event_id` and `kind` are extracted up front; `raw` keeps the full
/// payload for computed point rules.
#[derive(Debug, Clone)]
pub struct ActivityItem {
    pub event_id: Option<String>,
    pub kind: Option<String>,
    pub raw: Value,
}

/// A live client for one linked account.
#[async_trait]
pub trait ActivityProvider: Send + Sync {
    /// Lightweight probe that the credential is still valid.
    async fn verify(&self) -> Result<(), ProviderError>;

    /// Bounded page of recent activity, provider-defined order.
    async fn recent_activities(&self) -> Result<Vec<ActivityItem>, ProviderError>;
}

/// Builds a provider client from a stored token blob.
pub trait ProviderFactory: Send + Sync {
    /// `None` means the token is malformed — the worker skips the account
    /// for this pass without raising.
    fn build(&self, token: &str) -> Option<Box<dyn ActivityProvider>>;
}

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const ACTIVITY_PAGE_SIZE: &str = "25";

/// YouTube Data API factory
///
/// One shared reqwest client; the per-request timeout bounds every probe
/// and fetch so a provider hang cannot stall the periodic schedule.
pub struct YouTubeFactory {
    client: reqwest::Client,
}

impl YouTubeFactory {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Request(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl ProviderFactory for YouTubeFactory {
    fn build(&self, token: &str) -> Option<Box<dyn ActivityProvider>> {
        let parsed: Value = serde_json::from_str(token).ok()?;
        let access_token = parsed.get("access_token")?.as_str()?.to_string();
        Some(Box::new(YouTubeProvider {
            client: self.client.clone(),
            access_token,
        }))
    }
}

/// YouTube Data API client for one account
struct YouTubeProvider {
    client: reqwest::Client,
    access_token: String,
}

#[async_trait]
impl ActivityProvider for YouTubeProvider {
    async fn verify(&self) -> Result<(), ProviderError> {
        let resp = self
            .client
            .get(format!("{YOUTUBE_API_BASE}/subscriptions"))
            .query(&[("part", "id"), ("mine", "true")])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ProviderError::Credential(format!(
                "Subscription probe returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn recent_activities(&self) -> Result<Vec<ActivityItem>, ProviderError> {
        let resp = self
            .client
            .get(format!("{YOUTUBE_API_BASE}/activities"))
            .query(&[
                ("part", "snippet,contentDetails"),
                ("mine", "true"),
                ("maxResults", ACTIVITY_PAGE_SIZE),
            ])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ProviderError::Request(format!(
                "Activity fetch returned {}",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(items.into_iter().map(parse_activity_item).collect())
    }
}

fn parse_activity_item(item: Value) -> ActivityItem {
    ActivityItem {
        event_id: item.get("id").and_then(Value::as_str).map(str::to_string),
        kind: item
            .pointer("/snippet/type")
            .and_then(Value::as_str)
            .map(str::to_string),
        raw: item,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn factory_rejects_malformed_tokens() {
        let factory = YouTubeFactory::new(Duration::from_secs(1)).unwrap();
        assert!(factory.build("not json").is_none());
        assert!(factory.build(r#"{"refresh_token":"x"}"#).is_none());
        assert!(factory.build(r#"{"access_token":"tok"}"#).is_some());
    }

    #[test]
    fn parse_activity_item_extracts_id_and_kind() {
        let item = parse_activity_item(json!({
            "id": "ev-1",
            "snippet": {"type": "comment"},
        }));
        assert_eq!(item.event_id.as_deref(), Some("ev-1"));
        assert_eq!(item.kind.as_deref(), Some("comment"));

        let bare = parse_activity_item(json!({"snippet": {}}));
        assert!(bare.event_id.is_none());
        assert!(bare.kind.is_none());
    }
}
