//! Contest identifier lookup against the contest listing API.

use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Opaque identifier of one contest leaderboard. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContestId(String);

impl ContestId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ScrapeError::Resolution("contest identifier is empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read a JSON cell, rejecting the values JavaScript would treat as falsy
    pub fn from_cell(cell: &Value) -> Result<Self> {
        match cell {
            Value::String(s) => Self::new(s.as_str()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Self::new(n.to_string()),
            other => Err(ScrapeError::Resolution(format!("contest identifier is not usable: {}", other))),
        }
    }
}

impl fmt::Display for ContestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can name the contest to scrape
#[async_trait]
pub trait ContestSource: Send + Sync {
    async fn resolve(&self) -> Result<ContestId>;
}

/// Body of the contest listing API: a table of rows, identifier in the first column
#[derive(Debug, Deserialize)]
struct ContestListing {
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

/// Pull the identifier out of `data[0][0]`
pub fn parse_listing(body: &str) -> Result<ContestId> {
    let listing: ContestListing =
        serde_json::from_str(body).map_err(|e| ScrapeError::Resolution(format!("malformed listing JSON: {}", e)))?;

    let cell = listing
        .data
        .first()
        .and_then(|row| row.first())
        .ok_or_else(|| ScrapeError::Resolution("contest listing has no rows".to_string()))?;

    ContestId::from_cell(cell)
}

/// Resolves the contest with one GET against the listing API. No retries.
#[derive(Debug, Clone)]
pub struct ContestResolver {
    client: reqwest::Client,
    api_url: String,
}

impl ContestResolver {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScrapeError::Resolution(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, api_url: api_url.into() })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl ContestSource for ContestResolver {
    async fn resolve(&self) -> Result<ContestId> {
        log::debug!("Fetching contest listing from {}", self.api_url);

        let response = self
            .client
            .get(&self.api_url)
            .send()
            .await
            .map_err(|e| ScrapeError::Resolution(format!("contest API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Resolution(format!("contest API returned {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::Resolution(format!("Failed to read contest API body: {}", e)))?;

        let contest = parse_listing(&body)?;
        log::info!("Resolved contest {}", contest);
        Ok(contest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_cell_of_first_row() {
        let body = json!({ "data": [["ABC123", "Weekly"], ["XYZ", "Older"]] }).to_string();
        assert_eq!(parse_listing(&body).unwrap().as_str(), "ABC123");
    }

    #[test]
    fn test_numeric_identifier() {
        let body = json!({ "data": [[684512, "Weekly", 1733642420751u64]] }).to_string();
        assert_eq!(parse_listing(&body).unwrap().as_str(), "684512");
    }

    #[test]
    fn test_empty_data_is_resolution_error() {
        let err = parse_listing(r#"{"data": []}"#).unwrap_err();
        assert!(matches!(err, ScrapeError::Resolution(_)));

        let err = parse_listing(r#"{"recordsTotal": 0}"#).unwrap_err();
        assert!(matches!(err, ScrapeError::Resolution(_)));

        let err = parse_listing(r#"{"data": [[]]}"#).unwrap_err();
        assert!(matches!(err, ScrapeError::Resolution(_)));
    }

    #[test]
    fn test_falsy_identifiers_rejected() {
        for cell in [json!(""), json!("   "), json!(0), json!(null), json!(false)] {
            let body = json!({ "data": [[cell]] }).to_string();
            assert!(parse_listing(&body).is_err(), "accepted {}", body);
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_listing("<html>rate limited</html>").unwrap_err();
        assert!(err.to_string().contains("malformed listing JSON"));
    }
}
