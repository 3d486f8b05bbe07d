// Popularity ranking used to seed a crawl
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::retry::{with_retry, RetryConfig};

pub const TOP_PYPI_PACKAGES_URL: &str =
    "https://hugovk.github.io/top-pypi-packages/top-pypi-packages-30-days.min.json";

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("Ranking request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RankingError>;

#[derive(Debug, Deserialize)]
struct RankingResponse {
    rows: Vec<RankingRow>,
}

#[derive(Debug, Deserialize)]
struct RankingRow {
    project: String,
    #[allow(dead_code)]
    #[serde(default)]
    download_count: Option<u64>,
}

pub struct RankingClient {
    client: reqwest::Client,
    url: String,
    user_agent: String,
    retry_config: RetryConfig,
}

impl RankingClient {
    pub fn new(url: String, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url,
            user_agent: user_agent.to_string(),
            retry_config: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetch project names, most downloaded first
    pub async fn top_packages(&self, limit: Option<usize>) -> Result<Vec<String>> {
        let body = with_retry(&self.retry_config, || async {
            let response = self.client.get(&self.url).send().await?;

            if !response.status().is_success() {
                return Err(RankingError::RequestFailed(format!(
                    "Status {}",
                    response.status()
                )));
            }

            Ok(response.text().await?)
        })
        .await?;

        let names = parse_ranking(&body, limit)?;
        info!("Fetched {} ranked packages", names.len());
        Ok(names)
    }
}

/// Pull project names out of a ranking document, keeping its order
pub fn parse_ranking(body: &str, limit: Option<usize>) -> Result<Vec<String>> {
    let response: RankingResponse = serde_json::from_str(body)?;

    Ok(response
        .rows
        .into_iter()
        .map(|row| row.project)
        .take(limit.unwrap_or(usize::MAX))
        .collect())
}
